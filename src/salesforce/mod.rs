// src/salesforce/mod.rs
//! Reads raw records out of Salesforce.
//!
//! SOQL-backed datasets are queried through the REST query endpoint and
//! followed through `nextRecordsUrl` pages; the facilities dataset comes from
//! a custom Apex REST endpoint.

pub mod auth;
pub mod error;
pub mod query;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::datasets::{DatasetDescriptor, RecordSource, SOQL_QUERY_PATH};
use crate::settings::{Secrets, HTTP_TIMEOUT};
pub use auth::Credentials;
use auth::Session;
pub use error::{ExtractError, ExtractResult};
use query::{ApexBody, QueryPage};

/// Source of raw, nested records for a dataset.
pub trait Extractor {
    fn get_records(&mut self, dataset: &DatasetDescriptor) -> ExtractResult<Vec<Value>>;
}

pub struct SalesforceClient {
    http: Client,
    login_url: String,
    credentials: Credentials,
    session: Option<Session>,
}

impl SalesforceClient {
    pub fn new(org: &str, credentials: Credentials, sandbox: bool) -> ExtractResult<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            login_url: auth::login_url(org, sandbox),
            credentials,
            session: None,
        })
    }

    /// Sandbox user in development, API user in production.
    pub fn from_secrets(secrets: &Secrets) -> ExtractResult<Self> {
        let credentials = if secrets.is_dev {
            Credentials::Sandbox {
                username: secrets.sf_username.clone(),
                password: secrets.sf_password.clone(),
                security_token: String::new(),
                client_id: secrets.sf_client_id.clone(),
                client_secret: secrets.sf_client_secret.clone(),
            }
        } else {
            Credentials::ApiUser {
                client_id: secrets.sf_client_id.clone(),
                client_secret: secrets.sf_client_secret.clone(),
            }
        };
        Self::new(&secrets.sf_org, credentials, secrets.is_dev)
    }

    fn session(&mut self) -> ExtractResult<Session> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = auth::request_session(&self.http, &self.login_url, &self.credentials)?;
        info!("Authenticated with Salesforce at {}", session.instance_url);
        self.session = Some(session.clone());
        Ok(session)
    }

    fn get_json(&self, session: &Session, url: &str, params: &[(&str, &str)]) -> ExtractResult<Value> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&session.access_token)
            .query(params)
            .send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        query::read_body(url, status, &text)
    }

    fn get_page(&self, session: &Session, path: &str) -> ExtractResult<QueryPage> {
        let url = join_url(&session.instance_url, path);
        serde_json::from_value(self.get_json(session, &url, &[])?)
            .map_err(|e| ExtractError::UnexpectedShape(e.to_string()))
    }
}

impl Extractor for SalesforceClient {
    fn get_records(&mut self, dataset: &DatasetDescriptor) -> ExtractResult<Vec<Value>> {
        let session = self.session()?;

        let records = match &dataset.source {
            RecordSource::Apex { path } => {
                info!("{}: loading records from {}", dataset.key, path);
                let url = join_url(&session.instance_url, path);
                match query::parse_apex_body(self.get_json(&session, &url, &[])?)? {
                    ApexBody::Records(records) => records,
                    ApexBody::Page(page) => query::collect_pages(page, |path| self.get_page(&session, path))?,
                }
            }
            RecordSource::Soql { .. } => {
                let soql = dataset.soql_query().unwrap_or_default();
                info!("{}: querying Salesforce: {}", dataset.key, soql);
                let url = join_url(&session.instance_url, SOQL_QUERY_PATH);
                let first: QueryPage =
                    serde_json::from_value(self.get_json(&session, &url, &[("q", soql.as_str())])?)
                        .map_err(|e| ExtractError::UnexpectedShape(e.to_string()))?;
                query::collect_pages(first, |path| self.get_page(&session, path))?
            }
        };

        info!("{}: extracted {} records", dataset.key, records.len());
        Ok(records.into_iter().map(query::strip_attributes).collect())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
