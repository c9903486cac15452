// src/salesforce/auth.rs
//! OAuth2 tokens for the Salesforce REST API.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::error::{ExtractError, ExtractResult};

const TOKEN_PATH: &str = "services/oauth2/token";

#[derive(Clone)]
pub enum Credentials {
    /// Named sandbox user; password grant.
    Sandbox {
        username: String,
        password: String,
        security_token: String,
        client_id: String,
        client_secret: String,
    },
    /// Integration user of a connected app; client-credentials grant.
    ApiUser {
        client_id: String,
        client_secret: String,
    },
}

impl Credentials {
    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            Credentials::Sandbox {
                username,
                password,
                security_token,
                client_id,
                client_secret,
            } => vec![
                ("grant_type", "password".to_string()),
                ("username", username.clone()),
                ("password", format!("{}{}", password, security_token)),
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
            ],
            Credentials::ApiUser {
                client_id,
                client_secret,
            } => vec![
                ("grant_type", "client_credentials".to_string()),
                ("client_id", client_id.clone()),
                ("client_secret", client_secret.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub instance_url: String,
}

/// `https://<org>.my.salesforce.com`, or the sandbox host.
pub fn login_url(org: &str, sandbox: bool) -> String {
    if sandbox {
        format!("https://{}.sandbox.my.salesforce.com", org)
    } else {
        format!("https://{}.my.salesforce.com", org)
    }
}

pub fn request_session(
    http: &Client,
    login_url: &str,
    credentials: &Credentials,
) -> ExtractResult<Session> {
    let url = format!("{}/{}", login_url.trim_end_matches('/'), TOKEN_PATH);
    debug!("Requesting Salesforce access token from {}", url);

    let response = http.post(&url).form(&credentials.form()).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::Auth {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }
    Ok(response.json::<Session>()?)
}
