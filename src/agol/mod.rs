// src/agol/mod.rs
//! Writes assembled tables into hosted feature layers on ArcGIS Online.
//!
//! A routine load truncates the layer and adds every row again, then checks
//! the feature count. Nothing is diffed.

pub mod error;
pub mod features;
pub mod portal;
pub mod publish;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::datasets::LayerKind;
use crate::settings::{Secrets, HTTP_TIMEOUT};
use crate::spatial::SpatialTable;
pub use error::{LoadError, LoadResult};
use portal::{ItemInfo, TokenResponse};
pub use publish::{PublishedItem, Publisher};

const TOKEN_EXPIRATION_MINUTES: &str = "120";
pub const ADD_BATCH_SIZE: usize = 500;

/// Destination for an assembled table.
pub trait Loader {
    /// Replaces the contents of the layer behind `item_id`; returns the number
    /// of rows loaded.
    fn truncate_and_load(&mut self, item_id: &str, table: &SpatialTable) -> LoadResult<usize>;
}

pub struct ArcGisClient {
    http: Client,
    org_url: String,
    username: String,
    password: String,
    token: Option<String>,
}

impl ArcGisClient {
    pub fn new(org_url: &str, username: &str, password: &str) -> LoadResult<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            org_url: org_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            token: None,
        })
    }

    pub fn from_secrets(secrets: &Secrets) -> LoadResult<Self> {
        Self::new(&secrets.agol_org, &secrets.agol_user, &secrets.agol_password)
    }

    pub(crate) fn sharing_url(&self, path: &str) -> String {
        format!("{}/sharing/rest/{}", self.org_url, path.trim_start_matches('/'))
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn token(&mut self) -> LoadResult<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        let url = self.sharing_url("generateToken");
        debug!("Requesting ArcGIS token for {}", self.username);
        let form = [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("referer", self.org_url.as_str()),
            ("client", "referer"),
            ("expiration", TOKEN_EXPIRATION_MINUTES),
            ("f", "json"),
        ];
        let response = self.http.post(&url).form(&form).send()?;
        let body = portal::check_response(read_json(&url, response)?)?;
        let token: TokenResponse =
            serde_json::from_value(body).map_err(|e| LoadError::UnexpectedShape(e.to_string()))?;
        info!("Authenticated with ArcGIS Online as {}", self.username);
        if let Some(expires) = token.expires.and_then(chrono::DateTime::from_timestamp_millis) {
            debug!("ArcGIS token expires {}", expires);
        }
        self.token = Some(token.token.clone());
        Ok(token.token)
    }

    pub(crate) fn get(&mut self, url: &str, params: &[(&str, &str)]) -> LoadResult<Value> {
        let token = self.token()?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("f", "json"), ("token", token.as_str())])
            .header("Referer", &self.org_url)
            .send()?;
        portal::check_response(read_json(url, response)?)
    }

    pub(crate) fn post(&mut self, url: &str, form: &[(&str, String)]) -> LoadResult<Value> {
        let token = self.token()?;
        debug!("POST {}", url);
        let mut fields: Vec<(&str, String)> = form.to_vec();
        fields.push(("f", "json".to_string()));
        fields.push(("token", token));
        let response = self
            .http
            .post(url)
            .form(&fields)
            .header("Referer", &self.org_url)
            .send()?;
        portal::check_response(read_json(url, response)?)
    }

    pub fn item(&mut self, item_id: &str) -> LoadResult<ItemInfo> {
        let url = self.sharing_url(&format!("content/items/{}", item_id));
        let body = self.get(&url, &[])?;
        serde_json::from_value(body).map_err(|e| LoadError::UnexpectedShape(e.to_string()))
    }

    /// URL of the single layer or table a skid item holds.
    pub fn layer_url(&mut self, item_id: &str, kind: &LayerKind) -> LoadResult<(String, u64)> {
        let item = self.item(item_id)?;
        debug!("Item {} is '{}' ({})", item.id, item.title, item.item_type);
        let service_url = item
            .url
            .ok_or_else(|| LoadError::NotAFeatureService(item_id.to_string()))?;
        let info = self.get(&service_url, &[])?;
        let collection = if kind.is_layer() { "layers" } else { "tables" };
        let id = portal::first_id(&info, collection).ok_or(LoadError::LayerNotFound {
            url: service_url.clone(),
            wanted: collection,
        })?;
        Ok((service_url, id))
    }

    pub fn truncate(&mut self, service_url: &str, layer_id: u64) -> LoadResult<()> {
        let url = format!("{}/{}/truncate", portal::admin_url(service_url), layer_id);
        info!("Truncating {}", url);
        let body = self.post(&url, &[("async", "false".to_string())])?;
        if !portal::is_success(&body) {
            return Err(LoadError::UnexpectedShape(format!("truncate did not succeed: {}", body)));
        }
        Ok(())
    }

    pub fn add_features(&mut self, layer_url: &str, table: &SpatialTable) -> LoadResult<usize> {
        let url = format!("{}/addFeatures", layer_url);
        add_in_batches(table, |features| {
            self.post(
                &url,
                &[
                    ("features", serde_json::to_string(&features)?),
                    ("rollbackOnFailure", "true".to_string()),
                ],
            )
        })
    }

    pub fn feature_count(&mut self, layer_url: &str) -> LoadResult<usize> {
        let url = format!("{}/query", layer_url);
        let body = self.get(&url, &[("where", "1=1"), ("returnCountOnly", "true")])?;
        body.get("count")
            .and_then(Value::as_u64)
            .map(|c| c as usize)
            .ok_or_else(|| LoadError::UnexpectedShape(format!("count query returned {}", body)))
    }

    pub(crate) fn load_into(&mut self, service_url: &str, layer_id: u64, table: &SpatialTable) -> LoadResult<usize> {
        let layer_url = format!("{}/{}", service_url, layer_id);
        self.truncate(service_url, layer_id)?;
        let added = self.add_features(&layer_url, table)?;

        check_count(table.len(), self.feature_count(&layer_url)?)?;
        info!("Loaded {} rows into {}", added, layer_url);
        Ok(added)
    }
}

impl Loader for ArcGisClient {
    fn truncate_and_load(&mut self, item_id: &str, table: &SpatialTable) -> LoadResult<usize> {
        let (service_url, layer_id) = self.layer_url(item_id, &table.kind)?;
        self.load_into(&service_url, layer_id, table)
    }
}

/// Sends `table` in chunks of `ADD_BATCH_SIZE`; the first batch with a
/// rejected feature stops the load.
fn add_in_batches<F>(table: &SpatialTable, mut post_batch: F) -> LoadResult<usize>
where
    F: FnMut(Value) -> LoadResult<Value>,
{
    let mut added = 0;

    for (batch, rows) in table.rows.chunks(ADD_BATCH_SIZE).enumerate() {
        let body = post_batch(features::features_json(rows, table))?;
        let summary = portal::summarize_add_results(&body)?;
        if summary.rejected > 0 {
            return Err(LoadError::FeaturesRejected {
                attempted: rows.len(),
                rejected: summary.rejected,
                first_error: summary.first_error.unwrap_or_default(),
            });
        }
        added += summary.succeeded;
        debug!("Batch {}: added {} features ({} total)", batch + 1, summary.succeeded, added);
    }

    Ok(added)
}

fn check_count(expected: usize, found: usize) -> LoadResult<()> {
    if found != expected {
        return Err(LoadError::CountMismatch { expected, found });
    }
    Ok(())
}

fn read_json(url: &str, response: reqwest::blocking::Response) -> LoadResult<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FlatRecord;
    use crate::settings::test_secrets;
    use crate::spatial::SpatialRow;
    use serde_json::json;

    #[test]
    fn test_sharing_url_trims_org_slash() {
        let client = ArcGisClient::new("https://utah.maps.arcgis.com/", "u", "p").unwrap();
        assert_eq!(
            client.sharing_url("content/items/abc"),
            "https://utah.maps.arcgis.com/sharing/rest/content/items/abc"
        );
    }

    #[test]
    fn test_from_secrets() {
        let client = ArcGisClient::from_secrets(&test_secrets()).unwrap();
        assert_eq!(client.username(), "skid_user");
        assert!(client.token.is_none());
    }

    fn table_of(rows: usize) -> SpatialTable {
        SpatialTable {
            kind: LayerKind::Table,
            rows: (0..rows)
                .map(|_| SpatialRow {
                    attributes: FlatRecord::default(),
                    geometry: None,
                })
                .collect(),
            dropped: 0,
        }
    }

    fn all_added(features: &Value) -> Value {
        let n = features.as_array().map_or(0, Vec::len);
        json!({ "addResults": vec![json!({"success": true}); n] })
    }

    #[test]
    fn test_add_in_batches_splits_at_batch_size() {
        let table = table_of(1001);
        let mut sizes = Vec::new();

        let added = add_in_batches(&table, |features| {
            sizes.push(features.as_array().map_or(0, Vec::len));
            Ok(all_added(&features))
        })
        .unwrap();

        assert_eq!(sizes, vec![500, 500, 1]);
        assert_eq!(added, 1001);
    }

    #[test]
    fn test_rejected_feature_stops_loading() {
        let table = table_of(1001);
        let mut posts = 0;

        let result = add_in_batches(&table, |features| {
            posts += 1;
            let mut body = all_added(&features);
            body["addResults"][3] = json!({"success": false, "error": {"code": 1000, "description": "bad date"}});
            Ok(body)
        });

        assert_eq!(posts, 1);
        match result {
            Err(LoadError::FeaturesRejected {
                attempted,
                rejected,
                first_error,
            }) => {
                assert_eq!(attempted, 500);
                assert_eq!(rejected, 1);
                assert_eq!(first_error, "bad date");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_posts_nothing() {
        let added = add_in_batches(&table_of(0), |_| panic!("no batch expected")).unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn test_count_mismatch() {
        assert!(check_count(12, 12).is_ok());
        assert!(matches!(
            check_count(12, 11),
            Err(LoadError::CountMismatch { expected: 12, found: 11 })
        ));
    }

    #[test]
    fn test_encode_error_message_is_not_repeated() {
        let source = serde_json::from_str::<Value>("{").unwrap_err();
        let detail = source.to_string();
        let error = LoadError::from(source);
        let chain = crate::skid::error_chain(&error);
        assert_eq!(chain.matches(&detail).count(), 1);
    }
}
