// src/agol/portal.rs
//! Response handling shared by the sharing (portal) and feature service APIs.

use serde::Deserialize;
use serde_json::Value;

use super::error::{LoadError, LoadResult};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub expires: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ItemInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// ArcGIS answers HTTP 200 with `{"error": {...}}` on failure.
pub fn check_response(body: Value) -> LoadResult<Value> {
    match body.get("error") {
        Some(error) => {
            let error: ServiceError = serde_json::from_value(error.clone())
                .map_err(|e| LoadError::UnexpectedShape(e.to_string()))?;
            let mut message = error.message;
            if !error.details.is_empty() {
                message = format!("{} ({})", message, error.details.join("; "));
            }
            Err(LoadError::Service {
                code: error.code,
                message,
            })
        }
        None => Ok(body),
    }
}

/// `.../rest/services/<name>/FeatureServer` -> `.../rest/admin/services/<name>/FeatureServer`
pub fn admin_url(service_url: &str) -> String {
    service_url.replacen("/rest/services/", "/rest/admin/services/", 1)
}

/// First layer (or table) id advertised by the service root.
pub fn first_id(service_info: &Value, collection: &str) -> Option<u64> {
    service_info
        .get(collection)?
        .as_array()?
        .first()?
        .get("id")?
        .as_u64()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub succeeded: usize,
    pub rejected: usize,
    pub first_error: Option<String>,
}

pub fn summarize_add_results(body: &Value) -> LoadResult<EditSummary> {
    let results = body
        .get("addResults")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::UnexpectedShape("addFeatures returned no addResults".to_string()))?;

    let mut summary = EditSummary::default();
    for result in results {
        if result.get("success").and_then(Value::as_bool) == Some(true) {
            summary.succeeded += 1;
        } else {
            summary.rejected += 1;
            if summary.first_error.is_none() {
                summary.first_error = Some(
                    result
                        .pointer("/error/description")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                );
            }
        }
    }
    Ok(summary)
}

pub fn is_success(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}
