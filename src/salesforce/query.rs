// src/salesforce/query.rs
//! Response shapes returned by the query and Apex endpoints.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::{ExtractError, ExtractResult};

/// One page of a SOQL query result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    #[serde(default)]
    pub total_size: usize,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default)]
    pub records: Vec<Value>,
    #[serde(default)]
    pub next_records_url: Option<String>,
}

fn default_done() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorEntry {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    message: String,
}

/// Salesforce reports failures as `[{"errorCode": ..., "message": ...}]`.
pub fn api_error(body: &Value) -> Option<ExtractError> {
    let first = body.as_array()?.first()?;
    let entry: ApiErrorEntry = serde_json::from_value(first.clone()).ok()?;
    if entry.error_code.is_empty() {
        return None;
    }
    Some(ExtractError::Api {
        code: entry.error_code,
        message: entry.message,
    })
}

/// Turns a raw HTTP reply into JSON. Salesforce error arrays win over the
/// status; any other non-success status keeps its url and body even when the
/// body is not JSON (gateway error pages).
pub fn read_body(url: &str, status: u16, text: &str) -> ExtractResult<Value> {
    let parsed = serde_json::from_str::<Value>(text);
    if let Some(error) = parsed.as_ref().ok().and_then(api_error) {
        return Err(error);
    }
    if !(200..300).contains(&status) {
        return Err(ExtractError::Status {
            url: url.to_string(),
            status,
            body: truncate_for_log(text),
        });
    }
    parsed.map_err(|e| ExtractError::UnexpectedShape(format!("{} returned invalid JSON: {}", url, e)))
}

/// Follows `nextRecordsUrl` until a page reports `done`.
pub fn collect_pages<F>(first: QueryPage, mut fetch: F) -> ExtractResult<Vec<Value>>
where
    F: FnMut(&str) -> ExtractResult<QueryPage>,
{
    debug!("Query reports {} records in total", first.total_size);
    let mut records = first.records;
    let mut next = if first.done { None } else { first.next_records_url };

    while let Some(path) = next {
        let page = fetch(&path)?;
        debug!("Fetched {} more records", page.records.len());
        records.extend(page.records);
        next = if page.done { None } else { page.next_records_url };
    }

    Ok(records)
}

/// Drops the `attributes` metadata Salesforce adds to every record.
pub fn strip_attributes(mut record: Value) -> Value {
    if let Some(object) = record.as_object_mut() {
        object.remove("attributes");
    }
    record
}

/// Apex endpoints return either a record array, a query page, or the array
/// serialized into a JSON string.
pub enum ApexBody {
    Records(Vec<Value>),
    Page(QueryPage),
}

pub fn parse_apex_body(body: Value) -> ExtractResult<ApexBody> {
    if let Some(error) = api_error(&body) {
        return Err(error);
    }
    if body.as_object().is_some_and(|o| o.contains_key("records")) {
        let page: QueryPage = serde_json::from_value(body)
            .map_err(|e| ExtractError::UnexpectedShape(e.to_string()))?;
        return Ok(ApexBody::Page(page));
    }
    match body {
        Value::Array(records) => Ok(ApexBody::Records(records)),
        Value::String(text) => {
            let inner: Value = serde_json::from_str(&text).map_err(|e| {
                ExtractError::UnexpectedShape(format!("Apex string body is not JSON: {}", e))
            })?;
            match inner {
                Value::String(_) => Err(ExtractError::UnexpectedShape(
                    "Apex body is a doubly encoded string".to_string(),
                )),
                other => parse_apex_body(other),
            }
        }
        other => Err(ExtractError::UnexpectedShape(format!(
            "expected records, got {}",
            truncate_for_log(&other.to_string())
        ))),
    }
}

fn truncate_for_log(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_page_parses_pagination() {
        let page: QueryPage = serde_json::from_value(json!({
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v60.0/query/01g-2000",
            "records": [{"attributes": {"type": "Tank__c"}, "Name": "T-1"}]
        }))
        .unwrap();
        assert_eq!(page.total_size, 3);
        assert!(!page.done);
        assert_eq!(page.next_records_url.as_deref(), Some("/services/data/v60.0/query/01g-2000"));
    }

    #[test]
    fn test_strip_attributes() {
        let record = strip_attributes(json!({"attributes": {"type": "Tank__c"}, "Name": "T-1"}));
        assert_eq!(record, json!({"Name": "T-1"}));
    }

    #[test]
    fn test_api_error_detection() {
        let body = json!([{"errorCode": "INVALID_FIELD", "message": "No such column"}]);
        assert!(matches!(api_error(&body), Some(ExtractError::Api { code, .. }) if code == "INVALID_FIELD"));
        assert!(api_error(&json!([{"Id": "a"}])).is_none());
    }

    #[test]
    fn test_apex_body_shapes() {
        assert!(matches!(
            parse_apex_body(json!([{"Id": "a"}])).unwrap(),
            ApexBody::Records(r) if r.len() == 1
        ));
        assert!(matches!(
            parse_apex_body(json!("[{\"Id\": \"a\"}, {\"Id\": \"b\"}]")).unwrap(),
            ApexBody::Records(r) if r.len() == 2
        ));
        assert!(matches!(
            parse_apex_body(json!({"records": [], "done": true})).unwrap(),
            ApexBody::Page(_)
        ));
        assert!(parse_apex_body(json!({"unexpected": 1})).is_err());
    }

    fn page(records: Vec<Value>, done: bool, next: Option<&str>) -> QueryPage {
        QueryPage {
            total_size: 5,
            done,
            records,
            next_records_url: next.map(str::to_string),
        }
    }

    #[test]
    fn test_html_error_page_keeps_status_and_url() {
        let url = "https://utahdeq.my.salesforce.com/services/data/v60.0/query/";
        match read_body(url, 503, "<html>Service Unavailable</html>") {
            Err(ExtractError::Status { url: got, status, body }) => {
                assert_eq!(got, url);
                assert_eq!(status, 503);
                assert!(body.contains("Service Unavailable"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_error_array_wins_over_status() {
        let body = r#"[{"errorCode": "INVALID_SESSION_ID", "message": "Session expired or invalid"}]"#;
        assert!(matches!(
            read_body("u", 401, body),
            Err(ExtractError::Api { code, .. }) if code == "INVALID_SESSION_ID"
        ));
    }

    #[test]
    fn test_json_body_with_failing_status_is_status_error() {
        assert!(matches!(
            read_body("u", 500, r#"{"oops": true}"#),
            Err(ExtractError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_success_body_must_be_json() {
        assert_eq!(read_body("u", 200, r#"{"done": true}"#).unwrap(), json!({"done": true}));
        assert!(matches!(
            read_body("u", 200, "not json"),
            Err(ExtractError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_collect_pages_follows_next_records_url() {
        let first = page(vec![json!({"Id": "1"}), json!({"Id": "2"})], false, Some("/next-1"));
        let mut requested = Vec::new();

        let records = collect_pages(first, |path| {
            requested.push(path.to_string());
            Ok(match path {
                "/next-1" => page(vec![json!({"Id": "3"})], false, Some("/next-2")),
                _ => page(vec![json!({"Id": "4"}), json!({"Id": "5"})], true, Some("/ignored")),
            })
        })
        .unwrap();

        assert_eq!(requested, vec!["/next-1", "/next-2"]);
        let ids: Vec<_> = records.iter().map(|r| r["Id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_collect_pages_stops_when_done() {
        let first = page(vec![json!({"Id": "1"})], true, Some("/never"));
        let records = collect_pages(first, |path| panic!("fetched {}", path)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_collect_pages_propagates_fetch_error() {
        let first = page(vec![], false, Some("/next-1"));
        let result = collect_pages(first, |_| {
            Err(ExtractError::Status {
                url: "u".to_string(),
                status: 502,
                body: String::new(),
            })
        });
        assert!(matches!(result, Err(ExtractError::Status { status: 502, .. })));
    }
}
