// src/settings/mod.rs
//! Run-wide constants and the secrets the skid needs at runtime.

pub mod environment;
pub mod io;

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::datasets::DatasetKey;

pub const SKID_NAME: &str = "deq-tanks";
pub const SKID_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LOG_FILE_NAME: &str = "log";
/// Used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "deq_tanks=debug";

pub const SENDGRID_FROM_ADDRESS: &str = "noreply@utah.gov";
pub const SENDGRID_TO_ADDRESSES: &[&str] = &["ugrc-developers@utah.gov"];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(300);
pub const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Contents of `secrets.json`. Keys are upper-case, e.g. `AGOL_ORG`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Secrets {
    pub agol_org: String,
    pub agol_user: String,
    pub agol_password: String,
    pub sf_org: String,
    #[serde(default)]
    pub sf_username: String,
    #[serde(default)]
    pub sf_password: String,
    pub sf_client_id: String,
    pub sf_client_secret: String,
    /// Talk to the Salesforce sandbox with a named user instead of the API user.
    #[serde(default)]
    pub is_dev: bool,
    pub sendgrid_api_key: String,
    pub facilities_item_id: String,
    pub releases_item_id: String,
    pub tanks_item_id: String,
    pub compartments_item_id: String,
}

impl Secrets {
    pub fn item_id(&self, key: DatasetKey) -> &str {
        match key {
            DatasetKey::Facilities => &self.facilities_item_id,
            DatasetKey::Releases => &self.releases_item_id,
            DatasetKey::Tanks => &self.tanks_item_id,
            DatasetKey::Compartments => &self.compartments_item_id,
        }
    }
}

// Never print credentials, even at trace level.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("agol_org", &self.agol_org)
            .field("agol_user", &self.agol_user)
            .field("sf_org", &self.sf_org)
            .field("is_dev", &self.is_dev)
            .field("facilities_item_id", &self.facilities_item_id)
            .field("releases_item_id", &self.releases_item_id)
            .field("tanks_item_id", &self.tanks_item_id)
            .field("compartments_item_id", &self.compartments_item_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn test_secrets() -> Secrets {
    serde_json::from_value(serde_json::json!({
        "AGOL_ORG": "https://utah.maps.arcgis.com",
        "AGOL_USER": "skid_user",
        "AGOL_PASSWORD": "hunter2",
        "SF_ORG": "utahdeq",
        "SF_CLIENT_ID": "client-id",
        "SF_CLIENT_SECRET": "client-secret",
        "SENDGRID_API_KEY": "SG.key",
        "FACILITIES_ITEM_ID": "f1",
        "RELEASES_ITEM_ID": "r1",
        "TANKS_ITEM_ID": "t1",
        "COMPARTMENTS_ITEM_ID": "c1"
    }))
    .unwrap()
}
