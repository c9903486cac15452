// src/settings/environment.rs
//! Tells the cloud function apart from a developer machine by asking the GCP
//! metadata server for the project id.

use reqwest::blocking::Client;
use tracing::debug;

use super::METADATA_PROBE_TIMEOUT;

const METADATA_URL: &str = "http://metadata.google.internal/computeMetadata/v1/project/project-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    /// GCP project id in the cloud, machine host name locally.
    pub host_name: String,
    pub is_local_dev: bool,
}

impl RunEnvironment {
    pub fn from_project_id(project_id: Option<String>) -> Self {
        match project_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => RunEnvironment {
                host_name: id.trim().to_string(),
                is_local_dev: false,
            },
            None => RunEnvironment {
                host_name: local_host_name(),
                is_local_dev: true,
            },
        }
    }
}

fn local_host_name() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string())
}

fn probe_project_id() -> Option<String> {
    let client = Client::builder()
        .timeout(METADATA_PROBE_TIMEOUT)
        .build()
        .ok()?;
    let response = client
        .get(METADATA_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .ok()?;
    if !response.status().is_success() {
        return None;
    }
    response.text().ok()
}

pub fn detect() -> RunEnvironment {
    let environment = RunEnvironment::from_project_id(probe_project_id());
    debug!("Detected run environment: {:?}", environment);
    environment
}
