// src/settings/io.rs
use directories_next::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::Secrets;

const QUALIFIER: &str = "gov";
const ORGANIZATION: &str = "UGRC";
const APPLICATION: &str = "deq-tanks";
const SECRETS_FILE: &str = "secrets.json";

/// Overrides every other location when set.
pub const SECRETS_ENV_VAR: &str = "DEQ_TANKS_SECRETS";
/// Present only inside the cloud function.
pub const CLOUD_SECRETS_MOUNT: &str = "/secrets";
const CLOUD_SECRETS_FILE: &str = "app/secrets.json";
const LOCAL_SECRETS_DIR: &str = "secrets";

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("Secrets file not found; looked in {}", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
    #[error("Failed to read secrets file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse secrets file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(SECRETS_FILE))
}

/// Candidate secrets files, most specific first. When the cloud mount exists
/// it is the only place looked at besides an explicit override.
pub fn candidate_paths(env_override: Option<PathBuf>, cloud_mount: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = env_override.into_iter().collect();

    if cloud_mount.exists() {
        paths.push(cloud_mount.join(CLOUD_SECRETS_FILE));
        return paths;
    }

    paths.push(Path::new(LOCAL_SECRETS_DIR).join(SECRETS_FILE));
    paths.extend(user_config_path());
    paths
}

pub fn locate_secrets_in(candidates: Vec<PathBuf>) -> Result<PathBuf, SecretsError> {
    match candidates.iter().find(|p| p.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(SecretsError::NotFound {
            searched: candidates,
        }),
    }
}

pub fn locate_secrets() -> Result<PathBuf, SecretsError> {
    let env_override = std::env::var_os(SECRETS_ENV_VAR).map(PathBuf::from);
    locate_secrets_in(candidate_paths(env_override, Path::new(CLOUD_SECRETS_MOUNT)))
}

pub fn load_secrets() -> Result<Secrets, SecretsError> {
    let path = locate_secrets()?;
    load_secrets_from_file(&path)
}

pub fn load_secrets_from_file(path: &Path) -> Result<Secrets, SecretsError> {
    info!("Loading secrets from {:?}", path);
    let text = fs::read_to_string(path).map_err(|source| SecretsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let secrets: Secrets = serde_json::from_str(&text).map_err(|source| SecretsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Secrets loaded: {:?}", secrets);
    Ok(secrets)
}
