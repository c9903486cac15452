// src/agol/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("ArcGIS request failed")]
    Http(#[from] reqwest::Error),
    #[error("ArcGIS returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("ArcGIS error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("Item {0} has no feature service url")]
    NotAFeatureService(String),
    #[error("Feature service {url} has no {wanted}")]
    LayerNotFound { url: String, wanted: &'static str },
    #[error("{rejected} of {attempted} features were rejected; first error: {first_error}")]
    FeaturesRejected {
        attempted: usize,
        rejected: usize,
        first_error: String,
    },
    #[error("Expected {expected} features after loading, found {found}")]
    CountMismatch { expected: usize, found: usize },
    #[error("Could not encode request")]
    Encode(#[from] serde_json::Error),
    #[error("Unexpected ArcGIS response: {0}")]
    UnexpectedShape(String),
}

pub type LoadResult<T> = Result<T, LoadError>;
