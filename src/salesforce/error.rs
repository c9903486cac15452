// src/salesforce/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Salesforce request failed")]
    Http(#[from] reqwest::Error),
    #[error("Salesforce rejected the credentials ({status}): {body}")]
    Auth { status: u16, body: String },
    #[error("Salesforce returned HTTP {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("Salesforce error {code}: {message}")]
    Api { code: String, message: String },
    #[error("Unexpected Salesforce response: {0}")]
    UnexpectedShape(String),
}

pub type ExtractResult<T> = Result<T, ExtractError>;
