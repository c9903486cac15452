// src/notify/mod.rs
//! Run summaries and failure reports.
//!
//! Scheduled runs email through SendGrid; a developer machine just prints.

pub mod sendgrid;

use std::path::PathBuf;
use thiserror::Error;

use crate::settings::environment::RunEnvironment;
use crate::settings::Secrets;
pub use sendgrid::SendGridNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("SendGrid request failed")]
    Http(#[from] reqwest::Error),
    #[error("SendGrid rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Could not read attachment {path:?}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDetails {
    pub subject: String,
    pub message: String,
    pub attachment: Option<PathBuf>,
}

pub trait Notifier {
    fn notify(&mut self, details: &MessageDetails) -> Result<(), NotifyError>;
}

/// Prints messages to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, details: &MessageDetails) -> Result<(), NotifyError> {
        println!("{}", details.subject);
        println!();
        println!("{}", details.message);
        if let Some(path) = &details.attachment {
            println!("(log: {})", path.display());
        }
        Ok(())
    }
}

/// Either channel, picked once from the run environment.
pub enum RunNotifier {
    Email(SendGridNotifier),
    Console(ConsoleNotifier),
}

impl RunNotifier {
    pub fn for_environment(environment: &RunEnvironment, secrets: &Secrets) -> Result<Self, NotifyError> {
        if environment.is_local_dev {
            Ok(RunNotifier::Console(ConsoleNotifier))
        } else {
            Ok(RunNotifier::Email(SendGridNotifier::new(
                &secrets.sendgrid_api_key,
                &environment.host_name,
            )?))
        }
    }
}

impl Notifier for RunNotifier {
    fn notify(&mut self, details: &MessageDetails) -> Result<(), NotifyError> {
        match self {
            RunNotifier::Email(email) => email.notify(details),
            RunNotifier::Console(console) => console.notify(details),
        }
    }
}
