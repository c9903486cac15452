// src/notify/sendgrid.rs

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::{MessageDetails, NotifyError, Notifier};
use crate::settings::{HTTP_TIMEOUT, LOG_FILE_NAME, SENDGRID_FROM_ADDRESS, SENDGRID_TO_ADDRESSES, SKID_NAME};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Serialize, PartialEq)]
pub struct Address {
    pub email: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Personalization {
    pub to: Vec<Address>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Content {
    #[serde(rename = "type")]
    pub mime_type: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Attachment {
    pub content: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub mime_type: &'static str,
    pub disposition: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MailPayload {
    pub personalizations: Vec<Personalization>,
    pub from: Address,
    pub subject: String,
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// `deq-tanks on <host>: <subject>`
pub fn prefixed_subject(host: &str, subject: &str) -> String {
    format!("{} on {}: {}", SKID_NAME, host, subject)
}

pub fn build_payload(host: &str, details: &MessageDetails, attachment: Option<Attachment>) -> MailPayload {
    MailPayload {
        personalizations: vec![Personalization {
            to: SENDGRID_TO_ADDRESSES
                .iter()
                .map(|email| Address {
                    email: email.to_string(),
                })
                .collect(),
        }],
        from: Address {
            email: SENDGRID_FROM_ADDRESS.to_string(),
        },
        subject: prefixed_subject(host, &details.subject),
        content: vec![Content {
            mime_type: "text/plain",
            value: details.message.clone(),
        }],
        attachments: attachment.into_iter().collect(),
    }
}

pub fn read_attachment(path: &Path) -> Result<Attachment, NotifyError> {
    let bytes = std::fs::read(path).map_err(|source| NotifyError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.txt", LOG_FILE_NAME));
    Ok(Attachment {
        content: STANDARD.encode(bytes),
        filename,
        mime_type: "text/plain",
        disposition: "attachment",
    })
}

pub struct SendGridNotifier {
    http: Client,
    api_key: String,
    host: String,
}

impl SendGridNotifier {
    pub fn new(api_key: &str, host: &str) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            host: host.to_string(),
        })
    }
}

impl Notifier for SendGridNotifier {
    fn notify(&mut self, details: &MessageDetails) -> Result<(), NotifyError> {
        let attachment = details.attachment.as_deref().map(read_attachment).transpose()?;
        let payload = build_payload(&self.host, details, attachment);

        debug!("Sending '{}' through SendGrid", payload.subject);
        let response = self
            .http
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        info!("Notification sent: {}", payload.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_subject_prefix() {
        assert_eq!(
            prefixed_subject("ut-dts-ugrc-deq-tanks-prod", "Update Summary"),
            "deq-tanks on ut-dts-ugrc-deq-tanks-prod: Update Summary"
        );
    }

    #[test]
    fn test_payload_shape() {
        let details = MessageDetails {
            subject: "deq-tanks Update Failure".to_string(),
            message: "boom".to_string(),
            attachment: None,
        };
        let payload = serde_json::to_value(build_payload("host", &details, None)).unwrap();
        assert_eq!(
            payload,
            json!({
                "personalizations": [{"to": [{"email": "ugrc-developers@utah.gov"}]}],
                "from": {"email": "noreply@utah.gov"},
                "subject": "deq-tanks on host: deq-tanks Update Failure",
                "content": [{"type": "text/plain", "value": "boom"}]
            })
        );
    }

    #[test]
    fn test_attachment_is_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"hello log").unwrap();

        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.filename, "log.txt");
        assert_eq!(attachment.content, "aGVsbG8gbG9n");
        assert_eq!(attachment.disposition, "attachment");
    }

    #[test]
    fn test_missing_attachment_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_attachment(&dir.path().join("absent")),
            Err(NotifyError::Attachment { .. })
        ));
    }
}
