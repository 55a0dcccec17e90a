use crate::app_config::EmailJsCredentials;
use crate::contact::ContactMessage;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[async_trait]
pub trait EmailSender: Debug + Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), SendError>;
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("email service responded with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Sends messages through the EmailJS REST API.
#[derive(Debug)]
pub struct EmailJsSender {
    client: Client,
    api_url: String,
    credentials: EmailJsCredentials,
}

#[derive(Serialize, Debug)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize, Debug)]
struct TemplateParams<'a> {
    user_name: &'a str,
    user_email: &'a str,
    subject: &'a str,
    message: &'a str,
}

impl EmailJsSender {
    pub fn new(client: Client, api_url: impl Into<String>, credentials: EmailJsCredentials) -> Self {
        EmailJsSender {
            client,
            api_url: api_url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl EmailSender for EmailJsSender {
    #[instrument(skip_all)]
    async fn send(&self, message: &ContactMessage) -> Result<(), SendError> {
        debug!("✉️ Sending contact message...");

        let request = EmailJsRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            template_params: TemplateParams {
                user_name: &message.name,
                user_email: &message.email,
                subject: &message.subject,
                message: &message.message,
            },
        };

        let response = self.client.post(&self.api_url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("✉️ Sending contact message... failed with {}", status);
            return Err(SendError::Rejected { status, body });
        }

        debug!("✉️ Sending contact message... OK");
        Ok(())
    }
}
