use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::toml_config::MailConfig;
use crate::domain::model::ContactMessage;
use crate::domain::ports::Mailer;
use crate::utils::error::{PortfolioError, Result};

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    reply_to: Contact<'a>,
    subject: String,
    html_content: String,
    text_content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

/// Relays contact messages through Brevo's transactional email endpoint.
/// The visitor is set as reply-to; the sender stays the verified account address.
#[derive(Debug, Clone)]
pub struct BrevoMailer {
    client: Client,
    base_url: String,
    api_key: String,
    recipient: String,
    sender_email: String,
    sender_name: String,
}

impl BrevoMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            recipient: config.recipient.clone(),
            sender_email: config
                .sender_email
                .clone()
                .unwrap_or_else(|| config.recipient.clone()),
            sender_name: config.sender_name.clone(),
        }
    }
}

fn mail_error(e: reqwest::Error) -> PortfolioError {
    PortfolioError::MailerError {
        message: e.to_string(),
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, message: &ContactMessage) -> Result<()> {
        let request = SendEmailRequest {
            sender: Contact {
                email: &self.sender_email,
                name: Some(&self.sender_name),
            },
            to: vec![Contact {
                email: &self.recipient,
                name: None,
            }],
            reply_to: Contact {
                email: message.email.trim(),
                name: Some(message.name.trim()),
            },
            subject: message.subject(),
            html_content: message.html_body(),
            text_content: message.text_body(),
        };

        let response = self
            .client
            .post(format!("{}/v3/smtp/email", self.base_url))
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(mail_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortfolioError::MailerError {
                message: format!("relay answered {}: {}", status, body),
            });
        }

        let body: SendEmailResponse = response.json().await.map_err(mail_error)?;
        tracing::debug!(
            "Mail relay accepted message {}",
            body.message_id.as_deref().unwrap_or("(no id)")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn mail_config(base_url: String) -> MailConfig {
        MailConfig {
            api_key: "xkeysib-test".to_string(),
            recipient: "owner@example.com".to_string(),
            sender_email: None,
            sender_name: "Portfolio Contact".to_string(),
            base_url,
        }
    }

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            message: "Let's talk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_transactional_email() {
        let server = MockServer::start_async().await;
        let mail_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v3/smtp/email")
                    .header("api-key", "xkeysib-test")
                    .json_body_partial(
                        r#"{
                            "to": [{ "email": "owner@example.com" }],
                            "replyTo": { "email": "jane@example.com", "name": "Jane" },
                            "subject": "New Portfolio Contact from Jane"
                        }"#,
                    );
                then.status(201)
                    .json_body(json!({ "messageId": "<abc@smtp-relay.example>" }));
            })
            .await;

        let mailer = BrevoMailer::new(&mail_config(server.base_url()));
        mailer.send(&message()).await.unwrap();

        mail_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sender_defaults_to_recipient() {
        let server = MockServer::start_async().await;
        let mail_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/smtp/email").json_body_partial(
                    r#"{ "sender": { "email": "owner@example.com", "name": "Portfolio Contact" } }"#,
                );
                then.status(201).json_body(json!({ "messageId": "1" }));
            })
            .await;

        let mailer = BrevoMailer::new(&mail_config(server.base_url()));
        mailer.send(&message()).await.unwrap();

        mail_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_relay_failure_is_mailer_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v3/smtp/email");
                then.status(401)
                    .json_body(json!({ "code": "unauthorized", "message": "Key not found" }));
            })
            .await;

        let mailer = BrevoMailer::new(&mail_config(server.base_url()));
        let err = mailer.send(&message()).await.unwrap_err();

        assert!(matches!(err, PortfolioError::MailerError { .. }));
        assert!(err.to_string().contains("Key not found"));
    }
}
