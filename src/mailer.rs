//! Message-transport collaborator: the HTTP relay that delivers the outbound
//! notification emails.
//!
//! The engine never retries a failed send; failures are reported upward per
//! recipient and the linked status write is withheld.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One outbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub subject: String,
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("relay returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("send request timed out")]
    Timeout,

    #[error("could not reach the mail relay: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MailerError::Timeout
        } else {
            MailerError::Transport(err.to_string())
        }
    }
}

/// Anything that can deliver an [`OutboundMessage`].
pub trait MessageTransport {
    fn send(&self, message: &OutboundMessage)
    -> impl Future<Output = Result<(), MailerError>> + Send;
}

/// HTTP client for the mail relay.
#[derive(Clone)]
pub struct MailerClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl MailerClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
        }
    }
}

impl MessageTransport for MailerClient {
    async fn send(&self, message: &OutboundMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(MailerError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> OutboundMessage {
        OutboundMessage {
            subject: "Hosting Confirmation".into(),
            to: vec!["alex@example.edu".into()],
            cc: vec![],
            html_body: "<p>Hi Alex,</p>".into(),
        }
    }

    #[tokio::test]
    async fn send_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("authorization", "Bearer key-1"))
            .and(body_partial_json(json!({
                "subject": "Hosting Confirmation",
                "to": ["alex@example.edu"]
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"id": "m-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = MailerClient::new("key-1".into(), server.uri());
        client.send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn send_maps_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad recipient"))
            .mount(&server)
            .await;

        let client = MailerClient::new("key-1".into(), server.uri());
        let err = client.send(&message()).await.unwrap_err();
        match err {
            MailerError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad recipient");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_maps_rate_limiting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let client = MailerClient::new("key-1".into(), server.uri());
        let err = client.send(&message()).await.unwrap_err();
        assert!(matches!(err, MailerError::RateLimited { retry_after_ms: 3000 }));
    }

    #[test]
    fn message_serializes_cc_by_default() {
        let json = serde_json::to_string(&message()).unwrap();
        assert!(json.contains("\"cc\":[]"));
        assert!(json.contains("html_body"));
    }
}
