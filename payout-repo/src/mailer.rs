//! Email adapter backed by a transactional mail HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use payout_types::{EmailError, EmailService};

#[derive(Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct MailResponse {
    #[serde(default)]
    failed_recipients: Vec<String>,
}

/// Sends plain-text mail through `POST {endpoint}`.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_token: None,
            from: from.into(),
        }
    }

    /// Sets the bearer token sent with every request.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[async_trait]
impl EmailService for HttpMailer {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn send(
        &self,
        subject: &str,
        recipient: &str,
        body: &str,
    ) -> Result<Vec<String>, EmailError> {
        let mail = OutgoingMail {
            from: &self.from,
            to: [recipient],
            subject,
            text: body,
        };

        let mut req = self.client.post(&self.endpoint).json(&mail);
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "mail service rejected message");
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MailResponse = resp
            .json()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        info!(
            failed = parsed.failed_recipients.len(),
            "mail handed to mail service"
        );
        Ok(parsed.failed_recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{Json, Router, http::StatusCode, routing::post};

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/send", addr)
    }

    #[tokio::test]
    async fn test_send_returns_failed_recipients() {
        let app = Router::new().route(
            "/send",
            post(|Json(mail): Json<serde_json::Value>| async move {
                Json(serde_json::json!({ "failed_recipients": mail["to"] }))
            }),
        );
        let mailer = HttpMailer::new(spawn_stub(app).await, "noreply@example.com");

        let failed = mailer
            .send("Subject", "ops@example.com", "Body")
            .await
            .unwrap();

        assert_eq!(failed, vec!["ops@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_send_success_without_failures() {
        let app = Router::new().route(
            "/send",
            post(|| async { Json(serde_json::json!({ "id": "msg-1" })) }),
        );
        let mailer = HttpMailer::new(spawn_stub(app).await, "noreply@example.com")
            .with_api_token("secret");

        let failed = mailer
            .send("Subject", "ops@example.com", "Body")
            .await
            .unwrap();

        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let app = Router::new().route(
            "/send",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad token") }),
        );
        let mailer = HttpMailer::new(spawn_stub(app).await, "noreply@example.com");

        let result = mailer.send("Subject", "ops@example.com", "Body").await;

        assert!(matches!(result, Err(EmailError::Rejected { status: 401, .. })));
    }
}
