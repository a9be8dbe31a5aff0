//! # Invoicing Client
//!
//! A typed Rust client for the invoicing provider's payment account API,
//! implementing the `InvoicingProvider` port.
//!
//! The client holds no per-request state: `persist_payment_account` sends
//! its PUT right away and `done` has nothing left to flush, so one client can
//! be shared by every request.

use async_trait::async_trait;
use payout_types::{InvoicingProvider, PaymentAccount, ProviderError, UserId};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Invoicing provider API client.
pub struct InvoicingClient {
    base_url: String,
    api_token: Option<String>,
    http: Client,
}

impl InvoicingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token for authentication.
    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    fn account_url(&self, user_id: UserId) -> String {
        format!("{}/payment-accounts/{}", self.base_url, user_id)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn create_payment_account(
        &self,
        user_id: UserId,
    ) -> Result<PaymentAccount, ProviderError> {
        tracing::info!(%user_id, "creating payment account at provider");
        let req = self
            .http
            .post(format!("{}/payment-accounts", self.base_url))
            .json(&serde_json::json!({ "user_id": user_id }));
        let resp = self.authorize(req).send().await.map_err(http_error)?;
        handle_response(resp).await
    }
}

#[async_trait]
impl InvoicingProvider for InvoicingClient {
    #[tracing::instrument(skip(self))]
    async fn get_or_create_payment_account(
        &self,
        user_id: UserId,
    ) -> Result<PaymentAccount, ProviderError> {
        let req = self.http.get(self.account_url(user_id));
        let resp = self.authorize(req).send().await.map_err(http_error)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return self.create_payment_account(user_id).await;
        }
        handle_response(resp).await
    }

    #[tracing::instrument(skip(self, account))]
    async fn persist_payment_account(
        &self,
        user_id: UserId,
        account: &PaymentAccount,
    ) -> Result<(), ProviderError> {
        let req = self.http.put(self.account_url(user_id)).json(account);
        let resp = self.authorize(req).send().await.map_err(http_error)?;
        handle_response::<serde_json::Value>(resp)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "payment account write failed"))?;
        Ok(())
    }

    /// Writes are sent by `persist_payment_account`, so there is nothing to
    /// flush.
    async fn done(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

fn http_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Http(err.to_string())
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await.map_err(http_error)?;
        let body: &str = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(|e| ProviderError::Json(e.to_string()))
    } else {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
