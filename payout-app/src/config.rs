//! Configuration loading from environment.

use std::env;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub invoicing_api_url: String,
    pub invoicing_api_token: Option<String>,
    pub mail_api_url: String,
    pub mail_api_token: Option<String>,
    pub mail_from: String,
    pub environment: String,
    pub company_change_email_to: String,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            invoicing_api_url: required("INVOICING_API_URL")?,
            invoicing_api_token: optional("INVOICING_API_TOKEN"),
            mail_api_url: required("MAIL_API_URL")?,
            mail_api_token: optional("MAIL_API_TOKEN"),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| "noreply@localhost".to_string()),
            environment: optional("APP_ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
            company_change_email_to: required("COMPANY_CHANGE_EMAIL_TO")?,
            otlp_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("{} environment variable is required", key))
}

// Empty values count as unset.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
