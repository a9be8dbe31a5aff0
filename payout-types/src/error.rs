//! Error types for the payout settings service.

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid payment option: {0}")]
    InvalidPaymentOption(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,
}

/// Errors raised by the invoicing provider port.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),
}

/// Errors raised by the email port when a message cannot be handed over.
///
/// Failed recipients are not an error at this level; they are returned by
/// `EmailService::send`.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected by mail service: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// Message carried by `AppError::EmailDeliveryFailure`.
pub const EMAIL_DELIVERY_FAILURE: &str = "Company change notification could not be delivered";

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid payment option: {0}")]
    InvalidPaymentOption(String),

    #[error("{0}")]
    EmailDeliveryFailure(String),

    #[error("Invoicing provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidPaymentOption(tag) => AppError::InvalidPaymentOption(tag),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Serialization(e) => AppError::Internal(e),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err.to_string())
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        AppError::Internal(err.to_string())
    }
}
