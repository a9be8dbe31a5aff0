//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payout_types::{
    AppError, BankTransfer, ChangeCompanyRequest, EmailService, InvoicingProvider,
    PaymentDataRepository, PayoutOption, PayoutValidityResponse, Paypal, UpdateUserRequest,
    UserStore,
};

use super::auth::CurrentUser;
use crate::PayoutService;

/// Where company change notifications go.
#[derive(Debug, Clone)]
pub struct CompanyChangeConfig {
    /// Deployment name included in the message.
    pub environment: String,
    /// Operator address receiving the message.
    pub email_to: String,
}

/// Application state shared across handlers.
pub struct AppState<R, P, E>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    pub service: PayoutService<R, P, E>,
    pub company_change: CompanyChangeConfig,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::BadRequest(_) | AppError::InvalidPaymentOption(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Provider(_) | AppError::EmailDeliveryFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Current payout settings.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_settings<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    let settings = state.service.get_settings(user).await?;
    Ok(Json(settings))
}

/// Update the display name of the current user.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn update_user<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(mut user)): Extension<CurrentUser>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    user.first_name = req.first_name;
    user.last_name = req.last_name;
    state.service.save_user(&user).await?;
    Ok(Json(user))
}

/// Save a bank account and make it the default payout.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn save_bank_transfer<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<BankTransfer>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    let account = state.service.save_bank_transfer(user.id, req).await?;
    Ok(Json(account))
}

/// Save a PayPal account and make it the default payout.
#[tracing::instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn save_paypal<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<Paypal>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    state.service.save_paypal(user.id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Switch the default payout type.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn save_default_payment_type<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<PayoutOption>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    state.service.save_default_payment_type(user.id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the default payout is fully filled in.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn payout_validity<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    let valid = state.service.has_user_set_valid_payment_method(user).await?;
    Ok(Json(PayoutValidityResponse { valid }))
}

/// Ask operators to move the current user to another company.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn change_company<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<ChangeCompanyRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    let config = &state.company_change;
    state
        .service
        .change_company(&user, &req, &config.environment, &config.email_to)
        .await?;
    Ok(StatusCode::ACCEPTED)
}
