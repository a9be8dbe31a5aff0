//! Current-user resolution middleware.
//!
//! Session handling lives in front of this service; it forwards the
//! authenticated user's ID in a header, which this middleware turns into a
//! loaded [`User`] for the handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use payout_types::{EmailService, InvoicingProvider, PaymentDataRepository, User, UserId, UserStore};

use super::handlers::{ApiError, AppState};

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The user a request acts on behalf of.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn extract_user_id(header: Option<&str>) -> Option<UserId> {
    header?.trim().parse().ok()
}

/// Loads the current user and stores it as a request extension.
///
/// `/health` bypasses the lookup. Returns 401 when the header is missing or
/// malformed and 404 when the user does not exist.
pub async fn current_user_middleware<R, P, E>(
    State(state): State<Arc<AppState<R, P, E>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let header = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(user_id) = extract_user_id(header) else {
        return unauthorized_response("Missing or invalid X-User-Id header");
    };

    match state.service.get_user(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(%user_id, error = %e, "current user lookup failed");
            ApiError(e).into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}
