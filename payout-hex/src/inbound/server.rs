//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use payout_types::{EmailService, InvoicingProvider, PaymentDataRepository, UserStore};

use super::auth::current_user_middleware;
use super::handlers::{self, AppState, CompanyChangeConfig};
use crate::PayoutService;

/// HTTP Server for the Payout Settings API.
pub struct HttpServer<R, P, E>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    state: Arc<AppState<R, P, E>>,
}

impl<R, P, E> HttpServer<R, P, E>
where
    R: UserStore + PaymentDataRepository,
    P: InvoicingProvider,
    E: EmailService,
{
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PayoutService<R, P, E>, company_change: CompanyChangeConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                company_change,
            }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/settings", get(handlers::get_settings::<R, P, E>))
            .route("/api/settings/user", put(handlers::update_user::<R, P, E>))
            .route(
                "/api/settings/bank-transfer",
                put(handlers::save_bank_transfer::<R, P, E>),
            )
            .route("/api/settings/paypal", put(handlers::save_paypal::<R, P, E>))
            .route(
                "/api/settings/default",
                put(handlers::save_default_payment_type::<R, P, E>),
            )
            .route(
                "/api/settings/valid",
                get(handlers::payout_validity::<R, P, E>),
            )
            .route(
                "/api/settings/company",
                post(handlers::change_company::<R, P, E>),
            )
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                current_user_middleware::<R, P, E>,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
