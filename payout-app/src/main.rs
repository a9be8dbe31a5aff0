//! # Payout Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository, invoicing and mail adapters
//! - Create the payout service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicing_client::InvoicingClient;
use payout_hex::{
    PayoutService,
    inbound::{CompanyChangeConfig, HttpServer},
};
use payout_repo::{HttpMailer, build_repo};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing; endpoint comes from OTEL_EXPORTER_OTLP_ENDPOINT
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("payout-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;

    let (telemetry, otel_provider) = match config.otlp_endpoint {
        Some(_) => {
            let (tracer, provider) = init_tracer()?;
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(provider),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payout_app=debug,payout_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting payout server on port {}", config.port);
    tracing::info!(environment = %config.environment, "Loaded configuration");

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    let mut invoicing = InvoicingClient::new(&config.invoicing_api_url);
    if let Some(token) = &config.invoicing_api_token {
        invoicing = invoicing.with_api_token(token);
    }

    let mut mailer = HttpMailer::new(&config.mail_api_url, &config.mail_from);
    if let Some(token) = &config.mail_api_token {
        mailer = mailer.with_api_token(token);
    }

    let service = PayoutService::new(repo, invoicing, mailer);

    let server = HttpServer::new(
        service,
        CompanyChangeConfig {
            environment: config.environment,
            email_to: config.company_change_email_to,
        },
    );
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
