//! # Payout Hex
//!
//! Application service layer and HTTP adapter for the payout settings service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates repository, provider and mailer)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over its ports, allowing different adapters to be
//! injected.

pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::PayoutService;
