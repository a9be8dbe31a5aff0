//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod email;
mod provider;
mod repository;

pub use email::EmailService;
pub use provider::InvoicingProvider;
pub use repository::{PaymentDataRepository, UserStore};
