//! # Payout Types
//!
//! Domain types and port traits for the payout settings service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Payout value objects, provider payment account, local record
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AccountType, BankAccount, BankTransfer, CompanyChangeNotification, Invoicing, PaymentAccount,
    Payout, PayoutDetails, PayoutMethod, PayoutOption, PayoutType, Paypal, Settings, User, UserId,
};
pub use dto::*;
pub use error::{
    AppError, DomainError, EMAIL_DELIVERY_FAILURE, EmailError, ProviderError, RepoError,
};
pub use ports::{EmailService, InvoicingProvider, PaymentDataRepository, UserStore};
