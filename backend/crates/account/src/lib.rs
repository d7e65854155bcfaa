//! Account Lifecycle Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Account entity, value objects, repository and mailer ports
//! - `application/` - Use cases, configuration and the `AccountManager` facade
//! - `infra/` - Postgres and in-memory stores, log mailer
//!
//! ## Lifecycle
//! - Registration creates an unactivated account and mails an activation key
//! - Activation by key; accounts left unactivated for 3 days are purged
//! - Password reset via a mailed key valid for 24 hours
//! - Password change, profile update, administrator listing and editing
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, clear text zeroized after use
//! - Login and email unique case-insensitively, enforced by the store
//! - Unactivated accounts never authenticate and never receive reset keys

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AccountConfig;
pub use application::manager::AccountManager;
pub use error::{AccountError, AccountResult};
pub use infra::{InMemoryAccountRepository, LogMailer, PgAccountRepository};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::account::*;
    pub use crate::domain::page::*;
    pub use crate::domain::value_object::*;
}
