//! Domain Layer
//!
//! Contains the account entity, value objects, and the ports for
//! persistence and mail delivery.

pub mod entity;
pub mod mailer;
pub mod page;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::account::{Account, ManagedUpdate, PendingReset};
pub use mailer::{MailError, MailKind, Mailer};
pub use page::{Page, PageRequest};
pub use repository::AccountRepository;
