//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by every backend crate:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed identifiers ([`id::Id`])
//!
//! Only things with the same meaning in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
