//! Infrastructure Layer
//!
//! Store implementations and the mail adapter.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::LogMailer;
pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;
