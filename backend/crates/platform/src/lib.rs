//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Secure random tokens (activation / reset keys)
//! - Password hashing (Argon2id) behind a configurable length policy

pub mod crypto;
pub mod password;
