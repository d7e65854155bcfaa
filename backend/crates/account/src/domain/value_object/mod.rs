//! Value Object Module

pub mod account_key;
pub mod account_password;
pub mod authority;
pub mod email;
pub mod login;
pub mod profile;
