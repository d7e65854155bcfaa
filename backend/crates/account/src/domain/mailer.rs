//! Mailer Port
//!
//! Delivery of account mails. Use cases dispatch through
//! `application::notify` and never surface failures to their callers.

use derive_more::Display;
use thiserror::Error;

use crate::domain::entity::account::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MailKind {
    #[display("activation")]
    Activation,
    #[display("password_reset")]
    PasswordReset,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Account has no {0} key to send")]
    MissingKey(MailKind),

    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Mail the activation link to a newly registered account
    async fn send_activation_email(&self, account: &Account) -> Result<(), MailError>;

    /// Mail the reset link for the account's pending reset
    async fn send_password_reset_email(&self, account: &Account) -> Result<(), MailError>;
}
