//! Log Mailer
//!
//! Writes each mail intent and its link to the tracing log instead of
//! delivering it. Stands in for a real SMTP adapter.

use crate::domain::entity::account::Account;
use crate::domain::mailer::{MailError, MailKind, Mailer};

#[derive(Debug, Clone)]
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn activation_link(&self, key: &str) -> String {
        format!("{}/account/activate?key={}", self.base_url, key)
    }

    pub fn reset_link(&self, key: &str) -> String {
        format!("{}/account/reset/finish?key={}", self.base_url, key)
    }
}

impl Mailer for LogMailer {
    async fn send_activation_email(&self, account: &Account) -> Result<(), MailError> {
        let key = account
            .activation_key
            .as_ref()
            .ok_or(MailError::MissingKey(MailKind::Activation))?;

        tracing::info!(
            to = %account.email,
            login = %account.login,
            lang_key = %account.profile.lang_key,
            link = %self.activation_link(key.as_str()),
            "Activation mail"
        );

        Ok(())
    }

    async fn send_password_reset_email(&self, account: &Account) -> Result<(), MailError> {
        let reset = account
            .pending_reset
            .as_ref()
            .ok_or(MailError::MissingKey(MailKind::PasswordReset))?;

        tracing::info!(
            to = %account.email,
            login = %account.login,
            lang_key = %account.profile.lang_key,
            link = %self.reset_link(reset.key.as_str()),
            "Password reset mail"
        );

        Ok(())
    }
}
