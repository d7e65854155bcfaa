//! Application Configuration
//!
//! Configuration for the account lifecycle use cases.

use std::time::Duration;

use platform::password::PasswordPolicy;

use crate::domain::value_object::{
    account_key::ACCOUNT_KEY_LENGTH, login::Login, profile::DEFAULT_LANG_KEY,
};

/// Login of the built-in anonymous account, never listed
pub const ANONYMOUS_LOGIN: &str = "anonymoususer";

#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Length bounds for new passwords
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub activation_key_length: usize,
    pub reset_key_length: usize,
    /// Reset keys at least this old are rejected
    pub reset_key_ttl: Duration,
    /// Unactivated accounts older than this are purged
    pub unactivated_retention: Duration,
    /// Period of the purge job
    pub cleanup_interval: Duration,
    pub anonymous_login: String,
    pub default_lang_key: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            password_policy: PasswordPolicy::default(),
            password_pepper: None,
            activation_key_length: ACCOUNT_KEY_LENGTH,
            reset_key_length: ACCOUNT_KEY_LENGTH,
            reset_key_ttl: Duration::from_secs(24 * 3600), // 24 hours
            unactivated_retention: Duration::from_secs(3 * 24 * 3600), // 3 days
            cleanup_interval: Duration::from_secs(24 * 3600), // daily
            anonymous_login: ANONYMOUS_LOGIN.to_string(),
            default_lang_key: DEFAULT_LANG_KEY.to_string(),
        }
    }
}

impl AccountConfig {
    /// Create config for development (hourly purge)
    pub fn development() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// The anonymous account can neither sign in nor reset its password
    pub fn is_anonymous(&self, login: &Login) -> bool {
        Login::new(&self.anonymous_login).is_ok_and(|anonymous| anonymous == *login)
    }

    pub fn reset_key_ttl_chrono(&self) -> chrono::Duration {
        to_chrono(self.reset_key_ttl)
    }

    pub fn unactivated_retention_chrono(&self) -> chrono::Duration {
        to_chrono(self.unactivated_retention)
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccountConfig::default();
        assert_eq!(config.password_policy.min_length, 4);
        assert_eq!(config.password_policy.max_length, 100);
        assert_eq!(config.activation_key_length, 20);
        assert_eq!(config.reset_key_ttl_chrono(), chrono::Duration::hours(24));
        assert_eq!(config.unactivated_retention_chrono(), chrono::Duration::days(3));
        assert_eq!(config.anonymous_login, "anonymoususer");
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_is_anonymous_ignores_case() {
        let config = AccountConfig::default();
        assert!(config.is_anonymous(&Login::new("AnonymousUser").unwrap()));
        assert!(!config.is_anonymous(&Login::new("admin").unwrap()));
    }

    #[test]
    fn test_development_purges_hourly() {
        let config = AccountConfig::development();
        assert_eq!(config.cleanup_interval, Duration::from_secs(3600));
        assert_eq!(config.reset_key_ttl, AccountConfig::default().reset_key_ttl);
    }
}
