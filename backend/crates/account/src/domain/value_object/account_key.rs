//! Account Keys
//!
//! Opaque single-use tokens mailed to the account owner. Both kinds are
//! random alphanumeric strings compared by exact match.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// Length of generated keys
pub const ACCOUNT_KEY_LENGTH: usize = 20;

macro_rules! account_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Fresh random key of `len` alphanumeric characters
            pub fn generate(len: usize) -> Self {
                Self(platform::crypto::random_alphanumeric(len))
            }

            /// Wrap a key supplied by a caller, as-is
            pub fn parse(raw: impl AsRef<str>) -> AppResult<Self> {
                let raw = raw.as_ref();
                if raw.is_empty() {
                    return Err(AppError::bad_request(concat!(stringify!($name), " cannot be empty")));
                }
                Ok(Self(raw.to_string()))
            }

            pub fn from_db(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&"[REDACTED]").finish()
            }
        }
    };
}

account_key!(
    /// Key that activates a freshly registered account
    ActivationKey
);

account_key!(
    /// Key that authorizes one password reset
    ResetKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let key = ActivationKey::generate(ACCOUNT_KEY_LENGTH);
        assert_eq!(key.as_str().len(), ACCOUNT_KEY_LENGTH);
        assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(
            ResetKey::generate(ACCOUNT_KEY_LENGTH),
            ResetKey::generate(ACCOUNT_KEY_LENGTH)
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(ActivationKey::parse("").is_err());
        assert_eq!(ResetKey::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let key = ResetKey::parse(" abc ").unwrap();
        assert_eq!(key.as_str(), " abc ");
        assert_ne!(key, ResetKey::from_db("abc"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = ResetKey::from_db("secretkey");
        let debug = format!("{:?}", key);
        assert!(debug.contains("ResetKey"));
        assert!(!debug.contains("secretkey"));
    }
}
