//! Login Value Object
//!
//! The login is the account's unique handle. Input is NFKC-normalized and
//! trimmed, then lowercased; the lowercase form is the only one stored, so
//! uniqueness and lookups are case-insensitive.
//!
//! ## Invariants
//! - Length: 1 to 50 characters
//! - Characters: `a-z`, `0-9`, `_`, `.`, `@`, `-`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum login length (in characters)
pub const LOGIN_MIN_LENGTH: usize = 1;

/// Maximum login length (in characters)
pub const LOGIN_MAX_LENGTH: usize = 50;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '@', '-'];

/// Error returned when login validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Login cannot be empty")]
    Empty,

    #[error("Login is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid character '{char}' at position {position}. Only a-z, 0-9, _, ., @, - are allowed")]
    InvalidCharacter { char: char, position: usize },
}

/// Validated, lowercase login
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Normalize (NFKC, trim, lowercase) and validate
    pub fn new(input: impl AsRef<str>) -> Result<Self, LoginError> {
        let canonical = Self::normalize(input.as_ref());
        Self::validate(&canonical)?;
        Ok(Self(canonical))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_lowercase()
    }

    fn validate(canonical: &str) -> Result<(), LoginError> {
        let length = canonical.chars().count();
        if length < LOGIN_MIN_LENGTH {
            return Err(LoginError::Empty);
        }
        if length > LOGIN_MAX_LENGTH {
            return Err(LoginError::TooLong {
                length,
                max: LOGIN_MAX_LENGTH,
            });
        }

        if let Some((position, char)) = canonical
            .chars()
            .enumerate()
            .find(|(_, c)| !Self::is_valid_char(*c))
        {
            return Err(LoginError::InvalidCharacter { char, position });
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Login").field(&self.0).finish()
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Login {
    type Error = LoginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Login {
    type Error = LoginError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Login> for String {
    fn from(login: Login) -> Self {
        login.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_and_lowercase() {
            let login = Login::new("  JohnDoe  ").unwrap();
            assert_eq!(login.as_str(), "johndoe");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Fullwidth 'Ｊ' (U+FF2A) becomes ASCII 'j'
            let login = Login::new("Ｊohn").unwrap();
            assert_eq!(login.as_str(), "john");
        }

        #[test]
        fn test_case_variants_are_equal() {
            assert_eq!(Login::new("ALICE").unwrap(), Login::new("alice").unwrap());
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(Login::new(""), Err(LoginError::Empty));
            assert_eq!(Login::new("   "), Err(LoginError::Empty));
        }

        #[test]
        fn test_single_char_ok() {
            assert!(Login::new("a").is_ok());
        }

        #[test]
        fn test_maximum_length() {
            assert!(Login::new("a".repeat(LOGIN_MAX_LENGTH)).is_ok());
            assert!(matches!(
                Login::new("a".repeat(LOGIN_MAX_LENGTH + 1)),
                Err(LoginError::TooLong { length: 51, max: 50 })
            ));
        }

        #[test]
        fn test_allowed_special_chars() {
            assert!(Login::new("john.doe_1-x@corp").is_ok());
        }

        #[test]
        fn test_invalid_chars() {
            assert!(matches!(
                Login::new("funky-log(n"),
                Err(LoginError::InvalidCharacter { char: '(', position: 9 })
            ));
            assert!(matches!(
                Login::new("john doe"),
                Err(LoginError::InvalidCharacter { char: ' ', .. })
            ));
            assert!(matches!(
                Login::new("日本"),
                Err(LoginError::InvalidCharacter { .. })
            ));
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_deserialize_normalizes() {
            let login: Login = serde_json::from_str("\"ALICE\"").unwrap();
            assert_eq!(login.as_str(), "alice");
        }

        #[test]
        fn test_deserialize_invalid() {
            let result: Result<Login, _> = serde_json::from_str("\"bad login\"");
            assert!(result.is_err());
        }

        #[test]
        fn test_serialize() {
            let login = Login::new("alice").unwrap();
            assert_eq!(serde_json::to_string(&login).unwrap(), "\"alice\"");
        }
    }
}
