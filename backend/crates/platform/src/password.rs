//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, OWASP recommended parameters)
//! - Zeroization of clear text on drop
//! - Unicode NFKC normalization before length checks and hashing
//! - Length bounds supplied by the caller through [`PasswordPolicy`]

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default minimum password length (characters)
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 4;

/// Default maximum password length (characters)
pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Policy
// ============================================================================

/// Inclusive length bounds, counted in Unicode code points after NFKC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_length: DEFAULT_MAX_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub const fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    fn check(&self, normalized: &str) -> Result<(), PasswordPolicyError> {
        let char_count = normalized.chars().count();
        if char_count < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: self.min_length,
                actual: char_count,
            });
        }
        if char_count > self.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: self.max_length,
                actual: char_count,
            });
        }

        Ok(())
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` is redacted.
///
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordPolicy};
///
/// let password = ClearTextPassword::new("correct horse".to_string(), &PasswordPolicy::default()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize and check against `policy`
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let password = Self::unvalidated(raw);
        policy.check(&password.0)?;
        Ok(password)
    }

    /// Normalize only
    ///
    /// For passwords that are compared against a stored hash, never for ones
    /// about to be stored.
    pub fn unvalidated(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with Argon2id and a fresh 128-bit salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = self.peppered(pepper);
        let salt = SaltString::generate(OsRng);

        // m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Parse a PHC string (e.g. from the database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification; `pepper` must match the one used for hashing
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let mut password_bytes = password.peppered(pepper);
        let valid = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();
        valid
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_password_too_short() {
        let short = "a".repeat(DEFAULT_MIN_PASSWORD_LENGTH - 1);
        let result = ClearTextPassword::new(short, &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_password_too_long() {
        let long = "a".repeat(DEFAULT_MAX_PASSWORD_LENGTH + 1);
        let result = ClearTextPassword::new(long, &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_bounds_are_inclusive() {
        assert!(ClearTextPassword::new("a".repeat(DEFAULT_MIN_PASSWORD_LENGTH), &policy()).is_ok());
        assert!(ClearTextPassword::new("a".repeat(DEFAULT_MAX_PASSWORD_LENGTH), &policy()).is_ok());
    }

    #[test]
    fn test_password_empty_is_too_short() {
        assert!(matches!(
            ClearTextPassword::new(String::new(), &policy()),
            Err(PasswordPolicyError::TooShort { min: 4, actual: 0 })
        ));
    }

    #[test]
    fn test_password_whitespace_counts_toward_length() {
        assert!(ClearTextPassword::new("    ".to_string(), &policy()).is_ok());
        assert!(matches!(
            ClearTextPassword::new("   ".to_string(), &policy()),
            Err(PasswordPolicyError::TooShort { min: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_custom_policy() {
        let strict = PasswordPolicy::new(12, 64);
        assert!(ClearTextPassword::new("password".to_string(), &strict).is_err());
        assert!(ClearTextPassword::new("a much longer password".to_string(), &strict).is_ok());
    }

    #[test]
    fn test_length_counts_code_points() {
        // 4 code points, 12 bytes
        assert!(ClearTextPassword::new("パスワド".to_string(), &policy()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("new password".to_string(), &policy()).unwrap();
        let hashed = password.hash(None).unwrap();
        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::unvalidated("other password".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_nfkc_equivalent_inputs_verify() {
        // Fullwidth letters normalize to ASCII under NFKC
        let password = ClearTextPassword::new("ＡＢＣＤ1234".to_string(), &policy()).unwrap();
        let hashed = password.hash(None).unwrap();
        let ascii = ClearTextPassword::unvalidated("ABCD1234".to_string());
        assert!(hashed.verify(&ascii, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::unvalidated("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::unvalidated("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(matches!(
            HashedPassword::from_phc_string("not_a_valid_hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::unvalidated("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
