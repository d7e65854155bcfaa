//! Account Password Value Object
//!
//! Delegates to `platform::password` for normalization and Argon2id hashing.
//!
//! ```rust
//! use account::domain::value_object::account_password::{AccountPassword, RawPassword};
//! use platform::password::PasswordPolicy;
//!
//! let raw = RawPassword::new("new password".to_string(), &PasswordPolicy::default()).unwrap();
//! let hashed = AccountPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicy, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Clear text password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a password that is about to be stored
    pub fn new(raw: String, policy: &PasswordPolicy) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw, policy).map_err(|e| match e {
            PasswordPolicyError::TooShort { .. } => {
                AppError::bad_request(e.to_string()).with_action("Please choose a longer password")
            }
            PasswordPolicyError::TooLong { .. } => {
                AppError::bad_request(e.to_string()).with_action("Please choose a shorter password")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Wrap a password that is only compared against a stored hash
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::unvalidated(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Account Password (Hashed, for storage)
// ============================================================================

/// Argon2id hash in PHC format
#[derive(Clone, PartialEq, Eq)]
pub struct AccountPassword(HashedPassword);

impl AccountPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;

        Ok(Self(hashed))
    }

    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AppError::internal("Invalid password hash in database"))?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time check; `pepper` must match the one used for hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
