//! Account Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Error)]
pub enum AccountError {
    /// Login held by an activated account
    #[error("Login name already used")]
    LoginAlreadyUsed,

    /// Email held by an activated (or, on update, another) account
    #[error("Email is already in use")]
    EmailAlreadyUsed,

    /// Current password does not match
    #[error("Incorrect password")]
    InvalidPassword,

    /// Activation or reset key unknown or expired
    #[error("No account found for this key")]
    InvalidKey,

    #[error("Account is not activated")]
    AccountNotActivated,

    #[error("Account not found")]
    AccountNotFound,

    /// Unknown identifier or wrong password during authentication
    #[error("Invalid credentials")]
    BadCredentials,

    /// Malformed input; nothing was changed
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::LoginAlreadyUsed | AccountError::EmailAlreadyUsed => ErrorKind::Conflict,
            AccountError::InvalidPassword | AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::InvalidKey | AccountError::AccountNotFound => ErrorKind::NotFound,
            AccountError::AccountNotActivated => ErrorKind::Forbidden,
            AccountError::BadCredentials => ErrorKind::Unauthorized,
            AccountError::Database(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError, logging first
    pub fn into_app_error(self) -> AppError {
        self.log();
        match self {
            AccountError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::BadCredentials | AccountError::InvalidPassword => {
                tracing::warn!(error = %self, "Credential check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl From<AppError> for AccountError {
    /// Client-side `AppError`s come from value object validation
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AccountError::Validation(err.message().to_string())
        } else {
            AccountError::Internal(err.to_string())
        }
    }
}

impl From<crate::domain::value_object::login::LoginError> for AccountError {
    fn from(err: crate::domain::value_object::login::LoginError) -> Self {
        AccountError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AccountError::LoginAlreadyUsed.kind(), ErrorKind::Conflict);
        assert_eq!(AccountError::EmailAlreadyUsed.kind(), ErrorKind::Conflict);
        assert_eq!(AccountError::InvalidPassword.kind(), ErrorKind::BadRequest);
        assert_eq!(AccountError::InvalidKey.kind(), ErrorKind::NotFound);
        assert_eq!(AccountError::AccountNotActivated.kind(), ErrorKind::Forbidden);
        assert_eq!(AccountError::BadCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            AccountError::Internal("boom".into()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_from_app_error() {
        let err: AccountError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AccountError::Validation(msg) if msg == "Invalid email format"));

        let err: AccountError = AppError::internal("hash failed").into();
        assert!(matches!(err, AccountError::Internal(_)));
    }

    #[test]
    fn test_into_app_error() {
        let app = AccountError::EmailAlreadyUsed.into_app_error();
        assert_eq!(app.kind(), ErrorKind::Conflict);
        assert_eq!(app.message(), "Email is already in use");

        let app = AccountError::Database(sqlx::Error::RowNotFound).into_app_error();
        assert_eq!(app.kind(), ErrorKind::NotFound);
    }
}
