//! Error conversions into [`AppError`]

#[cfg(feature = "sqlx")]
use super::app_error::AppError;

/// PostgreSQL SQLSTATE → AppError
///
/// Codes: <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted")
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // Class 23: integrity constraint violation
                Some("23505") => AppError::conflict("Duplicate key value"),
                Some("23503") => AppError::conflict("Foreign key violation"),
                Some("23502") | Some("23514") => AppError::bad_request("Constraint violation"),
                // Class 53: insufficient resources, class 57: operator intervention
                Some(code) if code.starts_with("53") || code.starts_with("57") => {
                    AppError::service_unavailable("Database unavailable")
                }
                _ => AppError::internal("Database error"),
            },
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_row_not_found_is_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err: AppError = sqlx::Error::PoolClosed.into();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }
}
