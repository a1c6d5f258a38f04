/// Error handling for the web server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, AppError>`; since this server renders HTML, errors become
/// minimal HTML pages rather than JSON bodies.
///
/// Form validation failures are NOT errors in this sense: they re-render
/// the submitted form at 200. `AppError` covers what's left, missing
/// pages and infrastructure failures.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use crate::pages;

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug)]
pub enum AppError {
    /// Not found (404)
    NotFound,

    /// Bad request (400)
    BadRequest(String),

    /// Internal server error (500)
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Html(pages::error_page(status))).into_response()
    }
}

/// Convert sqlx errors to application errors
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert password hashing errors to application errors
impl From<inkpost_shared::auth::password::PasswordError> for AppError {
    fn from(err: inkpost_shared::auth::password::PasswordError) -> Self {
        AppError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Checks whether a database error is a unique-constraint violation on the
/// named constraint
///
/// Registration uses this to turn the username unique-index race into a
/// form error instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error, constraint_part: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            return constraint.contains(constraint_part);
        }
    }
    false
}
