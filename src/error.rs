//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the error conditions that can occur, from database issues to
//! rejected credentials.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses with JSON bodies. `From` impls for
//! the auth core's error types (`AuthError`, `VerifyError`, `HashFormatError`,
//! `DirectoryError`) and for `sqlx::Error` / `validator::ValidationErrors`
//! allow conversion with the `?` operator.
//!
//! Every failure of credential validation or identity resolution collapses to
//! one generic 401 message. The specific reason (revoked, expired, unknown
//! subject, inactive account) is never put on the wire, so a caller cannot
//! enumerate usernames or probe account state through error bodies.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::password::HashFormatError;
use crate::auth::service::AuthError;
use crate::auth::token::VerifyError;
use crate::directory::DirectoryError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Represents a rejected credential or failed identity resolution (HTTP 401).
    Unauthorized(String),
    /// Represents a client-side error due to a malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Represents an error due to failed input validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

/// The one message every authentication failure surfaces as.
const CREDENTIALS_REJECTED: &str = "Could not validate credentials";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic internal server errors.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`, other database
/// errors become `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Identity resolution failures all surface as the same 401, except
/// infrastructure errors from the account lookup, which stay server errors.
impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::Directory(DirectoryError::DatabaseError(msg)) => AppError::DatabaseError(msg),
            AuthError::Directory(other) => AppError::InternalServerError(other.to_string()),
            _ => AppError::Unauthorized(CREDENTIALS_REJECTED.into()),
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(_: VerifyError) -> AppError {
        AppError::Unauthorized(CREDENTIALS_REJECTED.into())
    }
}

/// A malformed stored hash is data corruption, not a client problem.
impl From<HashFormatError> for AppError {
    fn from(error: HashFormatError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<DirectoryError> for AppError {
    fn from(error: DirectoryError) -> AppError {
        match error {
            DirectoryError::DuplicateUsername => {
                AppError::BadRequest("Username already registered".into())
            }
            DirectoryError::DatabaseError(msg) => AppError::DatabaseError(msg),
        }
    }
}
