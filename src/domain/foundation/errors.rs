//! Shared error types.
//!
//! `ValidationError` rejects bad input while building values.
//! `DomainError` is what every port returns; handlers translate it into
//! their module error by `ErrorCode`.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A value that cannot be constructed from the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("{field} is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, reported to API clients.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Machine-readable failure category, shown to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    ChangeRequestNotFound,
    WbsElementNotFound,
    ProposedSolutionNotFound,

    // Lifecycle errors
    ChangeRequestDeleted,
    WbsElementDeleted,
    AlreadyDeleted,
    AlreadyReviewed,

    // Authorization errors
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    NotificationFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::ChangeRequestNotFound => "CHANGE_REQUEST_NOT_FOUND",
            ErrorCode::WbsElementNotFound => "WBS_ELEMENT_NOT_FOUND",
            ErrorCode::ProposedSolutionNotFound => "PROPOSED_SOLUTION_NOT_FOUND",
            ErrorCode::ChangeRequestDeleted => "CHANGE_REQUEST_DELETED",
            ErrorCode::WbsElementDeleted => "WBS_ELEMENT_DELETED",
            ErrorCode::AlreadyDeleted => "ALREADY_DELETED",
            ErrorCode::AlreadyReviewed => "ALREADY_REVIEWED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotificationFailed => "NOTIFICATION_FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Error returned across every port, with string details such as
/// `id` (the record involved) or `field` (the rejected input).
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// An error about one stored record; `id` lands in the `id` detail.
    pub fn for_record(code: ErrorCode, message: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::new(code, message).with_detail("id", id.to_string())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field)
    }

    /// Store failures. Handlers surface these unchanged as infrastructure errors.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}
