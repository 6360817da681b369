//! Change-request-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | Deleted | 410 |
//! | AlreadyDeleted | 410 |
//! | AlreadyReviewed | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Kind of record a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    ChangeRequest,
    WbsElement,
    ProposedSolution,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::ChangeRequest => "Change request",
            Resource::WbsElement => "WBS element",
            Resource::ProposedSolution => "Proposed solution",
        };
        write!(f, "{}", s)
    }
}

/// Change request errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRequestError {
    /// Actor's role is insufficient, or a reviewer tried to review their own submission.
    Forbidden(String),
    /// Referenced record does not exist.
    NotFound { resource: Resource, id: String },
    /// Referenced record has been soft-deleted.
    Deleted { resource: Resource, id: String },
    /// Change request was already soft-deleted.
    AlreadyDeleted(String),
    /// Change request already carries a review decision.
    AlreadyReviewed(String),
    /// Input or precondition failed.
    ValidationFailed { field: String, message: String },
    /// Store or other infrastructure failure, surfaced unchanged.
    Infrastructure(String),
}

impl ChangeRequestError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ChangeRequestError::Forbidden(reason.into())
    }
    pub fn not_found(resource: Resource, id: impl ToString) -> Self {
        ChangeRequestError::NotFound {
            resource,
            id: id.to_string(),
        }
    }
    pub fn deleted(resource: Resource, id: impl ToString) -> Self {
        ChangeRequestError::Deleted {
            resource,
            id: id.to_string(),
        }
    }
    pub fn already_deleted(id: impl ToString) -> Self {
        ChangeRequestError::AlreadyDeleted(id.to_string())
    }
    pub fn already_reviewed(id: impl ToString) -> Self {
        ChangeRequestError::AlreadyReviewed(id.to_string())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ChangeRequestError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ChangeRequestError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            ChangeRequestError::Forbidden(_) => ErrorCode::Forbidden,
            ChangeRequestError::NotFound { resource, .. } => match resource {
                Resource::ChangeRequest => ErrorCode::ChangeRequestNotFound,
                Resource::WbsElement => ErrorCode::WbsElementNotFound,
                Resource::ProposedSolution => ErrorCode::ProposedSolutionNotFound,
            },
            ChangeRequestError::Deleted { resource, .. } => match resource {
                Resource::WbsElement => ErrorCode::WbsElementDeleted,
                _ => ErrorCode::ChangeRequestDeleted,
            },
            ChangeRequestError::AlreadyDeleted(_) => ErrorCode::AlreadyDeleted,
            ChangeRequestError::AlreadyReviewed(_) => ErrorCode::AlreadyReviewed,
            ChangeRequestError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ChangeRequestError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            ChangeRequestError::Forbidden(reason) => format!("Permission denied: {}", reason),
            ChangeRequestError::NotFound { resource, id } => {
                format!("{} not found: {}", resource, id)
            }
            ChangeRequestError::Deleted { resource, id } => {
                format!("{} has been deleted: {}", resource, id)
            }
            ChangeRequestError::AlreadyDeleted(id) => {
                format!("Change request already deleted: {}", id)
            }
            ChangeRequestError::AlreadyReviewed(id) => {
                format!("Change request already reviewed: {}", id)
            }
            ChangeRequestError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ChangeRequestError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl fmt::Display for ChangeRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ChangeRequestError {}

impl From<ValidationError> for ChangeRequestError {
    fn from(err: ValidationError) -> Self {
        ChangeRequestError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ChangeRequestError {
    fn from(err: DomainError) -> Self {
        let id = err.detail("id").unwrap_or("unknown").to_string();
        match err.code {
            ErrorCode::ChangeRequestNotFound => {
                ChangeRequestError::not_found(Resource::ChangeRequest, id)
            }
            ErrorCode::WbsElementNotFound => {
                ChangeRequestError::not_found(Resource::WbsElement, id)
            }
            ErrorCode::ProposedSolutionNotFound => {
                ChangeRequestError::not_found(Resource::ProposedSolution, id)
            }
            ErrorCode::ChangeRequestDeleted => {
                ChangeRequestError::deleted(Resource::ChangeRequest, id)
            }
            ErrorCode::WbsElementDeleted => ChangeRequestError::deleted(Resource::WbsElement, id),
            ErrorCode::AlreadyDeleted => ChangeRequestError::AlreadyDeleted(id),
            ErrorCode::AlreadyReviewed => ChangeRequestError::AlreadyReviewed(id),
            ErrorCode::Forbidden => ChangeRequestError::Forbidden(err.message),
            ErrorCode::ValidationFailed => {
                ChangeRequestError::ValidationFailed {
                    field: err.detail("field").unwrap_or("unknown").to_string(),
                    message: err.message,
                }
            }
            _ => ChangeRequestError::Infrastructure(err.to_string()),
        }
    }
}
