use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by nutrigraph repositories.
///
/// Every variant is boundary-recoverable: the transport collaborator maps it
/// to a status code via [`Error::status_code`] and nothing propagates as an
/// unhandled fault.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation - the value already exists on another entity.
    #[error("{field} '{value}' already exists")]
    Conflict { field: &'static str, value: String },

    /// The operation is not allowed for this combination of inputs
    /// (e.g. a user attempting to follow themselves).
    #[error("invalid operation: {message}")]
    InvalidOperation { message: Cow<'static, str> },

    /// No caller identity was supplied.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller identity is valid but may not act on this resource.
    #[error("forbidden")]
    Forbidden,
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        Error::Conflict {
            field,
            value: value.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<Cow<'static, str>>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// The HTTP status the transport layer should answer with.
    ///
    /// Duplicate-key conflicts map to 400 rather than 409 to preserve the
    /// response contract of the existing API surface.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 422,
            Error::NotFound { .. } => 404,
            Error::Conflict { .. } => 400,
            Error::InvalidOperation { .. } => 400,
            Error::Unauthorized => 401,
            Error::Forbidden => 403,
        }
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `Err` if any issues were collected, `Ok` otherwise.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Detailed validation failure for a single field or logical path.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}
