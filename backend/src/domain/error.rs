//! Error taxonomy shared by every operation. All errors surface at the
//! boundary of a single request; nothing is retried or swallowed.

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// A validation message attached to a single form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// No authenticated actor on the request
    #[error("authentication required")]
    Unauthorized,

    /// The actor lacks the capability for this action
    #[error("access denied for action '{0}'")]
    AccessDenied(String),

    /// A referenced identifier does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The submitted payload violates field constraints
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Storage or other infrastructure failure. Must never turn into a
    /// success notification or redirect.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Shorthand for a single-field validation error
    pub fn validation(field: &str, message: &str) -> Self {
        DomainError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        DomainError::NotFound(format!("{} '{}'", entity, id))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        for (field, errors) in errors.field_errors() {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                fields.push(FieldError {
                    field: field.to_string(),
                    message,
                });
            }
        }
        DomainError::Validation(fields)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
