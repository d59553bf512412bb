//! Record store error types.
//!
//! Defined in `scoreline-core` so store backends and callers share one
//! taxonomy: rejected input, unknown ids, and backend persistence failures
//! are distinct variants rather than stringly-typed errors.

use thiserror::Error;

/// Errors produced by record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The supplied fields were rejected (missing or out of range).
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// An update or delete referenced an id that does not exist.
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: String },

    /// The backing store could not be read or written.
    #[error("persistence failure: {reason}")]
    Persistence { reason: String },
}

impl StoreError {
    pub fn validation(reason: impl Into<String>) -> Self {
        StoreError::Validation {
            reason: reason.into(),
        }
    }

    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn persistence(reason: impl Into<String>) -> Self {
        StoreError::Persistence {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the caller's input rather than
    /// the store itself.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StoreError::Validation { .. } | StoreError::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = StoreError::validation("total_marks must be a positive number");
        assert!(e.to_string().contains("validation failed"));

        let e = StoreError::not_found("test", "abc");
        assert_eq!(e.to_string(), "test not found: abc");
    }

    #[test]
    fn caller_error_classification() {
        assert!(StoreError::validation("x").is_caller_error());
        assert!(StoreError::not_found("subject", "y").is_caller_error());
        assert!(!StoreError::persistence("disk full").is_caller_error());
    }
}
