//! Error types for validation entry points and document loading.

use thiserror::Error;

use crate::violation::ValidationViolations;

/// Error from a validation entry point.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The document did not conform to the schema.
    #[error("document is invalid ({n} violations):\n{0}", n = .0.len())]
    InvalidDocument(ValidationViolations),

    /// The top-level value handed to the validator is not a mapping.
    ///
    /// This is a defect in the calling code, not bad document content, and
    /// is never reported as a violation.
    #[error("top-level document must be a mapping, got {found}")]
    NotADocument {
        /// Kind of the value that was passed instead.
        found: &'static str,
    },

    /// The document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path or label of the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },
}

impl ValidationError {
    /// The violations carried by [`ValidationError::InvalidDocument`].
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            ValidationError::InvalidDocument(violations) => Some(violations),
            _ => None,
        }
    }
}
