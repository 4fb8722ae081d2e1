//! Store error taxonomy
//!
//! Error definitions with transient/permanent classification. The
//! maintenance operations branch on `NotFound` and `AlreadyExists`;
//! everything else propagates to the caller unmodified.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error that can occur against the identity or document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed identity or document does not exist.
    ///
    /// Recoverable locally: the provisioning workflow treats this as a
    /// valid branch ("nothing to delete", "create instead of update").
    #[error("{kind} not found: {key}")]
    NotFound {
        /// What was looked up ("identity", "document", "collection").
        kind: &'static str,
        key: String,
    },

    /// An identity with the same business key already exists.
    ///
    /// Recoverable locally: triggers the update-instead-of-create branch.
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },

    /// Malformed input, rejected before any remote call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Quota, network, permission, or server-side failure.
    ///
    /// The core never retries these; the underlying message is preserved
    /// and surfaced to the invoking caller.
    #[error("service error: {0}")]
    Transient(String),
}

impl StoreError {
    /// Whether a caller outside the core could reasonably retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    /// Shorthand for an identity lookup miss.
    pub fn identity_not_found(email: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "identity",
            key: email.into(),
        }
    }

    /// Shorthand for a document lookup miss.
    pub fn document_not_found(path: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: "document",
            key: path.into(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transient(err.to_string())
    }
}
