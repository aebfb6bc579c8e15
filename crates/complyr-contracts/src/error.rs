//! Error types for the COMPLYR workspace.
//!
//! Evaluation itself never fails. Errors come from rejecting a request body,
//! loading configuration, or the surrounding plumbing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One itemized reason a request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON pointer into the request body (`""` for the document root).
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The unified error type for COMPLYR.
#[derive(Debug, Error)]
pub enum ComplyrError {
    /// The request body did not conform to the expected shape. Nothing was
    /// evaluated.
    #[error("request validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<ValidationIssue> },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The request schema document could not be compiled.
    #[error("schema error: {reason}")]
    Schema { reason: String },

    /// The audit writer could not persist a record.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the COMPLYR crates.
pub type ComplyrResult<T> = Result<T, ComplyrError>;
