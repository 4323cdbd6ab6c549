//! Error types for fatal remapping failures.
//!
//! Recoverable problems (ambiguous targets, implicit field access, edit
//! conflicts) are reported as per-file diagnostics instead.

use thiserror::Error;

/// Errors that abort processing of a file or a whole run.
#[derive(Debug, Error)]
pub enum RemapError {
    /// Node declarations do not line up with token boundaries or do not nest.
    #[error("Malformed tree in {file}: {message}")]
    MalformedTree { file: String, message: String },

    /// The resolution service failed to deliver a tree for a file.
    #[error("Resolution failed for {file}: {message}")]
    Resolution { file: String, message: String },

    /// A pattern definition could not be turned into a usable pattern.
    #[error("Invalid pattern {name}: {message}")]
    InvalidPattern { name: String, message: String },

    /// A pattern in the "before" set has no counterpart in the "after" set.
    #[error("Missing replacement for pattern {0}")]
    MissingReplacement(String),

    /// IO error while reading sources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemapError {
    /// Create a malformed tree error.
    pub fn malformed(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a resolution error.
    pub fn resolution(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            message: message.into(),
        }
    }
}
