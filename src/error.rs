//! Error types for blamelens.
//!
//! This module provides the error taxonomy for the client layer following
//! the thiserror pattern. The two preflight conditions (`BackendUnavailable`,
//! `NoProjectSelected`) are detected before a backend call is issued and are
//! surfaced as dedicated empty states, never as the generic failure path.

use thiserror::Error;

/// Primary error type for blamelens operations.
#[derive(Error, Debug)]
pub enum LensError {
    /// No remote invocation channel is configured.
    ///
    /// This is a distinct condition from a call that was attempted and
    /// rejected: views show a "desktop backend required" empty state for it.
    #[error("No backend channel configured. Blame data requires the desktop backend")]
    BackendUnavailable,

    /// An operation requiring an active project was invoked without one.
    #[error("No project selected")]
    NoProjectSelected,

    /// A backend call was attempted and rejected.
    #[error("Backend call '{operation}' failed: {message}")]
    RequestFailed {
        /// Name of the backend operation that failed.
        operation: String,
        /// Error message returned by the backend.
        message: String,
    },

    /// A navigation target was absent after a successful load.
    #[error("Not found: {target}")]
    NotFound {
        /// Description of the missing target (file path or session ID).
        target: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization or wire-decoding error.
    #[error("Serialization error: {context}")]
    Serialization {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// TUI error.
    #[error("TUI error: {message}")]
    Tui {
        /// Human-readable error message.
        message: String,
    },
}

impl LensError {
    /// Create a new request-failed error.
    #[must_use]
    pub fn request(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is a preflight condition rather than a failed call.
    ///
    /// Preflight conditions get dedicated empty states in the affected view.
    #[must_use]
    pub const fn is_preflight(&self) -> bool {
        matches!(self, Self::BackendUnavailable | Self::NoProjectSelected)
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_preflight() {
            2
        } else {
            1
        }
    }
}

/// Result type alias for blamelens operations.
pub type Result<T> = std::result::Result<T, LensError>;

impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for LensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_classification() {
        assert!(LensError::BackendUnavailable.is_preflight());
        assert!(LensError::NoProjectSelected.is_preflight());
        assert!(!LensError::request("blame_file", "boom").is_preflight());
        assert!(!LensError::not_found("x.py").is_preflight());
    }

    #[test]
    fn test_request_display_names_operation() {
        let err = LensError::request("list_timeline", "trace dir missing");
        let text = err.to_string();
        assert!(text.contains("list_timeline"));
        assert!(text.contains("trace dir missing"));
    }
}
