//! Error types for issuepress.
//!
//! Library crates use [`IssuePressError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all issuepress operations.
#[derive(Debug, thiserror::Error)]
pub enum IssuePressError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport or HTTP failure while talking to the issue tracker.
    #[error("tracker error: {0}")]
    Tracker(String),

    /// The tracker reported that the requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response decoding or content parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad repository name, invalid value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IssuePressError>;

impl IssuePressError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the tracker has no such resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = IssuePressError::config("missing repository name");
        assert_eq!(err.to_string(), "config error: missing repository name");

        let err = IssuePressError::validation("repo name must be owner/name");
        assert!(err.to_string().contains("owner/name"));
    }

    #[test]
    fn not_found_is_detected() {
        assert!(IssuePressError::NotFound("issue #7".into()).is_not_found());
        assert!(!IssuePressError::Tracker("HTTP 500".into()).is_not_found());
    }
}
