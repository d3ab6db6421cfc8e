//! Shared error types for the application

use crate::purity::Cancelled;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for purecheck operations
///
/// The analysis core itself never fails: every function gets a verdict. These
/// errors cover the surfaces around it (configuration, model loading) plus
/// cancellation bubbling out of a run.
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Program model references symbols that do not exist
    #[error("Invalid program model: {0}")]
    InvalidModel(String),

    /// The host asked the analysis to stop
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a file system error for an I/O failure on `path`
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let err = Error::Configuration("max_call_depth must be positive".into())
            .with_context("Loading .purecheck.toml");
        assert_eq!(
            err.to_string(),
            "Loading .purecheck.toml: Configuration error: max_call_depth must be positive"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::InvalidModel("dangling fn#3".into()));
        let err = result.context("validate").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().contains("dangling fn#3"));
    }

    #[test]
    fn test_cancelled_converts() {
        let err: Error = Cancelled.into();
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[test]
    fn test_file_system_error_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        match Error::file_system("Failed to read model", "/tmp/model.json", io) {
            Error::FileSystem { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("/tmp/model.json")))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
