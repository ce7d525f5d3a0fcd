//! Error types for the ontomatch-rs library.
//!
//! The taxonomy follows the pipeline's failure contract: configuration and
//! validation problems fail fast, storage problems carry the failed
//! operation, and numeric edge cases inside the matchers never surface here
//! at all (they produce defined zero/no-match results instead).

use std::io;

use thiserror::Error;

/// Main result type for ontomatch operations.
pub type Result<T> = std::result::Result<T, OntomatchError>;

/// Error type for all ontomatch operations.
#[derive(Error, Debug)]
pub enum OntomatchError {
    /// I/O related errors (config files, exports)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for caller-supplied inputs (contract violations)
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format involved (YAML, JSON, CSV)
        format: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors crossing the project store boundary
    #[error("Storage error during {operation}: {message}")]
    Storage {
        /// Store operation that failed
        operation: String,
        /// Error description
        message: String,
    },

    /// Analysis pipeline errors
    #[error("Pipeline error at stage '{stage}': {message}")]
    Pipeline {
        /// Pipeline stage where the error occurred
        stage: String,
        /// Error description
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl OntomatchError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            expected: None,
            actual: None,
        }
    }

    /// Create a new validation error recording what was expected and received
    pub fn validation_mismatch(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Create a new storage error
    pub fn storage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a new pipeline error
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        if let Self::Internal { context: ctx, .. } = &mut self {
            *ctx = Some(context.into());
        }
        self
    }
}

impl From<io::Error> for OntomatchError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for OntomatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            format: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for OntomatchError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            format: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Helper macro for creating context-aware errors
#[macro_export]
macro_rules! ontomatch_error {
    ($kind:ident, $msg:expr) => {
        $crate::core::errors::OntomatchError::$kind($msg.to_string())
    };
    ($kind:ident, $msg:expr, $($arg:tt)*) => {
        $crate::core::errors::OntomatchError::$kind(format!($msg, $($arg)*))
    };
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<OntomatchError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OntomatchError::config("Invalid configuration");
        assert!(matches!(err, OntomatchError::Config { .. }));

        let err = OntomatchError::storage("save_matches", "write rejected");
        assert!(matches!(err, OntomatchError::Storage { .. }));
    }

    #[test]
    fn test_config_field_error() {
        let err = OntomatchError::config_field("Invalid value", "matching.threshold");

        if let OntomatchError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("matching.threshold".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validation_mismatch() {
        let err = OntomatchError::validation_mismatch(
            "segment count out of range",
            "segment_count",
            ">= 1",
            "0",
        );

        if let OntomatchError::Validation {
            field,
            expected,
            actual,
            ..
        } = err
        {
            assert_eq!(field, Some("segment_count".to_string()));
            assert_eq!(expected, Some(">= 1".to_string()));
            assert_eq!(actual, Some("0".to_string()));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_error_with_context() {
        let err = OntomatchError::internal("vocabulary index out of bounds")
            .with_context("building concept tf matrix");

        if let OntomatchError::Internal { context, .. } = err {
            assert_eq!(context, Some("building concept tf matrix".to_string()));
        } else {
            panic!("Expected Internal error");
        }
    }

    #[test]
    fn test_with_context_non_contextual_error() {
        let err = OntomatchError::config("Bad config").with_context("Should not change");

        if let OntomatchError::Config { message, .. } = err {
            assert_eq!(message, "Bad config");
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_result_extension() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let mapped = result.context("Failed to read configuration file");
        assert!(matches!(mapped.unwrap_err(), OntomatchError::Io { .. }));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: OntomatchError = yaml_err.into();

        if let OntomatchError::Serialization { format, .. } = err {
            assert_eq!(format, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_error_display_formatting() {
        let err = OntomatchError::pipeline("matching", "vocabulary is empty");
        let display = format!("{err}");
        assert!(display.contains("Pipeline error at stage 'matching'"));
        assert!(display.contains("vocabulary is empty"));
    }
}
