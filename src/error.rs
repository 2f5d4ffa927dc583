//! Error types for shuvlog
//!
//! This module defines the error types used throughout the engine. Sink
//! admission failures (extension, duplicate destination, filter validity,
//! file opening) are raised here and caught at the `add_sink` boundary; they
//! never reach the host application as hard failures.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shuvlog operations
#[derive(Error, Debug)]
pub enum ShuvlogError {
    /// A sink implementation declared a malformed recommended extension
    /// (must start with '.' and be at least two characters long).
    #[error("{0}: Invalid extension.")]
    BadRecommendedExtension(String),

    /// The user-supplied output path does not end with the sink's
    /// recommended extension.
    #[error("CAUTION: Prefer piping {extension_name} to {recommended} files ({path}).")]
    BadFileExtension {
        extension_name: String,
        recommended: String,
        path: PathBuf,
    },

    /// The destination file could not be opened.
    #[error("{path}: Could not open file ({source}).")]
    CouldNotOpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another sink already writes to the same file or stream.
    #[error("{0}: Another Sink is already using that file/stream.")]
    DuplicateSink(String),

    /// MinimumLevel filter given something other than exactly one level bit.
    #[error("FilterMode::MinimumLevel requires a single level, not a bitwise OR combination (mask {0:#06x}).")]
    InvalidLevel(u16),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// Unparseable log level name
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// I/O errors outside of sink admission
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for shuvlog operations
pub type Result<T> = std::result::Result<T, ShuvlogError>;

impl ShuvlogError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// Create a duplicate-destination error naming the conflicting target
    pub fn duplicate<S: Into<String>>(target: S) -> Self {
        Self::DuplicateSink(target.into())
    }

    /// Whether this error was produced while admitting a sink
    pub fn is_admission_error(&self) -> bool {
        matches!(
            self,
            Self::BadRecommendedExtension(_)
                | Self::BadFileExtension { .. }
                | Self::CouldNotOpenFile { .. }
                | Self::DuplicateSink(_)
                | Self::InvalidLevel(_)
        )
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Self::BadRecommendedExtension(_) => "sink_definition",
            Self::BadFileExtension { .. } | Self::CouldNotOpenFile { .. } => "user_input",
            Self::DuplicateSink(_) => "registration_conflict",
            Self::InvalidLevel(_) => "invalid_filter",
            Self::ConfigError(_) | Self::ConfigFileMissing(_) | Self::InvalidLogLevel(_) => {
                "config"
            }
            Self::IoError { .. } => "io",
            Self::SerializationError { .. } => "serialization",
            Self::TomlError { .. } => "toml",
            Self::InternalError(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_err = ShuvlogError::config("Invalid configuration");
        assert!(matches!(config_err, ShuvlogError::ConfigError(_)));
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Invalid configuration"
        );

        let dup = ShuvlogError::duplicate("/tmp/out.log");
        assert_eq!(
            dup.to_string(),
            "/tmp/out.log: Another Sink is already using that file/stream."
        );
    }

    #[test]
    fn test_error_from_conversions() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: ShuvlogError = io_error.into();
        assert!(matches!(err, ShuvlogError::IoError { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json").unwrap_err();
        let err: ShuvlogError = json_error.into();
        assert!(matches!(err, ShuvlogError::SerializationError { .. }));
    }

    #[test]
    fn test_bad_file_extension_message() {
        let err = ShuvlogError::BadFileExtension {
            extension_name: "JSON".to_string(),
            recommended: ".json".to_string(),
            path: PathBuf::from("/tmp/data.txt"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("CAUTION: Prefer piping JSON to .json files"));
        assert!(msg.contains("/tmp/data.txt"));
    }

    #[test]
    fn test_admission_classification() {
        assert!(ShuvlogError::InvalidLevel(0b11).is_admission_error());
        assert!(ShuvlogError::BadRecommendedExtension("log".into()).is_admission_error());
        assert!(ShuvlogError::duplicate("console").is_admission_error());
        assert!(!ShuvlogError::config("x").is_admission_error());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ShuvlogError::config("test").category(), "config");
        assert_eq!(ShuvlogError::internal("test").category(), "internal");
        assert_eq!(
            ShuvlogError::BadRecommendedExtension("x".into()).category(),
            "sink_definition"
        );
        assert_eq!(ShuvlogError::InvalidLevel(3).category(), "invalid_filter");
        assert_eq!(
            ShuvlogError::duplicate("x").category(),
            "registration_conflict"
        );
    }

    #[test]
    fn test_could_not_open_preserves_source() {
        let err = ShuvlogError::CouldNotOpenFile {
            path: PathBuf::from("/nope/out.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        };
        assert!(err.to_string().contains("Access denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
