//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, and the
//! `LoadError` taxonomy for spec loading failures.

use derive_more::{Display, From};
use std::path::PathBuf;

/// Failures while obtaining or decoding a spec document.
#[derive(Debug, Display)]
pub enum LoadError {
    /// The network fetch failed (connection, timeout or non-success status).
    #[display("Failed to fetch {url}: {reason}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// Transport or status message.
        reason: String,
    },

    /// The local file does not exist.
    #[display("Spec file not found: {}", _0.display())]
    NotFound(PathBuf),

    /// The local file exists but could not be read.
    #[display("Failed to read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The content is not valid JSON/YAML.
    #[display("Failed to decode {format} document: {reason}")]
    Decode {
        /// `JSON` or `YAML`.
        format: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The document decoded, but its root is not a mapping.
    #[display("Spec root must be a mapping")]
    NotAMapping,
}

impl std::error::Error for LoadError {}

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The spec could not be loaded.
    #[display("Load Error: {_0}")]
    Load(LoadError),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_load_error_display() {
        let app_err: AppError = LoadError::NotFound(PathBuf::from("missing.yaml")).into();
        assert_eq!(
            app_err.to_string(),
            "Load Error: Spec file not found: missing.yaml"
        );

        let app_err: AppError = LoadError::NotAMapping.into();
        assert_eq!(app_err.to_string(), "Load Error: Spec root must be a mapping");
    }
}
