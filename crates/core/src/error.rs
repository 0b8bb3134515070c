//! Error types for Pagewright operations.
//!
//! The pure engines (extraction, scoring, reconstruction) never fail on
//! data-shape problems: a page with no title is a valid, scorable page. The
//! variants below cover the remaining failure classes: rejected caller input,
//! missing pages, storage and I/O failures, and ingestion transport errors.
//!
//! # Example
//!
//! ```rust
//! use pagewright_core::{BulkEdit, PagewrightError, TargetField};
//!
//! let edit = BulkEdit::new("", "Houston", [TargetField::Content]);
//! match edit.validate() {
//!     Err(PagewrightError::Validation(msg)) => println!("rejected: {}", msg),
//!     _ => unreachable!(),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Pagewright operations.
#[derive(Error, Debug)]
pub enum PagewrightError {
    /// Caller input rejected before any work started.
    ///
    /// Returned for empty find text, an empty target field set, or an
    /// empty document selection. Distinct from execution failures.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A page addressed by slug does not exist in storage.
    #[error("Page not found: {0}")]
    NotFound(String),

    /// The storage collaborator failed.
    ///
    /// A bulk commit that hits this error leaves every page in the batch
    /// unchanged.
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Wraps standard I/O errors for file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Keyword configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON (de)serialization of trees and reports.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PagewrightError {
    /// True for errors caused by caller input rather than execution.
    pub fn is_validation(&self) -> bool {
        matches!(self, PagewrightError::Validation(_))
    }
}

/// Result type alias for PagewrightError.
pub type Result<T> = std::result::Result<T, PagewrightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PagewrightError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_validation_error() {
        let err = PagewrightError::Validation("find text must not be empty".to_string());
        assert!(err.is_validation());
        assert!(err.to_string().contains("find text"));
    }

    #[test]
    fn test_storage_error_is_not_validation() {
        let err = PagewrightError::Storage("connection reset".to_string());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_timeout_error() {
        let err = PagewrightError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }
}
