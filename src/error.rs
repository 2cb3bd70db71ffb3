//! Error types for CSV to archive conversion

use thiserror::Error;

/// Errors that abort a conversion request
///
/// Row-level problems (malformed quoting, blank lines, serializer failures)
/// never show up here; they are logged and the row is skipped.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The upload was missing or had no content
    #[error("No file uploaded.")]
    NoFile,

    /// The uploaded file name does not end in `.csv`
    #[error("Only CSV files are accepted.")]
    NotCsv,

    /// `outputFormat` was missing or not one of `json` / `txt`
    #[error("Unsupported output format.")]
    UnsupportedFormat(String),

    /// The payload is not UTF-8 or its header row is unusable
    #[error("Invalid CSV format.")]
    InvalidCsv,

    /// Building the ZIP archive failed
    #[error("Archive error: {0}")]
    Archive(String),
}

impl ConvertError {
    /// Whether the error was caused by the uploaded input (HTTP 400)
    /// rather than by the server (HTTP 500)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ConvertError::Archive(_))
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages() {
        assert_eq!(ConvertError::NoFile.to_string(), "No file uploaded.");
        assert_eq!(ConvertError::NotCsv.to_string(), "Only CSV files are accepted.");
        assert_eq!(ConvertError::InvalidCsv.to_string(), "Invalid CSV format.");
        assert_eq!(
            ConvertError::UnsupportedFormat("xml".to_string()).to_string(),
            "Unsupported output format."
        );
    }

    #[test]
    fn test_client_vs_server() {
        assert!(ConvertError::NoFile.is_client_error());
        assert!(ConvertError::InvalidCsv.is_client_error());
        assert!(!ConvertError::Archive("disk full".to_string()).is_client_error());
    }
}
