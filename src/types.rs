//! Type definitions for uploads, output formats and archives

use crate::error::ConvertError;
use std::fmt;
use std::str::FromStr;

/// Media type of the returned archive
pub const ZIP_MEDIA_TYPE: &str = "application/zip";

/// Document format for each archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Flat JSON object keyed by header names
    Json,
    /// `header: value` lines
    Text,
}

impl OutputFormat {
    /// File extension used for archive entries
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }

    /// Parse the `outputFormat` form value, rejecting a missing value
    pub fn from_form_value(value: Option<&str>) -> Result<Self, ConvertError> {
        value
            .ok_or_else(|| ConvertError::UnsupportedFormat(String::new()))?
            .parse()
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("json") {
            Ok(OutputFormat::Json)
        } else if value.eq_ignore_ascii_case("txt") {
            Ok(OutputFormat::Text)
        } else {
            Err(ConvertError::UnsupportedFormat(value.to_string()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded file held in memory
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// File name as sent by the client
    pub file_name: String,
    /// Raw file content
    pub data: Vec<u8>,
}

impl Upload {
    /// Create a new upload
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Upload {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Whether the file name ends in `.csv` (case-insensitive)
    pub fn has_csv_extension(&self) -> bool {
        std::path::Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }

    /// File name without directory part and last extension
    pub fn base_name(&self) -> &str {
        // Browsers on Windows may send full client paths
        let name = self
            .file_name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.file_name);
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

/// Finished ZIP archive ready to be sent to the client
#[derive(Debug, Clone)]
pub struct ConvertedArchive {
    /// Archive bytes
    pub data: Vec<u8>,
    /// Suggested download name, `<base-name>.zip`
    pub file_name: String,
    /// Number of entries written
    pub entry_count: u64,
    /// Number of data rows skipped as blank or malformed
    pub skipped_rows: u64,
}

impl ConvertedArchive {
    /// Media type of the archive
    pub fn content_type(&self) -> &'static str {
        ZIP_MEDIA_TYPE
    }
}
