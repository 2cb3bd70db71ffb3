//! CSV upload to ZIP archive conversion
//!
//! A conversion runs in three phases over one request-scoped
//! [`ConversionJob`]:
//!
//! - **Init**: validate the upload, read the header row, open the archive
//! - **Streaming**: turn every following record into one archive entry
//! - **Finalize**: close the archive and hand back its bytes
//!
//! Blank or malformed data rows are logged and skipped; they never fail the
//! request and never consume an entry number.
//!
//! # Example
//!
//! ```
//! use csvzip::{convert, Upload};
//!
//! let upload = Upload::new("people.csv", "name,age\nAnn,30\n");
//! let archive = convert(&upload, Some("json"))?;
//!
//! assert_eq!(archive.file_name, "people.zip");
//! assert_eq!(archive.entry_count, 1);
//! # Ok::<(), csvzip::ConvertError>(())
//! ```

use crate::archive::ArchiveWriter;
use crate::csv::ParseOutcome;
use crate::csv_reader::CsvReader;
use crate::document;
use crate::error::{ConvertError, Result};
use crate::types::{ConvertedArchive, OutputFormat, Upload};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Convert an upload using the raw `outputFormat` form value
///
/// File checks run before the format check, so an empty upload is reported
/// as such even when the format is also missing.
pub fn convert(upload: &Upload, output_format: Option<&str>) -> Result<ConvertedArchive> {
    validate_upload(upload)?;
    let format = OutputFormat::from_form_value(output_format)?;
    convert_validated(upload, format)
}

/// Convert an upload into an archive of `format` documents
pub fn convert_with_format(upload: &Upload, format: OutputFormat) -> Result<ConvertedArchive> {
    validate_upload(upload)?;
    convert_validated(upload, format)
}

fn convert_validated(upload: &Upload, format: OutputFormat) -> Result<ConvertedArchive> {
    let text = std::str::from_utf8(&upload.data).map_err(|e| {
        debug!("Rejecting {}: not UTF-8: {}", upload.file_name, e);
        ConvertError::InvalidCsv
    })?;

    let mut reader = CsvReader::new(text);
    let mut job = ConversionJob::start(upload, format, &mut reader)?;

    while let Some(outcome) = reader.read_record() {
        job.process_record(outcome, reader.line_number())?;
    }

    job.finish()
}

/// Check that the upload is non-empty and named `*.csv`
pub fn validate_upload(upload: &Upload) -> Result<()> {
    if upload.data.is_empty() {
        return Err(ConvertError::NoFile);
    }
    if !upload.has_csv_extension() {
        return Err(ConvertError::NotCsv);
    }
    Ok(())
}

/// Per-request conversion state
///
/// Holds the header row, the running entry index and the archive under
/// construction. Nothing here outlives one request.
pub struct ConversionJob {
    format: OutputFormat,
    headers: Vec<String>,
    archive: ArchiveWriter,
    next_index: u64,
    skipped_rows: u64,
    base_name: String,
}

impl ConversionJob {
    /// Read the header row from `reader` and open an empty archive
    pub fn start(upload: &Upload, format: OutputFormat, reader: &mut CsvReader<'_>) -> Result<Self> {
        let headers = match reader.read_record() {
            Some(ParseOutcome::Fields(fields)) => fields,
            Some(ParseOutcome::Malformed(reason)) => {
                debug!("Rejecting {}: malformed header: {}", upload.file_name, reason);
                return Err(ConvertError::InvalidCsv);
            }
            Some(ParseOutcome::Empty) | None => return Err(ConvertError::InvalidCsv),
        };

        // A JSON object cannot hold the same key twice
        if format == OutputFormat::Json && has_duplicates(&headers) {
            debug!("Rejecting {}: duplicate header names", upload.file_name);
            return Err(ConvertError::InvalidCsv);
        }

        Ok(Self {
            format,
            headers,
            archive: ArchiveWriter::new()?,
            next_index: 1,
            skipped_rows: 0,
            base_name: upload.base_name().to_string(),
        })
    }

    /// Header names read during [`ConversionJob::start`]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Convert one record into an archive entry, or skip it
    ///
    /// Only archive failures are returned as errors.
    pub fn process_record(&mut self, outcome: ParseOutcome, line_number: usize) -> Result<()> {
        match outcome {
            ParseOutcome::Fields(values) => self.emit_row(&values, line_number),
            ParseOutcome::Empty => {
                self.skip(line_number, "blank line");
                Ok(())
            }
            ParseOutcome::Malformed(reason) => {
                self.skip(line_number, &reason.to_string());
                Ok(())
            }
        }
    }

    fn emit_row(&mut self, values: &[String], line_number: usize) -> Result<()> {
        let content = match document::render(self.format, &self.headers, values) {
            Ok(content) => content,
            Err(e) => {
                self.skip(line_number, &e.to_string());
                return Ok(());
            }
        };

        let entry_name = format!("row_{}.{}", self.next_index, self.format.extension());
        self.archive.add_entry(&entry_name, content.as_bytes())?;
        self.next_index += 1;
        Ok(())
    }

    fn skip(&mut self, line_number: usize, reason: &str) {
        warn!("Skipping line {}: {}", line_number, reason);
        self.skipped_rows += 1;
    }

    /// Close the archive and return it with its download name
    pub fn finish(self) -> Result<ConvertedArchive> {
        let entry_count = self.archive.entry_count();
        let data = self.archive.finish()?;

        debug!(
            "Built {}.zip: {} entries, {} rows skipped, {} bytes",
            self.base_name,
            entry_count,
            self.skipped_rows,
            data.len()
        );

        Ok(ConvertedArchive {
            data,
            file_name: format!("{}.zip", self.base_name),
            entry_count,
            skipped_rows: self.skipped_rows,
        })
    }
}

fn has_duplicates(names: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(names.len());
    !names.iter().all(|name| seen.insert(name.as_str()))
}
