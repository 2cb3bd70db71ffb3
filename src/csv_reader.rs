//! Record-by-record CSV reading over an in-memory payload

use crate::csv::{CsvParser, MalformedLine, ParseOutcome, PartialRecord};
use std::str::Lines;

const UTF8_BOM: char = '\u{feff}';

/// CSV reader over decoded text
///
/// Yields one [`ParseOutcome`] per record. A record is normally one physical
/// line; when a quoted field is still open at the end of a line, following
/// lines are joined with `\n` until the quote closes. If the joined record
/// turns out malformed, or the input ends with the quote still open, only the
/// record's first line is reported as malformed and reading resumes on the
/// line after it.
///
/// # Examples
///
/// ```
/// use csvzip::csv_reader::CsvReader;
/// use csvzip::csv::ParseOutcome;
///
/// let mut reader = CsvReader::new("name,note\nAnn,\"two\nlines\"\n");
///
/// assert_eq!(
///     reader.read_record(),
///     Some(ParseOutcome::Fields(vec!["name".into(), "note".into()]))
/// );
/// assert_eq!(
///     reader.read_record(),
///     Some(ParseOutcome::Fields(vec!["Ann".into(), "two\nlines".into()]))
/// );
/// assert_eq!(reader.read_record(), None);
/// ```
pub struct CsvReader<'a> {
    lines: Lines<'a>,

    // Cursor state
    line_number: usize,
    record_start: usize,
    record_count: u64,

    // Configuration
    delimiter: u8,
    quote_char: u8,
}

impl<'a> CsvReader<'a> {
    /// Create a reader over `text`, skipping a leading UTF-8 byte order mark
    pub fn new(text: &'a str) -> Self {
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
        Self {
            lines: text.lines(),
            line_number: 0,
            record_start: 0,
            record_count: 0,
            delimiter: b',',
            quote_char: b'"',
        }
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: u8) -> Self {
        self.quote_char = quote;
        self
    }

    /// Read the next record
    ///
    /// Returns `None` once the input is exhausted.
    pub fn read_record(&mut self) -> Option<ParseOutcome> {
        let first = self.lines.next()?;
        self.line_number += 1;
        self.record_start = self.line_number;
        self.record_count += 1;

        if first.is_empty() {
            return Some(ParseOutcome::Empty);
        }

        let parser = CsvParser::new(self.delimiter, self.quote_char);
        let mut record = PartialRecord::default();
        if let Err(reason) = parser.feed(&mut record, first) {
            return Some(ParseOutcome::Malformed(reason));
        }
        if !record.is_open() {
            return Some(record.finish());
        }

        // Quoted field spans into the following lines
        let resume = self.lines.clone();
        while let Some(next) = self.lines.next() {
            self.line_number += 1;
            if parser.feed_continuation(&mut record, next).is_err() {
                break;
            }
            if !record.is_open() {
                return Some(record.finish());
            }
        }

        // Give up on the first line only
        self.lines = resume;
        self.line_number = self.record_start;
        Some(ParseOutcome::Malformed(MalformedLine::UnterminatedQuote))
    }

    /// Get iterator over records
    pub fn records(&mut self) -> CsvRecordIterator<'_, 'a> {
        CsvRecordIterator { reader: self }
    }

    /// 1-based physical line where the last returned record started
    pub fn line_number(&self) -> usize {
        self.record_start
    }

    /// Get the number of records read so far
    pub fn record_count(&self) -> u64 {
        self.record_count
    }
}

/// Iterator over CSV records
pub struct CsvRecordIterator<'r, 'a> {
    reader: &'r mut CsvReader<'a>,
}

impl Iterator for CsvRecordIterator<'_, '_> {
    type Item = ParseOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record()
    }
}
