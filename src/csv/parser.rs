//! CSV line parsing with optional double-quoted fields

use thiserror::Error;

/// Why a line could not be split into fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLine {
    /// Input ended inside a quoted field
    #[error("unterminated quoted field")]
    UnterminatedQuote,

    /// A closing quote was followed by something other than a delimiter
    #[error("unexpected character after closing quote at column {column}")]
    UnexpectedCharAfterQuote { column: usize },
}

/// Result of parsing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The line split into one or more fields
    Fields(Vec<String>),
    /// Blank line, no fields
    Empty,
    /// The line could not be parsed
    Malformed(MalformedLine),
}

impl ParseOutcome {
    /// Fields of a successfully parsed line
    pub fn into_fields(self) -> Option<Vec<String>> {
        match self {
            ParseOutcome::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// True when an open quote ran past the end of the input
    pub fn is_unterminated(&self) -> bool {
        matches!(self, ParseOutcome::Malformed(MalformedLine::UnterminatedQuote))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum FieldState {
    #[default]
    Start,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Record assembled across one or more physical lines
///
/// Feeding a continuation line resumes from the saved field state, so a
/// record is scanned once no matter how many lines it spans.
#[derive(Debug, Default)]
pub struct PartialRecord {
    fields: Vec<String>,
    current_field: String,
    state: FieldState,
}

impl PartialRecord {
    /// True while a quoted field is still open
    pub fn is_open(&self) -> bool {
        self.state == FieldState::Quoted
    }

    /// Close the record
    pub fn finish(mut self) -> ParseOutcome {
        if self.is_open() {
            return ParseOutcome::Malformed(MalformedLine::UnterminatedQuote);
        }
        self.fields.push(self.current_field);
        ParseOutcome::Fields(self.fields)
    }
}

/// CSV parser for splitting a line into fields
pub struct CsvParser {
    delimiter: u8,
    quote_char: u8,
}

impl CsvParser {
    /// Create a new CSV parser with custom delimiter and quote character
    pub fn new(delimiter: u8, quote_char: u8) -> Self {
        Self {
            delimiter,
            quote_char,
        }
    }

    /// Parse one line into fields
    ///
    /// A quote only opens a quoted field at the start of a field; elsewhere
    /// it is literal content. Inside a quoted field `""` stands for one quote.
    /// Only a zero-length line is [`ParseOutcome::Empty`]; a line of spaces is
    /// a single field holding those spaces.
    pub fn parse_line(&self, line: &str) -> ParseOutcome {
        if line.is_empty() {
            return ParseOutcome::Empty;
        }

        let mut record = PartialRecord::default();
        match self.feed(&mut record, line) {
            Ok(()) => record.finish(),
            Err(reason) => ParseOutcome::Malformed(reason),
        }
    }

    /// Continue `record` with the text of one physical line
    ///
    /// Columns in errors are 1-based within `text`.
    pub fn feed(&self, record: &mut PartialRecord, text: &str) -> Result<(), MalformedLine> {
        let quote = self.quote_char as char;
        let delimiter = self.delimiter as char;

        for (idx, ch) in text.chars().enumerate() {
            record.state = match record.state {
                FieldState::Start if ch == quote => FieldState::Quoted,
                FieldState::Start | FieldState::Unquoted if ch == delimiter => {
                    record.fields.push(std::mem::take(&mut record.current_field));
                    FieldState::Start
                }
                FieldState::Start | FieldState::Unquoted => {
                    record.current_field.push(ch);
                    FieldState::Unquoted
                }
                FieldState::Quoted if ch == quote => FieldState::QuoteInQuoted,
                FieldState::Quoted => {
                    record.current_field.push(ch);
                    FieldState::Quoted
                }
                FieldState::QuoteInQuoted if ch == quote => {
                    // Escaped quote ("")
                    record.current_field.push(quote);
                    FieldState::Quoted
                }
                FieldState::QuoteInQuoted if ch == delimiter => {
                    record.fields.push(std::mem::take(&mut record.current_field));
                    FieldState::Start
                }
                FieldState::QuoteInQuoted => {
                    return Err(MalformedLine::UnexpectedCharAfterQuote { column: idx + 1 });
                }
            };
        }

        Ok(())
    }

    /// Continue an open quoted field with the next physical line
    pub fn feed_continuation(
        &self,
        record: &mut PartialRecord,
        line: &str,
    ) -> Result<(), MalformedLine> {
        record.current_field.push('\n');
        self.feed(record, line)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',', b'"')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> Vec<String> {
        CsvParser::default()
            .parse_line(line)
            .into_fields()
            .expect("line should parse")
    }

    #[test]
    fn test_simple() {
        assert_eq!(fields("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_delimiter() {
        assert_eq!(fields(r#""Smith, Ann",30"#), vec!["Smith, Ann", "30"]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            fields(r#""Say ""Hello""",world"#),
            vec![r#"Say "Hello""#, "world"]
        );
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(fields("a,,c"), vec!["a", "", "c"]);
        assert_eq!(fields(",,"), vec!["", "", ""]);
        assert_eq!(fields("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_quoted_with_newline() {
        assert_eq!(
            fields("\"Line 1\nLine 2\",normal"),
            vec!["Line 1\nLine 2", "normal"]
        );
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(fields(r#"5" screen,x"#), vec![r#"5" screen"#, "x"]);
    }

    #[test]
    fn test_quoted_empty() {
        assert_eq!(fields(r#""","""#), vec!["", ""]);
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = CsvParser::new(b';', b'"');
        assert_eq!(
            parser.parse_line(r#"a;"b;c";d"#),
            ParseOutcome::Fields(vec!["a".into(), "b;c".into(), "d".into()])
        );
    }

    #[test]
    fn test_only_zero_length_line_is_empty() {
        let parser = CsvParser::default();
        assert_eq!(parser.parse_line(""), ParseOutcome::Empty);
        assert_eq!(
            parser.parse_line("   \t"),
            ParseOutcome::Fields(vec!["   \t".into()])
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let outcome = CsvParser::default().parse_line(r#"a,"open"#);
        assert!(outcome.is_unterminated());
        assert_eq!(outcome.into_fields(), None);
    }

    #[test]
    fn test_garbage_after_closing_quote() {
        assert_eq!(
            CsvParser::default().parse_line(r#""ab"c,d"#),
            ParseOutcome::Malformed(MalformedLine::UnexpectedCharAfterQuote { column: 5 })
        );
    }

    #[test]
    fn test_feed_resumes_open_quote() {
        let parser = CsvParser::default();
        let mut record = PartialRecord::default();

        parser.feed(&mut record, r#"1,"first"#).unwrap();
        assert!(record.is_open());
        parser.feed_continuation(&mut record, "second").unwrap();
        assert!(record.is_open());
        parser.feed_continuation(&mut record, r#"third",x"#).unwrap();
        assert!(!record.is_open());

        assert_eq!(
            record.finish(),
            ParseOutcome::Fields(vec!["1".into(), "first\nsecond\nthird".into(), "x".into()])
        );
    }

    #[test]
    fn test_feed_reports_column_within_line() {
        let parser = CsvParser::default();
        let mut record = PartialRecord::default();

        parser.feed(&mut record, r#"a,"open"#).unwrap();
        assert_eq!(
            parser.feed_continuation(&mut record, r#"ab"c"#),
            Err(MalformedLine::UnexpectedCharAfterQuote { column: 4 })
        );
    }

    #[test]
    fn test_parser_is_stateless_between_lines() {
        let parser = CsvParser::default();
        assert!(parser.parse_line(r#""broken"#).is_unterminated());
        assert_eq!(
            parser.parse_line("x,y"),
            ParseOutcome::Fields(vec!["x".into(), "y".into()])
        );
    }
}
