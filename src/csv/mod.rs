//! CSV primitives for splitting lines into fields

mod parser;

pub use parser::{CsvParser, MalformedLine, ParseOutcome, PartialRecord};
