//! # csvzip
//!
//! Convert an uploaded CSV file into a ZIP archive holding one document per
//! data row, either a JSON object keyed by the header names or a block of
//! `header: value` lines.
//!
//! ## Quick Start
//!
//! ```
//! use csvzip::{convert, Upload};
//!
//! let upload = Upload::new("people.csv", "name,age\nAnn,30\n\"Smith, Bob\",41\n");
//! let archive = convert(&upload, Some("txt"))?;
//!
//! assert_eq!(archive.file_name, "people.zip");
//! assert_eq!(archive.entry_count, 2);
//! # Ok::<(), csvzip::ConvertError>(())
//! ```
//!
//! With the `server` feature (on by default) the crate also provides an axum
//! router exposing the conversion as a multipart upload endpoint.

pub mod archive;
pub mod config;
pub mod converter;
pub mod csv;
pub mod csv_reader;
pub mod document;
pub mod error;
#[cfg(feature = "server")]
pub mod http;
pub mod types;

pub use converter::{convert, convert_with_format, ConversionJob};
pub use error::{ConvertError, Result};
pub use types::{ConvertedArchive, OutputFormat, Upload};
