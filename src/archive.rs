//! In-memory ZIP archive assembly
//!
//! Entries are compressed on the fly with s-zip into a growable buffer, so no
//! temporary files are involved. The finished archive is returned as bytes
//! ready to be used as an HTTP response body.
//!
//! # Example
//!
//! ```no_run
//! use csvzip::archive::ArchiveWriter;
//!
//! let mut archive = ArchiveWriter::new()?;
//! archive.add_entry("row_1.txt", b"name: Ann")?;
//! archive.add_entry("row_2.txt", b"name: Bob")?;
//!
//! let zip_bytes = archive.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{ConvertError, Result};
use s_zip::StreamingZipWriter;
use std::io::Cursor;

/// Deflate level for row documents: small text payloads, favor speed
pub const FAST_COMPRESSION_LEVEL: u32 = 1;

/// ZIP writer that builds the whole archive in memory
pub struct ArchiveWriter {
    zip_writer: StreamingZipWriter<Cursor<Vec<u8>>>,
    entry_count: u64,
}

impl ArchiveWriter {
    /// Create an empty archive using fast Deflate compression
    pub fn new() -> Result<Self> {
        Self::with_compression(FAST_COMPRESSION_LEVEL)
    }

    /// Create an empty archive with a Deflate level from 0 to 9
    pub fn with_compression(compression_level: u32) -> Result<Self> {
        let buffer = Cursor::new(Vec::with_capacity(64 * 1024));
        let zip_writer =
            StreamingZipWriter::from_writer_with_compression(buffer, compression_level.min(9))
                .map_err(|e| ConvertError::Archive(format!("Failed to create ZIP writer: {}", e)))?;

        Ok(Self {
            zip_writer,
            entry_count: 0,
        })
    }

    /// Append one named entry
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip_writer
            .start_entry(name)
            .map_err(|e| ConvertError::Archive(format!("Failed to start entry {}: {}", name, e)))?;
        self.zip_writer
            .write_data(data)
            .map_err(|e| ConvertError::Archive(format!("Failed to write entry {}: {}", name, e)))?;

        self.entry_count += 1;
        Ok(())
    }

    /// Get the number of entries written
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        let buffer = self
            .zip_writer
            .finish()
            .map_err(|e| ConvertError::Archive(format!("Failed to finish ZIP: {}", e)))?;
        Ok(buffer.into_inner())
    }
}
