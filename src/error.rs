//! Error types for dtbo-unpack
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DtboError
pub type Result<T> = std::result::Result<T, DtboError>;

/// Unified error type for DTBO reading and extraction
#[derive(Debug, Error)]
pub enum DtboError {
    // -------------------------------------------------------------------------
    // Byte-range I/O Errors
    // -------------------------------------------------------------------------
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to seek to offset {offset} in {}: {source}", .path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {length} bytes at offset {offset} from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        length: u64,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("truncated {context}: {length} bytes at offset {offset} exceed input of {available} bytes")]
    Truncated {
        context: &'static str,
        offset: u64,
        length: u64,
        available: u64,
    },

    #[error("invalid DTBO magic: expected {:#010x}, got {found:#010x}", crate::format::DT_TABLE_MAGIC)]
    InvalidMagic { found: u32 },

    #[error("declared entry size {declared} is smaller than the {}-byte entry record", crate::format::ENTRY_SIZE)]
    InvalidEntrySize { declared: u32 },

    #[error("entry index {index} out of range (image has {count} entries)")]
    EntryIndexOutOfRange { index: u32, count: u32 },

    #[error("header total size {declared} does not match input size {actual}")]
    SizeMismatch { declared: u32, actual: u64 },

    // -------------------------------------------------------------------------
    // Output Errors
    // -------------------------------------------------------------------------
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("extraction worker panicked")]
    WorkerPanicked,
}

impl DtboError {
    /// True when the failure is a range running past the end of the input
    pub fn is_truncation(&self) -> bool {
        matches!(self, DtboError::Truncated { .. })
    }
}
