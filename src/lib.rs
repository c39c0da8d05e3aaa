//! # dtbo-unpack
//!
//! Reader and extractor for Android DTBO (device tree blob overlay)
//! container images:
//! - Header decoding with explicit big-endian fields
//! - Entry table walking with the declared entry stride
//! - Bounds-checked payload extraction to `NN_0xIIII_0xRRRR.dtb` files
//! - Sequential or parallel extraction, fail-fast or keep-going
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Byte Source                               │
//! │             (file on disk / memory buffer)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read_at(offset, length)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Header Reader                               │
//! │             (32 bytes at offset 0, magic gate)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Entry Table Walker                            │
//! │        record → payload → NN_0xIIII_0xRRRR.dtb               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod source;
pub mod format;
pub mod image;
pub mod extract;
pub mod unpack;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DtboError, Result};
pub use config::Config;
pub use format::{read_header, ContainerHeader, EntryRecord};
pub use image::DtboImage;
pub use extract::{ExtractedEntry, ExtractionReport, Extractor};
pub use unpack::{unpack, unpack_with, Unpacked};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dtbo-unpack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
