//! DTBO Format Module
//!
//! On-disk layout of a DTBO (device tree blob overlay) container image.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (32 bytes)                                       │
//! │   Magic: 0xD7B7AB1E | TotalSize | HeaderSize            │
//! │   EntrySize | EntryCount | EntriesOffset                │
//! │   PageSize | Version                                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Entry Table (at EntriesOffset, stride EntrySize)        │
//! │   [DtSize][DtOffset][Id][Rev][Custom0..3]               │
//! │   ... repeated EntryCount times ...                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payloads (variable)                                     │
//! │   DTB bytes at [DtOffset, DtOffset + DtSize)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every field is a big-endian `u32`. Offsets are absolute from the start
//! of the file.

mod entry;
mod header;

pub use entry::EntryRecord;
pub use header::{read_header, ContainerHeader};

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic number identifying a DTBO image
pub const DT_TABLE_MAGIC: u32 = 0xD7B7_AB1E;

/// Header size: 8 fields × 4 bytes
pub const HEADER_SIZE: u64 = 32;

/// Entry record size: 8 fields × 4 bytes
pub const ENTRY_SIZE: u64 = 32;
