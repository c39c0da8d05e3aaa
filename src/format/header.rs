//! Container Header
//!
//! Decodes the fixed 32-byte header at offset 0.

use bytes::Buf;

use crate::error::{DtboError, Result};
use crate::source::ByteSource;

use super::{DT_TABLE_MAGIC, HEADER_SIZE};

/// The DTBO container header, decoded field by field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Must equal `DT_TABLE_MAGIC` for the image to be walked
    pub magic: u32,
    /// Header + entry table + all payloads
    pub total_size: u32,
    /// Declared header size (32 for the known layout)
    pub header_size: u32,
    /// Declared entry record size, used as the table stride
    pub dt_entry_size: u32,
    pub dt_entry_count: u32,
    /// Absolute offset of the first entry record
    pub dt_entries_offset: u32,
    pub page_size: u32,
    pub version: u32,
}

impl ContainerHeader {
    /// Decode a header from the first 32 bytes of `bytes`
    ///
    /// Returns `None` if fewer than 32 bytes are given.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if (bytes.len() as u64) < HEADER_SIZE {
            return None;
        }

        let mut buf = &bytes[..HEADER_SIZE as usize];
        Some(Self {
            magic: buf.get_u32(),
            total_size: buf.get_u32(),
            header_size: buf.get_u32(),
            dt_entry_size: buf.get_u32(),
            dt_entry_count: buf.get_u32(),
            dt_entries_offset: buf.get_u32(),
            page_size: buf.get_u32(),
            version: buf.get_u32(),
        })
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == DT_TABLE_MAGIC
    }

    /// Absolute offset of record `index` in the entry table
    pub fn entry_offset(&self, index: u32) -> u64 {
        u64::from(self.dt_entries_offset) + u64::from(index) * u64::from(self.dt_entry_size)
    }
}

/// Read and decode the header at offset 0 of `source`
///
/// An invalid magic is not rejected here; callers check
/// [`ContainerHeader::has_valid_magic`] before walking entries.
/// Fails with `Truncated` when the input is shorter than 32 bytes.
pub fn read_header<S: ByteSource + ?Sized>(source: &S) -> Result<ContainerHeader> {
    let bytes = source.read_at("header", 0, HEADER_SIZE)?;

    // read_at returned exactly HEADER_SIZE bytes
    let header = ContainerHeader::decode(&bytes).ok_or(DtboError::Truncated {
        context: "header",
        offset: 0,
        length: HEADER_SIZE,
        available: bytes.len() as u64,
    })?;

    tracing::debug!(
        entries = header.dt_entry_count,
        entries_offset = header.dt_entries_offset,
        entry_size = header.dt_entry_size,
        "decoded header with magic {:#010x}",
        header.magic
    );

    Ok(header)
}
