//! Entry Record
//!
//! One row of the entry table: where a DTB lives and how it is tagged.

use bytes::Buf;

use super::ENTRY_SIZE;

/// A decoded entry table record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryRecord {
    /// Payload length in bytes
    pub dt_size: u32,
    /// Absolute payload offset
    pub dt_offset: u32,
    /// Optional board id, 0 if unused
    pub id: u32,
    /// Optional revision, 0 if unused
    pub rev: u32,
    /// Opaque vendor values, 0 if unused
    pub custom: [u32; 4],
}

impl EntryRecord {
    /// Decode a record from the first 32 bytes of `bytes`
    ///
    /// Trailing bytes (from a larger declared entry size) are ignored.
    /// Returns `None` if fewer than 32 bytes are given.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if (bytes.len() as u64) < ENTRY_SIZE {
            return None;
        }

        let mut buf = &bytes[..ENTRY_SIZE as usize];
        Some(Self {
            dt_size: buf.get_u32(),
            dt_offset: buf.get_u32(),
            id: buf.get_u32(),
            rev: buf.get_u32(),
            custom: [buf.get_u32(), buf.get_u32(), buf.get_u32(), buf.get_u32()],
        })
    }

    /// Byte range `[dt_offset, dt_offset + dt_size)` of the payload
    pub fn payload_range(&self) -> std::ops::Range<u64> {
        let start = u64::from(self.dt_offset);
        start..start + u64::from(self.dt_size)
    }

    /// Output file name for this record at zero-based table position `index`
    pub fn file_name(&self, index: u32) -> String {
        crate::extract::output_file_name(index, self.id, self.rev)
    }
}
