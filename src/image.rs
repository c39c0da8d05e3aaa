//! DTBO Image
//!
//! A byte source paired with its decoded header.
//!
//! ## Responsibilities
//! - Read the header once when the image is opened
//! - Gate the entry walk on magic and size consistency
//! - Locate and decode entry records by table position
//! - Read entry payloads

use std::path::Path;

use crate::config::{Config, EntryReadMode, SizeCheck};
use crate::error::{DtboError, Result};
use crate::format::{read_header, ContainerHeader, EntryRecord, ENTRY_SIZE};
use crate::source::{check_range, ByteSource, FileSource};

/// An opened DTBO image
///
/// Opening never rejects a bad magic, so the header can still be shown
/// for files that are not DTBO images. Call [`DtboImage::validate`]
/// before walking entries.
#[derive(Debug)]
pub struct DtboImage<S = FileSource> {
    source: S,
    header: ContainerHeader,
}

impl DtboImage<FileSource> {
    /// Open an image on disk and read its header
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Opening DTBO image: {}", path.display());
        Self::from_source(FileSource::new(path))
    }
}

impl<S: ByteSource> DtboImage<S> {
    /// Wrap any byte source and read its header
    pub fn from_source(source: S) -> Result<Self> {
        let header = read_header(&source)?;
        Ok(Self { source, header })
    }

    /// Pair a source with a header that was already read from it
    pub fn from_parts(source: S, header: ContainerHeader) -> Self {
        Self { source, header }
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn entry_count(&self) -> u32 {
        self.header.dt_entry_count
    }

    /// Check that the entry table may be walked
    ///
    /// Fails with `InvalidMagic` for a foreign file. A `total_size` that
    /// disagrees with the input length is logged, and rejected with
    /// `SizeMismatch` under [`SizeCheck::Strict`]. The whole entry table
    /// must lie inside the input, so the number of records walked is
    /// bounded by the input length rather than by `dt_entry_count`.
    pub fn validate(&self, config: &Config) -> Result<()> {
        if !self.header.has_valid_magic() {
            return Err(DtboError::InvalidMagic {
                found: self.header.magic,
            });
        }

        let actual = self.source.len()?;
        let declared = self.header.total_size;
        if u64::from(declared) != actual {
            match config.size_check {
                SizeCheck::Warn => tracing::warn!(
                    "Header total size {} does not match input size {}",
                    declared,
                    actual
                ),
                SizeCheck::Strict => {
                    return Err(DtboError::SizeMismatch { declared, actual });
                }
            }
        }

        self.check_entry_table(config.entry_read, actual)
    }

    /// Bytes read per record under `mode`
    fn record_len(&self, mode: EntryReadMode) -> Result<u64> {
        let declared = self.header.dt_entry_size;
        match mode {
            EntryReadMode::Declared if u64::from(declared) < ENTRY_SIZE => {
                Err(DtboError::InvalidEntrySize { declared })
            }
            EntryReadMode::Declared => Ok(u64::from(declared)),
            EntryReadMode::Fixed => Ok(ENTRY_SIZE),
        }
    }

    /// Check that every record `[0, dt_entry_count)` lies within `available`
    fn check_entry_table(&self, mode: EntryReadMode, available: u64) -> Result<()> {
        let count = self.header.dt_entry_count;
        if count == 0 {
            return Ok(());
        }

        let record_len = self.record_len(mode)?;
        // A zero stride stacks every record on the first one
        if count > 1 && self.header.dt_entry_size == 0 {
            return Err(DtboError::InvalidEntrySize { declared: 0 });
        }

        let start = u64::from(self.header.dt_entries_offset);
        let end = self.header.entry_offset(count - 1) + record_len;
        check_range("entry table", start, end - start, available)
    }

    /// Read and decode record `index` (zero-based)
    ///
    /// The record is located at `dt_entries_offset + index * dt_entry_size`.
    pub fn entry(&self, index: u32, mode: EntryReadMode) -> Result<EntryRecord> {
        let count = self.header.dt_entry_count;
        if index >= count {
            return Err(DtboError::EntryIndexOutOfRange { index, count });
        }

        let length = self.record_len(mode)?;
        let offset = self.header.entry_offset(index);
        tracing::debug!(index, offset, length, "reading entry record");

        let bytes = self.source.read_at("entry record", offset, length)?;
        EntryRecord::decode(&bytes).ok_or(DtboError::Truncated {
            context: "entry record",
            offset,
            length: ENTRY_SIZE,
            available: bytes.len() as u64,
        })
    }

    /// Iterate over every record in table order
    pub fn entries(&self, mode: EntryReadMode) -> Entries<'_, S> {
        Entries {
            image: self,
            mode,
            next: 0,
        }
    }

    /// Read the payload bytes of `entry`
    ///
    /// A zero-length payload yields an empty buffer.
    pub fn payload(&self, entry: &EntryRecord) -> Result<Vec<u8>> {
        let range = entry.payload_range();
        self.source
            .read_at("entry payload", range.start, range.end - range.start)
    }
}

/// Iterator over the records of a [`DtboImage`]
///
/// Yields `(index, record)` pairs; records are read lazily, one per step.
pub struct Entries<'a, S> {
    image: &'a DtboImage<S>,
    mode: EntryReadMode,
    next: u32,
}

impl<'a, S: ByteSource> Iterator for Entries<'a, S> {
    type Item = Result<(u32, EntryRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.image.entry_count() {
            return None;
        }

        let index = self.next;
        self.next += 1;
        Some(self.image.entry(index, self.mode).map(|entry| (index, entry)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.image.entry_count().saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}
