//! Extraction Module
//!
//! Walks the entry table and persists each DTB payload to its own file.
//!
//! ## Responsibilities
//! - Read each entry record at its table position
//! - Read the payload it points at (before touching the output)
//! - Create the output directory on demand
//! - Write `NN_0xIIII_0xRRRR.dtb` files
//! - Report per-entry results for display; never print
//!
//! Entries are independent of each other. Under
//! [`FailurePolicy::FailFast`] the first failure ends the walk and files
//! already written are left in place.

mod naming;
mod parallel;
mod writer;

use std::path::{Path, PathBuf};

use crate::config::{Config, FailurePolicy};
use crate::error::{DtboError, Result};
use crate::format::{ContainerHeader, EntryRecord};
use crate::image::DtboImage;
use crate::source::ByteSource;

pub use naming::{output_file_name, output_path};

// =============================================================================
// Results
// =============================================================================

/// What was extracted for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Zero-based table position
    pub index: u32,
    pub id: u32,
    pub rev: u32,
    pub custom: [u32; 4],
    /// Payload length in bytes
    pub size: u32,
    /// Absolute payload offset in the image
    pub offset: u32,
    /// File written, `None` on a dry run
    pub path: Option<PathBuf>,
}

impl ExtractedEntry {
    fn new(index: u32, record: &EntryRecord, path: Option<PathBuf>) -> Self {
        Self {
            index,
            id: record.id,
            rev: record.rev,
            custom: record.custom,
            size: record.dt_size,
            offset: record.dt_offset,
            path,
        }
    }

    /// 1-based position, as used in file names
    pub fn number(&self) -> u64 {
        u64::from(self.index) + 1
    }
}

/// A failed entry, kept under [`FailurePolicy::Continue`]
#[derive(Debug)]
pub struct EntryFailure {
    pub index: u32,
    pub error: DtboError,
}

/// Outcome of a whole walk, in ascending index order
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub entries: Vec<ExtractedEntry>,
    pub failures: Vec<EntryFailure>,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// Entry table walker bound to one image and one configuration
pub struct Extractor<'a, S> {
    image: &'a DtboImage<S>,
    config: &'a Config,
}

impl<'a, S: ByteSource> Extractor<'a, S> {
    /// Validate the image for extraction
    ///
    /// Fails with `InvalidMagic`, with `Truncated` when the entry table
    /// runs past the end of the input, or with `SizeMismatch` in strict
    /// mode; no entry is touched in that case.
    pub fn new(image: &'a DtboImage<S>, config: &'a Config) -> Result<Self> {
        image.validate(config)?;
        Ok(Self { image, config })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Extract entry `index` (zero-based)
    ///
    /// The record and payload are both read before the output file is
    /// created, so a truncated entry leaves no file behind.
    pub fn extract_entry(&self, index: u32) -> Result<ExtractedEntry> {
        let (record, payload) = self.read_entry(index)?;
        self.store_entry(index, &record, &payload)
    }

    /// Read record `index` and its payload without touching the output
    fn read_entry(&self, index: u32) -> Result<(EntryRecord, Vec<u8>)> {
        let record = self.image.entry(index, self.config.entry_read)?;
        let payload = self.image.payload(&record)?;
        Ok((record, payload))
    }

    /// Persist an already-read payload (nothing is written on a dry run)
    fn store_entry(&self, index: u32, record: &EntryRecord, payload: &[u8]) -> Result<ExtractedEntry> {
        if self.config.dry_run {
            return Ok(ExtractedEntry::new(index, record, None));
        }

        let dir = &self.config.output_dir;
        writer::ensure_dir(dir)?;

        let path = output_path(dir, index, record.id, record.rev);
        writer::write_payload(&path, payload, self.config.file_mode)?;

        tracing::debug!(
            index,
            size = record.dt_size,
            "Stored DTB to {}",
            path.display()
        );

        Ok(ExtractedEntry::new(index, record, Some(path)))
    }

    /// Extract every entry
    pub fn extract_all(&self) -> Result<ExtractionReport> {
        self.extract_each(|_| {})
    }

    /// Extract every entry, handing each success to `on_entry` in
    /// ascending index order
    ///
    /// Under `FailFast` the first failing entry's error is returned after
    /// `on_entry` has seen every success that precedes it.
    pub fn extract_each<F>(&self, on_entry: F) -> Result<ExtractionReport>
    where
        F: FnMut(&ExtractedEntry),
    {
        let count = self.image.entry_count();
        tracing::info!(
            "Extracting {} entries to {}",
            count,
            self.config.output_dir.display()
        );

        if self.config.jobs > 1 && count > 1 {
            parallel::extract(self, on_entry)
        } else {
            self.extract_sequential(on_entry)
        }
    }

    fn extract_sequential<F>(&self, mut on_entry: F) -> Result<ExtractionReport>
    where
        F: FnMut(&ExtractedEntry),
    {
        let mut report = ExtractionReport::default();

        for index in 0..self.image.entry_count() {
            match self.extract_entry(index) {
                Ok(entry) => {
                    on_entry(&entry);
                    report.entries.push(entry);
                }
                Err(error) => self.record_failure(&mut report, index, error)?,
            }
        }

        Ok(report)
    }

    /// Apply the failure policy: abort, or log and keep the failure
    fn record_failure(
        &self,
        report: &mut ExtractionReport,
        index: u32,
        error: DtboError,
    ) -> Result<()> {
        match self.config.on_error {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::Continue => {
                tracing::warn!("Failed to extract DT entry {}: {}", u64::from(index) + 1, error);
                report.failures.push(EntryFailure { index, error });
                Ok(())
            }
        }
    }
}

/// Extract entry `index` of `source` into `output_dir` with default settings
///
/// The header must carry a valid magic and `index` must be below
/// `dt_entry_count`.
pub fn extract_entry<S: ByteSource>(
    source: S,
    header: ContainerHeader,
    index: u32,
    output_dir: &Path,
) -> Result<ExtractedEntry> {
    let image = DtboImage::from_parts(source, header);
    if !header.has_valid_magic() {
        return Err(DtboError::InvalidMagic {
            found: header.magic,
        });
    }

    let config = Config::builder().output_dir(output_dir).build();
    let extractor = Extractor {
        image: &image,
        config: &config,
    };
    extractor.extract_entry(index)
}
