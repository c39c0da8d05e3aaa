//! Unpack Module
//!
//! One-call entry point: open an image, read its header, and walk the
//! entry table when the header allows it.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::extract::{ExtractedEntry, ExtractionReport, Extractor};
use crate::format::ContainerHeader;
use crate::image::DtboImage;

/// Outcome of [`unpack`]
#[derive(Debug)]
pub struct Unpacked {
    /// The header as read, valid magic or not
    pub header: ContainerHeader,
    /// `None` when the walk did not run: bad magic or no entries
    pub report: Option<ExtractionReport>,
}

/// Unpack every DTB in the image at `input` according to `config`
///
/// A file without the DTBO magic is not an error: its header is returned
/// and nothing is written.
pub fn unpack(input: impl AsRef<Path>, config: &Config) -> Result<Unpacked> {
    unpack_with(input, config, |_| {}, |_| {})
}

/// [`unpack`], reporting progress as it goes
///
/// `on_header` sees the header as soon as it is read, before any entry;
/// `on_entry` sees each extracted entry in ascending index order.
pub fn unpack_with<H, F>(
    input: impl AsRef<Path>,
    config: &Config,
    on_header: H,
    on_entry: F,
) -> Result<Unpacked>
where
    H: FnOnce(&ContainerHeader),
    F: FnMut(&ExtractedEntry),
{
    let image = DtboImage::open(input)?;
    let header = *image.header();
    on_header(&header);

    if !header.has_valid_magic() {
        tracing::warn!(
            "Invalid DTBO magic {:#010x}, skipping entry extraction",
            header.magic
        );
        return Ok(Unpacked {
            header,
            report: None,
        });
    }

    if header.dt_entry_count == 0 {
        tracing::info!("Image has no entries");
        return Ok(Unpacked {
            header,
            report: None,
        });
    }

    let extractor = Extractor::new(&image, config)?;
    let report = extractor.extract_each(on_entry)?;

    tracing::info!(
        "Extracted {} of {} entries",
        report.entries.len(),
        header.dt_entry_count
    );

    Ok(Unpacked {
        header,
        report: Some(report),
    })
}
