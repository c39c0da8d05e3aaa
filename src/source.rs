//! Byte-range I/O
//!
//! Absolute-offset reads over a DTBO image held on disk or in memory.
//!
//! Every range read is checked against the input length before any bytes
//! are touched, so a range running past the end is reported as
//! [`DtboError::Truncated`] rather than as a short read.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{DtboError, Result};

/// Random-access, read-only view of an image
///
/// Implementations must be safe to read from several threads at once;
/// each call is independent and keeps no cursor between calls.
pub trait ByteSource: Sync {
    /// Total input length in bytes
    fn len(&self) -> Result<u64>;

    /// Read exactly `length` bytes starting at `offset`
    ///
    /// `context` names what is being read and ends up in truncation errors.
    fn read_at(&self, context: &'static str, offset: u64, length: u64) -> Result<Vec<u8>>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Check that `[offset, offset + length)` lies within `available` bytes
pub(crate) fn check_range(
    context: &'static str,
    offset: u64,
    length: u64,
    available: u64,
) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= available => Ok(()),
        _ => Err(DtboError::Truncated {
            context,
            offset,
            length,
            available,
        }),
    }
}

// =============================================================================
// File-backed Source
// =============================================================================

/// An image on disk
///
/// Holds only the path: each read opens its own handle, which is closed
/// when the read returns, on success or error.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> Result<u64> {
        let metadata = std::fs::metadata(&self.path).map_err(|source| DtboError::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(metadata.len())
    }

    fn read_at(&self, context: &'static str, offset: u64, length: u64) -> Result<Vec<u8>> {
        let available = self.len()?;
        check_range(context, offset, length, available)?;
        read_range(&self.path, offset, length)
    }
}

/// Open `path` read-only, seek to `offset` and read exactly `length` bytes
///
/// The failing step is reported as `Open`, `Seek` or `Read`. A short read
/// is a `Read` failure, never a partial result.
pub fn read_range(path: &Path, offset: u64, length: u64) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| DtboError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    file.seek(SeekFrom::Start(offset))
        .map_err(|source| DtboError::Seek {
            path: path.to_path_buf(),
            offset,
            source,
        })?;

    let read_err = |source| DtboError::Read {
        path: path.to_path_buf(),
        offset,
        length,
        source,
    };

    let len = usize::try_from(length).map_err(|_| {
        read_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "length exceeds addressable memory",
        ))
    })?;

    let mut buf = vec![0u8; len];
    file.read_exact(&mut buf).map_err(read_err)?;

    tracing::trace!(path = %path.display(), offset, length, "read range");
    Ok(buf)
}

// =============================================================================
// In-memory Sources
// =============================================================================

impl ByteSource for [u8] {
    fn len(&self) -> Result<u64> {
        Ok(<[u8]>::len(self) as u64)
    }

    fn read_at(&self, context: &'static str, offset: u64, length: u64) -> Result<Vec<u8>> {
        check_range(context, offset, length, <[u8]>::len(self) as u64)?;
        // Both bounds fit in usize: they are at most the slice length.
        let start = offset as usize;
        let end = start + length as usize;
        Ok(self[start..end].to_vec())
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> Result<u64> {
        ByteSource::len(self.as_slice())
    }

    fn read_at(&self, context: &'static str, offset: u64, length: u64) -> Result<Vec<u8>> {
        self.as_slice().read_at(context, offset, length)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn len(&self) -> Result<u64> {
        (**self).len()
    }

    fn read_at(&self, context: &'static str, offset: u64, length: u64) -> Result<Vec<u8>> {
        (**self).read_at(context, offset, length)
    }
}
