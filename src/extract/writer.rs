//! Output writer
//!
//! Creates the output directory and persists payloads.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{DtboError, Result};

/// Create `dir` and its parents if missing
///
/// An existing directory is not an error, including one created
/// concurrently by another worker.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| DtboError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `payload` verbatim to `path`, creating or truncating it
///
/// `mode` applies on Unix when the file is newly created.
pub(crate) fn write_payload(path: &Path, payload: &[u8], mode: u32) -> Result<()> {
    let write_err = |source| DtboError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(write_err)?;
    file.write_all(payload).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    Ok(())
}
