//! Output naming
//!
//! `NN_0xIIII_0xRRRR.dtb`: 1-based table position padded to two digits,
//! then id and rev as hex padded to four digits.

use std::path::{Path, PathBuf};

/// File name for the entry at zero-based table position `index`
pub fn output_file_name(index: u32, id: u32, rev: u32) -> String {
    format!("{:02}_0x{:04x}_0x{:04x}.dtb", u64::from(index) + 1, id, rev)
}

/// Full output path inside `dir`
///
/// `dir` may or may not end in a separator; the result has exactly one
/// separator before the file name either way.
pub fn output_path(dir: &Path, index: u32, id: u32, rev: u32) -> PathBuf {
    dir.join(output_file_name(index, id, rev))
}
