//! Configuration for dtbo-unpack
//!
//! Centralized extraction configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an extraction run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Directory receiving one `NN_0xIIII_0xRRRR.dtb` file per entry.
    /// Created on demand; an existing directory is reused.
    pub output_dir: PathBuf,

    /// Permission bits for newly created output files (Unix only)
    pub file_mode: u32,

    /// Read and validate everything but write nothing
    pub dry_run: bool,

    // -------------------------------------------------------------------------
    // Format Handling
    // -------------------------------------------------------------------------
    /// How many bytes make up one entry record
    pub entry_read: EntryReadMode,

    /// What to do when `total_size` disagrees with the input length
    pub size_check: SizeCheck,

    // -------------------------------------------------------------------------
    // Walk Configuration
    // -------------------------------------------------------------------------
    /// Behavior after an entry fails to extract
    pub on_error: FailurePolicy,

    /// Number of worker threads (1 = sequential)
    pub jobs: usize,
}

/// Entry record read length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryReadMode {
    /// Read `dt_entry_size` bytes per record (must be at least 32) and
    /// decode the leading 32
    Declared,

    /// Always read 32 bytes, using `dt_entry_size` only as the stride
    Fixed,
}

/// `total_size` cross-check policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// Log a warning on mismatch and carry on
    Warn,

    /// Refuse to walk the entry table on mismatch
    Strict,
}

/// Entry failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing entry (files already written are kept)
    FailFast,

    /// Extract every entry and collect the failures
    Continue,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_mode: 0o755,
            dry_run: false,
            entry_read: EntryReadMode::Declared,
            size_check: SizeCheck::Warn,
            on_error: FailurePolicy::FailFast,
            jobs: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the output directory
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Set the permission bits for created files
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    /// Enable or disable dry-run (listing) mode
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.config.dry_run = enabled;
        self
    }

    /// Set the entry record read mode
    pub fn entry_read(mut self, mode: EntryReadMode) -> Self {
        self.config.entry_read = mode;
        self
    }

    /// Set the total size policy
    pub fn size_check(mut self, check: SizeCheck) -> Self {
        self.config.size_check = check;
        self
    }

    /// Set the failure policy
    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.config.on_error = policy;
        self
    }

    /// Set the worker count (values below 1 are treated as 1)
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
