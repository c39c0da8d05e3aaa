//! dtbo-unpack Binary
//!
//! Prints the header of a DTBO image and extracts every DTB it contains.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dtbo_unpack::config::{EntryReadMode, FailurePolicy, SizeCheck};
use dtbo_unpack::{unpack_with, Config, ContainerHeader, ExtractedEntry};
use tracing_subscriber::{fmt, EnvFilter};

/// Extract device tree blobs from a DTBO image
#[derive(Parser, Debug)]
#[command(name = "dtbo-unpack")]
#[command(about = "Extract DTBs from an Android DTBO image")]
#[command(version)]
struct Args {
    /// DTBO image to read
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// List entries without writing any file
    #[arg(short, long)]
    list: bool,

    /// Keep extracting after an entry fails
    #[arg(short, long)]
    keep_going: bool,

    /// Reject images whose header total size differs from the file size
    #[arg(long)]
    strict_size: bool,

    /// Always read 32-byte entry records regardless of the declared size
    #[arg(long)]
    fixed_entry_size: bool,

    /// Number of extraction threads
    #[arg(short, long, default_value = "1")]
    jobs: usize,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dtbo_unpack=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("dtbo-unpack v{}", dtbo_unpack::VERSION);

    let config = Config::builder()
        .output_dir(&args.output)
        .dry_run(args.list)
        .on_error(if args.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::FailFast
        })
        .size_check(if args.strict_size {
            SizeCheck::Strict
        } else {
            SizeCheck::Warn
        })
        .entry_read(if args.fixed_entry_size {
            EntryReadMode::Fixed
        } else {
            EntryReadMode::Declared
        })
        .jobs(args.jobs)
        .build();

    match run(&args, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every entry was extracted
fn run(args: &Args, config: &Config) -> dtbo_unpack::Result<bool> {
    let unpacked = unpack_with(
        &args.input,
        config,
        |header| {
            print_header(header);
            if header.has_valid_magic() && header.dt_entry_count != 0 {
                println!();
                if config.dry_run {
                    println!("- Listing DTBs...");
                } else {
                    println!("- Dumping DTBs...");
                }
                println!();
            }
        },
        print_entry,
    )?;

    let Some(report) = unpacked.report else {
        return Ok(true);
    };

    for failure in &report.failures {
        eprintln!(
            "Failed to extract DT entry {}: {}",
            u64::from(failure.index) + 1,
            failure.error
        );
    }

    Ok(report.is_complete())
}

fn print_header(header: &ContainerHeader) {
    println!(
        "Magic: {:#x} ({})",
        header.magic,
        if header.has_valid_magic() { "valid" } else { "invalid" }
    );
    println!("Total size: {} bytes", header.total_size);
    println!("Header size: {} bytes", header.header_size);
    println!("DT entry size: {} bytes", header.dt_entry_size);
    println!("DT entries count: {}", header.dt_entry_count);
    println!(
        "Header -> first DT entry offset: {} bytes",
        header.dt_entries_offset
    );
    println!("Page size: {} bytes", header.page_size);
    println!("DTBO version: {}", header.version);
}

fn print_entry(entry: &ExtractedEntry) {
    let [c0, c1, c2, c3] = entry.custom;
    println!(
        "Found DTB #{}: id: {:#06x}, rev: {:#06x}, custom: [{:#x}, {:#x}, {:#x}, {:#x}], size: {}, offset: {}",
        entry.number(),
        entry.id,
        entry.rev,
        c0,
        c1,
        c2,
        c3,
        entry.size,
        entry.offset
    );

    if let Some(path) = &entry.path {
        println!("Stored DTB #{} to {}", entry.number(), path.display());
    }
}
