//! Integration tests for dtbo-unpack
//!
//! End-to-end runs through `unpack` and the command-line binary.

mod common;

use std::process::Command;

use common::*;
use dtbo_unpack::{unpack, Config, DtboError};

// =============================================================================
// unpack Tests
// =============================================================================

#[test]
fn test_unpack_single_entry() {
    let mut bytes = header_bytes([MAGIC, 68, 32, 32, 1, 32, 2048, 0]);
    for value in [4u32, 64, 0x0001, 0x0000, 0, 0, 0, 0] {
        put_u32(&mut bytes, value);
    }
    bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let (temp, path) = write_image(&bytes);
    let out = temp.path().join("out");

    let unpacked = unpack(&path, &Config::builder().output_dir(&out).build()).unwrap();

    assert!(unpacked.header.has_valid_magic());
    let report = unpacked.report.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(list_files(&out), vec!["01_0x0001_0x0000.dtb"]);
    assert_eq!(
        std::fs::read(out.join("01_0x0001_0x0000.dtb")).unwrap(),
        vec![0xDE, 0xAD, 0xBE, 0xEF]
    );
}

#[test]
fn test_unpack_no_entries() {
    let (temp, path) = write_image(&header_bytes([MAGIC, 32, 32, 32, 0, 32, 2048, 0]));
    let out = temp.path().join("out");

    let unpacked = unpack(&path, &Config::builder().output_dir(&out).build()).unwrap();

    assert_eq!(unpacked.header.dt_entry_count, 0);
    assert!(unpacked.report.is_none());
    assert!(list_files(&out).is_empty());
}

#[test]
fn test_unpack_zero_magic_writes_nothing() {
    let mut bytes = build_image(&[
        TestEntry::new(1, 0, b"one"),
        TestEntry::new(2, 0, b"two"),
    ]);
    set_u32(&mut bytes, 0, 0);
    let (temp, path) = write_image(&bytes);
    let out = temp.path().join("out");

    let unpacked = unpack(&path, &Config::builder().output_dir(&out).build()).unwrap();

    assert_eq!(unpacked.header.magic, 0);
    assert_eq!(unpacked.header.dt_entry_count, 2);
    assert!(unpacked.report.is_none());
    assert!(!out.exists());
}

#[test]
fn test_unpack_short_file() {
    let (_temp, path) = write_image(&[0xD7, 0xB7, 0xAB, 0x1E]);

    let err = unpack(&path, &Config::default()).unwrap_err();

    assert!(err.is_truncation());
}

#[test]
fn test_unpack_missing_file() {
    let temp = tempfile::TempDir::new().unwrap();

    let err = unpack(temp.path().join("missing.img"), &Config::default()).unwrap_err();

    assert!(matches!(err, DtboError::Open { .. }));
}

// =============================================================================
// Binary Tests
// =============================================================================

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dtbo-unpack"))
}

#[test]
fn test_cli_requires_input() {
    let output = bin().output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--input"));
}

#[test]
fn test_cli_extracts_and_reports() {
    let entries = [TestEntry::new(0x10, 0x2, b"first"), TestEntry::new(0x11, 0x3, b"second")];
    let (temp, path) = write_image(&build_image(&entries));
    let out = temp.path().join("dtbs/");

    let output = bin()
        .arg("-i")
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Magic: 0xd7b7ab1e (valid)"));
    assert!(stdout.contains("DT entries count: 2"));
    assert!(stdout.contains("Found DTB #1: id: 0x0010, rev: 0x0002"));
    assert!(stdout.contains("Found DTB #2: id: 0x0011, rev: 0x0003"));
    assert_eq!(
        list_files(&out),
        vec!["01_0x0010_0x0002.dtb", "02_0x0011_0x0003.dtb"]
    );
}

#[test]
fn test_cli_invalid_magic_prints_header_only() {
    let mut bytes = build_image(&[TestEntry::new(1, 0, b"x")]);
    set_u32(&mut bytes, 0, 0x1234_5678);
    let (temp, path) = write_image(&bytes);
    let out = temp.path().join("out");

    let output = bin().arg("-i").arg(&path).arg("-o").arg(&out).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Magic: 0x12345678 (invalid)"));
    assert!(!stdout.contains("Found DTB"));
    assert!(!out.exists());
}

#[test]
fn test_cli_list_mode() {
    let (temp, path) = write_image(&build_image(&[TestEntry::new(1, 0, b"x")]));
    let out = temp.path().join("out");

    let output = bin()
        .arg("-i")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .arg("--list")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Found DTB #1"));
    assert!(!out.exists());
}

#[test]
fn test_cli_keep_going_exits_with_failure() {
    let mut bytes = build_image(&[TestEntry::new(1, 0, b"ok"), TestEntry::new(2, 0, b"bad")]);
    set_u32(&mut bytes, 64 + 4, 0x00FF_FFFF);
    let (temp, path) = write_image(&bytes);
    let out = temp.path().join("out");

    let output = bin()
        .arg("-i")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .arg("--keep-going")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to extract DT entry 2"));
    assert_eq!(list_files(&out), vec!["01_0x0001_0x0000.dtb"]);
}

// =============================================================================
// unpack_with Tests
// =============================================================================

#[test]
fn test_unpack_with_reports_header_then_entries() {
    let entries = [TestEntry::new(1, 0, b"one"), TestEntry::new(2, 0, b"two")];
    let (temp, path) = write_image(&build_image(&entries));
    let config = Config::builder().output_dir(temp.path().join("out")).build();

    let events = std::cell::RefCell::new(Vec::new());
    let unpacked = dtbo_unpack::unpack_with(
        &path,
        &config,
        |header| events.borrow_mut().push(format!("header {}", header.dt_entry_count)),
        |entry| events.borrow_mut().push(format!("entry {}", entry.number())),
    )
    .unwrap();

    assert_eq!(
        events.into_inner(),
        vec!["header 2", "entry 1", "entry 2"]
    );
    assert_eq!(unpacked.report.unwrap().entries.len(), 2);
}

#[test]
fn test_unpack_with_invalid_magic_reports_header_only() {
    let mut bytes = build_image(&[TestEntry::new(1, 0, b"x")]);
    set_u32(&mut bytes, 0, 0);
    let (temp, path) = write_image(&bytes);
    let config = Config::builder().output_dir(temp.path().join("out")).build();

    let mut headers = 0;
    let mut entries = 0;
    let unpacked =
        dtbo_unpack::unpack_with(&path, &config, |_| headers += 1, |_| entries += 1).unwrap();

    assert_eq!(headers, 1);
    assert_eq!(entries, 0);
    assert!(unpacked.report.is_none());
}

#[test]
fn test_cli_huge_entry_count_fails_cleanly() {
    let bytes = header_bytes([MAGIC, 32, 32, 32, u32::MAX, 32, 2048, 0]);
    let (temp, path) = write_image(&bytes);
    let out = temp.path().join("out");

    let output = bin()
        .arg("-i")
        .arg(&path)
        .arg("-o")
        .arg(&out)
        .arg("--keep-going")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated entry table"));
    assert!(!out.exists());
}
