//! Shared helpers for building DTBO images in tests

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

pub const MAGIC: u32 = 0xD7B7_AB1E;

/// One entry to place in a test image
pub struct TestEntry {
    pub id: u32,
    pub rev: u32,
    pub custom: [u32; 4],
    pub payload: Vec<u8>,
}

impl TestEntry {
    pub fn new(id: u32, rev: u32, payload: &[u8]) -> Self {
        Self {
            id,
            rev,
            custom: [0; 4],
            payload: payload.to_vec(),
        }
    }
}

/// Append a big-endian u32
pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Overwrite a big-endian u32 at `offset`
pub fn set_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Header bytes with every field given explicitly
pub fn header_bytes(fields: [u32; 8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32);
    for field in fields {
        put_u32(&mut buf, field);
    }
    buf
}

/// Build a well-formed image: header, entry table (stride `entry_size`),
/// then payloads back to back
pub fn build_image_with_stride(entries: &[TestEntry], entry_size: u32) -> Vec<u8> {
    let table_offset = 32u32;
    let payload_start = table_offset + entry_size * entries.len() as u32;

    let mut table = Vec::new();
    let mut payloads = Vec::new();
    for entry in entries {
        let offset = payload_start + payloads.len() as u32;
        let mut record = Vec::with_capacity(entry_size as usize);
        put_u32(&mut record, entry.payload.len() as u32);
        put_u32(&mut record, offset);
        put_u32(&mut record, entry.id);
        put_u32(&mut record, entry.rev);
        for value in entry.custom {
            put_u32(&mut record, value);
        }
        record.resize(entry_size as usize, 0xEE);
        table.extend_from_slice(&record);
        payloads.extend_from_slice(&entry.payload);
    }

    let total_size = payload_start + payloads.len() as u32;
    let mut image = header_bytes([
        MAGIC,
        total_size,
        32,
        entry_size,
        entries.len() as u32,
        table_offset,
        2048,
        0,
    ]);
    image.extend_from_slice(&table);
    image.extend_from_slice(&payloads);
    image
}

pub fn build_image(entries: &[TestEntry]) -> Vec<u8> {
    build_image_with_stride(entries, 32)
}

/// Write `bytes` to `dtbo.img` in a fresh temp directory
pub fn write_image(bytes: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dtbo.img");
    std::fs::write(&path, bytes).unwrap();
    (temp_dir, path)
}

/// Sorted file names in `dir` (empty if it does not exist)
pub fn list_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
