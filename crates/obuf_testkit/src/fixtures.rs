//! Test fixtures and buffer helpers.
//!
//! Provides buffers whose backing files live in a private temp directory,
//! so tests can inspect or count the files a buffer leaves behind.

use obuf_codec::{CborCodec, Codec};
use obuf_core::{Buffer, Config};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A buffer whose backing files are created in its own temp directory.
pub struct TestBuffer<T, C = CborCodec> {
    /// The buffer instance.
    pub buffer: Buffer<T, C>,
    // Dropped after the buffer, so the buffer deletes its file first
    dir: TempDir,
}

impl<T> TestBuffer<T, CborCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates an empty CBOR buffer in a fresh temp directory.
    pub fn new() -> Self {
        Self::with_codec(CborCodec)
    }
}

impl<T, C> TestBuffer<T, C>
where
    C: Codec<T>,
{
    /// Creates an empty buffer with the given codec in a fresh temp directory.
    pub fn with_codec(codec: C) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config::new().temp_dir(dir.path()).prefix("testbuf");
        let buffer = Buffer::with_config(&config, codec).expect("Failed to create buffer");
        Self { buffer, dir }
    }

    /// Returns the directory holding the backing files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Lists the files currently present in the backing directory.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.dir.path())
            .expect("Failed to read temp directory")
            .map(|entry| entry.expect("Failed to read directory entry").path())
            .collect();
        files.sort();
        files
    }
}

impl<T> Default for TestBuffer<T, CborCodec>
where
    T: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> std::ops::Deref for TestBuffer<T, C> {
    type Target = Buffer<T, C>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

/// The single letters `"A"` through `"Z"`.
pub fn letters() -> Vec<String> {
    ('A'..='Z').map(String::from).collect()
}

/// Creates a CBOR buffer seeded with `"A"` through `"Z"`.
pub fn letters_buffer() -> Buffer<String> {
    Buffer::from_values(letters()).expect("Failed to seed buffer")
}

/// Runs a test with a temporary, empty CBOR buffer.
///
/// # Example
///
/// ```rust
/// use obuf_testkit::with_temp_buffer;
///
/// let len = with_temp_buffer(|buffer: &obuf_core::Buffer<u32>| {
///     buffer.push(1).unwrap();
///     buffer.len()
/// });
/// assert_eq!(len, 1);
/// ```
pub fn with_temp_buffer<T, F, R>(f: F) -> R
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&Buffer<T>) -> R,
{
    let test_buffer = TestBuffer::new();
    f(&test_buffer.buffer)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a buffer holding `0..count` in order.
    pub fn counting_buffer(count: u64) -> TestBuffer<u64> {
        let test_buffer = TestBuffer::new();
        for i in 0..count {
            test_buffer.push(i).expect("Failed to push value");
        }
        test_buffer
    }

    /// Creates a buffer of strings full of frame delimiters.
    pub fn delimiter_heavy_buffer() -> TestBuffer<String> {
        let test_buffer = TestBuffer::new();
        for value in ["A \tstring", "B\r\nWow!", "\t\t\n\n", "12\t34\n", "\n"] {
            test_buffer
                .push(value.to_string())
                .expect("Failed to push value");
        }
        test_buffer
    }
}
