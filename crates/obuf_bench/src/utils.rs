//! Benchmark utilities.

use obuf_core::{Buffer, CborCodec, Codec, Config};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

/// A representative row, similar to what callers spill to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Sequence number.
    pub id: u64,
    /// Free text with embedded delimiters.
    pub text: String,
    /// Numeric columns.
    pub values: Vec<f64>,
}

/// Generate random payload bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a batch of rows whose text is roughly `text_len` bytes.
pub fn generate_rows(count: usize, text_len: usize) -> Vec<Row> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| Row {
            id: i as u64,
            text: (0..text_len)
                .map(|_| match rng.gen_range(0..16) {
                    0 => '\t',
                    1 => '\n',
                    _ => rng.gen_range('a'..='z'),
                })
                .collect(),
            values: (0..4).map(|_| rng.gen()).collect(),
        })
        .collect()
}

/// Creates an empty buffer whose backing file lives in a fresh temp dir.
///
/// The returned directory must outlive the buffer.
pub fn temp_buffer<T, C: Codec<T>>(codec: C) -> (Buffer<T, C>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = Config::new().temp_dir(dir.path()).prefix("bench");
    let buffer = Buffer::with_config(&config, codec).expect("Failed to create buffer");
    (buffer, dir)
}

/// Creates a CBOR buffer holding `rows`.
pub fn filled_buffer(rows: &[Row]) -> (Buffer<Row>, TempDir) {
    let (buffer, dir) = temp_buffer(CborCodec);
    for row in rows {
        buffer.push(row.clone()).expect("Failed to push row");
    }
    (buffer, dir)
}
