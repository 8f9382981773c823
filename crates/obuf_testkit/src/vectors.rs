//! Frame test vectors.
//!
//! These vectors pin the on-disk record format byte for byte. Each one is
//! a raw payload and the exact frame bytes a lens must write for it, or a
//! stored byte sequence and the payloads a reader must recover from it.

use serde::{Deserialize, Serialize};

/// A single payload and its expected frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Payload bytes (hex-encoded).
    pub payload_hex: String,
    /// Expected frame bytes (hex-encoded).
    pub frame_hex: String,
}

/// Stored bytes and the payloads a full read pass must yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Stored bytes (hex-encoded).
    pub stored_hex: String,
    /// Payloads recovered in order (hex-encoded).
    pub payloads_hex: Vec<String>,
}

/// Write-side frame vectors.
pub fn frame_vectors() -> Vec<FrameVector> {
    vec![
        FrameVector {
            id: "frame_single_byte".into(),
            description: "One-byte payload 'A'".into(),
            payload_hex: "41".into(),
            // "1\tA\n"
            frame_hex: "3109410a".into(),
        },
        FrameVector {
            id: "frame_embedded_tab".into(),
            description: "Payload containing the header delimiter".into(),
            payload_hex: hex_encode(b"A\tstring"),
            frame_hex: hex_encode(b"8\tA\tstring\n"),
        },
        FrameVector {
            id: "frame_crlf".into(),
            description: "Payload containing CR LF".into(),
            payload_hex: hex_encode(b"B\r\nWow!"),
            frame_hex: hex_encode(b"7\tB\r\nWow!\n"),
        },
        FrameVector {
            id: "frame_two_digit_length".into(),
            description: "Payload whose length needs two digits".into(),
            payload_hex: hex_encode(&[0u8; 10]),
            frame_hex: format!("313009{}0a", "00".repeat(10)),
        },
        FrameVector {
            id: "frame_empty".into(),
            description: "Zero-length payload, written but unreadable".into(),
            payload_hex: String::new(),
            frame_hex: "30090a".into(),
        },
    ]
}

/// Read-side vectors, including malformed input.
pub fn read_vectors() -> Vec<ReadVector> {
    vec![
        ReadVector {
            id: "read_empty".into(),
            description: "Empty stream".into(),
            stored_hex: String::new(),
            payloads_hex: vec![],
        },
        ReadVector {
            id: "read_two_frames".into(),
            description: "Two contiguous frames".into(),
            stored_hex: hex_encode(b"1\ta\n2\tbc\n"),
            payloads_hex: vec![hex_encode(b"a"), hex_encode(b"bc")],
        },
        ReadVector {
            id: "read_garbage_header".into(),
            description: "Non-numeric header ends the data".into(),
            stored_hex: hex_encode(b"1\ta\nxyz\t1\tb\n"),
            payloads_hex: vec![hex_encode(b"a")],
        },
        ReadVector {
            id: "read_negative_header".into(),
            description: "Negative header ends the data".into(),
            stored_hex: hex_encode(b"-1\ta\n"),
            payloads_hex: vec![],
        },
        ReadVector {
            id: "read_zero_header".into(),
            description: "Zero-length frame ends the data".into(),
            stored_hex: hex_encode(b"1\ta\n0\t\n1\tc\n"),
            payloads_hex: vec![hex_encode(b"a")],
        },
        ReadVector {
            id: "read_truncated".into(),
            description: "Payload cut short by end of stream".into(),
            stored_hex: hex_encode(b"1\ta\n9\tabc"),
            payloads_hex: vec![hex_encode(b"a")],
        },
        ReadVector {
            id: "read_missing_separator".into(),
            description: "Last frame without its trailing newline".into(),
            stored_hex: hex_encode(b"1\ta\n1\tb"),
            payloads_hex: vec![hex_encode(b"a"), hex_encode(b"b")],
        },
    ]
}

/// Generate all test vectors as JSON.
pub fn all_vectors_json() -> String {
    let vectors = AllTestVectors {
        frames: frame_vectors(),
        reads: read_vectors(),
    };

    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    frames: Vec<FrameVector>,
    reads: Vec<ReadVector>,
}

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}
