//! Frame header encoding and lenient length parsing.

/// Delimiter terminating the decimal length header.
pub const DELIM: u8 = b'\t';

/// Separator written after each payload. Never parsed on read.
pub const END_RECORD: u8 = b'\n';

/// Renders a payload length as the decimal ASCII header digits.
pub(crate) fn encode_length(len: usize) -> Vec<u8> {
    len.to_string().into_bytes()
}

/// Parses a length header as read up to and including the delimiter.
///
/// Leading whitespace is skipped, so the newline ending the previous frame
/// is consumed here. An optional `+` is accepted. Everything after the first
/// non-digit is ignored. Empty, non-numeric, negative, or overflowing input
/// yields 0, which callers treat as end-of-data.
pub(crate) fn parse_length(raw: &[u8]) -> u64 {
    let mut rest = raw;
    while let [first, tail @ ..] = rest {
        if !is_space(*first) {
            break;
        }
        rest = tail;
    }

    match rest {
        [b'-', ..] => return 0,
        [b'+', tail @ ..] => rest = tail,
        _ => {}
    }

    let mut value: u64 = 0;
    for &byte in rest.iter().take_while(|b| b.is_ascii_digit()) {
        let digit = u64::from(byte - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            None => return 0,
        };
    }
    value
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}
