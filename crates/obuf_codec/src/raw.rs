//! Identity codec for byte and string payloads.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use bytes::Bytes;

/// Stores byte and string payloads verbatim.
///
/// The frame payload is exactly the value's bytes, which makes the on-disk
/// format easy to inspect. An empty value produces an empty payload, and an
/// empty payload reads back as end-of-data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCodec;

impl Codec<Vec<u8>> for RawCodec {
    fn encode(&self, value: &Vec<u8>) -> CodecResult<Vec<u8>> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

impl Codec<Bytes> for RawCodec {
    fn encode(&self, value: &Bytes) -> CodecResult<Vec<u8>> {
        Ok(value.to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Bytes> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

impl Codec<String> for RawCodec {
    fn encode(&self, value: &String) -> CodecResult<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CodecError::decoding_failed(format!("invalid UTF-8: {e}")))
    }
}
