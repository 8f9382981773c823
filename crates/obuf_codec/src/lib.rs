//! # obuf Codec
//!
//! Pluggable value codecs for obuf.
//!
//! The framing layer treats a record payload as opaque bytes. A [`Codec`]
//! turns a value into those bytes and back. The only contract is
//! "bytes in, same bytes out": `decode(encode(v))` must yield a value equal
//! to `v`, and the payload length is always measured over the exact bytes
//! `encode` returned.
//!
//! ## Available Codecs
//!
//! - [`CborCodec`] - Default. Any `serde` type, encoded as CBOR
//! - [`JsonCodec`] - Any `serde` type, encoded as compact JSON
//! - [`RawCodec`] - Byte and string payloads stored verbatim
//! - [`FnCodec`] - A pair of caller-supplied functions
//!
//! ## Compatibility
//!
//! The CBOR payloads written by [`CborCodec`] are a compatibility boundary:
//! they round-trip within Rust `serde` types, but they are not meant to be
//! read back by other languages' object serializers.
//!
//! ## Usage
//!
//! ```
//! use obuf_codec::{CborCodec, Codec};
//!
//! let codec = CborCodec;
//! let bytes = Codec::<Vec<String>>::encode(&codec, &vec!["a".into(), "b".into()]).unwrap();
//! let decoded: Vec<String> = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, vec!["a", "b"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod func;
mod json;
mod raw;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use func::FnCodec;
pub use json::JsonCodec;
pub use raw::RawCodec;

use std::sync::Arc;

/// Encodes values of type `T` to bytes and decodes them back.
///
/// Codecs are shared between the writer and every concurrent reader of a
/// buffer, so they must be `Send + Sync` and take `&self`.
pub trait Codec<T>: Send + Sync {
    /// Encodes a value to its payload bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented by this codec.
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Decodes a value from payload bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoding.
    fn decode(&self, bytes: &[u8]) -> CodecResult<T>;
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for &C {
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        (**self).decode(bytes)
    }
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for Arc<C> {
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        (**self).decode(bytes)
    }
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for Box<C> {
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        (**self).decode(bytes)
    }
}
