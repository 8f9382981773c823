//! Codec built from a pair of functions.

use crate::error::CodecResult;
use crate::Codec;
use std::fmt;

/// A codec assembled from caller-supplied encode and decode functions.
///
/// Use it for domain-specific record formats without declaring a new type.
///
/// # Example
///
/// ```
/// use obuf_codec::{Codec, CodecError, CodecResult, FnCodec};
///
/// let codec = FnCodec::new(
///     |n: &u32| -> CodecResult<Vec<u8>> { Ok(n.to_be_bytes().to_vec()) },
///     |b: &[u8]| -> CodecResult<u32> {
///         let arr: [u8; 4] = b.try_into().map_err(|_| CodecError::decoding_failed("need 4 bytes"))?;
///         Ok(u32::from_be_bytes(arr))
///     },
/// );
///
/// let bytes = Codec::<u32>::encode(&codec, &7).unwrap();
/// let n: u32 = codec.decode(&bytes).unwrap();
/// assert_eq!(n, 7);
/// ```
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    /// Creates a codec from an encode and a decode function.
    pub const fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<T, E, D> Codec<T> for FnCodec<E, D>
where
    E: Fn(&T) -> CodecResult<Vec<u8>> + Send + Sync,
    D: Fn(&[u8]) -> CodecResult<T> + Send + Sync,
{
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        (self.encode)(value)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        (self.decode)(bytes)
    }
}

impl<E, D> fmt::Debug for FnCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodec").finish_non_exhaustive()
    }
}
