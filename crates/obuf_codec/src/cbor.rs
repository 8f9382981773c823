//! CBOR codec over `serde`.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The default codec: any `serde` type, encoded as CBOR with `ciborium`.
///
/// CBOR is self-describing and binary-safe, so strings containing tabs,
/// newlines, or arbitrary bytes round-trip unchanged. Encoded payloads are
/// never empty, which keeps them clear of the zero-length end-of-data marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborCodec;

impl<T> Codec<T> for CborCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(value, &mut bytes)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        ciborium::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tracker {
        name: String,
        keyframes: Vec<(u32, f64, f64)>,
    }

    fn roundtrip<T: Serialize + DeserializeOwned>(value: &T) -> T {
        let bytes = CborCodec.encode(value).unwrap();
        CborCodec.decode(&bytes).unwrap()
    }

    #[test]
    fn roundtrip_integer() {
        assert_eq!(roundtrip(&3i64), 3);
    }

    #[test]
    fn roundtrip_string_with_delimiters() {
        let value = "A \tstring\nwith\r\nbreaks".to_string();
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn roundtrip_map() {
        let mut value = BTreeMap::new();
        value.insert("foo".to_string(), "bar".to_string());
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn roundtrip_struct() {
        let value = Tracker {
            name: "Tracker1".into(),
            keyframes: vec![(1, 10.5, 20.25), (2, 11.0, 21.0)],
        };
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn unit_encodes_to_non_empty_payload() {
        let bytes = CborCodec.encode(&()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn decode_garbage_fails() {
        let result: CodecResult<Tracker> = CborCodec.decode(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn decode_wrong_type_fails() {
        let bytes = CborCodec.encode(&"text".to_string()).unwrap();
        let result: CodecResult<u64> = CborCodec.decode(&bytes);
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_strings(s in ".*") {
            prop_assert_eq!(roundtrip(&s), s);
        }

        #[test]
        fn roundtrip_arbitrary_bytes(v in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(roundtrip(&v), v);
        }
    }
}
