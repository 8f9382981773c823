//! Integration tests for the object buffer.

use obuf_core::{
    Buffer, CborCodec, Codec, CodecError, CodecResult, Config, CoreError, FnCodec, JsonCodec,
    Lens, MemoryFactory, ProtectedLens, RawCodec,
};
use obuf_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn push_then_iterate_roundtrips() {
    init_tracing();
    let buffer = TestBuffer::new();
    let mut rows = Vec::new();
    for i in 0..20u32 {
        let mut row = BTreeMap::new();
        row.insert("id".to_string(), i.to_string());
        row.insert("text".to_string(), format!("line {i}\twith\ttabs\n"));
        rows.push(buffer.push(row).unwrap());
    }

    assert_eq!(buffer.len(), 20);
    assert_eq!(buffer.to_vec().unwrap(), rows);
}

#[test]
fn pushes_many_records() {
    init_tracing();
    let test_buffer = scenarios::counting_buffer(50_000);

    assert_eq!(test_buffer.len(), 50_000);
    let mut expected = 0u64;
    for value in test_buffer.iter().unwrap() {
        assert_eq!(value.unwrap(), expected);
        expected += 1;
    }
    assert_eq!(expected, 50_000);
    assert_eq!(test_buffer.get(49_999).unwrap(), Some(49_999));
}

#[test]
fn tab_inside_string_survives() {
    let buffer = TestBuffer::new();
    buffer.push("A \tstring".to_string()).unwrap();

    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.get(0).unwrap().as_deref(), Some("A \tstring"));
    assert_eq!(buffer.to_vec().unwrap(), vec!["A \tstring"]);
}

#[test]
fn delimiter_heavy_values_roundtrip() {
    let test_buffer = scenarios::delimiter_heavy_buffer();
    let all = test_buffer.to_vec().unwrap();

    assert_eq!(all, vec!["A \tstring", "B\r\nWow!", "\t\t\n\n", "12\t34\n", "\n"]);
    assert_eq!(test_buffer.get(1).unwrap().as_deref(), Some("B\r\nWow!"));
}

#[test]
fn repeated_passes_yield_identical_sequences() {
    let test_buffer = scenarios::delimiter_heavy_buffer();

    let first = test_buffer.to_vec().unwrap();
    let second = test_buffer.to_vec().unwrap();
    let third: Vec<String> = test_buffer.iter().unwrap().map(Result::unwrap).collect();

    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(first.len(), test_buffer.len());
}

#[test]
fn nested_iteration_with_inner_break() {
    let buffer = letters_buffer();
    let mut pairs = Vec::new();

    buffer
        .for_each(|outer| {
            buffer.for_each(|inner| {
                pairs.push(format!("{outer}{inner}"));
                Ok(inner != "B")
            })?;
            Ok(true)
        })
        .unwrap();

    assert_eq!(pairs.len(), 52);
    assert_eq!(&pairs[..4], ["AA", "AB", "BA", "BB"]);
    assert_eq!(pairs.last().map(String::as_str), Some("ZB"));
}

#[test]
fn overlapping_iterators_are_independent() {
    let buffer = letters_buffer();
    let mut first = buffer.iter().unwrap();
    let mut second = buffer.iter().unwrap();

    assert_eq!(first.next().unwrap().unwrap(), "A");
    assert_eq!(first.next().unwrap().unwrap(), "B");
    assert_eq!(second.next().unwrap().unwrap(), "A");
    assert_eq!(first.next().unwrap().unwrap(), "C");
    assert_eq!(buffer.get(10).unwrap().as_deref(), Some("K"));
    assert_eq!(second.next().unwrap().unwrap(), "B");
}

#[test]
fn random_access_over_letters() {
    let buffer = letters_buffer();

    for (i, letter) in letters().iter().enumerate() {
        assert_eq!(buffer.get(i).unwrap().as_ref(), Some(letter));
    }
    assert_eq!(buffer.get(26).unwrap(), None);
    assert_eq!(buffer.get(usize::MAX).unwrap(), None);

    let picked = buffer.get_many([25, 0, 26, 12]).unwrap();
    assert_eq!(
        picked,
        vec![
            Some("Z".to_string()),
            Some("A".to_string()),
            None,
            Some("M".to_string())
        ]
    );
}

#[test]
fn random_access_after_tricky_values() {
    let buffer = TestBuffer::new();
    buffer.push("A".to_string()).unwrap();
    buffer.push("B\r\nWow!".to_string()).unwrap();
    buffer.push("C".to_string()).unwrap();

    assert_eq!(buffer.get(1).unwrap().as_deref(), Some("B\r\nWow!"));
    assert_eq!(buffer.get(2).unwrap().as_deref(), Some("C"));
}

#[test]
fn clear_removes_backing_file() {
    init_tracing();
    let test_buffer = TestBuffer::new();
    for letter in letters() {
        test_buffer.push(letter).unwrap();
    }
    assert_eq!(test_buffer.files().len(), 1);

    test_buffer.clear().unwrap();
    assert!(test_buffer.files().is_empty());
    assert_eq!(test_buffer.len(), 0);
    assert!(test_buffer.iter().unwrap().next().is_none());
}

#[test]
fn clear_disposes_exactly_once() {
    let factory = MemoryFactory::new();
    let stats = factory.stats();
    let buffer: Buffer<String> = Buffer::with_store_factory(factory, CborCodec)
        .unwrap()
        .seed(letters())
        .unwrap();

    buffer.clear().unwrap();
    buffer.clear().unwrap();
    assert_eq!(stats.allocations(), 1);
    assert_eq!(stats.disposals(), 1);
}

#[test]
fn cleared_buffer_becomes_active_on_push() {
    let test_buffer = TestBuffer::new();
    test_buffer.push(1u32).unwrap();
    test_buffer.clear().unwrap();
    assert!(test_buffer.files().is_empty());

    test_buffer.push(2).unwrap();
    test_buffer.push(3).unwrap();

    assert_eq!(test_buffer.files().len(), 1);
    assert_eq!(test_buffer.len(), 2);
    assert_eq!(test_buffer.to_vec().unwrap(), vec![2, 3]);
    assert_eq!(test_buffer.get(0).unwrap(), Some(2));
}

#[test]
fn drop_removes_backing_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().temp_dir(dir.path());
    let buffer: Buffer<String> = Buffer::with_config(&config, CborCodec).unwrap();
    buffer.push("gone".into()).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    drop(buffer);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn concurrent_pushes_are_all_recorded() {
    init_tracing();
    let buffer: Arc<Buffer<(usize, usize)>> = Arc::new(Buffer::new().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for i in 0..250 {
                    buffer.push((t, i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(buffer.len(), 2_000);
    let mut all = buffer.to_vec().unwrap();
    assert_eq!(all.len(), 2_000);

    // Each thread's records keep their relative order
    for t in 0..8 {
        let mine: Vec<usize> = all.iter().filter(|(o, _)| *o == t).map(|(_, i)| *i).collect();
        assert_eq!(mine, (0..250).collect::<Vec<_>>());
    }

    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 2_000);
}

#[test]
fn concurrent_pushes_with_readers() {
    let buffer = Arc::new(Buffer::new().unwrap());
    let config = StressConfig {
        pushes_per_thread: 300,
        threads: 4,
        read_every: 60,
    };

    let result = stress_concurrent_pushes(Arc::clone(&buffer), &config);
    result.print_summary("concurrent pushes with readers");
    assert_eq!(result.failed_ops, 0);
    assert_eq!(buffer.len(), 1_200);
}

#[test]
fn json_codec_buffer() {
    let buffer = TestBuffer::with_codec(JsonCodec);
    buffer.push(vec!["x\ty".to_string()]).unwrap();
    buffer.push(vec![]).unwrap();

    // "[]" is two bytes, so an empty list is still readable
    assert_eq!(
        buffer.to_vec().unwrap(),
        vec![vec!["x\ty".to_string()], vec![]]
    );
}

#[test]
fn custom_codec_buffer() {
    let codec = FnCodec::new(
        |v: &u16| -> CodecResult<Vec<u8>> { Ok(v.to_be_bytes().to_vec()) },
        |b: &[u8]| -> CodecResult<u16> {
            let bytes: [u8; 2] = b
                .try_into()
                .map_err(|_| CodecError::decoding_failed("expected two bytes"))?;
            Ok(u16::from_be_bytes(bytes))
        },
    );
    let buffer = TestBuffer::with_codec(codec);
    for v in [9u16, 0x0a09, 65535] {
        buffer.push(v).unwrap();
    }

    assert_eq!(buffer.to_vec().unwrap(), vec![9, 0x0a09, 65535]);
    assert_eq!(buffer.get(1).unwrap(), Some(0x0a09));
}

#[test]
fn decode_failure_surfaces_as_codec_error() {
    struct Lying;

    impl Codec<u8> for Lying {
        fn encode(&self, value: &u8) -> CodecResult<Vec<u8>> {
            Ok(vec![*value])
        }

        fn decode(&self, _bytes: &[u8]) -> CodecResult<u8> {
            Err(CodecError::decoding_failed("refused"))
        }
    }

    let buffer = TestBuffer::with_codec(Lying);
    buffer.push(1).unwrap();

    assert!(matches!(buffer.get(0), Err(CoreError::Codec(_))));
    let mut iter = buffer.iter().unwrap();
    assert!(matches!(iter.next(), Some(Err(CoreError::Codec(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn config_places_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new()
        .temp_dir(dir.path())
        .prefix("spill")
        .write_buffer_capacity(16)
        .read_buffer_capacity(16);
    let buffer: Buffer<String> = Buffer::with_config(&config, CborCodec).unwrap();
    buffer.push("x".repeat(100)).unwrap();

    let path = buffer.path().unwrap();
    assert!(path.starts_with(dir.path()));
    assert_eq!(buffer.get(0).unwrap().map(|s| s.len()), Some(100));
}

#[test]
fn protected_lens_shared_between_threads() {
    let lens = Arc::new(ProtectedLens::new(Cursor::new(Vec::new()), RawCodec));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let lens = Arc::clone(&lens);
            thread::spawn(move || {
                for i in 0..25 {
                    lens.append(format!("{t}\t{i}\n")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut lens = Arc::try_unwrap(lens).unwrap().into_inner();
    lens.get_mut().set_position(0);
    let count = lens.iter::<String>().map(Result::unwrap).count();
    assert_eq!(count, 100);
}

#[test]
fn lens_over_file_written_by_buffer() {
    let buffer = TestBuffer::with_codec(RawCodec);
    buffer.push(b"one".to_vec()).unwrap();
    buffer.push(b"two".to_vec()).unwrap();
    let _ = buffer.iter().unwrap();

    let bytes = std::fs::read(buffer.path().unwrap()).unwrap();
    let mut lens = Lens::new(Cursor::new(bytes), RawCodec);
    let second: Option<Vec<u8>> = lens.recover_at(1).unwrap();
    assert_eq!(second.as_deref(), Some(&b"two"[..]));
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn records_roundtrip_in_order(records in record_sequence_strategy(0, 40)) {
        let buffer = TestBuffer::new();
        for record in &records {
            buffer.push(record.clone()).unwrap();
        }

        prop_assert_eq!(buffer.len(), records.len());
        prop_assert_eq!(buffer.to_vec().unwrap(), records.clone());
        for (i, record) in records.iter().enumerate() {
            let found = buffer.get(i).unwrap();
            prop_assert_eq!(found.as_ref(), Some(record));
        }
        prop_assert_eq!(buffer.get(records.len()).unwrap(), None);
    }

    #[test]
    fn raw_payloads_roundtrip(payloads in prop::collection::vec(payload_strategy(), 1..20)) {
        let buffer = TestBuffer::with_codec(RawCodec);
        for payload in &payloads {
            buffer.push(payload.clone()).unwrap();
        }

        let last = payloads.len() - 1;
        let found = buffer.get(last).unwrap();
        prop_assert_eq!(found.as_ref(), Some(&payloads[last]));
        prop_assert_eq!(buffer.to_vec().unwrap(), payloads);
    }

    #[test]
    fn delimiter_strings_roundtrip(values in prop::collection::vec(delimiter_string_strategy(), 1..20)) {
        let buffer = TestBuffer::new();
        for value in &values {
            buffer.push(value.clone()).unwrap();
        }
        prop_assert_eq!(buffer.to_vec().unwrap(), values);
    }
}
