//! Property-based test generators using proptest.
//!
//! Provides strategies for values that stress the frame format: strings
//! and byte payloads full of the header delimiter and record separator.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for strings biased towards tabs, newlines, and digits.
pub fn delimiter_string_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => Just('\t'),
            3 => Just('\n'),
            1 => Just('\r'),
            2 => prop::char::range('0', '9'),
            4 => any::<char>(),
        ],
        0..64,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for non-empty raw payloads of arbitrary bytes.
///
/// Zero-length payloads are excluded because they read back as end of data.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

/// A structured record of the kind buffered by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Sequence number.
    pub id: u64,
    /// Free text, often containing delimiters.
    pub label: String,
    /// Optional numeric fields.
    pub values: Vec<i64>,
    /// Optional nested flag.
    pub flag: Option<bool>,
}

/// Strategy for generating records.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<u64>(),
        delimiter_string_strategy(),
        prop::collection::vec(any::<i64>(), 0..8),
        any::<Option<bool>>(),
    )
        .prop_map(|(id, label, values, flag)| Record {
            id,
            label,
            values,
            flag,
        })
}

/// Strategy for generating a sequence of records to push.
pub fn record_sequence_strategy(
    min_len: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), min_len..max_len)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
