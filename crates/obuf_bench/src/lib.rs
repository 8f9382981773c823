//! Benchmark support for obuf.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
