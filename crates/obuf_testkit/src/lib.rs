//! # obuf Testkit
//!
//! Test utilities for obuf.
//!
//! This crate provides:
//! - Buffer fixtures backed by a private temp directory
//! - Property-based test generators using proptest
//! - Frame test vectors pinning the on-disk format
//! - Concurrent push stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use obuf_testkit::prelude::*;
//!
//! with_temp_buffer(|buffer: &obuf_core::Buffer<String>| {
//!     assert!(buffer.is_empty());
//!     buffer.push("A".to_string()).unwrap();
//!     assert_eq!(buffer.len(), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
pub use vectors::*;
