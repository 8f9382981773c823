//! # obuf Core
//!
//! A disk-backed, append-only sequence of values.
//!
//! This crate provides:
//! - [`Lens`] - record framing over any byte stream
//! - [`ProtectedLens`] - a lens whose operations are serialized by a mutex
//! - [`Buffer`] - the object buffer: push, iterate, random access, clear
//! - [`Config`] - where and how backing files are created
//!
//! Values pushed into a [`Buffer`] are encoded by a [`Codec`] and appended to
//! a temporary file as `<decimal length>\t<payload>\n` frames, so the
//! working set is bounded by disk rather than memory. Every read pass opens
//! its own handle on the file, which lets passes nest and overlap with
//! pushes.
//!
//! ## Example
//!
//! ```rust
//! use obuf_core::{Buffer, Config, JsonCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Row {
//!     id: u32,
//!     name: String,
//! }
//!
//! let config = Config::new().prefix("rows");
//! let buffer = Buffer::with_config(&config, JsonCodec).unwrap();
//! buffer.push(Row { id: 1, name: "a\tb".into() }).unwrap();
//! buffer.push(Row { id: 2, name: "c\nd".into() }).unwrap();
//!
//! let mut ids = Vec::new();
//! buffer
//!     .for_each(|row: Row| {
//!         ids.push(row.id);
//!         Ok(true)
//!     })
//!     .unwrap();
//! assert_eq!(ids, vec![1, 2]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod lens;

pub use buffer::{Buffer, Iter};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use lens::{Lens, LensIter, ProtectedLens, DELIM, END_RECORD};

pub use obuf_codec::{CborCodec, Codec, CodecError, CodecResult, FnCodec, JsonCodec, RawCodec};
pub use obuf_storage::{
    BackingStore, MemoryFactory, MemoryStats, MemoryStore, ReadStream, StorageError,
    StoreFactory, TempFileFactory, TempFileStore,
};
