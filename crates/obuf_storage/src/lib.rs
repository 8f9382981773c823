//! # obuf Storage
//!
//! Backing store abstraction for obuf.
//!
//! This crate provides the lowest layer of the object buffer: a place to
//! append bytes, and a way to open **independent** read handles over what
//! has been appended so far. Stores are **opaque byte sinks** - they do not
//! know about record framing or value encoding.
//!
//! ## Design Principles
//!
//! - A store has exactly one write cursor, owned by whoever holds the store
//! - Every reader is a fresh handle with its own cursor, starting at offset 0
//! - Disposal closes the store and deletes its storage
//! - Stores must be `Send` so a buffer can be shared across threads
//!
//! ## Available Stores
//!
//! - [`TempFileStore`] - Temporary file, deleted on dispose or drop
//! - [`MemoryStore`] - In-memory bytes, for tests and small workloads
//!
//! ## Example
//!
//! ```rust
//! use obuf_storage::{BackingStore, MemoryStore};
//! use std::io::{BufRead, Write};
//!
//! let mut store = MemoryStore::new();
//! store.write_all(b"3\tabc\n").unwrap();
//! store.flush().unwrap();
//!
//! let mut reader = store.open_reader().unwrap();
//! let mut header = Vec::new();
//! reader.read_until(b'\t', &mut header).unwrap();
//! assert_eq!(&header, b"3\t");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::{TempFileFactory, TempFileStore, DEFAULT_BUFFER_CAPACITY, DEFAULT_PREFIX};
pub use memory::{MemoryFactory, MemoryStats, MemoryStore};
pub use store::{BackingStore, ReadStream, StoreFactory};
