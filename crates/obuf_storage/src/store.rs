//! Backing store trait definitions.

use crate::error::StorageResult;
use std::fmt;
use std::io::{BufRead, Seek, Write};
use std::path::Path;

/// An independent, read-only cursor over a store's contents.
///
/// Anything that can read up to a delimiter byte ([`BufRead::read_until`]),
/// read an exact number of bytes, and seek by absolute or relative offset
/// qualifies. Each reader owns its cursor; moving it never affects the
/// store's write position or any other reader.
pub trait ReadStream: BufRead + Seek + Send {}

impl<T: BufRead + Seek + Send> ReadStream for T {}

/// A write-once-append byte store with independent readers.
///
/// The [`Write`] implementation appends at the store's single write cursor.
/// Writers may buffer internally; [`Write::flush`] must push every buffered
/// byte to where [`open_reader`](BackingStore::open_reader) can see it.
///
/// # Invariants
///
/// - Bytes are only ever appended, never overwritten
/// - A reader opened after `flush` returns observes every byte written before it
/// - Readers start at offset 0 and never share a cursor
/// - After `dispose` the storage no longer exists
///
/// # Implementors
///
/// - [`super::TempFileStore`] - Temporary file on disk
/// - [`super::MemoryStore`] - In-memory bytes
pub trait BackingStore: Write + Send + fmt::Debug {
    /// Returns the file-system path of the store, if it has one.
    fn path(&self) -> Option<&Path>;

    /// Returns the number of bytes appended so far, including bytes still
    /// sitting in a write buffer.
    fn bytes_written(&self) -> u64;

    /// Opens a fresh read handle positioned at offset 0.
    ///
    /// Callers must flush before opening a reader if they need to observe
    /// the latest writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be opened.
    fn open_reader(&self) -> StorageResult<Box<dyn ReadStream>>;

    /// Closes the store and deletes its storage.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered bytes cannot be flushed or the storage
    /// cannot be removed.
    fn dispose(self: Box<Self>) -> StorageResult<()>;
}

/// Allocates fresh backing stores.
///
/// A buffer holds a factory rather than a store so that it can allocate a new
/// store after it has been cleared.
pub trait StoreFactory: Send + Sync {
    /// Creates a new, empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be allocated.
    fn create(&self) -> StorageResult<Box<dyn BackingStore>>;
}

impl<F> StoreFactory for F
where
    F: Fn() -> StorageResult<Box<dyn BackingStore>> + Send + Sync,
{
    fn create(&self) -> StorageResult<Box<dyn BackingStore>> {
        self()
    }
}
