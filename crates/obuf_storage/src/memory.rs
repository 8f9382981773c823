//! In-memory backing store for testing.

use crate::error::StorageResult;
use crate::store::{BackingStore, ReadStream, StoreFactory};
use parking_lot::RwLock;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// An in-memory backing store.
///
/// This store keeps all bytes in memory and is suitable for:
/// - Unit tests
/// - Integration tests that need to observe allocation and disposal
/// - Small buffers that never need to spill
///
/// Readers are snapshots: each [`open_reader`](BackingStore::open_reader)
/// copies the bytes written so far into its own cursor.
///
/// # Example
///
/// ```rust
/// use obuf_storage::{BackingStore, MemoryStore};
/// use std::io::Write;
///
/// let mut store = MemoryStore::new();
/// store.write_all(b"test data").unwrap();
/// assert_eq!(store.bytes_written(), 9);
/// assert_eq!(store.data(), b"test data");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Vec<u8>>,
    stats: Option<Arc<MemoryStats>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with pre-existing bytes.
    ///
    /// Useful for feeding hand-crafted frames to a reader.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
            stats: None,
        }
    }

    /// Returns a copy of all bytes in the store.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }
}

impl Write for MemoryStore {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.write().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing is buffered
        Ok(())
    }
}

impl BackingStore for MemoryStore {
    fn path(&self) -> Option<&Path> {
        None
    }

    fn bytes_written(&self) -> u64 {
        self.data.read().len() as u64
    }

    fn open_reader(&self) -> StorageResult<Box<dyn ReadStream>> {
        Ok(Box::new(Cursor::new(self.data())))
    }

    fn dispose(self: Box<Self>) -> StorageResult<()> {
        if let Some(stats) = &self.stats {
            stats.disposals.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Allocation and disposal counters shared by a [`MemoryFactory`] and every
/// store it creates.
#[derive(Debug, Default)]
pub struct MemoryStats {
    allocations: AtomicUsize,
    disposals: AtomicUsize,
}

impl MemoryStats {
    /// Number of stores created so far.
    #[must_use]
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Number of stores disposed so far.
    #[must_use]
    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    /// Number of stores created but not yet disposed.
    #[must_use]
    pub fn live(&self) -> usize {
        self.allocations().saturating_sub(self.disposals())
    }
}

/// Allocates [`MemoryStore`]s and counts their lifecycle events.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactory {
    stats: Arc<MemoryStats>,
}

impl MemoryFactory {
    /// Creates a new factory with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared counters.
    #[must_use]
    pub fn stats(&self) -> Arc<MemoryStats> {
        Arc::clone(&self.stats)
    }
}

impl StoreFactory for MemoryFactory {
    fn create(&self) -> StorageResult<Box<dyn BackingStore>> {
        self.stats.allocations.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryStore {
            data: RwLock::new(Vec::new()),
            stats: Some(Arc::clone(&self.stats)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Read, Seek, SeekFrom};

    #[test]
    fn memory_new_is_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.bytes_written(), 0);
        assert!(store.data().is_empty());
        assert!(store.path().is_none());
    }

    #[test]
    fn memory_write_appends() {
        let mut store = MemoryStore::new();
        store.write_all(b"hello").unwrap();
        store.write_all(b" world").unwrap();
        assert_eq!(store.data(), b"hello world");
        assert_eq!(store.bytes_written(), 11);
    }

    #[test]
    fn memory_with_data() {
        let store = MemoryStore::with_data(b"5\thello\n".to_vec());
        let mut reader = store.open_reader().unwrap();

        let mut header = Vec::new();
        reader.read_until(b'\t', &mut header).unwrap();
        assert_eq!(&header, b"5\t");
    }

    #[test]
    fn memory_reader_is_a_snapshot() {
        let mut store = MemoryStore::new();
        store.write_all(b"before").unwrap();

        let mut reader = store.open_reader().unwrap();
        store.write_all(b" after").unwrap();

        let mut seen = String::new();
        reader.read_to_string(&mut seen).unwrap();
        assert_eq!(seen, "before");
    }

    #[test]
    fn memory_reader_seeks() {
        let store = MemoryStore::with_data(b"abcdef".to_vec());
        let mut reader = store.open_reader().unwrap();
        reader.seek(SeekFrom::Start(3)).unwrap();

        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "def");
    }

    #[test]
    fn factory_counts_lifecycle() {
        let factory = MemoryFactory::new();
        let stats = factory.stats();

        let first = factory.create().unwrap();
        let second = factory.create().unwrap();
        assert_eq!(stats.allocations(), 2);
        assert_eq!(stats.live(), 2);

        first.dispose().unwrap();
        assert_eq!(stats.disposals(), 1);
        assert_eq!(stats.live(), 1);

        second.dispose().unwrap();
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn standalone_dispose_is_uncounted() {
        let store = Box::new(MemoryStore::new());
        assert!(store.dispose().is_ok());
    }
}
