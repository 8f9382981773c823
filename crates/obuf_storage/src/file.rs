//! Temporary-file backing store.

use crate::error::StorageResult;
use crate::store::{BackingStore, ReadStream, StoreFactory};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Default file-name prefix for backing files.
pub const DEFAULT_PREFIX: &str = "obuf";

/// Default capacity of the write buffer and of each reader's buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// A backing store on a temporary file.
///
/// Writes go through a [`BufWriter`]; readers are separate read-only
/// [`File`] handles opened on the same path, so the file must be flushed
/// before a reader can observe the latest appends.
///
/// The file is deleted when the store is disposed, or when it is dropped.
///
/// # Example
///
/// ```
/// use obuf_storage::{BackingStore, TempFileStore};
/// use std::io::{Read, Write};
///
/// let mut store = TempFileStore::create().unwrap();
/// store.write_all(b"spilled").unwrap();
/// store.flush().unwrap();
///
/// let mut contents = String::new();
/// store.open_reader().unwrap().read_to_string(&mut contents).unwrap();
/// assert_eq!(contents, "spilled");
///
/// let path = store.path().unwrap().to_path_buf();
/// Box::new(store).dispose().unwrap();
/// assert!(!path.exists());
/// ```
#[derive(Debug)]
pub struct TempFileStore {
    writer: BufWriter<NamedTempFile>,
    path: PathBuf,
    read_capacity: usize,
    written: u64,
}

impl TempFileStore {
    /// Creates a store in the system temporary directory with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn create() -> StorageResult<Self> {
        Self::create_with(&TempFileFactory::default())
    }

    /// Creates a store using the settings of the given factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn create_with(factory: &TempFileFactory) -> StorageResult<Self> {
        let mut builder = Builder::new();
        builder.prefix(&factory.prefix);

        let file = match &factory.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let path = file.path().to_path_buf();

        tracing::debug!(path = %path.display(), "allocated temp file store");

        Ok(Self {
            writer: BufWriter::with_capacity(factory.write_capacity, file),
            path,
            read_capacity: factory.read_capacity,
            written: 0,
        })
    }
}

impl Write for TempFileStore {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl BackingStore for TempFileStore {
    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }

    fn open_reader(&self) -> StorageResult<Box<dyn ReadStream>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::with_capacity(self.read_capacity, file)))
    }

    fn dispose(self: Box<Self>) -> StorageResult<()> {
        let Self {
            writer,
            path,
            written,
            ..
        } = *self;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.close()?;

        tracing::debug!(path = %path.display(), bytes = written, "disposed temp file store");
        Ok(())
    }
}

/// Allocates [`TempFileStore`]s with fixed settings.
#[derive(Debug, Clone)]
pub struct TempFileFactory {
    dir: Option<PathBuf>,
    prefix: String,
    write_capacity: usize,
    read_capacity: usize,
}

impl Default for TempFileFactory {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            write_capacity: DEFAULT_BUFFER_CAPACITY,
            read_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl TempFileFactory {
    /// Creates a factory with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory files are created in (default: system temp dir).
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Sets the file-name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the write buffer capacity.
    #[must_use]
    pub const fn write_capacity(mut self, capacity: usize) -> Self {
        self.write_capacity = capacity;
        self
    }

    /// Sets the buffer capacity of each reader.
    #[must_use]
    pub const fn read_capacity(mut self, capacity: usize) -> Self {
        self.read_capacity = capacity;
        self
    }
}

impl StoreFactory for TempFileFactory {
    fn create(&self) -> StorageResult<Box<dyn BackingStore>> {
        Ok(Box::new(TempFileStore::create_with(self)?))
    }
}
