//! Buffer configuration.

use obuf_storage::{TempFileFactory, DEFAULT_BUFFER_CAPACITY, DEFAULT_PREFIX};
use std::path::PathBuf;

/// Configuration for the temp-file store behind a buffer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the backing file (`None` = system temp dir).
    pub temp_dir: Option<PathBuf>,

    /// File-name prefix of the backing file.
    pub prefix: String,

    /// Capacity of the writer-side buffer, flushed at every read barrier.
    pub write_buffer_capacity: usize,

    /// Capacity of each independent read handle's buffer.
    pub read_buffer_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            write_buffer_capacity: DEFAULT_BUFFER_CAPACITY, // 8 KiB
            read_buffer_capacity: DEFAULT_BUFFER_CAPACITY,  // 8 KiB
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory the backing file is created in.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Sets the backing file name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the write buffer capacity.
    #[must_use]
    pub const fn write_buffer_capacity(mut self, capacity: usize) -> Self {
        self.write_buffer_capacity = capacity;
        self
    }

    /// Sets the read buffer capacity.
    #[must_use]
    pub const fn read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    /// Builds the store factory described by this configuration.
    #[must_use]
    pub fn store_factory(&self) -> TempFileFactory {
        let factory = TempFileFactory::new()
            .prefix(self.prefix.clone())
            .write_capacity(self.write_buffer_capacity)
            .read_capacity(self.read_buffer_capacity);

        match &self.temp_dir {
            Some(dir) => factory.dir(dir.clone()),
            None => factory,
        }
    }
}
