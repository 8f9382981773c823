//! The disk-backed object buffer.

use crate::config::Config;
use crate::error::CoreResult;
use crate::lens::Lens;
use obuf_codec::{CborCodec, Codec};
use obuf_storage::{BackingStore, ReadStream, StoreFactory};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

/// Writer-side state, guarded by the buffer's mutex.
struct WriteState<C> {
    /// The write lens over the backing store. `None` once cleared.
    lens: Option<Lens<Box<dyn BackingStore>, Arc<C>>>,
    /// Number of records appended. The only source of truth for the count.
    size: usize,
}

/// A write-once-append, read-many store of values spilled to a temp file.
///
/// Values are encoded by the codec `C` and appended as framed records to a
/// backing store. Reading never touches the write cursor: every pass and
/// every lookup opens its own read handle at offset 0, so passes can run
/// concurrently, or nested inside one another, without interfering.
///
/// # Thread Safety
///
/// `push` and `clear` take an internal mutex. Before a read handle is opened
/// the same mutex is taken just long enough to flush buffered writes and
/// capture the record count, so a read started after `push` returns sees
/// that record. A read pass never observes records pushed while it runs.
///
/// # States
///
/// - **Active**: a backing store exists; `push`, iteration and lookups work.
/// - **Cleared**: after [`clear`](Buffer::clear) the store is disposed and
///   the count is 0. Reads yield nothing. The next `push` allocates a fresh
///   store and the buffer is Active again.
///
/// # Example
///
/// ```
/// use obuf_core::Buffer;
///
/// let buffer: Buffer<String> = Buffer::new().unwrap();
/// for letter in ["A", "B", "C"] {
///     buffer.push(letter.to_string()).unwrap();
/// }
///
/// assert_eq!(buffer.len(), 3);
/// assert_eq!(buffer.get(1).unwrap().as_deref(), Some("B"));
/// assert_eq!(buffer.get(3).unwrap(), None);
///
/// let all: Vec<String> = buffer.to_vec().unwrap();
/// assert_eq!(all, ["A", "B", "C"]);
///
/// buffer.clear().unwrap();
/// assert!(buffer.is_empty());
/// ```
pub struct Buffer<T, C = CborCodec> {
    state: Mutex<WriteState<C>>,
    codec: Arc<C>,
    factory: Box<dyn StoreFactory>,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Buffer<T, CborCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates an empty buffer on a fresh temp file, using CBOR encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created.
    pub fn new() -> CoreResult<Self> {
        Self::with_codec(CborCodec)
    }

    /// Creates a buffer seeded with `values`, pushed in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created or a value
    /// cannot be pushed.
    pub fn from_values<I>(values: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::new()?.seed(values)
    }
}

impl<T, C> Buffer<T, C>
where
    C: Codec<T>,
{
    /// Creates an empty buffer on a fresh temp file with the given codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created.
    pub fn with_codec(codec: C) -> CoreResult<Self> {
        Self::with_config(&Config::default(), codec)
    }

    /// Creates an empty buffer whose temp file follows `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created.
    pub fn with_config(config: &Config, codec: C) -> CoreResult<Self> {
        Self::with_store_factory(config.store_factory(), codec)
    }

    /// Creates an empty buffer over stores allocated by `factory`.
    ///
    /// The first store is allocated immediately; another one is allocated
    /// on the first `push` after each [`clear`](Buffer::clear).
    ///
    /// # Errors
    ///
    /// Returns an error if the first store cannot be allocated.
    pub fn with_store_factory<F>(factory: F, codec: C) -> CoreResult<Self>
    where
        F: StoreFactory + 'static,
    {
        let codec = Arc::new(codec);
        let store = factory.create()?;

        Ok(Self {
            state: Mutex::new(WriteState {
                lens: Some(Lens::new(store, Arc::clone(&codec))),
                size: 0,
            }),
            codec,
            factory: Box::new(factory),
            _marker: PhantomData,
        })
    }

    /// Pushes every value of `values` in order and returns the buffer.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`push`](Buffer::push).
    pub fn seed<I>(self, values: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(self)
    }

    /// Hands the buffer to `setup` for final adjustment before first use.
    ///
    /// # Errors
    ///
    /// Returns the error raised by `setup`.
    pub fn configure<F>(mut self, setup: F) -> CoreResult<Self>
    where
        F: FnOnce(&mut Self) -> CoreResult<()>,
    {
        setup(&mut self)?;
        Ok(self)
    }

    /// Encodes `value`, appends it to the backing store, and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails, the store rejects the write, or
    /// a store cannot be allocated after a `clear`.
    pub fn push(&self, value: T) -> CoreResult<T> {
        let mut state = self.state.lock();

        let lens = match &mut state.lens {
            Some(lens) => lens,
            slot => {
                let store = self.factory.create()?;
                tracing::debug!("allocated backing store after clear");
                slot.insert(Lens::new(store, Arc::clone(&self.codec)))
            }
        };

        let value = lens.append(value)?;
        state.size += 1;
        Ok(value)
    }

    /// Returns the number of records pushed since creation or the last clear.
    pub fn len(&self) -> usize {
        self.state.lock().size
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a lazy iterator over every stored record, in push order.
    ///
    /// The iterator owns a fresh read handle, closed when the iterator is
    /// dropped, whether or not it ran to completion. It yields at most the
    /// number of records stored when it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered writes cannot be flushed or the read
    /// handle cannot be opened.
    pub fn iter(&self) -> CoreResult<Iter<'_, T, C>> {
        let pass = self.open_read_pass()?;
        Ok(Iter {
            remaining: pass.as_ref().map_or(0, |(_, size)| *size),
            lens: pass.map(|(reader, _)| Lens::new(reader, &*self.codec)),
            _marker: PhantomData,
        })
    }

    /// Visits every stored record in push order.
    ///
    /// The callback returns `Ok(true)` to continue or `Ok(false)` to stop
    /// early; the read handle is released either way.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if the callback
    /// returns one.
    pub fn for_each<F>(&self, mut visit: F) -> CoreResult<()>
    where
        F: FnMut(T) -> CoreResult<bool>,
    {
        for value in self.iter()? {
            if !visit(value?)? {
                break;
            }
        }
        Ok(())
    }

    /// Collects a full pass into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while reading.
    pub fn to_vec(&self) -> CoreResult<Vec<T>> {
        self.iter()?.collect()
    }

    /// Returns the record at `index`, or `None` if `index >= len()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the record does not
    /// decode.
    pub fn get(&self, index: usize) -> CoreResult<Option<T>> {
        self.recover_at(index)
    }

    /// Looks up each index in order. Out-of-range indices yield `None` in
    /// their slot rather than failing the call.
    ///
    /// # Errors
    ///
    /// Returns the first storage or decoding error.
    pub fn get_many<I>(&self, indices: I) -> CoreResult<Vec<Option<T>>>
    where
        I: IntoIterator<Item = usize>,
    {
        indices.into_iter().map(|i| self.recover_at(i)).collect()
    }

    /// Disposes the backing store and resets the count to zero.
    ///
    /// Clearing an already cleared buffer does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be closed or deleted. The buffer
    /// is Cleared even then.
    pub fn clear(&self) -> CoreResult<()> {
        let mut state = self.state.lock();
        let records = std::mem::take(&mut state.size);

        if let Some(lens) = state.lens.take() {
            let store = lens.into_inner();
            let bytes = store.bytes_written();
            store.dispose()?;
            tracing::debug!(records, bytes, "cleared buffer");
        }

        Ok(())
    }

    /// Returns the path of the backing file, if the store has one and the
    /// buffer is not cleared.
    pub fn path(&self) -> Option<PathBuf> {
        let state = self.state.lock();
        state
            .lens
            .as_ref()
            .and_then(|lens| lens.get_ref().path().map(PathBuf::from))
    }

    /// Returns the number of bytes appended to the current backing store.
    pub fn bytes_written(&self) -> u64 {
        let state = self.state.lock();
        state
            .lens
            .as_ref()
            .map_or(0, |lens| lens.get_ref().bytes_written())
    }

    fn recover_at(&self, index: usize) -> CoreResult<Option<T>> {
        let Some((reader, size)) = self.open_read_pass()? else {
            return Ok(None);
        };
        if index >= size {
            return Ok(None);
        }

        tracing::trace!(index, "random access lookup");
        Lens::new(reader, &*self.codec).recover_at(index)
    }

    /// Flushes buffered writes and opens an independent read handle, all
    /// under the write lock. Returns the handle with the record count
    /// captured at that moment, or `None` if the buffer is cleared.
    fn open_read_pass(&self) -> CoreResult<Option<(Box<dyn ReadStream>, usize)>> {
        let mut state = self.state.lock();
        let size = state.size;

        let Some(lens) = state.lens.as_mut() else {
            return Ok(None);
        };

        let store = lens.get_mut();
        store.flush()?;
        let reader = store.open_reader()?;

        tracing::trace!(records = size, "opened read pass");
        Ok(Some((reader, size)))
    }
}

impl<T, C> fmt::Debug for Buffer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Buffer")
            .field("size", &state.size)
            .field("cleared", &state.lens.is_none())
            .finish_non_exhaustive()
    }
}

/// A single read pass over a [`Buffer`].
///
/// Created by [`Buffer::iter`]. Holds its own read handle and yields at most
/// the record count captured when it was created.
pub struct Iter<'a, T, C> {
    lens: Option<Lens<Box<dyn ReadStream>, &'a C>>,
    remaining: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> Iterator for Iter<'_, T, C>
where
    C: Codec<T>,
{
    type Item = CoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let lens = self.lens.as_mut()?;
        self.remaining -= 1;

        match lens.recover_object() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                tracing::warn!(
                    missing = self.remaining + 1,
                    "read pass hit end of data before the captured record count"
                );
                self.remaining = 0;
                None
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<T, C> std::iter::FusedIterator for Iter<'_, T, C> where C: Codec<T> {}

impl<T, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
