//! A lens shareable between threads.

use super::Lens;
use crate::error::CoreResult;
use obuf_codec::Codec;
use parking_lot::Mutex;
use std::io::{BufRead, Seek, Write};

/// A [`Lens`] whose cursor-moving operations are serialized by a mutex.
///
/// Every `append`, `recover_object`, and `recover_at` runs under the lock, so
/// a single stream can be shared (for example behind an `Arc`) by several
/// threads. Reads and writes still share one cursor: a read moves the
/// position the next append writes at.
#[derive(Debug)]
pub struct ProtectedLens<S, C> {
    inner: Mutex<Lens<S, C>>,
}

impl<S, C> ProtectedLens<S, C> {
    /// Creates a protected lens over a stream.
    pub fn new(stream: S, codec: C) -> Self {
        Self {
            inner: Mutex::new(Lens::new(stream, codec)),
        }
    }

    /// Runs `f` with exclusive access to the underlying lens.
    ///
    /// Use this for multi-step operations that must not interleave with
    /// other threads, such as a full [`Lens::for_each`] pass.
    pub fn with_lens<R>(&self, f: impl FnOnce(&mut Lens<S, C>) -> R) -> R {
        let mut lens = self.inner.lock();
        f(&mut *lens)
    }

    /// Consumes the wrapper, returning the underlying lens.
    pub fn into_inner(self) -> Lens<S, C> {
        self.inner.into_inner()
    }
}

impl<S: Write, C> ProtectedLens<S, C> {
    /// Appends one frame under the lock. See [`Lens::append`].
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the stream rejects a write.
    pub fn append<T>(&self, value: T) -> CoreResult<T>
    where
        C: Codec<T>,
    {
        self.inner.lock().append(value)
    }
}

impl<S: BufRead + Seek, C> ProtectedLens<S, C> {
    /// Reads the record at the current position under the lock.
    /// See [`Lens::recover_object`].
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the payload does not decode.
    pub fn recover_object<T>(&self) -> CoreResult<Option<T>>
    where
        C: Codec<T>,
    {
        self.inner.lock().recover_object()
    }

    /// Reads the `index`-th record under the lock. See [`Lens::recover_at`].
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the payload does not decode.
    pub fn recover_at<T>(&self, index: usize) -> CoreResult<Option<T>>
    where
        C: Codec<T>,
    {
        self.inner.lock().recover_at(index)
    }
}
