//! Record framing over byte streams.
//!
//! A [`Lens`] reads and writes self-delimiting records on any stream. It is
//! stateless apart from the stream cursor it borrows or owns, so a read-only
//! lens is cheap to create and throw away for each read pass.
//!
//! ## Record Format
//!
//! ```text
//! | decimal ASCII length | 0x09 | payload (length bytes) | 0x0A |
//! ```
//!
//! Frames are contiguous, with no file header, footer, index, or checksum.
//! The payload is binary-safe because its length is explicit. Frame `i`
//! starts where frames `0..i` end, so random access scans headers from
//! offset 0 and seeks over payloads without decoding them.
//!
//! ## End of Data
//!
//! A header that parses as zero ends the data. That covers real end of
//! stream, malformed headers, and genuine zero-length payloads alike: the
//! format cannot tell them apart, and no repair is attempted. A payload cut
//! short by end of stream is also treated as end of data.

mod header;
mod iter;
mod protected;

pub use header::{DELIM, END_RECORD};
pub use iter::LensIter;
pub use protected::ProtectedLens;

use crate::error::CoreResult;
use obuf_codec::Codec;
use std::io::{BufRead, Read, Seek, SeekFrom, Write};

/// Payload buffers are pre-sized up to this many bytes; longer payloads grow
/// as they are read, so a corrupt header cannot force a huge allocation.
const PREALLOC_LIMIT: u64 = 64 * 1024; // 64 KB

/// A framing view over a byte stream.
///
/// The write side ([`append`](Lens::append)) needs `S: Write`; the read side
/// ([`recover_object`](Lens::recover_object), [`recover_at`](Lens::recover_at),
/// [`for_each`](Lens::for_each), [`iter`](Lens::iter)) needs `S: BufRead + Seek`.
///
/// # Example
///
/// ```
/// use obuf_core::{Lens, RawCodec};
/// use std::io::Cursor;
///
/// let mut writer = Lens::new(Vec::new(), RawCodec);
/// writer.append("A".to_string()).unwrap();
/// writer.append("B\tC".to_string()).unwrap();
/// assert_eq!(writer.get_ref(), b"1\tA\n3\tB\tC\n");
///
/// let mut reader = Lens::new(Cursor::new(writer.into_inner()), RawCodec);
/// let second: Option<String> = reader.recover_at(1).unwrap();
/// assert_eq!(second.as_deref(), Some("B\tC"));
/// ```
#[derive(Debug)]
pub struct Lens<S, C> {
    stream: S,
    codec: C,
}

impl<S, C> Lens<S, C> {
    /// Creates a lens over a stream, encoding values with `codec`.
    pub const fn new(stream: S, codec: C) -> Self {
        Self { stream, codec }
    }

    /// Returns a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Returns a mutable reference to the underlying stream.
    ///
    /// Moving the stream cursor directly changes where the next frame is
    /// read or written.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Returns the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Consumes the lens, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Write, C> Lens<S, C> {
    /// Encodes `value` and appends one frame at the stream's current position.
    ///
    /// The length digits, the delimiter, the payload, and the record
    /// separator are written in that order. The value is handed back
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the stream rejects a write.
    pub fn append<T>(&mut self, value: T) -> CoreResult<T>
    where
        C: Codec<T>,
    {
        let payload = self.codec.encode(&value)?;
        self.write_frame(&payload)?;
        Ok(value)
    }

    fn write_frame(&mut self, payload: &[u8]) -> CoreResult<()> {
        if payload.is_empty() {
            tracing::warn!("appending zero-length payload; it will read back as end of data");
        }

        self.stream.write_all(&header::encode_length(payload.len()))?;
        self.stream.write_all(&[DELIM])?;
        self.stream.write_all(payload)?;
        self.stream.write_all(&[END_RECORD])?;
        Ok(())
    }
}

impl<S: BufRead + Seek, C> Lens<S, C> {
    /// Reads and decodes the record at the current stream position.
    ///
    /// Returns `Ok(None)` at end of data.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the payload does not decode.
    pub fn recover_object<T>(&mut self) -> CoreResult<Option<T>>
    where
        C: Codec<T>,
    {
        match self.read_payload()? {
            Some(payload) => Ok(Some(self.codec.decode(&payload)?)),
            None => Ok(None),
        }
    }

    /// Reads and decodes the `index`-th record counted from offset 0.
    ///
    /// Preceding records are skipped by their header lengths, without
    /// decoding them. Returns `Ok(None)` if the data ends before
    /// `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the payload does not decode.
    pub fn recover_at<T>(&mut self, index: usize) -> CoreResult<Option<T>>
    where
        C: Codec<T>,
    {
        self.stream.seek(SeekFrom::Start(0))?;

        for _ in 0..index {
            let len = self.read_header()?;
            if len == 0 {
                return Ok(None);
            }

            // Skip the payload and its record separator
            let Some(skip) = len.checked_add(1).filter(|n| i64::try_from(*n).is_ok()) else {
                return Ok(None);
            };
            self.skip_bytes(skip)?;
        }

        self.recover_object()
    }

    /// Visits every record from the current position to end of data.
    ///
    /// The callback returns `Ok(true)` to continue, `Ok(false)` to stop, or
    /// an error to abort.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails, or if the callback
    /// returns one.
    pub fn for_each<T, F>(&mut self, mut visit: F) -> CoreResult<()>
    where
        C: Codec<T>,
        F: FnMut(T) -> CoreResult<bool>,
    {
        while let Some(value) = self.recover_object()? {
            if !visit(value)? {
                break;
            }
        }
        Ok(())
    }

    /// Returns a lazy iterator over records from the current position.
    pub fn iter<T>(&mut self) -> LensIter<'_, S, C, T>
    where
        C: Codec<T>,
    {
        LensIter::new(self)
    }

    /// Reads the length header up to and including the delimiter.
    fn read_header(&mut self) -> CoreResult<u64> {
        let mut raw = Vec::with_capacity(16);
        self.stream.read_until(DELIM, &mut raw)?;
        Ok(header::parse_length(&raw))
    }

    /// Moves the cursor `count` bytes forward.
    ///
    /// Bytes already buffered are consumed in place; only the remainder is
    /// seeked over, so skipping short frames never discards the read buffer.
    fn skip_bytes(&mut self, count: u64) -> CoreResult<()> {
        let buffered = self.stream.fill_buf()?.len() as u64;
        let step = buffered.min(count);
        self.stream.consume(step as usize);

        let rest = count - step;
        if rest > 0 {
            // count fits in i64, checked by the caller
            self.stream.seek_relative(rest as i64)?;
        }
        Ok(())
    }

    /// Reads the next frame's payload, leaving the record separator for the
    /// next header read to skip.
    fn read_payload(&mut self) -> CoreResult<Option<Vec<u8>>> {
        let len = self.read_header()?;
        if len == 0 {
            return Ok(None);
        }

        let mut payload = Vec::with_capacity(len.min(PREALLOC_LIMIT) as usize);
        let read = Read::by_ref(&mut self.stream)
            .take(len)
            .read_to_end(&mut payload)?;

        if (read as u64) < len {
            tracing::warn!(expected = len, read, "truncated payload; treating as end of data");
            return Ok(None);
        }

        Ok(Some(payload))
    }
}
