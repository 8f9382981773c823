//! Lazy record iteration over a lens.

use super::Lens;
use crate::error::CoreResult;
use obuf_codec::Codec;
use std::io::{BufRead, Seek};
use std::marker::PhantomData;

/// An iterator over the records following a lens's current position.
///
/// Yields `Ok(value)` per record and stops at end of data. After an error
/// is yielded the iterator is finished.
pub struct LensIter<'a, S, C, T> {
    lens: &'a mut Lens<S, C>,
    finished: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, S, C, T> LensIter<'a, S, C, T> {
    pub(super) fn new(lens: &'a mut Lens<S, C>) -> Self {
        Self {
            lens,
            finished: false,
            _marker: PhantomData,
        }
    }
}

impl<S, C, T> Iterator for LensIter<'_, S, C, T>
where
    S: BufRead + Seek,
    C: Codec<T>,
{
    type Item = CoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.lens.recover_object() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S, C, T> std::iter::FusedIterator for LensIter<'_, S, C, T>
where
    S: BufRead + Seek,
    C: Codec<T>,
{
}
