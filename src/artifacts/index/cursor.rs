//! Bounded sequential reading over an in-memory index image
//!
//! `ByteSource` is the seam the primitive decoders read through. `ByteCursor`
//! is the plain implementation; `Checksum` wraps one and hashes every byte it
//! hands out.

use crate::artifacts::index::error::{DecodeError, DecodeResult};

pub trait ByteSource<'a> {
    /// Consume exactly `len` bytes or fail without consuming anything
    fn read_exact(&mut self, len: usize, field: &'static str) -> DecodeResult<&'a [u8]>;

    /// Up to `len` upcoming bytes, without consuming them
    fn peek(&self, len: usize) -> &'a [u8];

    /// Absolute offset of the next byte
    fn position(&self) -> usize;

    /// Bytes left before the current bound
    fn remaining(&self) -> usize;
}

/// Reader over a byte slice with a movable upper bound
///
/// The bound lets the decoder fence off the trailing checksum so entries and
/// extensions can never consume it. Offsets are always absolute within the
/// original slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    end: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor {
            data,
            position: 0,
            end: data.len(),
        }
    }

    /// Restrict reads to bytes before `end`
    ///
    /// The bound is clamped between the current position and the end of the
    /// underlying slice.
    pub fn limit_to(&mut self, end: usize) {
        self.end = end.clamp(self.position, self.data.len());
    }

    /// Lift any bound set by `limit_to`
    pub fn release_limit(&mut self) {
        self.end = self.data.len();
    }
}

impl<'a> ByteSource<'a> for ByteCursor<'a> {
    fn read_exact(&mut self, len: usize, field: &'static str) -> DecodeResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::truncated(field, self.position, len, available));
        }

        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    fn peek(&self, len: usize) -> &'a [u8] {
        let end = self.position + len.min(self.remaining());
        &self.data[self.position..end]
    }

    fn position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.end - self.position
    }
}
