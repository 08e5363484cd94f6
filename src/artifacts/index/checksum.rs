//! Whole-file integrity checksum
//!
//! The last 20 bytes of an index are the SHA-1 of everything before them.
//! `Checksum` hashes bytes as they are consumed, so once the decoder reaches
//! the trailer the digest covers exactly the header, entries and extensions.

use crate::artifacts::index::CHECKSUM_SIZE;
use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::error::{DecodeError, DecodeResult};
use crate::artifacts::objects::object_id::ObjectId;
use sha1::{Digest, Sha1};

/// Outcome of comparing the stored trailer with the recomputed digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Mismatch { stored: ObjectId, computed: ObjectId },
    /// Built in memory, never read back from bytes
    Unchecked,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }
}

/// Reader that feeds every consumed byte into a running SHA-1
#[derive(Debug, Clone)]
pub struct Checksum<'a> {
    cursor: ByteCursor<'a>,
    digest: Sha1,
}

impl<'a> Checksum<'a> {
    pub(crate) fn new(cursor: ByteCursor<'a>) -> Self {
        Checksum {
            cursor,
            digest: Sha1::new(),
        }
    }

    /// Fence off the trailer so nothing before `verify` can consume it
    ///
    /// Fails when the input is too short to hold a trailer at all.
    pub(crate) fn reserve_trailer(&mut self) -> DecodeResult<()> {
        let available = self.cursor.remaining();
        if available < CHECKSUM_SIZE {
            return Err(DecodeError::truncated(
                "checksum",
                self.cursor.position(),
                CHECKSUM_SIZE,
                available,
            ));
        }

        let end = self.cursor.position() + available - CHECKSUM_SIZE;
        self.cursor.limit_to(end);
        Ok(())
    }

    /// Read the trailer and compare it with the digest of all consumed bytes
    pub(crate) fn verify(mut self) -> DecodeResult<(ObjectId, Verification)> {
        if self.cursor.remaining() != 0 {
            return Err(DecodeError::malformed(
                "checksum",
                self.cursor.position(),
                format!("{} unread bytes before checksum", self.cursor.remaining()),
            ));
        }

        self.cursor.release_limit();
        let mut trailer = [0u8; CHECKSUM_SIZE];
        trailer.copy_from_slice(self.cursor.read_exact(CHECKSUM_SIZE, "checksum")?);
        let stored = ObjectId::from_bytes(trailer);

        let mut digest = [0u8; CHECKSUM_SIZE];
        digest.copy_from_slice(self.digest.finalize().as_slice());
        let computed = ObjectId::from_bytes(digest);

        let verification = if stored == computed {
            Verification::Verified
        } else {
            Verification::Mismatch { stored, computed }
        };

        Ok((stored, verification))
    }
}

impl<'a> ByteSource<'a> for Checksum<'a> {
    fn read_exact(&mut self, len: usize, field: &'static str) -> DecodeResult<&'a [u8]> {
        let bytes = self.cursor.read_exact(len, field)?;
        self.digest.update(bytes);
        Ok(bytes)
    }

    fn peek(&self, len: usize) -> &'a [u8] {
        self.cursor.peek(len)
    }

    fn position(&self) -> usize {
        self.cursor.position()
    }

    fn remaining(&self) -> usize {
        self.cursor.remaining()
    }
}

/// Writer side: accumulates output and appends the SHA-1 trailer
#[derive(Debug, Clone, Default)]
pub(crate) struct ChecksumWriter {
    buffer: Vec<u8>,
    digest: Sha1,
}

impl ChecksumWriter {
    pub(crate) fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.digest.update(data);
    }

    pub(crate) fn write_checksum(mut self) -> Vec<u8> {
        let checksum = self.digest.finalize();
        self.buffer.extend_from_slice(checksum.as_slice());
        self.buffer
    }
}
