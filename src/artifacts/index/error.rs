//! Decode and encode failures
//!
//! Every decode error records the stage it happened in and, where one
//! exists, the absolute byte offset and the index of the entry being read.
//! That is enough to locate corruption without re-deriving offsets.

use crate::artifacts::objects::object_id::ObjectId;
use std::fmt;
use thiserror::Error;

/// Decoder stage in which an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Header,
    Entries,
    Extensions,
    Checksum,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeStage::Header => "header",
            DecodeStage::Entries => "entries",
            DecodeStage::Extensions => "extensions",
            DecodeStage::Checksum => "checksum",
        };
        f.write_str(name)
    }
}

/// Entry position suffix used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTag(pub Option<u32>);

impl fmt::Display for EntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, " (entry #{index})"),
            None => Ok(()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not an index file: bad signature {found:02x?}")]
    BadSignature { found: [u8; 4] },

    #[error("unsupported index version {version}")]
    UnsupportedVersion { version: u32 },

    #[error(
        "truncated input in {stage} at offset {offset}: {field} needs {needed} bytes, \
         {available} available{entry}"
    )]
    TruncatedInput {
        stage: DecodeStage,
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
        entry: EntryTag,
    },

    #[error("malformed {field} in {stage} at offset {offset}{entry}: {reason}")]
    MalformedField {
        stage: DecodeStage,
        field: &'static str,
        offset: usize,
        entry: EntryTag,
        reason: String,
    },

    #[error(
        "malformed header: {entry_count} entries need at least {minimum} bytes, \
         only {available} available"
    )]
    MalformedHeader {
        entry_count: u32,
        minimum: u64,
        available: usize,
    },

    #[error("checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch { stored: ObjectId, computed: ObjectId },

    #[error("index was not decoded from bytes, there is no checksum to verify")]
    Unchecked,
}

impl DecodeError {
    pub(crate) fn truncated(field: &'static str, offset: usize, needed: usize, available: usize) -> Self {
        DecodeError::TruncatedInput {
            stage: DecodeStage::Header,
            field,
            offset,
            needed,
            available,
            entry: EntryTag(None),
        }
    }

    pub(crate) fn malformed(field: &'static str, offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::MalformedField {
            stage: DecodeStage::Header,
            field,
            offset,
            entry: EntryTag(None),
            reason: reason.into(),
        }
    }

    /// Record the stage on errors raised by stage-agnostic primitives
    pub(crate) fn in_stage(mut self, new_stage: DecodeStage) -> Self {
        match &mut self {
            DecodeError::TruncatedInput { stage, .. } | DecodeError::MalformedField { stage, .. } => {
                *stage = new_stage;
            }
            _ => {}
        }
        self
    }

    /// Tag the error with the position of the entry being decoded
    pub(crate) fn in_entry(mut self, index: u32) -> Self {
        match &mut self {
            DecodeError::TruncatedInput { entry, .. } | DecodeError::MalformedField { entry, .. } => {
                *entry = EntryTag(Some(index));
            }
            _ => {}
        }
        self.in_stage(DecodeStage::Entries)
    }

    /// Decoder stage the error was raised in, when it carries one
    pub fn stage(&self) -> Option<DecodeStage> {
        match self {
            DecodeError::TruncatedInput { stage, .. } | DecodeError::MalformedField { stage, .. } => {
                Some(*stage)
            }
            DecodeError::BadSignature { .. }
            | DecodeError::UnsupportedVersion { .. }
            | DecodeError::MalformedHeader { .. } => Some(DecodeStage::Header),
            DecodeError::ChecksumMismatch { .. } | DecodeError::Unchecked => {
                Some(DecodeStage::Checksum)
            }
        }
    }

    /// Entry index the error is tagged with, if any
    pub fn entry(&self) -> Option<u32> {
        match self {
            DecodeError::TruncatedInput { entry, .. } | DecodeError::MalformedField { entry, .. } => {
                entry.0
            }
            _ => None,
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("too many entries for the index header: {0}")]
    TooManyEntries(usize),

    #[error("extension {signature} payload of {length} bytes exceeds the 32-bit length field")]
    ExtensionTooLarge { signature: String, length: usize },

    #[error("path {0:?} contains a NUL byte")]
    NulInPath(String),

    #[error("unsupported index version {0}")]
    UnsupportedVersion(u32),
}
