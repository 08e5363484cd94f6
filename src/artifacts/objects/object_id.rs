//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 20-byte SHA-1 digests. The index stores them in binary form,
//! both for entry content hashes and for the trailing whole-file checksum.
//!
//! ## Format
//!
//! - Binary: 20 raw bytes, exactly as stored on disk
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use sha1::{Digest, Sha1};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("invalid object ID length: {0}")]
    Length(usize),

    #[error("invalid object ID characters: {0}")]
    NotHex(String),
}

/// Object identifier (SHA-1 hash)
///
/// Holds the raw 20-byte digest. Display renders the usual 40-character
/// lowercase hexadecimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse and validate an object ID from its hexadecimal form
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    pub fn try_parse(id: &str) -> Result<Self, ObjectIdError> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(ObjectIdError::Length(id.len()));
        }

        let mut raw = [0u8; OBJECT_ID_SIZE];
        for (byte, pair) in raw.iter_mut().zip(id.as_bytes().chunks_exact(2)) {
            let (Some(high), Some(low)) = (hex_value(pair[0]), hex_value(pair[1])) else {
                return Err(ObjectIdError::NotHex(id.to_string()));
            };
            *byte = (high << 4) | low;
        }

        Ok(Self(raw))
    }

    /// SHA-1 digest of the given content
    pub fn hash(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        let mut raw = [0u8; OBJECT_ID_SIZE];
        raw.copy_from_slice(hasher.finalize().as_slice());
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_SIZE] {
        &self.0
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        let mut full = self.to_string();
        full.truncate(7);
        full
    }
}

impl From<[u8; OBJECT_ID_SIZE]> for ObjectId {
    fn from(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|value| value as u8)
}
