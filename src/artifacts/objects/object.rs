use crate::artifacts::index::error::EncodeError;
use bytes::Bytes;

/// A value with a canonical on-disk byte representation
pub trait Packable {
    fn serialize(&self) -> Result<Bytes, EncodeError>;
}
