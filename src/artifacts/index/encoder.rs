//! Whole-file encoding
//!
//! Produces the exact image `decode` accepts: header, entries, extension
//! blocks in their stored order, and the SHA-1 trailer over everything
//! before it.

use crate::artifacts::index::checksum::ChecksumWriter;
use crate::artifacts::index::error::EncodeError;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::staging_index::Index;
use crate::artifacts::objects::object::Packable;
use bytes::{Bytes, BytesMut};

/// Encode an index into its on-disk form
///
/// The header's entry count is taken from the entries themselves, so an
/// index assembled by hand cannot disagree with what is written.
pub fn encode(index: &Index) -> Result<Bytes, EncodeError> {
    let entry_count = u32::try_from(index.len()).map_err(|_| EncodeError::TooManyEntries(index.len()))?;
    let header = IndexHeader {
        entry_count,
        ..index.header().clone()
    };

    let mut writer = ChecksumWriter::default();
    writer.write(&header.serialize()?);

    let mut entries = BytesMut::new();
    let mut previous: &[u8] = &[];
    for entry in index.entries() {
        entry.encode(&mut entries, header.version, previous)?;
        previous = entry.path_bytes();
    }
    writer.write(&entries);

    for block in index.extensions() {
        writer.write(&block.serialize()?);
    }

    Ok(Bytes::from(writer.write_checksum()))
}

impl Packable for Index {
    fn serialize(&self) -> Result<Bytes, EncodeError> {
        encode(self)
    }
}
