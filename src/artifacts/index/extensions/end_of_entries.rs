//! `EOIE` extension: where the entries end
//!
//! Lets a reader jump straight to the extensions. The hash covers the
//! signature and length of every extension that follows the entries.

use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::error::{DecodeError, DecodeResult};
use crate::artifacts::index::primitives::{read_fixed_bytes, read_u32_be};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfEntries {
    /// Offset of the first byte after the last entry
    pub offset: u32,
    pub hash: ObjectId,
}

impl EndOfEntries {
    pub(crate) fn parse(payload: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(payload);
        let offset = read_u32_be(&mut cursor, "end of entries offset")?;
        let hash = ObjectId::from_bytes(read_fixed_bytes::<OBJECT_ID_SIZE>(
            &mut cursor,
            "end of entries hash",
        )?);

        if cursor.remaining() > 0 {
            return Err(DecodeError::malformed(
                "end of entries",
                cursor.position(),
                "payload longer than 24 bytes",
            ));
        }

        Ok(EndOfEntries { offset, hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_offset_and_hash() {
        let hash = ObjectId::hash(b"TREE");
        let mut payload = 4096u32.to_be_bytes().to_vec();
        payload.extend_from_slice(hash.as_bytes());

        assert_eq!(
            EndOfEntries::parse(&payload).unwrap(),
            EndOfEntries { offset: 4096, hash }
        );
        payload.push(0);
        assert!(EndOfEntries::parse(&payload).is_err());
    }
}
