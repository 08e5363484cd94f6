//! `link` extension: split index pointer
//!
//! Holds the object ID of the shared base index, optionally followed by two
//! EWAH-compressed bitmaps marking base entries that are deleted or replaced.
//! The bitmaps are captured word-for-word; they are not expanded.

use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::error::{DecodeError, DecodeResult};
use crate::artifacts::index::primitives::{read_fixed_bytes, read_u32_be};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ByteOrder, NetworkEndian};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EwahBitmap {
    /// Number of bits the uncompressed bitmap holds
    pub bit_size: u32,
    pub words: Vec<u64>,
    /// Word index of the last run-length word
    pub rlw_position: u32,
}

impl EwahBitmap {
    fn parse(cursor: &mut ByteCursor<'_>, field: &'static str) -> DecodeResult<Self> {
        let bit_size = read_u32_be(cursor, field)?;
        let word_count = read_u32_be(cursor, field)? as usize;

        let byte_len = word_count.checked_mul(8).ok_or_else(|| {
            DecodeError::malformed(field, cursor.position(), "word count overflows")
        })?;
        let words = cursor
            .read_exact(byte_len, field)?
            .chunks_exact(8)
            .map(NetworkEndian::read_u64)
            .collect();
        let rlw_position = read_u32_be(cursor, field)?;

        Ok(EwahBitmap {
            bit_size,
            words,
            rlw_position,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndex {
    pub base_oid: ObjectId,
    pub delete_bitmap: Option<EwahBitmap>,
    pub replace_bitmap: Option<EwahBitmap>,
}

impl SplitIndex {
    pub(crate) fn parse(payload: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(payload);
        let base_oid = ObjectId::from_bytes(read_fixed_bytes::<OBJECT_ID_SIZE>(
            &mut cursor,
            "split index base",
        )?);

        let (delete_bitmap, replace_bitmap) = if cursor.remaining() > 0 {
            let delete = EwahBitmap::parse(&mut cursor, "split index delete bitmap")?;
            let replace = EwahBitmap::parse(&mut cursor, "split index replace bitmap")?;
            (Some(delete), Some(replace))
        } else {
            (None, None)
        };

        if cursor.remaining() > 0 {
            return Err(DecodeError::malformed(
                "split index",
                cursor.position(),
                "trailing bytes after bitmaps",
            ));
        }

        Ok(SplitIndex {
            base_oid,
            delete_bitmap,
            replace_bitmap,
        })
    }
}
