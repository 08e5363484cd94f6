//! Trailing extension blocks
//!
//! Every block is a 4-byte signature, a 4-byte big-endian payload length and
//! the payload itself. Blocks are always captured losslessly; the ones this
//! crate understands are additionally parsed into typed structures. A block
//! whose payload fails to parse stays `Opaque` rather than failing the
//! whole index.
//!
//! A signature starting with an uppercase letter marks an optional
//! extension that readers may ignore.

pub mod cache_tree;
pub mod end_of_entries;
pub mod resolve_undo;
pub mod split_index;

use crate::artifacts::index::cursor::ByteSource;
use crate::artifacts::index::error::{DecodeError, DecodeResult, EncodeError};
use crate::artifacts::index::primitives::{read_fixed_bytes, read_u32_be};
use crate::artifacts::objects::object::Packable;
use bytes::{BufMut, Bytes, BytesMut};
use cache_tree::CacheTree;
use end_of_entries::EndOfEntries;
use resolve_undo::ResolveUndo;
use split_index::SplitIndex;

/// Signature plus length
pub const EXTENSION_HEADER_SIZE: usize = 8;

pub const KNOWN_EXTENSIONS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "TREE" => "cache tree",
    "REUC" => "resolve undo",
    "link" => "split index",
    "UNTR" => "untracked cache",
    "FSMN" => "file system monitor",
    "EOIE" => "end of index entries",
    "IEOT" => "index entry offset table",
    "sdir" => "sparse directory entries",
};

/// Typed view of an extension payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionData {
    CacheTree(CacheTree),
    ResolveUndo(ResolveUndo),
    SplitIndex(SplitIndex),
    EndOfEntries(EndOfEntries),
    Opaque,
}

impl ExtensionData {
    fn parse(signature: &[u8; 4], payload: &[u8]) -> Self {
        let parsed = match signature {
            b"TREE" => CacheTree::parse(payload).map(ExtensionData::CacheTree),
            b"REUC" => ResolveUndo::parse(payload).map(ExtensionData::ResolveUndo),
            b"link" => SplitIndex::parse(payload).map(ExtensionData::SplitIndex),
            b"EOIE" => EndOfEntries::parse(payload).map(ExtensionData::EndOfEntries),
            _ => return ExtensionData::Opaque,
        };

        parsed.unwrap_or(ExtensionData::Opaque)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBlock {
    pub signature: [u8; 4],
    /// Raw payload, kept even when `data` is typed
    pub payload: Bytes,
    pub data: ExtensionData,
}

impl ExtensionBlock {
    pub fn new(signature: [u8; 4], payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let data = ExtensionData::parse(&signature, &payload);

        ExtensionBlock {
            signature,
            payload,
            data,
        }
    }

    /// Build a block from a typed payload
    pub fn from_typed(signature: [u8; 4], typed: &impl Packable) -> Result<Self, EncodeError> {
        Ok(Self::new(signature, typed.serialize()?))
    }

    pub fn length(&self) -> usize {
        self.payload.len()
    }

    pub fn signature_str(&self) -> String {
        String::from_utf8_lossy(&self.signature).into_owned()
    }

    pub fn is_optional(&self) -> bool {
        self.signature[0].is_ascii_uppercase()
    }

    /// Human name for well-known signatures
    pub fn description(&self) -> Option<&'static str> {
        std::str::from_utf8(&self.signature)
            .ok()
            .and_then(|signature| KNOWN_EXTENSIONS.get(signature).copied())
    }
}

impl Packable for ExtensionBlock {
    fn serialize(&self) -> Result<Bytes, EncodeError> {
        let length = u32::try_from(self.payload.len()).map_err(|_| EncodeError::ExtensionTooLarge {
            signature: self.signature_str(),
            length: self.payload.len(),
        })?;

        let mut out = BytesMut::with_capacity(EXTENSION_HEADER_SIZE + self.payload.len());
        out.put_slice(&self.signature);
        out.put_u32(length);
        out.put_slice(&self.payload);

        Ok(out.freeze())
    }
}

/// Read extension blocks until only the checksum is left
///
/// `source` must already be bounded to exclude the trailing checksum.
pub(crate) fn decode_extensions<'a>(
    source: &mut impl ByteSource<'a>,
) -> DecodeResult<Vec<ExtensionBlock>> {
    let mut blocks = Vec::new();

    while source.remaining() >= EXTENSION_HEADER_SIZE {
        let signature = read_fixed_bytes::<4>(source, "extension signature")?;
        let length = read_u32_be(source, "extension length")? as usize;
        let payload = source.read_exact(length, "extension payload")?;

        blocks.push(ExtensionBlock::new(signature, Bytes::copy_from_slice(payload)));
    }

    if source.remaining() > 0 {
        return Err(DecodeError::malformed(
            "extension",
            source.position(),
            format!(
                "{} bytes before the checksum are too short for an extension header",
                source.remaining()
            ),
        ));
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::cursor::ByteCursor;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;

    fn block_bytes(signature: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        ExtensionBlock::new(*signature, payload.to_vec())
            .serialize()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn unknown_blocks_are_kept_opaque() {
        let bytes = block_bytes(b"ZZZZ", b"opaque payload");

        let mut cursor = ByteCursor::new(&bytes);
        let blocks = decode_extensions(&mut cursor).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].signature_str(), "ZZZZ");
        assert_eq!(blocks[0].length(), 14);
        assert_eq!(blocks[0].data, ExtensionData::Opaque);
        assert!(blocks[0].is_optional());
        assert_eq!(blocks[0].description(), None);
        assert_eq!(blocks[0].serialize().unwrap().as_ref(), bytes.as_slice());
    }

    #[test]
    fn known_blocks_are_typed_and_keep_payload() {
        let eoie = EndOfEntries::parse(&[0u8; 24]).unwrap();
        let mut bytes = block_bytes(b"EOIE", &[0u8; 24]);
        bytes.extend(block_bytes(b"link", ObjectId::hash(b"base").as_bytes()));

        let mut cursor = ByteCursor::new(&bytes);
        let blocks = decode_extensions(&mut cursor).unwrap();

        assert_eq!(blocks[0].data, ExtensionData::EndOfEntries(eoie));
        assert_eq!(blocks[0].description(), Some("end of index entries"));
        assert!(matches!(blocks[1].data, ExtensionData::SplitIndex(_)));
        assert!(!blocks[1].is_optional());
        assert_eq!(blocks[1].payload.len(), 20);
    }

    #[test]
    fn unparsable_known_block_falls_back_to_opaque() {
        let bytes = block_bytes(b"TREE", b"no terminator here");

        let mut cursor = ByteCursor::new(&bytes);
        let blocks = decode_extensions(&mut cursor).unwrap();
        assert_eq!(blocks[0].data, ExtensionData::Opaque);
        assert_eq!(blocks[0].payload.as_ref(), b"no terminator here");
    }

    #[test]
    fn payload_past_bound_is_truncation() {
        let mut bytes = block_bytes(b"UNTR", b"abcdef");
        bytes.truncate(bytes.len() - 2);

        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            decode_extensions(&mut cursor),
            Err(DecodeError::TruncatedInput { field: "extension payload", needed: 6, available: 4, .. })
        ));
    }

    #[test]
    fn stray_bytes_before_checksum_are_malformed() {
        let mut bytes = block_bytes(b"UNTR", b"");
        bytes.extend_from_slice(b"xyz");

        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            decode_extensions(&mut cursor),
            Err(DecodeError::MalformedField { field: "extension", offset: 8, .. })
        ));
    }

    #[test]
    fn typed_blocks_can_be_built() {
        let tree = CacheTree::parse(b"\0-1 0\n").unwrap();
        let block = ExtensionBlock::from_typed(*b"TREE", &tree).unwrap();

        assert_eq!(block.data, ExtensionData::CacheTree(tree));
        assert_eq!(block.payload.as_ref(), b"\0-1 0\n");
    }
}
