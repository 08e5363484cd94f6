use crate::artifacts::index::checksum::Verification;
use crate::artifacts::index::error::DecodeError;
use crate::artifacts::index::extensions::cache_tree::CacheTree;
use crate::artifacts::index::extensions::resolve_undo::ResolveUndo;
use crate::artifacts::index::extensions::{ExtensionBlock, ExtensionData};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;

/// Decoded staging area
///
/// Owns the header, the entries in file order, the extension blocks in file
/// order, and the trailer read from disk together with the outcome of
/// checking it.
#[derive(Debug, Clone)]
pub struct Index {
    header: IndexHeader,
    entries: Vec<IndexEntry>,
    extensions: Vec<ExtensionBlock>,
    checksum: ObjectId,
    verification: Verification,
}

impl Index {
    /// Assemble an index to be encoded
    ///
    /// The checksum is unknown until the index is written, so it starts out
    /// null and unchecked.
    pub fn new(version: u32, entries: Vec<IndexEntry>, extensions: Vec<ExtensionBlock>) -> Self {
        let mut header = IndexHeader::empty(version);
        header.entry_count = u32::try_from(entries.len()).unwrap_or(u32::MAX);

        Index {
            header,
            entries,
            extensions,
            checksum: ObjectId::default(),
            verification: Verification::Unchecked,
        }
    }

    pub(crate) fn from_parts(
        header: IndexHeader,
        entries: Vec<IndexEntry>,
        extensions: Vec<ExtensionBlock>,
        checksum: ObjectId,
        verification: Verification,
    ) -> Self {
        Index {
            header,
            entries,
            extensions,
            checksum,
            verification,
        }
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a stage-0 entry by its path
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries
            .iter()
            .find(|entry| entry.stage() == 0 && entry.path() == path)
    }

    /// Entries with a non-zero merge stage
    pub fn conflicts(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter().filter(|entry| entry.stage() != 0)
    }

    pub fn extensions(&self) -> &[ExtensionBlock] {
        &self.extensions
    }

    pub fn extension(&self, signature: &[u8; 4]) -> Option<&ExtensionBlock> {
        self.extensions
            .iter()
            .find(|block| &block.signature == signature)
    }

    pub fn cache_tree(&self) -> Option<&CacheTree> {
        self.extensions.iter().find_map(|block| match &block.data {
            ExtensionData::CacheTree(tree) => Some(tree),
            _ => None,
        })
    }

    pub fn resolve_undo(&self) -> Option<&ResolveUndo> {
        self.extensions.iter().find_map(|block| match &block.data {
            ExtensionData::ResolveUndo(undo) => Some(undo),
            _ => None,
        })
    }

    /// Trailer as stored on disk
    pub fn checksum(&self) -> ObjectId {
        self.checksum
    }

    pub fn verification(&self) -> Verification {
        self.verification
    }

    pub fn verified(&self) -> bool {
        self.verification.is_verified()
    }

    /// Turn a checksum mismatch into an error for callers that need a
    /// verified index
    pub fn ensure_verified(&self) -> Result<(), DecodeError> {
        match self.verification {
            Verification::Verified => Ok(()),
            Verification::Mismatch { stored, computed } => {
                Err(DecodeError::ChecksumMismatch { stored, computed })
            }
            Verification::Unchecked => Err(DecodeError::Unchecked),
        }
    }
}

/// Indexes are equal when their content is; the trailer and the outcome of
/// verifying it are not compared.
impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.entries == other.entries
            && self.extensions == other.extensions
    }
}

impl Eq for Index {}
