//! Index file on disk
//!
//! Opening, locking and reading the file lives here so the decoder itself
//! stays a pure function over bytes.
//!
//! ## Locking
//!
//! Reads hold a shared lock and writes an exclusive one on the first byte of
//! the file. The guard is released when it goes out of scope.

use crate::artifacts::index::checksum::Verification;
use crate::artifacts::index::decoder::decode_with;
use crate::artifacts::index::encoder::encode;
use crate::artifacts::index::options::DecodeOptions;
use crate::artifacts::index::staging_index::Index;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct IndexFile {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
}

impl IndexFile {
    pub fn new(path: Box<Path>) -> Self {
        IndexFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file under a shared lock
    pub fn read_bytes(&self) -> anyhow::Result<Bytes> {
        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("cannot open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)
            .with_context(|| format!("cannot lock index file {}", self.path.display()))?;

        let mut buffer = Vec::new();
        lock.deref_mut().read_to_end(&mut buffer)?;

        Ok(Bytes::from(buffer))
    }

    /// Load and decode the index
    ///
    /// A checksum mismatch is logged but not fatal; the caller decides what
    /// an unverified index means for it.
    pub fn load(&self, options: &DecodeOptions) -> anyhow::Result<Index> {
        let bytes = self.read_bytes()?;
        self.decode_bytes(&bytes, options)
    }

    /// Decode bytes previously read from this file
    pub fn decode_bytes(&self, bytes: &[u8], options: &DecodeOptions) -> anyhow::Result<Index> {
        let index = decode_with(bytes, options)
            .with_context(|| format!("cannot decode index file {}", self.path.display()))?;

        log::debug!(
            "loaded {} (version {}, {} entries, {} extensions, {} bytes)",
            self.path.display(),
            index.version(),
            index.len(),
            index.extensions().len(),
            bytes.len()
        );
        if let Verification::Mismatch { stored, computed } = index.verification() {
            log::warn!(
                "checksum mismatch in {}: stored {stored}, computed {computed}",
                self.path.display()
            );
        }

        Ok(index)
    }

    /// Encode the index and replace the file under an exclusive lock
    pub fn store(&self, index: &Index) -> anyhow::Result<()> {
        let bytes = encode(index)
            .with_context(|| format!("cannot encode index for {}", self.path.display()))?;

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("cannot open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)
            .with_context(|| format!("cannot lock index file {}", self.path.display()))?;

        lock.deref_mut().write_all(&bytes)?;
        lock.deref_mut().flush()?;

        log::debug!(
            "stored {} ({} entries, {} bytes)",
            self.path.display(),
            index.len(),
            bytes.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::error::DecodeError;
    use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index_file() -> (TempDir, IndexFile) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = IndexFile::new(dir.path().join("index").into_boxed_path());
        (dir, file)
    }

    #[rstest]
    fn stored_index_loads_back_verified(index_file: (TempDir, IndexFile)) {
        let (_dir, file) = index_file;
        let index = Index::new(
            2,
            vec![IndexEntry::new("a.txt", ObjectId::hash(b"a"), EntryMetadata::default())],
            Vec::new(),
        );

        file.store(&index).unwrap();
        let loaded = file.load(&DecodeOptions::default()).unwrap();

        assert_eq!(loaded, index);
        assert!(loaded.verified());
        assert_eq!(file.read_bytes().unwrap(), encode(&index).unwrap());
    }

    #[rstest]
    fn missing_file_is_an_error(index_file: (TempDir, IndexFile)) {
        let (_dir, file) = index_file;
        let error = file.load(&DecodeOptions::default()).unwrap_err();

        assert!(error.to_string().contains("cannot open index file"));
    }

    #[rstest]
    fn decode_errors_keep_their_type(index_file: (TempDir, IndexFile)) {
        let (_dir, file) = index_file;
        std::fs::write(file.path(), b"DIRX\0\0\0\x02\0\0\0\0").unwrap();

        let error = file.load(&DecodeOptions::default()).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DecodeError>(),
            Some(DecodeError::BadSignature { found }) if found == b"DIRX"
        ));
    }
}
