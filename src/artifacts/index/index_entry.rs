//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps)
//! - Flags (merge stage, assume-valid, optional extended flags)
//!
//! ## Entry Format
//!
//! ```text
//! 40 bytes  ctime, ctime_nsec, mtime, mtime_nsec, dev, ino, mode, uid, gid, size
//! 20 bytes  object ID
//!  2 bytes  flags
//! [2 bytes  extended flags]
//! v2/v3:    path, NUL, NUL padding up to a multiple of 8 from the entry start
//! v4:       varint count of bytes to drop from the previous path, NUL-terminated suffix
//! ```

use crate::artifacts::index::cursor::ByteSource;
use crate::artifacts::index::entry_flags::{EntryFlags, ExtendedFlags, NAME_LENGTH_SENTINEL};
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::error::{DecodeError, DecodeResult, EncodeError};
use crate::artifacts::index::options::PaddingMode;
use crate::artifacts::index::primitives::{
    align_to, padding_for, read_fixed_bytes, read_null_terminated, read_offset_varint,
    read_u8, read_u16_be, read_u32_be, write_offset_varint,
};
use crate::artifacts::index::{COMPRESSED_PATH_VERSION, ENTRY_BLOCK};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, BytesMut};
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

/// Index entry representing a tracked file
///
/// Contains the file path, content hash, and metadata needed for
/// efficient change detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path relative to repository root, byte-for-byte as stored
    pub name: PathBuf,
    /// SHA-1 hash of file content
    pub oid: ObjectId,
    /// File metadata (mode, size, timestamps)
    pub metadata: EntryMetadata,
    /// Flags word, including the recorded name length
    pub flags: EntryFlags,
    /// Second flags word, present iff `flags` has the extended bit
    pub extended_flags: Option<ExtendedFlags>,
}

impl IndexEntry {
    /// Build a stage-0 entry with the name length filled in
    pub fn new(name: impl Into<PathBuf>, oid: ObjectId, metadata: EntryMetadata) -> Self {
        let name = name.into();
        let flags = EntryFlags::empty().with_name_length(name.as_os_str().len());

        IndexEntry {
            name,
            oid,
            metadata,
            flags,
            extended_flags: None,
        }
    }

    pub fn with_stage(mut self, stage: u8) -> Self {
        self.flags = self.flags.with_stage(stage);
        self
    }

    pub fn with_extended_flags(mut self, extended: ExtendedFlags) -> Self {
        self.flags |= EntryFlags::EXTENDED;
        self.extended_flags = Some(extended);
        self
    }

    pub fn path(&self) -> &Path {
        &self.name
    }

    pub fn path_bytes(&self) -> &[u8] {
        self.name.as_os_str().as_bytes()
    }

    pub fn stage(&self) -> u8 {
        self.flags.stage()
    }

    pub fn is_skip_worktree(&self) -> bool {
        self.extended_flags
            .is_some_and(|flags| flags.contains(ExtendedFlags::SKIP_WORKTREE))
    }

    pub fn is_intent_to_add(&self) -> bool {
        self.extended_flags
            .is_some_and(|flags| flags.contains(ExtendedFlags::INTENT_TO_ADD))
    }

    /// Append the on-disk form of this entry
    ///
    /// `previous` is the path of the preceding entry; only version 4 uses it.
    pub(crate) fn encode(
        &self,
        out: &mut BytesMut,
        version: u32,
        previous: &[u8],
    ) -> Result<(), EncodeError> {
        let path = self.path_bytes();
        if path.contains(&0) {
            return Err(EncodeError::NulInPath(self.name.display().to_string()));
        }

        let start = out.len();
        let metadata = &self.metadata;
        for field in [
            metadata.ctime,
            metadata.ctime_nsec,
            metadata.mtime,
            metadata.mtime_nsec,
            metadata.dev,
            metadata.ino,
            metadata.mode.as_u32(),
            metadata.uid,
            metadata.gid,
            metadata.size,
        ] {
            out.put_u32(field);
        }
        out.put_slice(self.oid.as_bytes());

        let mut flags = self.flags.with_name_length(path.len());
        flags.set(EntryFlags::EXTENDED, self.extended_flags.is_some());
        out.put_u16(flags.bits());
        if let Some(extended) = self.extended_flags {
            out.put_u16(extended.bits());
        }

        if version >= COMPRESSED_PATH_VERSION {
            let common = previous
                .iter()
                .zip(path)
                .take_while(|(a, b)| a == b)
                .count();
            let mut strip = Vec::new();
            write_offset_varint(&mut strip, (previous.len() - common) as u64);
            out.put_slice(&strip);
            out.put_slice(&path[common..]);
            out.put_u8(0);
        } else {
            out.put_slice(path);
            out.put_u8(0);
            out.put_bytes(0, padding_for(out.len() - start, ENTRY_BLOCK));
        }

        Ok(())
    }
}

/// File metadata stored in index entries
///
/// All fields are the raw 32-bit values from disk; git truncates wider stat
/// values when it writes them.
///
/// ## Timestamps
///
/// - `ctime`: File status change time (inode modification)
/// - `mtime`: File content modification time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time (seconds since Unix epoch)
    pub ctime: u32,
    /// Change time nanoseconds
    pub ctime_nsec: u32,
    /// Modification time (seconds since Unix epoch)
    pub mtime: u32,
    /// Modification time nanoseconds
    pub mtime_nsec: u32,
    /// Device ID
    pub dev: u32,
    /// Inode number
    pub ino: u32,
    /// File mode (object type and permissions)
    pub mode: EntryMode,
    /// User ID of owner
    pub uid: u32,
    /// Group ID of owner
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
}

/// Decodes consecutive entries of one index
///
/// Version 4 paths are stored relative to the previous entry's path, so the
/// decoder keeps the last path it produced.
#[derive(Debug)]
pub(crate) struct EntryDecoder {
    version: u32,
    padding: PaddingMode,
    previous: Vec<u8>,
}

impl EntryDecoder {
    pub(crate) fn new(version: u32, padding: PaddingMode) -> Self {
        EntryDecoder {
            version,
            padding,
            previous: Vec::new(),
        }
    }

    /// Decode the entry at position `index`, tagging any failure with it
    pub(crate) fn decode<'a>(
        &mut self,
        source: &mut impl ByteSource<'a>,
        index: u32,
    ) -> DecodeResult<IndexEntry> {
        self.decode_entry(source).map_err(|e| e.in_entry(index))
    }

    fn decode_entry<'a>(&mut self, source: &mut impl ByteSource<'a>) -> DecodeResult<IndexEntry> {
        let start = source.position();

        let metadata = EntryMetadata {
            ctime: read_u32_be(source, "ctime")?,
            ctime_nsec: read_u32_be(source, "ctime nanoseconds")?,
            mtime: read_u32_be(source, "mtime")?,
            mtime_nsec: read_u32_be(source, "mtime nanoseconds")?,
            dev: read_u32_be(source, "dev")?,
            ino: read_u32_be(source, "ino")?,
            mode: read_u32_be(source, "mode")?.into(),
            uid: read_u32_be(source, "uid")?,
            gid: read_u32_be(source, "gid")?,
            size: read_u32_be(source, "size")?,
        };
        let oid = ObjectId::from_bytes(read_fixed_bytes::<OBJECT_ID_SIZE>(source, "oid")?);
        let flags = EntryFlags::from_bits_retain(read_u16_be(source, "flags")?);
        let extended_flags = if flags.is_extended() {
            Some(ExtendedFlags::from_bits_retain(read_u16_be(source, "extended flags")?))
        } else {
            None
        };

        let path = if self.version >= COMPRESSED_PATH_VERSION {
            let path = self.read_compressed_path(source, flags)?;
            self.previous.clone_from(&path);
            path
        } else {
            let path = read_path(source, flags)?;
            let consumed = source.position() - start;
            align_to(source, ENTRY_BLOCK, consumed, self.padding)?;
            path
        };

        Ok(IndexEntry {
            name: PathBuf::from(OsString::from_vec(path)),
            oid,
            metadata,
            flags,
            extended_flags,
        })
    }

    fn read_compressed_path<'a>(
        &self,
        source: &mut impl ByteSource<'a>,
        flags: EntryFlags,
    ) -> DecodeResult<Vec<u8>> {
        let strip_offset = source.position();
        let strip = read_offset_varint(source, "path prefix")?;
        let keep = usize::try_from(strip)
            .ok()
            .and_then(|strip| self.previous.len().checked_sub(strip))
            .ok_or_else(|| {
                DecodeError::malformed(
                    "path prefix",
                    strip_offset,
                    format!(
                        "cannot drop {strip} bytes from a {}-byte previous path",
                        self.previous.len()
                    ),
                )
            })?;

        let suffix_offset = source.position();
        let bound = source.remaining();
        let suffix = read_null_terminated(source, bound, "path")?;

        let mut path = Vec::with_capacity(keep + suffix.len());
        path.extend_from_slice(&self.previous[..keep]);
        path.extend_from_slice(suffix);

        let recorded = flags.name_length();
        if recorded != NAME_LENGTH_SENTINEL && usize::from(recorded) != path.len() {
            return Err(DecodeError::malformed(
                "path",
                suffix_offset,
                format!("name length {recorded} does not match path length {}", path.len()),
            ));
        }

        Ok(path)
    }
}

/// Read an uncompressed path and its NUL terminator
///
/// A recorded length below the sentinel is trusted; the sentinel means the
/// path is at least that long and must be found by scanning.
fn read_path<'a>(source: &mut impl ByteSource<'a>, flags: EntryFlags) -> DecodeResult<Vec<u8>> {
    let length = flags.name_length();

    if length == NAME_LENGTH_SENTINEL {
        let bound = source.remaining();
        let path = read_null_terminated(source, bound, "path")?;
        return Ok(path.to_vec());
    }

    let offset = source.position();
    let path = source.read_exact(usize::from(length), "path")?;
    if let Some(nul) = path.iter().position(|&b| b == 0) {
        return Err(DecodeError::malformed(
            "path",
            offset + nul,
            format!("NUL inside a path of recorded length {length}"),
        ));
    }

    let terminator_offset = source.position();
    let terminator = read_u8(source, "path terminator")?;
    if terminator != 0 {
        return Err(DecodeError::malformed(
            "path terminator",
            terminator_offset,
            format!("expected NUL after {length}-byte path, found {terminator:#04x}"),
        ));
    }

    Ok(path.to_vec())
}
