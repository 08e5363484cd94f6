//! `REUC` extension: stages recorded before a conflict was resolved
//!
//! ```text
//! <path> NUL <mode1> NUL <mode2> NUL <mode3> NUL [<oid> for every non-zero mode]
//! ```
//!
//! Modes are ASCII octal. A zero mode means the stage did not exist.

use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::error::{DecodeError, DecodeResult, EncodeError};
use crate::artifacts::index::primitives::{read_fixed_bytes, read_null_terminated};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, Bytes, BytesMut};
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

const MAX_MODE_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveUndoEntry {
    pub path: PathBuf,
    /// Base, ours and theirs
    pub stages: [Option<(EntryMode, ObjectId)>; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveUndo {
    pub entries: Vec<ResolveUndoEntry>,
}

impl ResolveUndo {
    pub(crate) fn parse(payload: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(payload);
        let mut entries = Vec::new();

        while cursor.remaining() > 0 {
            let bound = cursor.remaining();
            let path = read_null_terminated(&mut cursor, bound, "resolve-undo path")?.to_vec();

            let mut modes = [EntryMode::default(); 3];
            for mode in &mut modes {
                let offset = cursor.position();
                let text = read_null_terminated(&mut cursor, MAX_MODE_WIDTH, "resolve-undo mode")?;
                let text = std::str::from_utf8(text).map_err(|_| {
                    DecodeError::malformed("resolve-undo mode", offset, "not ASCII")
                })?;
                *mode = EntryMode::try_from(text).map_err(|e| {
                    DecodeError::malformed("resolve-undo mode", offset, format!("not an octal mode: {e}"))
                })?;
            }

            let mut stages = [None; 3];
            for (stage, mode) in stages.iter_mut().zip(modes) {
                if mode.as_u32() != 0 {
                    let oid = read_fixed_bytes::<OBJECT_ID_SIZE>(&mut cursor, "resolve-undo oid")?;
                    *stage = Some((mode, ObjectId::from_bytes(oid)));
                }
            }

            entries.push(ResolveUndoEntry {
                path: PathBuf::from(OsString::from_vec(path)),
                stages,
            });
        }

        Ok(ResolveUndo { entries })
    }
}

impl Packable for ResolveUndo {
    fn serialize(&self) -> Result<Bytes, EncodeError> {
        let mut out = BytesMut::new();

        for entry in &self.entries {
            out.put_slice(entry.path.as_os_str().as_bytes());
            out.put_u8(0);
            for stage in &entry.stages {
                let mode = stage.map_or(0, |(mode, _)| mode.as_u32());
                out.put_slice(format!("{mode:o}").as_bytes());
                out.put_u8(0);
            }
            for (_, oid) in entry.stages.iter().flatten() {
                out.put_slice(oid.as_bytes());
            }
        }

        Ok(out.freeze())
    }
}
