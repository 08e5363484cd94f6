//! `TREE` extension: cached tree objects
//!
//! Nodes are stored depth-first. Each node is its path component, the number
//! of index entries it covers (or -1 when invalidated), the number of direct
//! subtrees, and the tree's object ID when the node is valid.
//!
//! ```text
//! <component> NUL <entry_count> SP <subtree_count> LF [<20-byte oid>]
//! ```

use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::error::{DecodeError, DecodeResult, EncodeError};
use crate::artifacts::index::primitives::{read_fixed_bytes, read_null_terminated};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{BufMut, Bytes, BytesMut};
use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

/// Longest decimal count accepted, terminator included
const MAX_COUNT_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTreeNode {
    /// Path component, empty for the root
    pub name: PathBuf,
    /// Entries covered by this tree, -1 when the node is invalidated
    pub entry_count: i32,
    pub subtree_count: u32,
    pub oid: Option<ObjectId>,
}

impl CacheTreeNode {
    pub fn is_valid(&self) -> bool {
        self.entry_count >= 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheTree {
    /// Nodes in depth-first order, root first
    pub nodes: Vec<CacheTreeNode>,
}

impl CacheTree {
    pub fn root(&self) -> Option<&CacheTreeNode> {
        self.nodes.first()
    }

    pub(crate) fn parse(payload: &[u8]) -> DecodeResult<Self> {
        let mut cursor = ByteCursor::new(payload);
        let mut nodes = Vec::new();

        while cursor.remaining() > 0 {
            let bound = cursor.remaining();
            let name = read_null_terminated(&mut cursor, bound, "tree path")?.to_vec();
            let entry_count = read_count(&mut cursor, b' ', "tree entry count")?;
            let subtree_count = read_count(&mut cursor, b'\n', "tree subtree count")?;

            let entry_count = i32::try_from(entry_count).map_err(|_| {
                DecodeError::malformed("tree entry count", cursor.position(), "out of range")
            })?;
            let subtree_count = u32::try_from(subtree_count).map_err(|_| {
                DecodeError::malformed("tree subtree count", cursor.position(), "out of range")
            })?;

            let oid = if entry_count >= 0 {
                Some(ObjectId::from_bytes(read_fixed_bytes::<OBJECT_ID_SIZE>(
                    &mut cursor,
                    "tree oid",
                )?))
            } else {
                None
            };

            nodes.push(CacheTreeNode {
                name: PathBuf::from(OsString::from_vec(name)),
                entry_count,
                subtree_count,
                oid,
            });
        }

        Ok(CacheTree { nodes })
    }
}

/// Read an ASCII decimal, possibly negative, ending at `terminator`
fn read_count<'a>(
    cursor: &mut ByteCursor<'a>,
    terminator: u8,
    field: &'static str,
) -> DecodeResult<i64> {
    let offset = cursor.position();
    let window = cursor.peek(MAX_COUNT_WIDTH);
    let end = window
        .iter()
        .position(|&b| b == terminator)
        .ok_or_else(|| DecodeError::malformed(field, offset, "missing terminator"))?;

    let digits = cursor.read_exact(end + 1, field)?;
    std::str::from_utf8(&digits[..end])
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or_else(|| DecodeError::malformed(field, offset, "not a decimal number"))
}

impl Packable for CacheTree {
    fn serialize(&self) -> Result<Bytes, EncodeError> {
        let mut out = BytesMut::new();

        for node in &self.nodes {
            out.put_slice(node.name.as_os_str().as_bytes());
            out.put_u8(0);
            out.put_slice(format!("{} {}\n", node.entry_count, node.subtree_count).as_bytes());
            if let Some(oid) = node.oid.filter(|_| node.is_valid()) {
                out.put_slice(oid.as_bytes());
            }
        }

        Ok(out.freeze())
    }
}
