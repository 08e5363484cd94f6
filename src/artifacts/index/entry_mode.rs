//! Packed entry mode
//!
//! The 32-bit mode word keeps the object type in bits 15..12 and the unix
//! permission bits in 8..0. Git only ever writes 0644 or 0755 for regular
//! files and 0 for symlinks and gitlinks, but any value read from disk is
//! kept as-is so it can be written back unchanged.

use std::fmt;
use std::num::ParseIntError;

const TYPE_MASK: u32 = 0o170000;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ObjectType {
    Regular,
    Symlink,
    Gitlink,
    Unknown(u32),
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Regular => "file",
            ObjectType::Symlink => "symlink",
            ObjectType::Gitlink => "gitlink",
            ObjectType::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub struct EntryMode(u32);

impl EntryMode {
    pub const REGULAR: EntryMode = EntryMode(0o100644);
    pub const EXECUTABLE: EntryMode = EntryMode(0o100755);
    pub const SYMLINK: EntryMode = EntryMode(0o120000);
    pub const GITLINK: EntryMode = EntryMode(0o160000);

    pub fn object_type(&self) -> ObjectType {
        match self.0 & TYPE_MASK {
            0o100000 => ObjectType::Regular,
            0o120000 => ObjectType::Symlink,
            0o160000 => ObjectType::Gitlink,
            other => ObjectType::Unknown(other >> 12),
        }
    }

    pub fn is_executable(&self) -> bool {
        self.object_type() == ObjectType::Regular && self.0 & 0o111 != 0
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for EntryMode {
    fn from(mode: u32) -> Self {
        EntryMode(mode)
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.0
    }
}

/// Octal rendering, as `ls-files --stage` prints it
impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = ParseIntError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        u32::from_str_radix(value, 8).map(EntryMode)
    }
}
