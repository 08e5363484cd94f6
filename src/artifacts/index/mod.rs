//! Git index file format
//!
//! The index (also called staging area or cache) records, for every tracked
//! path, the object ID of its staged content and the stat data git uses to
//! notice changes in the working tree.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2, 3 or 4 (4 bytes, big-endian)
//!   - Entry count (4 bytes, big-endian)
//!
//! Entries (variable length):
//!   - 62 fixed bytes of stat data, object ID and flags
//!   - optional extended flags (version 3 and later)
//!   - path: padded to 8-byte alignment in v2/v3, prefix-compressed in v4
//!
//! Extensions (variable length):
//!   - 4-byte signature, 4-byte length, payload
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All multi-byte integers are big-endian.

pub mod checksum;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod entry_flags;
pub mod entry_mode;
pub mod error;
pub mod extensions;
pub mod index_entry;
pub mod index_header;
pub mod options;
pub mod primitives;
pub mod staging_index;

pub use checksum::Verification;
pub use decoder::{decode, decode_with};
pub use encoder::encode;
pub use error::{DecodeError, DecodeStage, EncodeError};
pub use index_entry::{EntryMetadata, IndexEntry};
pub use options::{DecodeOptions, PaddingMode, VersionField};
pub use staging_index::Index;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format versions this crate reads and writes
pub const SUPPORTED_VERSIONS: [u32; 3] = [2, 3, 4];

/// First version whose paths are prefix-compressed
pub const COMPRESSED_PATH_VERSION: u32 = 4;

/// v2/v3 entries are padded to a multiple of this many bytes
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible entry: 62 fixed bytes, a one-byte path and its terminator
pub const ENTRY_MIN_SIZE: usize = 64;
