//! Plumbing commands (read-only views of the index)
//!
//! ## Commands
//!
//! - `ls-files`: List the paths in the index, optionally with mode, oid and stage
//! - `show-index`: Print every header and entry field
//! - `verify`: Check the trailing checksum and the encoder's round trip
//! - `extensions`: List extension blocks with a summary of the known ones

pub mod ls_extensions;
pub mod ls_files;
pub mod show_index;
pub mod verify_index;
