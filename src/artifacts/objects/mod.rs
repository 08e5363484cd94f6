//! Object identifiers and serialization traits
//!
//! Every record in the index refers to content by a SHA-1 object ID. The
//! `Packable` trait is implemented by the parts of the index that can be
//! written back to disk.

pub mod object;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_SIZE: usize = 20;
