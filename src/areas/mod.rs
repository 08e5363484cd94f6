//! Repository components
//!
//! - `index`: the index file on disk, read and written under file locks
//! - `repository`: where the index lives, how to decode it, where output goes

pub mod index;
pub mod repository;
