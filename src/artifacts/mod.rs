//! Index data structures and algorithms
//!
//! - `index`: the DIRC file format, its decoder and encoder
//! - `objects`: object IDs and the `Packable` serialization trait

pub mod index;
pub mod objects;
