//! Reader and writer for the git staging-area index (`.git/index`)
//!
//! - `artifacts`: the file format itself, decoding and encoding over bytes
//! - `areas`: the index file on disk and the repository that owns it
//! - `commands`: the read-only views the `dirc` binary prints

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use artifacts::index::{
    DecodeError, DecodeOptions, DecodeStage, EncodeError, Index, IndexEntry, PaddingMode,
    Verification, VersionField, decode, decode_with, encode,
};
