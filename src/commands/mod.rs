//! Command implementations
//!
//! Every command loads the index once, read-only, and prints a view of it
//! through the repository's writer.

pub mod plumbing;
