#![allow(dead_code)]

use dirc::artifacts::objects::object_id::ObjectId;
use std::path::{Path, PathBuf};

pub mod command;
pub mod file;

/// One entry, laid out by hand rather than through the crate's encoder
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// ctime, ctime_nsec, mtime, mtime_nsec, dev, ino, mode, uid, gid, size
    pub stat: [u32; 10],
    pub oid: [u8; 20],
    pub flags: u16,
    pub extended_flags: Option<u16>,
    pub path: Vec<u8>,
    /// Byte used for padding after the terminator (v2/v3 only)
    pub padding_byte: u8,
}

impl RawEntry {
    pub fn new(path: &str) -> Self {
        let path = path.as_bytes().to_vec();

        RawEntry {
            stat: [
                1_700_000_000,
                1,
                1_700_000_001,
                2,
                64768,
                4242,
                0o100644,
                1000,
                1000,
                path.len() as u32,
            ],
            oid: *ObjectId::hash(&path).as_bytes(),
            flags: path.len().min(0xfff) as u16,
            extended_flags: None,
            path,
            padding_byte: 0,
        }
    }

    pub fn with_path_bytes(mut self, path: Vec<u8>, flags: u16) -> Self {
        self.path = path;
        self.flags = flags;
        self
    }

    pub fn with_extended_flags(mut self, extended: u16) -> Self {
        self.flags |= 0x4000;
        self.extended_flags = Some(extended);
        self
    }

    pub fn with_padding_byte(mut self, byte: u8) -> Self {
        self.padding_byte = byte;
        self
    }

    fn fixed_part(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for field in self.stat {
            bytes.extend_from_slice(&field.to_be_bytes());
        }
        bytes.extend_from_slice(&self.oid);
        bytes.extend_from_slice(&self.flags.to_be_bytes());
        if let Some(extended) = self.extended_flags {
            bytes.extend_from_slice(&extended.to_be_bytes());
        }
        bytes
    }

    /// Padded v2/v3 layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.fixed_part();
        bytes.extend_from_slice(&self.path);
        bytes.push(0);
        while bytes.len() % 8 != 0 {
            bytes.push(self.padding_byte);
        }
        bytes
    }

    /// v4 layout: `strip` bytes dropped from the previous path, then `suffix`
    pub fn to_compressed_bytes(&self, strip: u8, suffix: &[u8]) -> Vec<u8> {
        let mut bytes = self.fixed_part();
        bytes.push(strip);
        bytes.extend_from_slice(suffix);
        bytes.push(0);
        bytes
    }
}

/// Assembles an index image byte by byte
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    version: u32,
    entry_count: Option<u32>,
    entries: Vec<Vec<u8>>,
    tail: Vec<u8>,
}

impl IndexBuilder {
    pub fn new(version: u32) -> Self {
        IndexBuilder {
            version,
            entry_count: None,
            entries: Vec::new(),
            tail: Vec::new(),
        }
    }

    /// Override the entry count written in the header
    pub fn entry_count(mut self, count: u32) -> Self {
        self.entry_count = Some(count);
        self
    }

    pub fn entry(mut self, entry: &RawEntry) -> Self {
        self.entries.push(entry.to_bytes());
        self
    }

    pub fn raw_entry(mut self, bytes: Vec<u8>) -> Self {
        self.entries.push(bytes);
        self
    }

    pub fn extension(mut self, signature: &[u8; 4], payload: &[u8]) -> Self {
        self.tail.extend_from_slice(signature);
        self.tail
            .extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.tail.extend_from_slice(payload);
        self
    }

    pub fn raw_tail(mut self, bytes: &[u8]) -> Self {
        self.tail.extend_from_slice(bytes);
        self
    }

    /// Everything the checksum covers
    pub fn body(&self) -> Vec<u8> {
        let count = self.entry_count.unwrap_or(self.entries.len() as u32);

        let mut bytes = b"DIRC".to_vec();
        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        for entry in &self.entries {
            bytes.extend_from_slice(entry);
        }
        bytes.extend_from_slice(&self.tail);
        bytes
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = self.body();
        let checksum = ObjectId::hash(&bytes);
        bytes.extend_from_slice(checksum.as_bytes());
        bytes
    }
}

/// Write an index image to `<dir>/.git/index`
pub fn write_index(dir: &Path, bytes: &[u8]) -> PathBuf {
    let git_dir = dir.join(".git");
    std::fs::create_dir_all(&git_dir).expect("Failed to create .git");

    let index_path = git_dir.join("index");
    std::fs::write(&index_path, bytes).expect("Failed to write index");
    index_path
}

// Helper function to create hexdump representation
pub fn to_hexdump(data: &[u8]) -> String {
    let mut result = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        result.push_str(&format!("{:08x}: ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                result.push(' ');
            }
            result.push_str(&format!("{:02x} ", byte));
        }

        for j in chunk.len()..16 {
            if j == 8 {
                result.push(' ');
            }
            result.push_str("   ");
        }

        result.push_str(" |");
        for byte in chunk {
            if byte.is_ascii_graphic() {
                result.push(*byte as char);
            } else {
                result.push('.');
            }
        }

        result.push_str("|\n");
    }
    result
}

// Compare two index images, showing a hexdump diff on failure
#[macro_export]
macro_rules! assert_index_eq {
    ($actual:expr, $expected:expr) => {
        if $actual != $expected {
            pretty_assertions::assert_eq!(
                common::to_hexdump($actual),
                common::to_hexdump($expected),
                "\n=== INDEX CONTENTS DIFFER ===\nactual ({} bytes) vs expected ({} bytes)",
                $actual.len(),
                $expected.len()
            );
        }
    };
}
