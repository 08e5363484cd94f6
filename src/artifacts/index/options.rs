//! Decoder configuration
//!
//! Defaults are strict: null padding is verified and the version field is
//! read as a full 32-bit integer. Callers that only want to inspect damaged
//! or unusual files can relax both.

use crate::artifacts::index::SUPPORTED_VERSIONS;

/// How padding bytes after an entry path are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// Every padding byte must be NUL
    #[default]
    Strict,
    /// Padding bytes are skipped unchecked
    Lenient,
}

/// How the 4-byte version field of the header is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionField {
    /// The whole field is a big-endian integer
    #[default]
    Full,
    /// Only the last byte carries the version, the rest is ignored
    LowByte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub padding: PaddingMode,
    pub version_field: VersionField,
    pub supported_versions: Vec<u32>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            padding: PaddingMode::default(),
            version_field: VersionField::default(),
            supported_versions: SUPPORTED_VERSIONS.to_vec(),
        }
    }
}

impl DecodeOptions {
    pub fn lenient() -> Self {
        DecodeOptions {
            padding: PaddingMode::Lenient,
            ..Default::default()
        }
    }

    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_version_field(mut self, version_field: VersionField) -> Self {
        self.version_field = version_field;
        self
    }

    pub fn with_supported_versions(mut self, versions: impl Into<Vec<u32>>) -> Self {
        self.supported_versions = versions.into();
        self
    }

    pub fn supports(&self, version: u32) -> bool {
        self.supported_versions.contains(&version)
    }
}
