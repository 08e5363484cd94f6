use crate::artifacts::index::cursor::ByteSource;
use crate::artifacts::index::error::{DecodeError, DecodeResult, EncodeError};
use crate::artifacts::index::options::{DecodeOptions, VersionField};
use crate::artifacts::index::{ENTRY_MIN_SIZE, HEADER_SIZE, SIGNATURE, SUPPORTED_VERSIONS};
use crate::artifacts::objects::object::Packable;
use byteorder::ByteOrder;
use bytes::{BufMut, Bytes, BytesMut};
use derive_new::new;

/// Fixed 12-byte index header
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entry_count: u32,
}

impl IndexHeader {
    pub fn empty(version: u32) -> Self {
        IndexHeader::new(*SIGNATURE, version, 0)
    }

    /// Decode the header block
    ///
    /// All 12 bytes are required before anything is interpreted, so a short
    /// input is reported as truncation rather than as a bad signature.
    pub(crate) fn decode<'a>(
        source: &mut impl ByteSource<'a>,
        options: &DecodeOptions,
    ) -> DecodeResult<Self> {
        let bytes = source.read_exact(HEADER_SIZE, "header")?;

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&bytes[0..4]);
        if &signature != SIGNATURE {
            return Err(DecodeError::BadSignature { found: signature });
        }

        let version = match options.version_field {
            VersionField::Full => byteorder::NetworkEndian::read_u32(&bytes[4..8]),
            VersionField::LowByte => u32::from(bytes[7]),
        };
        if !options.supports(version) {
            return Err(DecodeError::UnsupportedVersion { version });
        }

        let entry_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            signature,
            version,
            entry_count,
        })
    }

    /// Reject entry counts that cannot fit in the bytes left for entries
    pub(crate) fn check_plausible(&self, available: usize) -> DecodeResult<()> {
        let minimum = u64::from(self.entry_count) * ENTRY_MIN_SIZE as u64;

        if minimum > available as u64 {
            return Err(DecodeError::MalformedHeader {
                entry_count: self.entry_count,
                minimum,
                available,
            });
        }

        Ok(())
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes, EncodeError> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(EncodeError::UnsupportedVersion(self.version));
        }

        let mut bytes = BytesMut::with_capacity(HEADER_SIZE);
        bytes.put_slice(&self.signature);
        bytes.put_u32(self.version);
        bytes.put_u32(self.entry_count);

        Ok(bytes.freeze())
    }
}
