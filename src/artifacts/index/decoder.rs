//! Whole-file decoding
//!
//! The decoder walks the file exactly once:
//!
//! ```text
//! Start -> Header -> Entries(0..entry_count) -> Extensions -> Checksum -> Done
//! ```
//!
//! A failure in any stage aborts the decode with that stage recorded in the
//! error; no partial index is returned. A checksum mismatch is not a
//! failure, it is reported through `Index::verification`.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::cursor::{ByteCursor, ByteSource};
use crate::artifacts::index::error::{DecodeResult, DecodeStage};
use crate::artifacts::index::extensions::{ExtensionBlock, decode_extensions};
use crate::artifacts::index::index_entry::{EntryDecoder, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::options::DecodeOptions;
use crate::artifacts::index::staging_index::Index;

pub struct IndexDecoder<'a, 'o> {
    reader: Checksum<'a>,
    options: &'o DecodeOptions,
}

impl<'a, 'o> IndexDecoder<'a, 'o> {
    pub fn new(bytes: &'a [u8], options: &'o DecodeOptions) -> Self {
        IndexDecoder {
            reader: Checksum::new(ByteCursor::new(bytes)),
            options,
        }
    }

    pub fn decode(mut self) -> DecodeResult<Index> {
        let header = self.decode_header()?;
        let entries = self.decode_entries(&header)?;
        let extensions = self.decode_extensions()?;
        let (checksum, verification) = self
            .reader
            .verify()
            .map_err(|e| e.in_stage(DecodeStage::Checksum))?;

        Ok(Index::from_parts(
            header,
            entries,
            extensions,
            checksum,
            verification,
        ))
    }

    fn decode_header(&mut self) -> DecodeResult<IndexHeader> {
        let header = IndexHeader::decode(&mut self.reader, self.options)
            .map_err(|e| e.in_stage(DecodeStage::Header))?;

        self.reader
            .reserve_trailer()
            .map_err(|e| e.in_stage(DecodeStage::Checksum))?;
        header.check_plausible(self.reader.remaining())?;

        Ok(header)
    }

    fn decode_entries(&mut self, header: &IndexHeader) -> DecodeResult<Vec<IndexEntry>> {
        let mut decoder = EntryDecoder::new(header.version, self.options.padding);
        let mut entries = Vec::with_capacity(header.entry_count as usize);

        for index in 0..header.entry_count {
            entries.push(decoder.decode(&mut self.reader, index)?);
        }

        Ok(entries)
    }

    fn decode_extensions(&mut self) -> DecodeResult<Vec<ExtensionBlock>> {
        decode_extensions(&mut self.reader).map_err(|e| e.in_stage(DecodeStage::Extensions))
    }
}

/// Decode an index image with strict default options
pub fn decode(bytes: &[u8]) -> DecodeResult<Index> {
    decode_with(bytes, &DecodeOptions::default())
}

pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> DecodeResult<Index> {
    IndexDecoder::new(bytes, options).decode()
}
