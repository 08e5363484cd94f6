//! Field-level decoders
//!
//! Stateless helpers that pull one field off a `ByteSource`. Integers are
//! big-endian regardless of host byte order.

use crate::artifacts::index::cursor::ByteSource;
use crate::artifacts::index::error::{DecodeError, DecodeResult};
use crate::artifacts::index::options::PaddingMode;
use byteorder::{ByteOrder, NetworkEndian};

pub fn read_u8<'a>(source: &mut impl ByteSource<'a>, field: &'static str) -> DecodeResult<u8> {
    Ok(source.read_exact(1, field)?[0])
}

pub fn read_u16_be<'a>(source: &mut impl ByteSource<'a>, field: &'static str) -> DecodeResult<u16> {
    Ok(NetworkEndian::read_u16(source.read_exact(2, field)?))
}

pub fn read_u32_be<'a>(source: &mut impl ByteSource<'a>, field: &'static str) -> DecodeResult<u32> {
    Ok(NetworkEndian::read_u32(source.read_exact(4, field)?))
}

pub fn read_fixed_bytes<'a, const N: usize>(
    source: &mut impl ByteSource<'a>,
    field: &'static str,
) -> DecodeResult<[u8; N]> {
    let mut block = [0u8; N];
    block.copy_from_slice(source.read_exact(N, field)?);
    Ok(block)
}

/// Read up to and including the next NUL, returning the bytes before it
///
/// The terminator must appear within `max_len` bytes (terminator included),
/// otherwise the field is malformed.
pub fn read_null_terminated<'a>(
    source: &mut impl ByteSource<'a>,
    max_len: usize,
    field: &'static str,
) -> DecodeResult<&'a [u8]> {
    let window = source.peek(max_len);

    match window.iter().position(|&b| b == 0) {
        Some(nul) => {
            let bytes = source.read_exact(nul + 1, field)?;
            Ok(&bytes[..nul])
        }
        None => Err(DecodeError::malformed(
            field,
            source.position(),
            format!("no NUL terminator within {} bytes", window.len()),
        )),
    }
}

/// Number of padding bytes that bring `consumed` up to a multiple of `unit`
pub const fn padding_for(consumed: usize, unit: usize) -> usize {
    (unit - consumed % unit) % unit
}

/// Consume the padding that aligns a record of `consumed` bytes to `unit`
pub fn align_to<'a>(
    source: &mut impl ByteSource<'a>,
    unit: usize,
    consumed: usize,
    mode: PaddingMode,
) -> DecodeResult<usize> {
    let start = source.position();
    let padding = source.read_exact(padding_for(consumed, unit), "padding")?;

    if mode == PaddingMode::Strict {
        if let Some(stray) = padding.iter().position(|&b| b != 0) {
            return Err(DecodeError::malformed(
                "padding",
                start + stray,
                format!("non-NUL padding byte {:#04x}", padding[stray]),
            ));
        }
    }

    Ok(padding.len())
}

/// Read the variable-length "offset" integer used by prefix-compressed paths
///
/// Each byte carries seven bits, most significant group first. A set high bit
/// means another byte follows, and every continuation adds one before the
/// shift so that no value has two encodings.
pub fn read_offset_varint<'a>(
    source: &mut impl ByteSource<'a>,
    field: &'static str,
) -> DecodeResult<u64> {
    let start = source.position();
    let mut byte = read_u8(source, field)?;
    let mut value = u64::from(byte & 0x7f);

    while byte & 0x80 != 0 {
        byte = read_u8(source, field)?;
        value = value
            .checked_add(1)
            .and_then(|v| v.checked_mul(0x80))
            .and_then(|v| v.checked_add(u64::from(byte & 0x7f)))
            .ok_or_else(|| DecodeError::malformed(field, start, "varint overflows 64 bits"))?;
    }

    Ok(value)
}

/// Inverse of `read_offset_varint`
pub fn write_offset_varint(out: &mut Vec<u8>, mut value: u64) {
    let mut buffer = [0u8; 10];
    let mut pos = buffer.len() - 1;
    buffer[pos] = (value & 0x7f) as u8;

    loop {
        value >>= 7;
        if value == 0 {
            break;
        }
        value -= 1;
        pos -= 1;
        buffer[pos] = 0x80 | (value & 0x7f) as u8;
    }

    out.extend_from_slice(&buffer[pos..]);
}
