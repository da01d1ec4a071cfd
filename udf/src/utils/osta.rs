//! OSTA CS0 compressed Unicode
//!
//! UDF 2.1.1 stores names as a compression identifier byte followed by
//! code units: one byte per unit for identifier 8, two big-endian bytes per
//! unit for identifier 16. The same encoding is used by d-strings such as
//! the logical volume identifier.

use crate::error::{Result, UdfError};
use crate::types::MAX_FILE_NAME_LENGTH;
use alloc::string::String;
use alloc::vec::Vec;

/// Compression identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionId {
    /// One byte per code unit
    Bits8,
    /// Two big-endian bytes per code unit
    Bits16,
}

impl CompressionId {
    /// Decode the identifier byte
    pub fn from_byte(id: u8) -> Result<Self> {
        match id {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            _ => {
                log::warn!("udf: invalid OSTA compression id {}", id);
                Err(UdfError::VolumeCorrupted)
            }
        }
    }

    /// Identifier byte
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
        }
    }
}

/// Iterate over the code units of a compressed body (identifier already removed)
fn units(id: CompressionId, body: &[u8]) -> impl Iterator<Item = u16> + '_ {
    let step = match id {
        CompressionId::Bits8 => 1,
        CompressionId::Bits16 => 2,
    };
    body.chunks(step).map(move |chunk| match (id, chunk) {
        (CompressionId::Bits8, [b, ..]) => u16::from(*b),
        (CompressionId::Bits16, [hi, lo]) => u16::from_be_bytes([*hi, *lo]),
        (CompressionId::Bits16, [hi]) => u16::from(*hi) << 8,
        _ => 0,
    })
}

/// Decompress into `out`, truncating to its capacity
///
/// At most `out.len() - 1` units are stored, followed by a NUL terminator.
/// Returns the number of units stored before the terminator. An empty input
/// decodes to the empty string.
pub fn decompress_into(compressed: &[u8], out: &mut [u16]) -> Result<usize> {
    if out.is_empty() {
        return Err(UdfError::BufferTooSmall);
    }

    let mut written = 0;
    if let Some((&id, body)) = compressed.split_first() {
        let id = CompressionId::from_byte(id)?;
        let capacity = out.len() - 1;
        for unit in units(id, body).take(capacity) {
            out[written] = unit;
            written += 1;
        }
    }

    out[written] = 0;
    Ok(written)
}

/// Decompress a whole identifier into code units
///
/// Fails with [`UdfError::BufferTooSmall`] when the name is longer than
/// `max_units`; nothing is truncated.
pub fn decompress(compressed: &[u8], max_units: usize) -> Result<Vec<u16>> {
    let Some((&id, body)) = compressed.split_first() else {
        return Ok(Vec::new());
    };
    let id = CompressionId::from_byte(id)?;

    let count = match id {
        CompressionId::Bits8 => body.len(),
        CompressionId::Bits16 => body.len().div_ceil(2),
    };
    if count > max_units {
        return Err(UdfError::BufferTooSmall);
    }

    let mut out = Vec::new();
    out.try_reserve_exact(count)?;
    out.extend(units(id, body));
    Ok(out)
}

/// Decode a file identifier to a host string
pub fn decode_file_name(compressed: &[u8]) -> Result<String> {
    let units = decompress(compressed, MAX_FILE_NAME_LENGTH)?;
    Ok(units_to_string(&units))
}

/// Decode a fixed-size d-string field (ECMA-167 1/7.2.12)
///
/// The last byte of the field holds the recorded length including the
/// compression identifier. Decoding stops at the first NUL unit.
pub fn decode_dstring(field: &[u8], capacity: usize) -> Result<String> {
    let Some((&declared, content)) = field.split_last() else {
        return Ok(String::new());
    };
    if content.is_empty() || content[0] == 0 {
        return Ok(String::new());
    }

    let declared = usize::from(declared);
    let recorded = if declared > 0 && declared <= content.len() {
        &content[..declared]
    } else {
        content
    };

    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity.max(1))?;
    buf.resize(capacity.max(1), 0u16);
    let count = decompress_into(recorded, &mut buf)?;
    let end = buf[..count].iter().position(|&u| u == 0).unwrap_or(count);
    Ok(units_to_string(&buf[..end]))
}

/// Convert UTF-16 code units to a string, replacing unpaired surrogates
pub fn units_to_string(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Compress a name, choosing 8-bit units when every unit fits in a byte
pub fn compress(name: &str) -> Vec<u8> {
    if name.encode_utf16().all(|u| u <= 0xFF) {
        compress_with(name, CompressionId::Bits8)
    } else {
        compress_with(name, CompressionId::Bits16)
    }
}

/// Compress a name with an explicit identifier
///
/// Units that do not fit in a byte are truncated under [`CompressionId::Bits8`].
pub fn compress_with(name: &str, id: CompressionId) -> Vec<u8> {
    let mut out = alloc::vec![id.as_byte()];
    for unit in name.encode_utf16() {
        match id {
            CompressionId::Bits8 => out.push(unit as u8),
            CompressionId::Bits16 => out.extend_from_slice(&unit.to_be_bytes()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_both_widths() {
        for name in ["readme.txt", "VIDEO_TS", "caf\u{e9}", "\u{65e5}\u{672c}", ""] {
            for id in [CompressionId::Bits8, CompressionId::Bits16] {
                if id == CompressionId::Bits8 && name.encode_utf16().any(|u| u > 0xFF) {
                    continue;
                }
                let encoded = compress_with(name, id);
                assert_eq!(decode_file_name(&encoded).unwrap(), name);
            }
        }
    }

    #[test]
    fn test_compress_picks_width() {
        assert_eq!(compress("ab"), [8, b'a', b'b']);
        assert_eq!(compress("\u{3042}"), [16, 0x30, 0x42]);
    }

    #[test]
    fn test_sixteen_bit_is_big_endian() {
        let encoded = [16, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_file_name(&encoded).unwrap(), "AB");
    }

    #[test]
    fn test_odd_trailing_byte() {
        let units = decompress(&[16, 0x00, 0x41, 0x42], 10).unwrap();
        assert_eq!(units, [0x0041, 0x4200]);
    }

    #[test]
    fn test_invalid_compression_id() {
        assert_eq!(decode_file_name(&[9, b'a']), Err(UdfError::VolumeCorrupted));
        let mut out = [0u16; 4];
        assert_eq!(decompress_into(&[254, b'a'], &mut out), Err(UdfError::VolumeCorrupted));
    }

    #[test]
    fn test_decompress_into_truncates() {
        let mut out = [0xFFFFu16; 4];
        let n = decompress_into(&[8, b'a', b'b', b'c', b'd', b'e'], &mut out).unwrap();
        assert_eq!(n, 3);
        assert_eq!(out, [b'a' as u16, b'b' as u16, b'c' as u16, 0]);
    }

    #[test]
    fn test_decompress_into_zero_capacity() {
        let mut out: [u16; 0] = [];
        assert_eq!(decompress_into(&[8, b'a'], &mut out), Err(UdfError::BufferTooSmall));
    }

    #[test]
    fn test_strict_decompress_rejects_long_names() {
        let mut long = alloc::vec![8u8];
        long.extend(core::iter::repeat(b'x').take(MAX_FILE_NAME_LENGTH + 1));
        assert_eq!(decode_file_name(&long), Err(UdfError::BufferTooSmall));
        long.pop();
        assert_eq!(decode_file_name(&long).unwrap().len(), MAX_FILE_NAME_LENGTH);
    }

    #[test]
    fn test_decode_dstring() {
        let mut field = [0u8; 128];
        let name = compress("UDF Volume");
        field[..name.len()].copy_from_slice(&name);
        field[127] = name.len() as u8;
        assert_eq!(decode_dstring(&field, 128).unwrap(), "UDF Volume");

        // length byte missing: stop at the first NUL
        field[127] = 0;
        assert_eq!(decode_dstring(&field, 128).unwrap(), "UDF Volume");

        assert_eq!(decode_dstring(&[0u8; 128], 128).unwrap(), "");
        assert_eq!(decode_dstring(&field, 4).unwrap(), "UDF");
    }
}
