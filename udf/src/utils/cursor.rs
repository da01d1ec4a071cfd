//! Bounds-checked little-endian field access
//!
//! On-disk records are parsed from byte slices whose lengths come from the
//! medium. Every accessor returns [`UdfError::VolumeCorrupted`] instead of
//! panicking when a field runs past the end of the slice.

use crate::error::{Result, UdfError};

/// Borrow `len` bytes at `offset`
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(UdfError::VolumeCorrupted)?;
    data.get(offset..end).ok_or(UdfError::VolumeCorrupted)
}

/// Read a byte
pub fn u8_at(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset).copied().ok_or(UdfError::VolumeCorrupted)
}

/// Read a little-endian u16
pub fn u16_at(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = slice_at(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a little-endian u32
pub fn u32_at(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = slice_at(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a little-endian u64
pub fn u64_at(data: &[u8], offset: usize) -> Result<u64> {
    let bytes = slice_at(data, offset, 8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(raw))
}

/// Copy a fixed-size array at `offset`
pub fn array_at<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    let bytes = slice_at(data, offset, N)?;
    let mut raw = [0u8; N];
    raw.copy_from_slice(bytes);
    Ok(raw)
}

/// Check that `offset + len` stays within `limit`, using 64-bit arithmetic
///
/// Lengths recorded on disk are 32 or 64 bits wide, so the sum is computed
/// without narrowing first.
pub fn check_range(offset: u64, len: u64, limit: u64) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= limit => Ok(()),
        _ => Err(UdfError::VolumeCorrupted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_in_bounds() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(u16_at(&data, 0).unwrap(), 0x1234);
        assert_eq!(u32_at(&data, 0).unwrap(), 0x5678_1234);
        assert_eq!(u64_at(&data, 0).unwrap(), 0x5678_1234);
        assert_eq!(u8_at(&data, 8).unwrap(), 1);
        assert_eq!(array_at::<2>(&data, 2).unwrap(), [0x78, 0x56]);
    }

    #[test]
    fn test_reads_out_of_bounds() {
        let data = [0u8; 4];
        assert_eq!(u32_at(&data, 1), Err(UdfError::VolumeCorrupted));
        assert_eq!(u8_at(&data, 4), Err(UdfError::VolumeCorrupted));
        assert_eq!(slice_at(&data, usize::MAX, 2), Err(UdfError::VolumeCorrupted));
    }

    #[test]
    fn test_check_range_overflow() {
        assert!(check_range(10, 20, 30).is_ok());
        assert_eq!(check_range(10, 21, 30), Err(UdfError::VolumeCorrupted));
        assert_eq!(check_range(u64::MAX, 1, u64::MAX), Err(UdfError::VolumeCorrupted));
    }
}
