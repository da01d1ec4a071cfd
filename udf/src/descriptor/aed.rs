//! Allocation Extent Descriptor (ECMA-167 4/14.5)
//!
//! Continues an allocation descriptor sequence that did not fit in its
//! File Entry. The descriptors follow the 24-byte header.

use crate::descriptor::tag::expect_tag;
use crate::error::{Result, UdfError};
use crate::types::TagIdentifier;
use crate::utils::cursor::{check_range, u32_at};

/// Allocation Extent Descriptor header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationExtentDescriptor {
    /// Location of the previous AED
    pub previous_location: u32,
    /// Bytes of allocation descriptors following the header
    pub descriptors_length: u32,
}

impl AllocationExtentDescriptor {
    /// Header size
    pub const HEADER_SIZE: usize = 24;

    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        expect_tag(data, TagIdentifier::AllocationExtent)?;
        Ok(Self {
            previous_location: u32_at(data, 16)?,
            descriptors_length: u32_at(data, 20)?,
        })
    }

    /// The descriptor sequence inside `data`
    ///
    /// `data` is the whole extent the AED was read from; the declared
    /// length must fit after the header.
    pub fn descriptors<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        check_range(
            Self::HEADER_SIZE as u64,
            u64::from(self.descriptors_length),
            data.len() as u64,
        )
        .map_err(|e| {
            log::warn!(
                "udf: AED declares {} bytes of descriptors in a {}-byte extent",
                self.descriptors_length,
                data.len()
            );
            e
        })?;
        let end = Self::HEADER_SIZE + self.descriptors_length as usize;
        data.get(Self::HEADER_SIZE..end).ok_or(UdfError::VolumeCorrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::checksum::tag_checksum;

    fn aed(length: u32, extent: usize) -> alloc::vec::Vec<u8> {
        let mut data = alloc::vec![0u8; extent];
        data[0..2].copy_from_slice(&258u16.to_le_bytes());
        data[20..24].copy_from_slice(&length.to_le_bytes());
        data[4] = tag_checksum(&data[..16]);
        data
    }

    #[test]
    fn test_descriptors_in_bounds() {
        let data = aed(16, 64);
        let header = AllocationExtentDescriptor::parse(&data).unwrap();
        assert_eq!(header.descriptors(&data).unwrap().len(), 16);
    }

    #[test]
    fn test_descriptors_exceed_extent() {
        for length in [41u32, 1000, u32::MAX] {
            let data = aed(length, 64);
            let header = AllocationExtentDescriptor::parse(&data).unwrap();
            assert_eq!(header.descriptors(&data), Err(UdfError::VolumeCorrupted));
        }
    }

    #[test]
    fn test_wrong_tag() {
        let mut data = aed(0, 64);
        data[0] = 5;
        assert_eq!(AllocationExtentDescriptor::parse(&data), Err(UdfError::VolumeCorrupted));
    }
}
