//! Descriptor tag (ECMA-167 3/7.2)

use crate::error::{Result, UdfError};
use crate::types::TagIdentifier;
use crate::utils::checksum::{crc_itu, verify_tag_checksum};
use crate::utils::cursor::{u16_at, u32_at, u8_at};

/// 16-byte tag at the start of every descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorTag {
    /// Tag identifier
    pub identifier: u16,
    /// Descriptor version (2 or 3)
    pub version: u16,
    /// Tag checksum
    pub checksum: u8,
    /// Tag serial number
    pub serial_number: u16,
    /// CRC over the descriptor body
    pub crc: u16,
    /// Number of body bytes covered by the CRC
    pub crc_length: u16,
    /// Logical sector the descriptor claims to be recorded at
    pub location: u32,
}

impl DescriptorTag {
    /// On-disk size
    pub const SIZE: usize = 16;

    /// Parse the tag at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self {
            identifier: u16_at(data, 0)?,
            version: u16_at(data, 2)?,
            checksum: u8_at(data, 4)?,
            serial_number: u16_at(data, 6)?,
            crc: u16_at(data, 8)?,
            crc_length: u16_at(data, 10)?,
            location: u32_at(data, 12)?,
        })
    }

    /// Whether the tag carries `id`
    pub fn is(&self, id: TagIdentifier) -> bool {
        self.identifier == id as u16
    }
}

/// Parse the tag at the start of `data` and require identifier `id`
///
/// Checksum and CRC mismatches are logged but do not fail the read.
pub fn expect_tag(data: &[u8], id: TagIdentifier) -> Result<DescriptorTag> {
    let tag = DescriptorTag::parse(data)?;
    if !tag.is(id) {
        log::warn!(
            "udf: expected tag {} ({:?}), found {}",
            id as u16,
            id,
            tag.identifier
        );
        return Err(UdfError::VolumeCorrupted);
    }

    check_integrity(data, &tag);
    Ok(tag)
}

/// Parse the tag and accept any identifier in `ids`
pub fn expect_one_of(data: &[u8], ids: &[TagIdentifier]) -> Result<(DescriptorTag, TagIdentifier)> {
    let tag = DescriptorTag::parse(data)?;
    match ids.iter().copied().find(|id| tag.is(*id)) {
        Some(id) => {
            check_integrity(data, &tag);
            Ok((tag, id))
        }
        None => {
            log::warn!("udf: unexpected tag identifier {}", tag.identifier);
            Err(UdfError::VolumeCorrupted)
        }
    }
}

fn check_integrity(data: &[u8], tag: &DescriptorTag) {
    if !verify_tag_checksum(data) {
        log::warn!("udf: tag {} checksum mismatch", tag.identifier);
    }

    let body = data
        .get(DescriptorTag::SIZE..DescriptorTag::SIZE + usize::from(tag.crc_length));
    if let Some(body) = body {
        if tag.crc_length != 0 && crc_itu(body) != tag.crc {
            log::trace!("udf: tag {} crc mismatch", tag.identifier);
        }
    }
}
