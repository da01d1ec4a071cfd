//! Descriptor tag checksum and CRC
//!
//! Every ECMA-167 descriptor starts with a 16-byte tag whose byte 4 is the
//! modulo-256 sum of the other fifteen bytes. The tag also carries a
//! CRC-ITU-T over the descriptor body.

/// Byte offset of the checksum inside the tag
pub const TAG_CHECKSUM_OFFSET: usize = 4;

/// Sum of tag bytes 0-15 excluding the checksum byte itself
pub fn tag_checksum(tag: &[u8]) -> u8 {
    tag.iter()
        .take(16)
        .enumerate()
        .filter(|(i, _)| *i != TAG_CHECKSUM_OFFSET)
        .fold(0u8, |sum, (_, b)| sum.wrapping_add(*b))
}

/// Check the stored checksum against the computed one
pub fn verify_tag_checksum(tag: &[u8]) -> bool {
    tag.len() >= 16 && tag[TAG_CHECKSUM_OFFSET] == tag_checksum(tag)
}

/// CRC-ITU-T (polynomial 0x1021, initial value 0) as used by descriptor tags
pub fn crc_itu(data: &[u8]) -> u16 {
    let mut crc = 0u16;

    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }

    crc
}
