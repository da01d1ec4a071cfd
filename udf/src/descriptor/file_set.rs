//! File Set Descriptor (ECMA-167 4/14.1)

use crate::descriptor::ad::LongAd;
use crate::descriptor::tag::expect_tag;
use crate::error::Result;
use crate::types::TagIdentifier;
use crate::utils::cursor::{array_at, u16_at, u32_at};
use crate::utils::datetime::Timestamp;

/// File Set Descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSetDescriptor {
    /// Recording date and time
    pub recording_time: Timestamp,
    /// Interchange level
    pub interchange_level: u16,
    /// File set number
    pub file_set_number: u32,
    /// File set descriptor number
    pub file_set_descriptor_number: u32,
    /// Logical volume identifier d-string
    pub logical_volume_identifier: [u8; 128],
    /// File set identifier d-string
    pub file_set_identifier: [u8; 32],
    /// ICB of the root directory
    pub root_directory_icb: LongAd,
    /// Next extent of File Set Descriptors
    pub next_extent: LongAd,
    /// ICB of the system stream directory (UDF 2.00+)
    pub system_stream_icb: LongAd,
}

impl FileSetDescriptor {
    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        expect_tag(data, TagIdentifier::FileSet)?;
        Ok(Self {
            recording_time: Timestamp::parse(data, 16)?,
            interchange_level: u16_at(data, 28)?,
            file_set_number: u32_at(data, 40)?,
            file_set_descriptor_number: u32_at(data, 44)?,
            logical_volume_identifier: array_at::<128>(data, 112)?,
            file_set_identifier: array_at::<32>(data, 304)?,
            root_directory_icb: LongAd::parse(data, 400)?,
            next_extent: LongAd::parse(data, 448)?,
            system_stream_icb: LongAd::parse(data, 464)?,
        })
    }
}
