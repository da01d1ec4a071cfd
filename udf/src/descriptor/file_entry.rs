//! File Entry and Extended File Entry (ECMA-167 4/14.9, 4/14.17)
//!
//! The record is kept as read from disk. The inline-data and
//! allocation-descriptor views are both checked against the record size
//! before a slice is handed out.

use crate::descriptor::ad::LongAd;
use crate::descriptor::icb::{AllocationForm, IcbTag};
use crate::descriptor::tag::expect_one_of;
use crate::error::{Result, UdfError};
use crate::types::{FileType, TagIdentifier};
use crate::utils::cursor::{check_range, u16_at, u32_at, u64_at};
use crate::utils::datetime::Timestamp;
use alloc::boxed::Box;

/// A File Entry or Extended File Entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    record: Box<[u8]>,
    icb: LongAd,
    extended: bool,
    /// ICB tag
    pub icb_tag: IcbTag,
    /// Owner
    pub uid: u32,
    /// Group
    pub gid: u32,
    /// Permission bits
    pub permissions: u32,
    /// Number of FIDs referencing this entry
    pub link_count: u16,
    /// Content length in bytes
    pub information_length: u64,
    /// Logical blocks recorded
    pub logical_blocks_recorded: u64,
    /// Last access
    pub access_time: Timestamp,
    /// Last modification
    pub modification_time: Timestamp,
    /// Creation (Extended File Entry only)
    pub creation_time: Option<Timestamp>,
    /// Last attribute change
    pub attribute_time: Timestamp,
    /// Unique identifier
    pub unique_id: u64,
    ea_length: u32,
    ad_length: u32,
}

impl FileEntry {
    /// Fixed part of a File Entry
    pub const HEADER_SIZE: usize = 176;

    /// Fixed part of an Extended File Entry
    pub const EXTENDED_HEADER_SIZE: usize = 216;

    /// Parse a record read from `icb`
    ///
    /// The tag must be File Entry or Extended File Entry; nothing else in
    /// the record is read before that check.
    pub fn parse(record: Box<[u8]>, icb: LongAd) -> Result<Self> {
        let (_, id) = expect_one_of(
            &record,
            &[TagIdentifier::FileEntry, TagIdentifier::ExtendedFileEntry],
        )?;
        let extended = id == TagIdentifier::ExtendedFileEntry;
        let data = &record[..];

        let (access, modification, creation, attribute, unique, ea, ad) = if extended {
            (80, 92, Some(104), 116, 200, 208, 212)
        } else {
            (72, 84, None, 96, 160, 168, 172)
        };

        let creation_time = match creation {
            Some(offset) => Some(Timestamp::parse(data, offset)?),
            None => None,
        };

        Ok(Self {
            icb_tag: IcbTag::parse(data, 16)?,
            uid: u32_at(data, 36)?,
            gid: u32_at(data, 40)?,
            permissions: u32_at(data, 44)?,
            link_count: u16_at(data, 48)?,
            information_length: u64_at(data, 56)?,
            logical_blocks_recorded: u64_at(data, if extended { 72 } else { 64 })?,
            access_time: Timestamp::parse(data, access)?,
            modification_time: Timestamp::parse(data, modification)?,
            creation_time,
            attribute_time: Timestamp::parse(data, attribute)?,
            unique_id: u64_at(data, unique)?,
            ea_length: u32_at(data, ea)?,
            ad_length: u32_at(data, ad)?,
            record,
            icb,
            extended,
        })
    }

    /// Whether this is an Extended File Entry
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// ICB the record was read from
    pub fn icb(&self) -> &LongAd {
        &self.icb
    }

    /// Raw record bytes
    pub fn record(&self) -> &[u8] {
        &self.record
    }

    /// File type from the ICB tag
    pub fn file_type(&self) -> FileType {
        self.icb_tag.file_type()
    }

    /// Content recording form
    pub fn allocation_form(&self) -> AllocationForm {
        self.icb_tag.allocation_form()
    }

    /// Length of the extended attribute area
    pub fn ea_length(&self) -> u32 {
        self.ea_length
    }

    /// Length of the allocation descriptor area
    pub fn ad_length(&self) -> u32 {
        self.ad_length
    }

    /// Offset of the allocation descriptor area inside the record
    pub fn data_offset(&self) -> u64 {
        let header = if self.extended {
            Self::EXTENDED_HEADER_SIZE
        } else {
            Self::HEADER_SIZE
        };
        header as u64 + u64::from(self.ea_length)
    }

    /// Inline content: `information_length` bytes after the extended attributes
    pub fn inline_data(&self) -> Result<&[u8]> {
        self.view(self.information_length)
    }

    /// Allocation descriptor sequence: `ad_length` bytes after the extended attributes
    pub fn allocation_descriptors(&self) -> Result<&[u8]> {
        self.view(u64::from(self.ad_length))
    }

    fn view(&self, len: u64) -> Result<&[u8]> {
        let offset = self.data_offset();
        check_range(offset, len, self.record.len() as u64).map_err(|e| {
            log::warn!(
                "udf: file entry data ({} + {}) exceeds {}-byte record",
                offset,
                len,
                self.record.len()
            );
            e
        })?;
        let (start, end) = (offset as usize, (offset + len) as usize);
        self.record.get(start..end).ok_or(UdfError::VolumeCorrupted)
    }
}
