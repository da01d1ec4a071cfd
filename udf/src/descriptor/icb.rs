//! ICB tag (ECMA-167 4/14.6)

use crate::error::Result;
use crate::types::FileType;
use crate::utils::cursor::{u16_at, u32_at, u8_at};
use bitflags::bitflags;

/// How a File Entry records its content (ICB flags bits 0-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationForm {
    /// Short allocation descriptors
    Short,
    /// Long allocation descriptors
    Long,
    /// Extended allocation descriptors
    Extended,
    /// Content stored in the allocation descriptor area itself
    Inline,
    /// Reserved values 4-7
    Reserved(u8),
}

bitflags! {
    /// ICB tag flags above the allocation form bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IcbFlags: u16 {
        /// Directory entries are sorted
        const SORTED = 1 << 3;
        /// Non-relocatable
        const NON_RELOCATABLE = 1 << 4;
        /// Archive
        const ARCHIVE = 1 << 5;
        /// Set-UID
        const SETUID = 1 << 6;
        /// Set-GID
        const SETGID = 1 << 7;
        /// Sticky
        const STICKY = 1 << 8;
        /// Contiguous
        const CONTIGUOUS = 1 << 9;
        /// System
        const SYSTEM = 1 << 10;
        /// Transformed
        const TRANSFORMED = 1 << 11;
        /// Multi-version
        const MULTI_VERSIONS = 1 << 12;
        /// Stream
        const STREAM = 1 << 13;
    }
}

/// 20-byte ICB tag embedded in every File Entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcbTag {
    /// Prior recorded number of direct entries
    pub prior_direct_entries: u32,
    /// ICB strategy type (4 or 4096)
    pub strategy_type: u16,
    /// Maximum number of entries
    pub max_entries: u16,
    /// Raw file type
    pub file_type: u8,
    /// Parent ICB logical block
    pub parent_block: u32,
    /// Parent ICB partition reference
    pub parent_partition: u16,
    /// Raw flags
    pub flags: u16,
}

impl IcbTag {
    /// On-disk size
    pub const SIZE: usize = 20;

    /// Parse at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            prior_direct_entries: u32_at(data, offset)?,
            strategy_type: u16_at(data, offset + 4)?,
            max_entries: u16_at(data, offset + 8)?,
            file_type: u8_at(data, offset + 11)?,
            parent_block: u32_at(data, offset + 12)?,
            parent_partition: u16_at(data, offset + 16)?,
            flags: u16_at(data, offset + 18)?,
        })
    }

    /// Content recording form
    pub fn allocation_form(&self) -> AllocationForm {
        match self.flags & 0x7 {
            0 => AllocationForm::Short,
            1 => AllocationForm::Long,
            2 => AllocationForm::Extended,
            3 => AllocationForm::Inline,
            v => AllocationForm::Reserved(v as u8),
        }
    }

    /// Decoded file type
    pub fn file_type(&self) -> FileType {
        FileType::from(self.file_type)
    }

    /// Flags above the allocation form
    pub fn icb_flags(&self) -> IcbFlags {
        IcbFlags::from_bits_retain(self.flags & !0x7)
    }
}
