//! Allocation descriptors (ECMA-167 3/7.1, 4/14.14)

use crate::error::Result;
use crate::utils::cursor::{array_at, u16_at, u32_at};

const LENGTH_MASK: u32 = 0x3FFF_FFFF;

/// Extent type stored in the top two bits of an extent length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentFlags {
    /// Recorded and allocated
    Recorded,
    /// Allocated but not recorded
    AllocatedNotRecorded,
    /// Neither recorded nor allocated
    NotAllocated,
    /// Points at the next Allocation Extent Descriptor
    NextExtent,
}

impl ExtentFlags {
    /// Decode from a raw extent length field
    pub fn from_length_field(raw: u32) -> Self {
        match raw >> 30 {
            0 => Self::Recorded,
            1 => Self::AllocatedNotRecorded,
            2 => Self::NotAllocated,
            _ => Self::NextExtent,
        }
    }

    /// Encode into the top bits of a length field
    pub fn to_length_bits(self) -> u32 {
        let bits = match self {
            Self::Recorded => 0,
            Self::AllocatedNotRecorded => 1,
            Self::NotAllocated => 2,
            Self::NextExtent => 3,
        };
        bits << 30
    }
}

/// Extent descriptor used by volume structures (byte length + sector)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtentAd {
    /// Length in bytes
    pub length: u32,
    /// Starting sector
    pub location: u32,
}

impl ExtentAd {
    /// On-disk size
    pub const SIZE: usize = 8;

    /// Parse at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            length: u32_at(data, offset)?,
            location: u32_at(data, offset + 4)?,
        })
    }
}

/// Logical block address: block number within a partition reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LbAddr {
    /// Logical block number
    pub logical_block: u32,
    /// Partition reference number
    pub partition_reference: u16,
}

/// Short allocation descriptor: no partition reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortAd {
    /// Extent length with flags in the top two bits
    pub raw_length: u32,
    /// Logical block within the owning partition
    pub position: u32,
}

impl ShortAd {
    /// On-disk size
    pub const SIZE: usize = 8;

    /// Parse at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            raw_length: u32_at(data, offset)?,
            position: u32_at(data, offset + 4)?,
        })
    }
}

/// Long allocation descriptor: carries its own partition reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongAd {
    /// Extent length with flags in the top two bits
    pub raw_length: u32,
    /// Extent location
    pub location: LbAddr,
    /// Implementation use (UDF stores ADImpUse flags here)
    pub implementation_use: [u8; 6],
}

impl LongAd {
    /// On-disk size
    pub const SIZE: usize = 16;

    /// Parse at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            raw_length: u32_at(data, offset)?,
            location: LbAddr {
                logical_block: u32_at(data, offset + 4)?,
                partition_reference: u16_at(data, offset + 8)?,
            },
            implementation_use: array_at::<6>(data, offset + 10)?,
        })
    }

    /// Extent length in bytes
    pub fn length(&self) -> u32 {
        self.raw_length & LENGTH_MASK
    }

    /// Extent type
    pub fn flags(&self) -> ExtentFlags {
        ExtentFlags::from_length_field(self.raw_length)
    }
}

/// Either form of allocation descriptor found in a File Entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationDescriptor {
    /// Short form, partition inherited from the owning ICB
    Short(ShortAd),
    /// Long form
    Long(LongAd),
}

impl AllocationDescriptor {
    /// Extent length in bytes
    pub fn length(&self) -> u32 {
        self.raw_length() & LENGTH_MASK
    }

    /// Extent type
    pub fn flags(&self) -> ExtentFlags {
        ExtentFlags::from_length_field(self.raw_length())
    }

    /// Logical block number within the partition
    pub fn logical_block(&self) -> u32 {
        match self {
            Self::Short(ad) => ad.position,
            Self::Long(ad) => ad.location.logical_block,
        }
    }

    fn raw_length(&self) -> u32 {
        match self {
            Self::Short(ad) => ad.raw_length,
            Self::Long(ad) => ad.raw_length,
        }
    }
}
