//! Volume structure descriptors (ECMA-167 part 3)
//!
//! Anchor pointer, Partition Descriptor, Logical Volume Descriptor with its
//! partition maps, and the Logical Volume Integrity Descriptor.

use crate::descriptor::ad::{ExtentAd, LongAd};
use crate::descriptor::tag::{expect_tag, DescriptorTag};
use crate::error::{Result, UdfError};
use crate::types::TagIdentifier;
use crate::utils::cursor::{array_at, check_range, slice_at, u16_at, u32_at, u8_at};
use alloc::vec::Vec;

/// Entity identifier (ECMA-167 1/7.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId {
    /// Flags
    pub flags: u8,
    /// Identifier, NUL padded
    pub identifier: [u8; 23],
    /// Identifier suffix
    pub suffix: [u8; 8],
}

impl EntityId {
    /// On-disk size
    pub const SIZE: usize = 32;

    /// Parse at `offset`
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            flags: u8_at(data, offset)?,
            identifier: array_at::<23>(data, offset + 1)?,
            suffix: array_at::<8>(data, offset + 24)?,
        })
    }

    /// Identifier bytes without NUL padding
    pub fn identifier_bytes(&self) -> &[u8] {
        let end = self
            .identifier
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.identifier.len());
        &self.identifier[..end]
    }
}

/// Anchor Volume Descriptor Pointer (ECMA-167 3/10.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorVolumeDescriptorPointer {
    /// Tag
    pub tag: DescriptorTag,
    /// Main Volume Descriptor Sequence extent
    pub main_vds: ExtentAd,
    /// Reserve Volume Descriptor Sequence extent
    pub reserve_vds: ExtentAd,
}

impl AnchorVolumeDescriptorPointer {
    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        let tag = expect_tag(data, TagIdentifier::AnchorVolumePointer)?;
        Ok(Self {
            tag,
            main_vds: ExtentAd::parse(data, 16)?,
            reserve_vds: ExtentAd::parse(data, 24)?,
        })
    }
}

/// Partition Descriptor (ECMA-167 3/10.5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    /// Volume descriptor sequence number
    pub sequence_number: u32,
    /// Partition flags (bit 0: allocated)
    pub flags: u16,
    /// Partition number referenced by partition maps
    pub number: u16,
    /// Partition contents (`+NSR02` / `+NSR03`)
    pub contents: EntityId,
    /// Access type (1 read-only, 2 write-once, 3 rewritable, 4 overwritable)
    pub access_type: u32,
    /// First sector of the partition
    pub starting_location: u32,
    /// Length in sectors
    pub length: u32,
}

impl PartitionDescriptor {
    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        expect_tag(data, TagIdentifier::Partition)?;
        Ok(Self {
            sequence_number: u32_at(data, 16)?,
            flags: u16_at(data, 20)?,
            number: u16_at(data, 22)?,
            contents: EntityId::parse(data, 24)?,
            access_type: u32_at(data, 184)?,
            starting_location: u32_at(data, 188)?,
            length: u32_at(data, 192)?,
        })
    }
}

/// Entry of a Logical Volume Descriptor partition map table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionMap {
    /// Type 1: a physical partition
    Type1 {
        /// Volume sequence number
        volume_sequence_number: u16,
        /// Partition number
        partition_number: u16,
    },
    /// Type 2 (virtual, sparable, metadata) or anything else
    Other {
        /// Map type
        map_type: u8,
        /// Map length
        length: u8,
    },
}

/// Logical Volume Descriptor (ECMA-167 3/10.6)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalVolumeDescriptor {
    /// Volume descriptor sequence number
    pub sequence_number: u32,
    /// Logical volume identifier d-string
    pub identifier: [u8; 128],
    /// Logical block size in bytes
    pub logical_block_size: u32,
    /// Domain identifier (`*OSTA UDF Compliant`)
    pub domain: EntityId,
    /// UDF revision from the domain identifier suffix
    pub udf_revision: u16,
    /// Location of the File Set Descriptor
    pub file_set_location: LongAd,
    /// Bytes of partition map data
    pub map_table_length: u32,
    /// Integrity sequence extent
    pub integrity_sequence: ExtentAd,
    /// Parsed partition maps
    pub partition_maps: Vec<PartitionMap>,
}

impl LogicalVolumeDescriptor {
    /// Offset of the partition map table
    pub const MAPS_OFFSET: usize = 440;

    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        expect_tag(data, TagIdentifier::LogicalVolume)?;

        let domain = EntityId::parse(data, 216)?;
        let map_table_length = u32_at(data, 264)?;
        let map_count = u32_at(data, 268)?;

        Ok(Self {
            sequence_number: u32_at(data, 16)?,
            identifier: array_at::<128>(data, 84)?,
            logical_block_size: u32_at(data, 212)?,
            udf_revision: u16::from_le_bytes([domain.suffix[0], domain.suffix[1]]),
            domain,
            file_set_location: LongAd::parse(data, 248)?,
            map_table_length,
            integrity_sequence: ExtentAd::parse(data, 432)?,
            partition_maps: parse_partition_maps(data, map_table_length, map_count)?,
        })
    }
}

fn parse_partition_maps(data: &[u8], table_length: u32, count: u32) -> Result<Vec<PartitionMap>> {
    let start = LogicalVolumeDescriptor::MAPS_OFFSET;
    check_range(start as u64, u64::from(table_length), data.len() as u64)?;
    let table = slice_at(data, start, table_length as usize)?;

    let mut maps = Vec::new();
    let mut offset = 0usize;
    for _ in 0..count {
        let map_type = u8_at(table, offset)?;
        let length = u8_at(table, offset + 1)?;
        if length < 2 {
            log::warn!("udf: partition map with length {}", length);
            return Err(UdfError::VolumeCorrupted);
        }
        slice_at(table, offset, usize::from(length))?;

        let map = match (map_type, length) {
            (1, 6) => PartitionMap::Type1 {
                volume_sequence_number: u16_at(table, offset + 2)?,
                partition_number: u16_at(table, offset + 4)?,
            },
            _ => PartitionMap::Other { map_type, length },
        };
        maps.try_reserve(1)?;
        maps.push(map);
        offset += usize::from(length);
    }

    Ok(maps)
}

/// Logical Volume Integrity Descriptor (ECMA-167 3/10.10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalVolumeIntegrityDescriptor {
    /// 0 = open, 1 = close
    pub integrity_type: u32,
    /// Next integrity extent
    pub next_extent: ExtentAd,
    /// Free blocks per partition (0xFFFFFFFF = unspecified)
    pub free_space_table: Vec<u32>,
    /// Size in blocks per partition (0xFFFFFFFF = unspecified)
    pub size_table: Vec<u32>,
}

impl LogicalVolumeIntegrityDescriptor {
    /// Table entry meaning "not specified"
    pub const UNSPECIFIED: u32 = 0xFFFF_FFFF;

    /// Parse and check the tag
    pub fn parse(data: &[u8]) -> Result<Self> {
        expect_tag(data, TagIdentifier::LogicalVolumeIntegrity)?;

        let partitions = u32_at(data, 72)?;
        let table_bytes = u64::from(partitions) * 4;
        check_range(80, table_bytes * 2, data.len() as u64)?;

        let read_table = |start: usize| -> Result<Vec<u32>> {
            let mut table = Vec::new();
            table.try_reserve_exact(partitions as usize)?;
            for i in 0..partitions as usize {
                table.push(u32_at(data, start + i * 4)?);
            }
            Ok(table)
        };

        Ok(Self {
            integrity_type: u32_at(data, 28)?,
            next_extent: ExtentAd::parse(data, 32)?,
            free_space_table: read_table(80)?,
            size_table: read_table(80 + table_bytes as usize)?,
        })
    }

    /// Sum of the specified free-space entries, in blocks
    pub fn free_blocks(&self) -> u64 {
        sum_specified(&self.free_space_table)
    }

    /// Sum of the specified size entries, in blocks
    pub fn size_blocks(&self) -> u64 {
        sum_specified(&self.size_table)
    }
}

fn sum_specified(table: &[u32]) -> u64 {
    table
        .iter()
        .filter(|&&v| v != LogicalVolumeIntegrityDescriptor::UNSPECIFIED)
        .map(|&v| u64::from(v))
        .sum()
}
