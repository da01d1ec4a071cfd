//! Allocation descriptor resolution
//!
//! Maps Short and Long Allocation Descriptors to logical sectors in the
//! relative view (origin at the Main Volume Descriptor Sequence), and reads
//! the Allocation Extent Descriptors that continue a descriptor sequence.

pub mod walker;

pub use walker::{Extent, ExtentWalker};

use crate::descriptor::ad::{AllocationDescriptor, LongAd, ShortAd};
use crate::descriptor::aed::AllocationExtentDescriptor;
use crate::descriptor::volume::{PartitionDescriptor, PartitionMap};
use crate::error::{Result, UdfError};
use crate::types::Volume;
use crate::utils::sector::read_vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Partition number that an allocation descriptor's partition reference names
///
/// The reference indexes the logical volume's partition map table. Volumes
/// recorded without a map table use the reference as the number.
pub fn map_partition_reference(maps: &[PartitionMap], reference: u16) -> Result<u16> {
    if maps.is_empty() {
        return Ok(reference);
    }

    match maps.get(usize::from(reference)) {
        Some(PartitionMap::Type1 {
            partition_number, ..
        }) => Ok(*partition_number),
        Some(PartitionMap::Other { map_type, .. }) => {
            log::warn!("udf: partition map type {} not supported", map_type);
            Err(UdfError::Unsupported)
        }
        None => {
            log::warn!("udf: partition reference {} out of range", reference);
            Err(UdfError::VolumeCorrupted)
        }
    }
}

/// [`map_partition_reference`] against the volume's map table
pub fn partition_number(volume: &Volume, reference: u16) -> Result<u16> {
    map_partition_reference(&volume.logical_volume.partition_maps, reference)
}

/// Check that `number` names the volume's single partition
pub fn check_partition_number(partition: &PartitionDescriptor, number: u16) -> Result<()> {
    if number != partition.number {
        log::warn!(
            "udf: partition {} requested, volume records {}",
            number,
            partition.number
        );
        return Err(UdfError::VolumeCorrupted);
    }
    Ok(())
}

/// Partition Descriptor a partition reference resolves to
pub fn partition_for(volume: &Volume, reference: u16) -> Result<&PartitionDescriptor> {
    let number = partition_number(volume, reference)?;
    check_partition_number(&volume.partition, number)?;
    Ok(&volume.partition)
}

/// Relative sector of logical block `block` of `partition`, for a view whose
/// origin is absolute sector `origin`
pub fn relative_lsn(origin: u64, partition: &PartitionDescriptor, block: u32) -> Result<u64> {
    u64::from(partition.starting_location)
        .checked_sub(origin)
        .and_then(|base| base.checked_add(u64::from(block)))
        .ok_or_else(|| {
            log::warn!(
                "udf: partition start {} precedes descriptor sequence at {}",
                partition.starting_location,
                origin
            );
            UdfError::VolumeCorrupted
        })
}

/// Device byte offset of relative sector `lsn`
pub fn view_offset(origin: u64, media_block_size: u32, logical_block_size: u32, lsn: u64) -> Result<u64> {
    origin
        .checked_mul(u64::from(media_block_size))
        .and_then(|base| {
            lsn.checked_mul(u64::from(logical_block_size))
                .and_then(|bytes| bytes.checked_add(base))
        })
        .ok_or(UdfError::VolumeCorrupted)
}

/// Relative sector of logical block `block` inside `partition`
pub fn partition_block_lsn(volume: &Volume, partition: &PartitionDescriptor, block: u32) -> Result<u64> {
    relative_lsn(volume.main_vds_start, partition, block)
}

/// Relative sector of a Long Allocation Descriptor
pub fn long_ad_lsn(volume: &Volume, ad: &LongAd) -> Result<u64> {
    let partition = partition_for(volume, ad.location.partition_reference)?;
    partition_block_lsn(volume, partition, ad.location.logical_block)
}

/// Relative sector of a Short Allocation Descriptor in `partition`
pub fn short_ad_lsn(volume: &Volume, partition: &PartitionDescriptor, ad: &ShortAd) -> Result<u64> {
    partition_block_lsn(volume, partition, ad.position)
}

/// Resolve any allocation descriptor to a relative sector
///
/// Short descriptors need the partition of the ICB that owns them.
pub fn resolve(
    volume: &Volume,
    partition: Option<&PartitionDescriptor>,
    ad: &AllocationDescriptor,
) -> Result<u64> {
    match ad {
        AllocationDescriptor::Long(long) => long_ad_lsn(volume, long),
        AllocationDescriptor::Short(short) => {
            let partition = partition.ok_or(UdfError::InvalidParameter)?;
            short_ad_lsn(volume, partition, short)
        }
    }
}

/// Read the Allocation Extent Descriptor `ad` points at
///
/// Returns a copy of the descriptor sequence it carries. The declared
/// sequence length is checked against the extent before anything is copied.
pub fn read_next_extent<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    partition: &PartitionDescriptor,
    ad: &AllocationDescriptor,
) -> Result<Vec<u8>> {
    let length = ad.length() as usize;
    if length < AllocationExtentDescriptor::HEADER_SIZE {
        log::warn!("udf: next-extent descriptor of {} bytes", length);
        return Err(UdfError::VolumeCorrupted);
    }

    let lsn = resolve(volume, Some(partition), ad)?;
    let data = read_vec(block_io, volume.sector_offset(lsn)?, length)?;
    let header = AllocationExtentDescriptor::parse(&data)?;
    let descriptors = header.descriptors(&data)?;

    let mut sequence = Vec::new();
    sequence.try_reserve_exact(descriptors.len())?;
    sequence.extend_from_slice(descriptors);

    log::trace!(
        "udf: followed allocation extent at sector {} ({} bytes of descriptors)",
        lsn,
        sequence.len()
    );
    Ok(sequence)
}
