//! Main Volume Descriptor Sequence walk

use crate::descriptor::tag::DescriptorTag;
use crate::descriptor::volume::{
    AnchorVolumeDescriptorPointer, LogicalVolumeDescriptor, PartitionDescriptor,
};
use crate::error::{Result, UdfError};
use crate::types::{TagIdentifier, MAX_LOGICAL_BLOCK_SIZE, MIN_VDS_SECTORS, SUPPORTED_UDF_REVISIONS};
use crate::utils::sector::read_vec;
use gpt_disk_io::BlockIo;

/// Descriptors captured from the Main Volume Descriptor Sequence
#[derive(Debug, Clone)]
pub struct VolumeDescriptors {
    /// Last Partition Descriptor seen
    pub partition: PartitionDescriptor,
    /// Last Logical Volume Descriptor seen
    pub logical_volume: LogicalVolumeDescriptor,
}

/// Walk the sequence until a Terminating Descriptor or the end of the extent
///
/// Later Partition and Logical Volume Descriptors replace earlier ones.
pub fn read_main_sequence<B: BlockIo>(
    block_io: &mut B,
    anchor: &AnchorVolumeDescriptorPointer,
    media_block_size: u32,
) -> Result<VolumeDescriptors> {
    let start = u64::from(anchor.main_vds.location);
    let sectors = u64::from(anchor.main_vds.length) / u64::from(media_block_size);
    if sectors < MIN_VDS_SECTORS {
        log::warn!("udf: main descriptor sequence is only {} sectors", sectors);
        return Err(UdfError::VolumeCorrupted);
    }

    let mut partition = None;
    let mut logical_volume = None;

    for index in 0..sectors {
        let sector = start + index;
        let data = read_vec(
            block_io,
            sector * u64::from(media_block_size),
            media_block_size as usize,
        )?;
        let tag = DescriptorTag::parse(&data)?;

        if tag.is(TagIdentifier::Partition) {
            let pd = PartitionDescriptor::parse(&data)?;
            log::debug!(
                "udf: partition {} at sector {} ({} sectors)",
                pd.number,
                pd.starting_location,
                pd.length
            );
            partition = Some(pd);
        } else if tag.is(TagIdentifier::LogicalVolume) {
            let lvd = LogicalVolumeDescriptor::parse(&data)?;
            log::debug!(
                "udf: logical volume, block size {}, revision {:#06x}, {} partition maps",
                lvd.logical_block_size,
                lvd.udf_revision,
                lvd.partition_maps.len()
            );
            logical_volume = Some(lvd);
        } else if tag.is(TagIdentifier::Terminating) {
            log::trace!("udf: terminating descriptor at sector {}", sector);
            break;
        } else {
            log::trace!("udf: skipping descriptor {} at sector {}", tag.identifier, sector);
        }
    }

    let (Some(partition), Some(logical_volume)) = (partition, logical_volume) else {
        log::warn!("udf: descriptor sequence lacks a partition or logical volume");
        return Err(UdfError::VolumeCorrupted);
    };

    if !SUPPORTED_UDF_REVISIONS.contains(&logical_volume.udf_revision) {
        log::warn!("udf: UDF revision {:#06x} not supported", logical_volume.udf_revision);
        return Err(UdfError::Unsupported);
    }

    let block_size = logical_volume.logical_block_size;
    if !block_size.is_power_of_two() || block_size < 512 || block_size > MAX_LOGICAL_BLOCK_SIZE {
        log::warn!("udf: invalid logical block size {}", block_size);
        return Err(UdfError::VolumeCorrupted);
    }

    Ok(VolumeDescriptors {
        partition,
        logical_volume,
    })
}
