//! File Set Descriptor lookup

use crate::descriptor::file_set::FileSetDescriptor;
use crate::descriptor::volume::{LogicalVolumeDescriptor, PartitionDescriptor};
use crate::error::Result;
use crate::extent::{check_partition_number, map_partition_reference, relative_lsn, view_offset};
use crate::types::LOGICAL_SECTOR_SIZE;
use crate::utils::sector::read_vec;
use gpt_disk_io::BlockIo;

/// Read the File Set Descriptor named by the logical volume's contents field
pub fn locate_file_set<B: BlockIo>(
    block_io: &mut B,
    media_block_size: u32,
    origin: u64,
    partition: &PartitionDescriptor,
    logical_volume: &LogicalVolumeDescriptor,
) -> Result<FileSetDescriptor> {
    let location = &logical_volume.file_set_location.location;
    let number = map_partition_reference(&logical_volume.partition_maps, location.partition_reference)?;
    check_partition_number(partition, number)?;

    let lsn = relative_lsn(origin, partition, location.logical_block)?;
    let offset = view_offset(origin, media_block_size, logical_volume.logical_block_size, lsn)?;
    let size = (logical_volume.logical_block_size as usize).max(LOGICAL_SECTOR_SIZE);
    let data = read_vec(block_io, offset, size)?;
    let file_set = FileSetDescriptor::parse(&data)?;

    log::debug!(
        "udf: file set at relative sector {}, root ICB block {}",
        lsn,
        file_set.root_directory_icb.location.logical_block
    );
    Ok(file_set)
}
