//! Logical Volume Integrity Descriptor lookup

use crate::descriptor::volume::LogicalVolumeIntegrityDescriptor;
use crate::error::{Result, UdfError};
use crate::types::Volume;
use crate::utils::sector::read_vec;
use gpt_disk_io::BlockIo;

/// Read the first integrity descriptor of the logical volume, if recorded
///
/// The integrity extent is addressed in volume sectors; it is mapped into
/// the relative view by subtracting the descriptor sequence start.
pub fn read_integrity<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
) -> Result<Option<LogicalVolumeIntegrityDescriptor>> {
    let extent = volume.logical_volume.integrity_sequence;
    if extent.length == 0 {
        return Ok(None);
    }

    let lsn = u64::from(extent.location)
        .checked_sub(volume.main_vds_start)
        .ok_or(UdfError::VolumeCorrupted)?;
    let len = extent.length.min(volume.logical_block_size) as usize;
    let data = read_vec(block_io, volume.sector_offset(lsn)?, len)?;

    let integrity = LogicalVolumeIntegrityDescriptor::parse(&data)?;
    log::trace!(
        "udf: integrity descriptor: {} free of {} blocks",
        integrity.free_blocks(),
        integrity.size_blocks()
    );
    Ok(Some(integrity))
}
