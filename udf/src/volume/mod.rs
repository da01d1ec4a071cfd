//! Volume recognition
//!
//! Finds the Anchor Volume Descriptor Pointer, walks the Main Volume
//! Descriptor Sequence for the Partition and Logical Volume Descriptors, and
//! reads the File Set Descriptor.

pub mod anchor;
pub mod file_set;
pub mod integrity;
pub mod sequence;

use crate::error::Result;
use crate::types::{Volume, LOGICAL_SECTOR_SIZE};
use crate::utils::sector::media_block_size;
use gpt_disk_io::BlockIo;

/// Mount a UDF volume from a block device
///
/// # Arguments
/// * `block_io` - Block device containing the volume
///
/// # Returns
/// The recognized volume; sector numbers inside it are relative to the
/// Main Volume Descriptor Sequence
pub fn mount<B: BlockIo>(block_io: &mut B) -> Result<Volume> {
    let media_block_size = media_block_size(block_io)?;
    let (_, anchor) = anchor::find_anchor(block_io, media_block_size)?;
    let descriptors = sequence::read_main_sequence(block_io, &anchor, media_block_size)?;

    let origin = u64::from(anchor.main_vds.location);
    let file_set = file_set::locate_file_set(
        block_io,
        media_block_size,
        origin,
        &descriptors.partition,
        &descriptors.logical_volume,
    )?;

    let logical_block_size = descriptors.logical_volume.logical_block_size;
    Ok(Volume {
        media_block_size,
        logical_block_size,
        main_vds_start: origin,
        partition: descriptors.partition,
        logical_volume: descriptors.logical_volume,
        file_set,
        file_entry_size: (logical_block_size as usize).max(LOGICAL_SECTOR_SIZE),
    })
}
