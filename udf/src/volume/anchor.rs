//! Anchor Volume Descriptor Pointer probe (ECMA-167 3/8.4.2.1)

use crate::descriptor::volume::AnchorVolumeDescriptorPointer;
use crate::error::{Result, UdfError};
use crate::types::{ANCHOR_SECTOR, ANCHOR_SECTOR_ALT};
use crate::utils::sector::{last_block, read_vec};
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Sectors probed for an anchor, in order
pub fn anchor_candidates(last: u64) -> Vec<u64> {
    let mut candidates = Vec::with_capacity(4);
    candidates.push(ANCHOR_SECTOR);
    if let Some(sector) = last.checked_sub(ANCHOR_SECTOR) {
        candidates.push(sector);
    }
    candidates.push(last);
    candidates.push(ANCHOR_SECTOR_ALT);
    candidates
}

/// Find the first sector holding a valid anchor
///
/// Sectors past the end of the device and sectors without an anchor tag are
/// skipped; a device failure on an in-range sector is returned as-is.
pub fn find_anchor<B: BlockIo>(
    block_io: &mut B,
    media_block_size: u32,
) -> Result<(u64, AnchorVolumeDescriptorPointer)> {
    let last = last_block(block_io)?;

    for sector in anchor_candidates(last) {
        if sector > last {
            continue;
        }

        let data = read_vec(
            block_io,
            sector * u64::from(media_block_size),
            media_block_size as usize,
        )?;
        match AnchorVolumeDescriptorPointer::parse(&data) {
            Ok(anchor) => {
                log::debug!(
                    "udf: anchor at sector {}, main sequence at {} ({} bytes)",
                    sector,
                    anchor.main_vds.location,
                    anchor.main_vds.length
                );
                return Ok((sector, anchor));
            }
            Err(_) => log::trace!("udf: no anchor at sector {}", sector),
        }
    }

    log::warn!("udf: no anchor volume descriptor pointer found");
    Err(UdfError::VolumeCorrupted)
}
