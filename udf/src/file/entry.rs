//! File Entry reads

use crate::descriptor::ad::LongAd;
use crate::descriptor::file_entry::FileEntry;
use crate::error::Result;
use crate::extent::long_ad_lsn;
use crate::types::Volume;
use crate::utils::sector::read_vec;
use gpt_disk_io::BlockIo;

/// Read the File Entry or Extended File Entry an ICB points at
///
/// One `file_entry_size` record is read; any tag other than the two entry
/// kinds makes the volume corrupted.
pub fn read_file_entry<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    icb: &LongAd,
) -> Result<FileEntry> {
    let lsn = long_ad_lsn(volume, icb)?;
    let record = read_vec(block_io, volume.sector_offset(lsn)?, volume.file_entry_size)?;
    let entry = FileEntry::parse(record.into_boxed_slice(), *icb)?;

    log::trace!(
        "udf: file entry at sector {}: type {:?}, {:?}, {} bytes",
        lsn,
        entry.file_type(),
        entry.allocation_form(),
        entry.information_length
    );
    Ok(entry)
}
