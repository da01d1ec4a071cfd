//! Byte-granular reads over a block device
//!
//! `BlockIo` reads whole blocks; UDF structures are addressed in logical
//! sectors that may differ from the media block size, so every read goes
//! through [`read_bytes`].

use crate::error::{Result, UdfError};
use alloc::vec::Vec;
use core::fmt::Debug;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Log a device failure and map it to [`UdfError::DeviceError`]
pub fn device_error<E: Debug>(err: E) -> UdfError {
    log::warn!("udf: block device error: {:?}", err);
    UdfError::DeviceError
}

/// Media block size in bytes
pub fn media_block_size<B: BlockIo>(block_io: &B) -> Result<u32> {
    u32::try_from(block_io.block_size().to_u64()).map_err(|_| UdfError::Unsupported)
}

/// Number of the last addressable block
pub fn last_block<B: BlockIo>(block_io: &mut B) -> Result<u64> {
    let blocks = block_io.num_blocks().map_err(device_error)?;
    blocks.checked_sub(1).ok_or(UdfError::DeviceError)
}

/// Number of blocks needed to hold `bytes`
pub fn blocks_for_bytes(bytes: u64, block_size: u32) -> u64 {
    bytes.div_ceil(u64::from(block_size))
}

/// Read `buf.len()` bytes starting at device byte `offset`
///
/// Aligned requests are read straight into `buf`; anything else goes
/// through a bounce buffer covering the touched blocks.
pub fn read_bytes<B: BlockIo>(block_io: &mut B, offset: u64, buf: &mut [u8]) -> Result<()> {
    if buf.is_empty() {
        return Ok(());
    }

    let block_size = u64::from(media_block_size(block_io)?);
    let len = buf.len() as u64;
    let end = offset.checked_add(len).ok_or(UdfError::VolumeCorrupted)?;
    let first = offset / block_size;
    let last = (end - 1) / block_size;
    let skip = (offset % block_size) as usize;

    if skip == 0 && len % block_size == 0 {
        return block_io.read_blocks(Lba(first), buf).map_err(device_error);
    }

    let span = (last - first + 1)
        .checked_mul(block_size)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or(UdfError::OutOfResources)?;

    let mut bounce = Vec::new();
    bounce.try_reserve_exact(span)?;
    bounce.resize(span, 0u8);

    block_io.read_blocks(Lba(first), &mut bounce).map_err(device_error)?;
    buf.copy_from_slice(&bounce[skip..skip + buf.len()]);
    Ok(())
}

/// Read `len` bytes at `offset` into a new buffer
pub fn read_vec<B: BlockIo>(block_io: &mut B, offset: u64, len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, 0u8);
    read_bytes(block_io, offset, &mut data)?;
    Ok(data)
}
