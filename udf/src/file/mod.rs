//! File content reads
//!
//! One extent-walking loop serves three modes: size query, full read and
//! seek-and-read. Inline entries are served from the File Entry record.

pub mod entry;
pub mod metadata;
pub mod reader;

pub use entry::read_file_entry;
pub use reader::FileReader;

use crate::descriptor::file_entry::FileEntry;
use crate::descriptor::icb::AllocationForm;
use crate::error::{Result, UdfError};
use crate::extent::{Extent, ExtentWalker};
use crate::types::Volume;
use crate::utils::sector::read_bytes;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// A piece of file content at a known file offset
enum Content<'a> {
    Inline(&'a [u8]),
    Extent(Extent),
}

impl Content<'_> {
    fn len(&self) -> u64 {
        match self {
            Self::Inline(bytes) => bytes.len() as u64,
            Self::Extent(extent) => u64::from(extent.length),
        }
    }

    /// Copy `out.len()` bytes starting `skip` bytes into this piece
    fn copy_to<B: BlockIo>(
        &self,
        block_io: &mut B,
        volume: &Volume,
        skip: u64,
        out: &mut [u8],
    ) -> Result<()> {
        match self {
            Self::Inline(bytes) => {
                let start = skip as usize;
                out.copy_from_slice(&bytes[start..start + out.len()]);
                Ok(())
            }
            Self::Extent(extent) if extent.is_recorded() => {
                let offset = volume
                    .sector_offset(extent.lsn)?
                    .checked_add(skip)
                    .ok_or(UdfError::VolumeCorrupted)?;
                read_bytes(block_io, offset, out)
            }
            Self::Extent(_) => {
                out.fill(0);
                Ok(())
            }
        }
    }
}

enum ReadMode<'b> {
    SizeQuery { total: u64 },
    ReadAll { data: Vec<u8> },
    SeekAndRead { position: u64, buffer: &'b mut [u8], filled: usize },
}

impl ReadMode<'_> {
    /// Consume one piece found at `file_offset`; true once the read is satisfied
    fn accept<B: BlockIo>(
        &mut self,
        block_io: &mut B,
        volume: &Volume,
        file_offset: u64,
        content: &Content<'_>,
    ) -> Result<bool> {
        let len = content.len();
        match self {
            Self::SizeQuery { total } => {
                *total = total.checked_add(len).ok_or(UdfError::VolumeCorrupted)?;
                Ok(false)
            }
            Self::ReadAll { data } => {
                let len = usize::try_from(len).map_err(|_| UdfError::OutOfResources)?;
                data.try_reserve(len)?;
                let start = data.len();
                data.resize(start + len, 0);
                content.copy_to(block_io, volume, 0, &mut data[start..])?;
                Ok(false)
            }
            Self::SeekAndRead {
                position,
                buffer,
                filled,
            } => {
                if *filled == buffer.len() {
                    return Ok(true);
                }
                let target = position.saturating_add(*filled as u64);
                let end = file_offset.saturating_add(len);
                if end <= target {
                    return Ok(false);
                }

                let skip = target - file_offset;
                let available = end - target;
                let wanted = (buffer.len() - *filled) as u64;
                let count = available.min(wanted) as usize;
                content.copy_to(block_io, volume, skip, &mut buffer[*filled..*filled + count])?;
                *filled += count;
                Ok(*filled == buffer.len())
            }
        }
    }
}

fn read_content<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    entry: &FileEntry,
    mode: &mut ReadMode<'_>,
) -> Result<()> {
    match entry.allocation_form() {
        AllocationForm::Inline => {
            let content = Content::Inline(entry.inline_data()?);
            mode.accept(block_io, volume, 0, &content)?;
            Ok(())
        }
        AllocationForm::Short | AllocationForm::Long => {
            let mut walker = ExtentWalker::new(volume, entry)?;
            let mut file_offset = 0u64;
            while let Some(extent) = walker.next_extent(block_io)? {
                let content = Content::Extent(extent);
                if mode.accept(block_io, volume, file_offset, &content)? {
                    break;
                }
                file_offset = file_offset
                    .checked_add(content.len())
                    .ok_or(UdfError::VolumeCorrupted)?;
            }
            Ok(())
        }
        form => {
            log::warn!("udf: cannot read content recorded as {:?}", form);
            Err(UdfError::Unsupported)
        }
    }
}

/// Content size: the inline length, or the sum of all extent lengths
pub fn file_size<B: BlockIo>(block_io: &mut B, volume: &Volume, entry: &FileEntry) -> Result<u64> {
    let mut mode = ReadMode::SizeQuery { total: 0 };
    read_content(block_io, volume, entry, &mut mode)?;
    match mode {
        ReadMode::SizeQuery { total } => Ok(total),
        _ => Err(UdfError::InvalidParameter),
    }
}

/// Read the whole content of `entry` into a new buffer
///
/// # Example
/// ```ignore
/// let file = find_file(&mut block_io, &volume, "\\boot\\vmlinuz")?;
/// let kernel = read_file(&mut block_io, &volume, &file.entry)?;
/// ```
pub fn read_file<B: BlockIo>(block_io: &mut B, volume: &Volume, entry: &FileEntry) -> Result<Vec<u8>> {
    let mut mode = ReadMode::ReadAll { data: Vec::new() };
    read_content(block_io, volume, entry, &mut mode)?;
    match mode {
        ReadMode::ReadAll { data } => Ok(data),
        _ => Err(UdfError::InvalidParameter),
    }
}

/// Read into `buffer` starting at byte `position` of the content
///
/// Returns the number of bytes copied, which is short only when the
/// content ends first.
pub fn read_file_at<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    entry: &FileEntry,
    position: u64,
    buffer: &mut [u8],
) -> Result<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }

    let mut mode = ReadMode::SeekAndRead {
        position,
        buffer,
        filled: 0,
    };
    read_content(block_io, volume, entry, &mut mode)?;
    match mode {
        ReadMode::SeekAndRead { filled, .. } => Ok(filled),
        _ => Err(UdfError::InvalidParameter),
    }
}
