//! Positioned file reader

use crate::descriptor::file_entry::FileEntry;
use crate::error::{Result, UdfError};
use crate::file::{file_size, read_file_at};
use crate::types::Volume;
use gpt_disk_io::BlockIo;

/// Reads a file's content from a tracked position
pub struct FileReader<'a, B: BlockIo> {
    block_io: &'a mut B,
    volume: &'a Volume,
    entry: &'a FileEntry,
    position: u64,
    size: u64,
}

impl<'a, B: BlockIo> FileReader<'a, B> {
    /// Create a reader at position 0; queries the content size
    pub fn new(block_io: &'a mut B, volume: &'a Volume, entry: &'a FileEntry) -> Result<Self> {
        let size = file_size(&mut *block_io, volume, entry)?;
        Ok(Self::with_position(block_io, volume, entry, size, 0))
    }

    /// Create a reader whose size and position are already known
    pub fn with_position(
        block_io: &'a mut B,
        volume: &'a Volume,
        entry: &'a FileEntry,
        size: u64,
        position: u64,
    ) -> Self {
        Self {
            block_io,
            volume,
            entry,
            position,
            size,
        }
    }

    /// Read bytes from the current position
    ///
    /// Returns 0 at end of file. A position past the end is a device error.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if self.position > self.size {
            return Err(UdfError::DeviceError);
        }
        if self.position == self.size {
            return Ok(0);
        }

        let remaining = self.size - self.position;
        let len = buffer.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let read = read_file_at(
            &mut *self.block_io,
            self.volume,
            self.entry,
            self.position,
            &mut buffer[..len],
        )?;
        self.position += read as u64;
        Ok(read)
    }

    /// Seek to position; `u64::MAX` seeks to the end
    pub fn seek(&mut self, position: u64) {
        self.position = if position == u64::MAX {
            self.size
        } else {
            position
        };
    }

    /// Get current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get file size
    pub fn size(&self) -> u64 {
        self.size
    }
}
