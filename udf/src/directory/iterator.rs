//! Directory iteration
//!
//! A directory's content is read in full on first use and File Identifier
//! Descriptors are decoded from that cached copy one at a time.

use crate::descriptor::fid::FileIdentifierDescriptor;
use crate::descriptor::file_entry::FileEntry;
use crate::error::Result;
use crate::file::read_file;
use crate::types::Volume;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Enumeration state of one directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryCursor {
    data: Option<Vec<u8>>,
    offset: usize,
}

impl DirectoryCursor {
    /// Empty cursor; nothing is read until the first entry is requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached content and restart from the first entry
    pub fn reset(&mut self) {
        self.data = None;
        self.offset = 0;
    }

    /// Byte offset of the next descriptor
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Next descriptor that is not marked deleted
    ///
    /// `Ok(None)` means the directory is exhausted.
    pub fn next_entry<B: BlockIo>(
        &mut self,
        block_io: &mut B,
        volume: &Volume,
        directory: &FileEntry,
    ) -> Result<Option<FileIdentifierDescriptor>> {
        if self.data.is_none() {
            let content = read_file(block_io, volume, directory)?;
            log::trace!("udf: cached {} bytes of directory content", content.len());
            self.data = Some(content);
            self.offset = 0;
        }

        let Some(data) = self.data.as_deref() else {
            return Ok(None);
        };

        while self.offset < data.len() {
            let (fid, length) = FileIdentifierDescriptor::parse(&data[self.offset..])?;
            self.offset += length;

            if fid.is_deleted() {
                log::trace!("udf: skipping deleted entry");
                continue;
            }
            return Ok(Some(fid));
        }

        Ok(None)
    }
}

/// Directory iterator
pub struct DirectoryIterator<'a, B: BlockIo> {
    block_io: &'a mut B,
    volume: &'a Volume,
    directory: &'a FileEntry,
    cursor: DirectoryCursor,
    failed: bool,
}

impl<'a, B: BlockIo> DirectoryIterator<'a, B> {
    /// Create new directory iterator
    pub fn new(block_io: &'a mut B, volume: &'a Volume, directory: &'a FileEntry) -> Self {
        Self {
            block_io,
            volume,
            directory,
            cursor: DirectoryCursor::new(),
            failed: false,
        }
    }
}

impl<'a, B: BlockIo> Iterator for DirectoryIterator<'a, B> {
    type Item = Result<FileIdentifierDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self
            .cursor
            .next_entry(&mut *self.block_io, self.volume, self.directory)
        {
            Ok(Some(fid)) => Some(Ok(fid)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
