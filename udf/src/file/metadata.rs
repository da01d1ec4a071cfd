//! File metadata helpers

use crate::descriptor::icb::IcbFlags;
use crate::error::Result;
use crate::types::{FileType, Node};
use alloc::string::String;

impl Node {
    /// Name from the directory entry; empty for the root
    pub fn name(&self) -> Result<String> {
        match &self.fid {
            Some(fid) if !fid.is_parent() => fid.name(),
            _ => Ok(String::new()),
        }
    }

    /// Is this a regular file?
    pub fn is_file(&self) -> bool {
        self.file_type() == FileType::Regular
    }

    /// Is this a directory?
    pub fn is_directory(&self) -> bool {
        self.file_type() == FileType::Directory
    }

    /// Is this a symbolic link?
    pub fn is_symlink(&self) -> bool {
        self.file_type() == FileType::Symlink
    }

    /// Is this hidden?
    pub fn is_hidden(&self) -> bool {
        self.fid.as_ref().is_some_and(|fid| fid.is_hidden())
    }

    /// Is this a system file?
    pub fn is_system(&self) -> bool {
        self.entry.icb_tag.icb_flags().contains(IcbFlags::SYSTEM)
    }

    /// Declared content length
    pub fn information_length(&self) -> u64 {
        self.entry.information_length
    }
}
