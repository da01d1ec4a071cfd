//! Information records returned by `get_info`

use crate::descriptor::volume::LogicalVolumeIntegrityDescriptor;
use crate::error::Result;
use crate::types::{Node, Volume, VOLUME_LABEL_CAPACITY};
use crate::utils::datetime::Timestamp;
use crate::utils::osta::decode_dstring;
use alloc::string::String;
use bitflags::bitflags;
use gpt_disk_types::{guid, Guid};

/// Information type of [`FileInfo`]
pub const FILE_INFO_ID: Guid = guid!("09576e92-6d3f-11d2-8e39-00a0c969723b");

/// Information type of [`FileSystemInfo`]
pub const FILE_SYSTEM_INFO_ID: Guid = guid!("09576e93-6d3f-11d2-8e39-00a0c969723b");

/// Information type of the volume label
pub const VOLUME_LABEL_ID: Guid = guid!("db47d7d3-fe81-11d3-9a35-0090273fc14d");

bitflags! {
    /// File attributes reported in [`FileInfo`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttributes: u64 {
        /// Read-only
        const READ_ONLY = 0x01;
        /// Hidden
        const HIDDEN = 0x02;
        /// System
        const SYSTEM = 0x04;
        /// Directory
        const DIRECTORY = 0x10;
        /// Archive
        const ARCHIVE = 0x20;
    }
}

/// Generic file information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Content size in bytes
    pub file_size: u64,
    /// Bytes occupied on the medium
    pub physical_size: u64,
    /// Creation time
    pub create_time: Timestamp,
    /// Last access time
    pub last_access_time: Timestamp,
    /// Last modification time
    pub modification_time: Timestamp,
    /// Attributes
    pub attribute: FileAttributes,
    /// File name without path
    pub file_name: String,
}

impl FileInfo {
    /// Build the record for `node`, whose content size is `file_size`
    pub fn new(node: &Node, file_name: String, file_size: u64) -> Self {
        let entry = &node.entry;

        let mut attribute = FileAttributes::READ_ONLY;
        if node.is_directory() {
            attribute |= FileAttributes::DIRECTORY;
        } else {
            attribute |= FileAttributes::ARCHIVE;
        }
        if node.is_hidden() {
            attribute |= FileAttributes::HIDDEN;
        }
        if node.is_system() {
            attribute |= FileAttributes::SYSTEM;
        }

        Self {
            file_size,
            physical_size: file_size,
            create_time: entry.creation_time.unwrap_or(entry.modification_time),
            last_access_time: entry.access_time,
            modification_time: entry.modification_time,
            attribute,
            file_name,
        }
    }
}

/// File system information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemInfo {
    /// Always true
    pub read_only: bool,
    /// Volume size in bytes
    pub volume_size: u64,
    /// Free space in bytes
    pub free_space: u64,
    /// Logical block size
    pub block_size: u32,
    /// Volume label
    pub volume_label: String,
}

impl FileSystemInfo {
    /// Build from the volume and its integrity descriptor
    ///
    /// Without an integrity descriptor the partition length is reported as
    /// the volume size and no space is free.
    pub fn new(volume: &Volume, integrity: Option<&LogicalVolumeIntegrityDescriptor>) -> Result<Self> {
        let block_size = u64::from(volume.logical_block_size);
        let (size_blocks, free_blocks) = match integrity {
            Some(lvid) => (lvid.size_blocks(), lvid.free_blocks()),
            None => (u64::from(volume.partition.length), 0),
        };

        Ok(Self {
            read_only: true,
            volume_size: size_blocks.saturating_mul(block_size),
            free_space: free_blocks.saturating_mul(block_size),
            block_size: volume.logical_block_size,
            volume_label: volume_label(volume)?,
        })
    }
}

/// Decoded logical volume identifier
pub fn volume_label(volume: &Volume) -> Result<String> {
    decode_dstring(&volume.logical_volume.identifier, VOLUME_LABEL_CAPACITY)
}

/// Result of `get_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Info {
    /// For [`FILE_INFO_ID`]
    File(FileInfo),
    /// For [`FILE_SYSTEM_INFO_ID`]
    FileSystem(FileSystemInfo),
    /// For [`VOLUME_LABEL_ID`]
    VolumeLabel(String),
}
