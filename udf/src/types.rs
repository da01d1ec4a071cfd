//! Common types and constants for UDF

use crate::descriptor::fid::FileIdentifierDescriptor;
use crate::descriptor::file_entry::FileEntry;
use crate::descriptor::file_set::FileSetDescriptor;
use crate::descriptor::volume::{LogicalVolumeDescriptor, PartitionDescriptor};
use crate::error::Result;
use crate::extent::view_offset;

/// Minimum logical sector size (UDF 2.1.5)
pub const LOGICAL_SECTOR_SIZE: usize = 2048;

/// Largest logical block size accepted from a Logical Volume Descriptor
pub const MAX_LOGICAL_BLOCK_SIZE: u32 = 65536;

/// Anchor Volume Descriptor Pointer primary location
pub const ANCHOR_SECTOR: u64 = 256;

/// Anchor probe used on media that only record it at 512
pub const ANCHOR_SECTOR_ALT: u64 = 512;

/// Main Volume Descriptor Sequence extents are at least 16 sectors long
pub const MIN_VDS_SECTORS: u64 = 16;

/// Maximum file name length in UTF-16 code units (excluding terminator)
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// Capacity of the volume label in code units (including terminator)
pub const VOLUME_LABEL_CAPACITY: usize = 128;

/// Upper bound on Allocation Extent Descriptors followed for one file
pub const MAX_INDIRECT_EXTENTS: usize = 4096;

/// UDF revisions this implementation understands (LVD domain suffix)
pub const SUPPORTED_UDF_REVISIONS: [u16; 6] = [0x0102, 0x0150, 0x0200, 0x0201, 0x0250, 0x0260];

/// Path separator used by the file protocol
pub const PATH_SEPARATOR: char = '\\';

/// Descriptor tag identifiers (ECMA-167 3/7.2.1 and 4/7.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TagIdentifier {
    /// Primary Volume Descriptor
    PrimaryVolume = 1,
    /// Anchor Volume Descriptor Pointer
    AnchorVolumePointer = 2,
    /// Volume Descriptor Pointer
    VolumePointer = 3,
    /// Implementation Use Volume Descriptor
    ImplementationUse = 4,
    /// Partition Descriptor
    Partition = 5,
    /// Logical Volume Descriptor
    LogicalVolume = 6,
    /// Unallocated Space Descriptor
    UnallocatedSpace = 7,
    /// Terminating Descriptor
    Terminating = 8,
    /// Logical Volume Integrity Descriptor
    LogicalVolumeIntegrity = 9,
    /// File Set Descriptor
    FileSet = 256,
    /// File Identifier Descriptor
    FileIdentifier = 257,
    /// Allocation Extent Descriptor
    AllocationExtent = 258,
    /// Indirect Entry
    IndirectEntry = 259,
    /// Terminal Entry
    TerminalEntry = 260,
    /// File Entry
    FileEntry = 261,
    /// Extended Attribute Header Descriptor
    ExtendedAttributeHeader = 262,
    /// Unallocated Space Entry
    UnallocatedSpaceEntry = 263,
    /// Space Bitmap Descriptor
    SpaceBitmap = 264,
    /// Partition Integrity Entry
    PartitionIntegrity = 265,
    /// Extended File Entry
    ExtendedFileEntry = 266,
}

/// File type recorded in the ICB tag (ECMA-167 4/14.6.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Directory
    Directory,
    /// Regular file
    Regular,
    /// Block device
    BlockDevice,
    /// Character device
    CharacterDevice,
    /// FIFO
    Fifo,
    /// Socket
    Socket,
    /// Symbolic link
    Symlink,
    /// Stream directory
    StreamDirectory,
    /// Anything else
    Other(u8),
}

impl From<u8> for FileType {
    fn from(value: u8) -> Self {
        match value {
            4 => Self::Directory,
            5 => Self::Regular,
            6 => Self::BlockDevice,
            7 => Self::CharacterDevice,
            9 => Self::Fifo,
            10 => Self::Socket,
            12 => Self::Symlink,
            13 => Self::StreamDirectory,
            v => Self::Other(v),
        }
    }
}

impl From<FileType> for u8 {
    fn from(value: FileType) -> Self {
        match value {
            FileType::Directory => 4,
            FileType::Regular => 5,
            FileType::BlockDevice => 6,
            FileType::CharacterDevice => 7,
            FileType::Fifo => 9,
            FileType::Socket => 10,
            FileType::Symlink => 12,
            FileType::StreamDirectory => 13,
            FileType::Other(v) => v,
        }
    }
}

/// Recognized volume
///
/// Built once per mount by [`crate::volume::mount`]. Sector numbers handed
/// out by the extent layer are relative to `main_vds_start`, the first
/// sector of the Main Volume Descriptor Sequence.
#[derive(Debug, Clone)]
pub struct Volume {
    /// Block size of the underlying device
    pub media_block_size: u32,

    /// Logical block size from the Logical Volume Descriptor
    pub logical_block_size: u32,

    /// Absolute sector of the Main Volume Descriptor Sequence
    pub main_vds_start: u64,

    /// The single Type-1 partition
    pub partition: PartitionDescriptor,

    /// Prevailing Logical Volume Descriptor
    pub logical_volume: LogicalVolumeDescriptor,

    /// File Set Descriptor of the logical volume
    pub file_set: FileSetDescriptor,

    /// Bytes read for every File Entry
    pub file_entry_size: usize,
}

impl Volume {
    /// Byte offset of the relative-view origin on the device
    pub fn origin_offset(&self) -> u64 {
        self.main_vds_start * u64::from(self.media_block_size)
    }

    /// Device byte offset of a relative logical sector
    pub fn sector_offset(&self, lsn: u64) -> Result<u64> {
        view_offset(
            self.main_vds_start,
            self.media_block_size,
            self.logical_block_size,
            lsn,
        )
    }

    /// UDF revision recorded in the logical volume's domain identifier
    pub fn udf_revision(&self) -> u16 {
        self.logical_volume.udf_revision
    }
}

/// A resolved file: its File Entry plus the directory entry that named it
///
/// The synthetic root opened through the protocol carries the root
/// directory's parent-link FID. Cloning deep-copies both records.
#[derive(Debug, Clone)]
pub struct Node {
    /// File Entry or Extended File Entry
    pub entry: FileEntry,

    /// File Identifier Descriptor that led to this entry
    pub fid: Option<FileIdentifierDescriptor>,
}

impl Node {
    /// Pair an entry with its identifier
    pub fn new(entry: FileEntry, fid: Option<FileIdentifierDescriptor>) -> Self {
        Self { entry, fid }
    }

    /// File type from the ICB tag
    pub fn file_type(&self) -> FileType {
        self.entry.file_type()
    }
}
