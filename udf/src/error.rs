//! Error types for UDF operations

use core::fmt;

/// Result type for UDF operations
pub type Result<T> = core::result::Result<T, UdfError>;

/// Errors that can occur during UDF operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdfError {
    /// The block device failed a read
    DeviceError,

    /// On-disk structures are inconsistent (bad tag, length out of bounds,
    /// missing mandatory descriptor)
    VolumeCorrupted,

    /// File or directory not found
    NotFound,

    /// Memory allocation failed
    OutOfResources,

    /// Feature not supported by this implementation
    Unsupported,

    /// Null, empty or self-contradictory argument
    InvalidParameter,

    /// The medium is read-only
    WriteProtected,

    /// Output capacity is too small for the result
    BufferTooSmall,

    /// The file was closed but could not be deleted
    DeleteFailure,
}

impl fmt::Display for UdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceError => write!(f, "Block device read failed"),
            Self::VolumeCorrupted => write!(f, "UDF volume structures are corrupted"),
            Self::NotFound => write!(f, "File or directory not found"),
            Self::OutOfResources => write!(f, "Out of memory"),
            Self::Unsupported => write!(f, "Operation or format feature not supported"),
            Self::InvalidParameter => write!(f, "Invalid parameter"),
            Self::WriteProtected => write!(f, "Medium is write-protected"),
            Self::BufferTooSmall => write!(f, "Buffer too small"),
            Self::DeleteFailure => write!(f, "File closed but not deleted"),
        }
    }
}

impl From<alloc::collections::TryReserveError> for UdfError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        Self::OutOfResources
    }
}
