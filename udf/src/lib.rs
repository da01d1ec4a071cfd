//! UDF Filesystem Implementation
//!
//! A `no_std`, read-only implementation of the Universal Disk Format
//! (OSTA UDF on top of ECMA-167) as found on DVD and Blu-ray media.
//!
//! # Overview
//!
//! This crate provides:
//! - Volume recognition (Anchor Volume Descriptor Pointer, Main Volume
//!   Descriptor Sequence, File Set Descriptor)
//! - Allocation descriptor resolution, including indirect extent chains
//! - File content reads in three modes (size query, full read, seek + read)
//! - Directory enumeration over File Identifier Descriptors
//! - Path resolution with symbolic links and `.`/`..` handling
//! - OSTA CS0 compressed name decoding
//! - A file-protocol surface (open/read/close/position/info) with a
//!   mount session that reloads the volume on the first open
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Descriptor layer** - Bounds-checked views over on-disk structures
//! 2. **Volume layer** - Finds the anchor, walks the descriptor sequence
//! 3. **Extent layer** - Maps allocation descriptors to sectors
//! 4. **File layer** - File Entries and content reads
//! 5. **Directory layer** - FID enumeration, path and symlink resolution
//! 6. **Fs layer** - Handles, positions and info records
//!
//! # Usage
//!
//! ```ignore
//! use udf::{mount, find_file, read_file};
//!
//! // Recognize the volume on a block device
//! let volume = mount(&mut block_io)?;
//!
//! // Resolve a path from the root directory
//! let file = find_file(&mut block_io, &volume, "\\VIDEO_TS\\VIDEO_TS.IFO")?;
//!
//! // Read its whole content
//! let data = read_file(&mut block_io, &volume, &file.entry)?;
//! ```
//!
//! # File protocol
//!
//! ```ignore
//! use udf::fs::{OpenMode, ReadOutcome, UdfFileSystem};
//!
//! let fs = UdfFileSystem::new(block_io);
//! let root = fs.open_volume()?;
//! let mut file = fs.open(&root, "boot\\vmlinuz", OpenMode::READ)?;
//! let mut buf = [0u8; 4096];
//! if let ReadOutcome::Bytes(n) = fs.read(&mut file, &mut buf)? {
//!     // use &buf[..n]
//! }
//! fs.close(file);
//! fs.close(root);
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod error;
pub mod types;
pub mod utils;
pub mod descriptor;
pub mod volume;
pub mod extent;
pub mod file;
pub mod directory;
pub mod fs;

pub use error::{UdfError, Result};
pub use types::{FileType, Node, Volume};

// High-level API exports
pub use volume::mount;
pub use directory::find_file;
pub use file::read_file;
pub use fs::UdfFileSystem;
