//! File protocol surface
//!
//! [`UdfFileSystem`] owns the block device and the mount session behind a
//! spin lock. Every operation holds the lock until it completes, so calls
//! never interleave.
//!
//! The volume is read when the first handle opens and released when the
//! last one closes. The medium is read-only: writes, deletes, info updates
//! and flushes are rejected.

pub mod handle;
pub mod info;
pub mod session;

pub use handle::{DirectoryHandle, FileHandle, Handle, OpenNode};
pub use info::{
    FileAttributes, FileInfo, FileSystemInfo, Info, FILE_INFO_ID, FILE_SYSTEM_INFO_ID,
    VOLUME_LABEL_ID,
};
pub use session::Session;

use crate::directory::{find_root_directory, resolve_path, resolve_symlink};
use crate::error::{Result, UdfError};
use crate::file::{file_size, read_file_entry, FileReader};
use crate::types::{Node, Volume, PATH_SEPARATOR};
use crate::utils::path::mangle_file_name;
use crate::volume::integrity::read_integrity;
use crate::volume::mount;
use alloc::string::String;
use bitflags::bitflags;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Guid;
use spin::Mutex;

bitflags! {
    /// Open mode
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenMode: u64 {
        /// Read
        const READ = 0x1;
        /// Write
        const WRITE = 0x2;
        /// Create
        const CREATE = 1 << 63;
    }
}

/// Result of [`UdfFileSystem::read`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes copied from a file; 0 at end of file
    Bytes(usize),
    /// Next directory entry
    Entry(FileInfo),
    /// The directory has no further entries
    EndOfDirectory,
}

struct Inner<B> {
    block_io: B,
    session: Session,
}

/// Read-only UDF file system over a block device
pub struct UdfFileSystem<B: BlockIo> {
    inner: Mutex<Inner<B>>,
}

impl<B: BlockIo> UdfFileSystem<B> {
    /// Wrap a block device; nothing is read until the volume is opened
    pub fn new(block_io: B) -> Self {
        Self {
            inner: Mutex::new(Inner {
                block_io,
                session: Session::new(),
            }),
        }
    }

    /// Give the block device back
    pub fn into_inner(self) -> B {
        self.inner.into_inner().block_io
    }

    /// Number of open handles
    pub fn open_count(&self) -> usize {
        self.inner.lock().session.open_count()
    }

    /// Whether the volume structures are currently loaded
    pub fn is_mounted(&self) -> bool {
        self.inner.lock().session.is_mounted()
    }

    /// Open the root directory
    ///
    /// The first open recognizes the volume; later ones duplicate the
    /// cached root.
    pub fn open_volume(&self) -> Result<Handle> {
        let mut guard = self.inner.lock();
        let Inner { block_io, session } = &mut *guard;

        if session.open() {
            match load(block_io) {
                Ok((volume, root)) => session.install(volume, root),
                Err(e) => {
                    session.close();
                    return Err(e);
                }
            }
        }

        match session.root() {
            Ok(root) => Ok(Handle::new(root.clone(), String::new(), 0)),
            Err(e) => {
                session.close();
                Err(e)
            }
        }
    }

    /// Open `name` relative to `parent`
    ///
    /// Names starting with `\` are absolute. Any mode other than
    /// [`OpenMode::READ`] is write-protected.
    pub fn open(&self, parent: &Handle, name: &str, mode: OpenMode) -> Result<Handle> {
        if mode != OpenMode::READ {
            return Err(UdfError::WriteProtected);
        }

        let path = absolute_path(parent.path(), name);
        if path.is_empty() {
            return Err(UdfError::NotFound);
        }

        let mut guard = self.inner.lock();
        let Inner { block_io, session } = &mut *guard;

        let (node, size) = {
            let volume = session.volume()?;
            let root = session.root()?;
            let node = resolve_path(block_io, volume, Some(root), parent.node(), &path)?;
            let size = if node.is_directory() {
                0
            } else {
                file_size(block_io, volume, &node.entry)?
            };
            (node, size)
        };

        log::trace!("udf: opened {:?}", path);
        session.open();
        Ok(Handle::new(node, path, size))
    }

    /// Read from a file, or the next entry of a directory
    ///
    /// File reads copy at most `buffer.len()` bytes and return 0 at end of
    /// file. Directory reads skip the parent link; once a directory with
    /// entries reports [`ReadOutcome::EndOfDirectory`] it must be rewound
    /// with [`Self::set_position`] before reading again.
    pub fn read(&self, handle: &mut Handle, buffer: &mut [u8]) -> Result<ReadOutcome> {
        let mut guard = self.inner.lock();
        let Inner { block_io, session } = &mut *guard;
        let volume = session.volume()?;

        match handle {
            Handle::File(file) => {
                let mut reader = FileReader::with_position(
                    block_io,
                    volume,
                    &file.node.entry,
                    file.size,
                    file.position,
                );
                let read = reader.read(buffer)?;
                file.position = reader.position();
                Ok(ReadOutcome::Bytes(read))
            }
            Handle::Directory(dir) => read_directory_entry(block_io, volume, dir),
        }
    }

    /// Writing is not supported on any handle
    pub fn write(&self, _handle: &mut Handle, _data: &[u8]) -> Result<usize> {
        Err(UdfError::Unsupported)
    }

    /// Close a handle; the last close releases the volume
    pub fn close(&self, handle: Handle) {
        let mut guard = self.inner.lock();
        guard.session.close();
        drop(handle);
    }

    /// Close a handle; deletion itself always fails
    pub fn delete(&self, handle: Handle) -> Result<()> {
        self.close(handle);
        Err(UdfError::DeleteFailure)
    }

    /// Current byte position of a file
    pub fn get_position(&self, handle: &Handle) -> Result<u64> {
        match handle {
            Handle::File(file) => Ok(file.position),
            Handle::Directory(_) => Err(UdfError::Unsupported),
        }
    }

    /// Move a file's position; `u64::MAX` moves to the end
    ///
    /// Directories only accept 0, which restarts enumeration.
    pub fn set_position(&self, handle: &mut Handle, position: u64) -> Result<()> {
        let _guard = self.inner.lock();
        match handle {
            Handle::File(file) => {
                file.position = if position == u64::MAX {
                    file.size
                } else {
                    position
                };
                Ok(())
            }
            Handle::Directory(dir) if position == 0 => {
                dir.rewind();
                Ok(())
            }
            Handle::Directory(_) => Err(UdfError::Unsupported),
        }
    }

    /// Information of the requested type
    pub fn get_info(&self, handle: &Handle, info_type: &Guid) -> Result<Info> {
        let mut guard = self.inner.lock();
        let Inner { block_io, session } = &mut *guard;
        let volume = session.volume()?;

        if *info_type == FILE_INFO_ID {
            let size = match handle {
                Handle::File(file) => file.size,
                Handle::Directory(dir) => file_size(block_io, volume, &dir.node.entry)?,
            };
            let name = String::from(handle.name());
            Ok(Info::File(FileInfo::new(handle.node(), name, size)))
        } else if *info_type == FILE_SYSTEM_INFO_ID {
            let integrity = read_integrity(block_io, volume)?;
            Ok(Info::FileSystem(FileSystemInfo::new(volume, integrity.as_ref())?))
        } else if *info_type == VOLUME_LABEL_ID {
            Ok(Info::VolumeLabel(info::volume_label(volume)?))
        } else {
            Err(UdfError::Unsupported)
        }
    }

    /// Information cannot be changed on this medium
    pub fn set_info(&self, _handle: &mut Handle, _info_type: &Guid, _info: &Info) -> Result<()> {
        Err(UdfError::WriteProtected)
    }

    /// Nothing to flush on this medium
    pub fn flush(&self, _handle: &mut Handle) -> Result<()> {
        Err(UdfError::WriteProtected)
    }
}

/// Recognize the volume and read its root directory
fn load<B: BlockIo>(block_io: &mut B) -> Result<(Volume, Node)> {
    let volume = mount(block_io)?;
    let root = find_root_directory(block_io, &volume)?;
    log::debug!(
        "udf: volume loaded, block size {}, revision {:#06x}",
        volume.logical_block_size,
        volume.udf_revision()
    );
    Ok((volume, root))
}

/// Join `name` to `parent` unless it is already absolute, then normalize
fn absolute_path(parent: &str, name: &str) -> String {
    let mut path = String::new();
    if !name.starts_with(PATH_SEPARATOR) {
        path.push_str(parent);
        path.push(PATH_SEPARATOR);
    }
    path.push_str(name);
    mangle_file_name(&path)
}

fn read_directory_entry<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    dir: &mut DirectoryHandle,
) -> Result<ReadOutcome> {
    if dir.exhausted {
        return Err(UdfError::DeviceError);
    }

    loop {
        let Some(fid) = dir.cursor.next_entry(block_io, volume, &dir.node.entry)? else {
            // an empty directory keeps reporting its end
            dir.exhausted = dir.returned > 0;
            return Ok(ReadOutcome::EndOfDirectory);
        };
        if fid.is_parent() {
            continue;
        }

        let name = fid.name()?;
        let entry = read_file_entry(block_io, volume, &fid.icb)?;
        let mut node = Node::new(entry, Some(fid));
        if node.is_symlink() {
            node = match resolve_symlink(block_io, volume, &dir.node, &node) {
                Ok(target) => target,
                Err(UdfError::NotFound) => node,
                Err(e) => return Err(e),
            };
        }

        let size = file_size(block_io, volume, &node.entry)?;
        dir.returned += 1;
        return Ok(ReadOutcome::Entry(FileInfo::new(&node, name, size)));
    }
}
