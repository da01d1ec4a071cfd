//! Open file and directory handles

use crate::directory::DirectoryCursor;
use crate::types::Node;
use alloc::string::String;

/// Behavior common to both handle kinds
pub trait OpenNode {
    /// The resolved file
    fn node(&self) -> &Node;

    /// Absolute path the handle was opened with; empty for the root
    fn path(&self) -> &str;

    /// Last component of the path
    fn name(&self) -> &str {
        let path = self.path();
        match path.rfind('\\') {
            Some(index) => &path[index + 1..],
            None => path,
        }
    }
}

/// Handle to a regular file (or any non-directory)
#[derive(Debug, Clone)]
pub struct FileHandle {
    pub(crate) node: Node,
    pub(crate) path: String,
    pub(crate) position: u64,
    pub(crate) size: u64,
}

impl FileHandle {
    /// Content size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl OpenNode for FileHandle {
    fn node(&self) -> &Node {
        &self.node
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Handle to a directory
#[derive(Debug, Clone)]
pub struct DirectoryHandle {
    pub(crate) node: Node,
    pub(crate) path: String,
    pub(crate) cursor: DirectoryCursor,
    /// Entries returned since the last rewind
    pub(crate) returned: u64,
    /// End of directory was reported after at least one entry
    pub(crate) exhausted: bool,
}

impl DirectoryHandle {
    /// Restart enumeration from the first entry
    pub(crate) fn rewind(&mut self) {
        self.cursor.reset();
        self.returned = 0;
        self.exhausted = false;
    }
}

impl OpenNode for DirectoryHandle {
    fn node(&self) -> &Node {
        &self.node
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// An open handle
#[derive(Debug)]
pub enum Handle {
    /// File
    File(FileHandle),
    /// Directory
    Directory(DirectoryHandle),
}

impl Handle {
    pub(crate) fn new(node: Node, path: String, size: u64) -> Self {
        if node.is_directory() {
            Self::Directory(DirectoryHandle {
                node,
                path,
                cursor: DirectoryCursor::new(),
                returned: 0,
                exhausted: false,
            })
        } else {
            Self::File(FileHandle {
                node,
                path,
                position: 0,
                size,
            })
        }
    }

    /// Whether this is a directory handle
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    fn inner(&self) -> &dyn OpenNode {
        match self {
            Self::File(file) => file,
            Self::Directory(dir) => dir,
        }
    }
}

impl OpenNode for Handle {
    fn node(&self) -> &Node {
        self.inner().node()
    }

    fn path(&self) -> &str {
        self.inner().path()
    }
}
