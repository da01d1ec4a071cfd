//! Mount session
//!
//! Tracks open handles. The volume is recognized when the count goes from
//! zero to one and dropped when it returns to zero.

use crate::error::{Result, UdfError};
use crate::types::{Node, Volume};

/// Mounted state shared by all handles of one file system
#[derive(Debug, Default)]
pub struct Session {
    mounted: Option<(Volume, Node)>,
    open_count: usize,
}

impl Session {
    /// No handles open, nothing mounted
    pub const fn new() -> Self {
        Self {
            mounted: None,
            open_count: 0,
        }
    }

    /// Count a new handle; true when this is the first one
    pub fn open(&mut self) -> bool {
        self.open_count += 1;
        self.open_count == 1
    }

    /// Release a handle; true when this was the last one
    ///
    /// The volume is dropped on the last close.
    pub fn close(&mut self) -> bool {
        if self.open_count == 0 {
            return false;
        }
        self.open_count -= 1;
        if self.open_count == 0 {
            self.mounted = None;
            log::debug!("udf: last handle closed, volume released");
            true
        } else {
            false
        }
    }

    /// Install the volume loaded for the first handle
    pub fn install(&mut self, volume: Volume, root: Node) {
        self.mounted = Some((volume, root));
    }

    /// Number of open handles
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Whether a volume is loaded
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Loaded volume
    pub fn volume(&self) -> Result<&Volume> {
        self.mounted
            .as_ref()
            .map(|(volume, _)| volume)
            .ok_or(UdfError::InvalidParameter)
    }

    /// Loaded root directory
    pub fn root(&self) -> Result<&Node> {
        self.mounted
            .as_ref()
            .map(|(_, root)| root)
            .ok_or(UdfError::InvalidParameter)
    }
}
