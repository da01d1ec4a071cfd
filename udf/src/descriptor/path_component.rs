//! Path Component records of a symbolic link (ECMA-167 4/14.16)

use crate::error::{Result, UdfError};
use crate::utils::cursor::{slice_at, u16_at, u8_at};

/// Component type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// 1: root of a platform-defined hierarchy
    RootHierarchy,
    /// 2: current directory
    CurrentDirectory,
    /// 3: parent of the current directory
    Parent,
    /// 4: the current file
    CurrentFile,
    /// 5: a named object
    Named,
}

impl ComponentType {
    fn from_byte(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::RootHierarchy),
            2 => Ok(Self::CurrentDirectory),
            3 => Ok(Self::Parent),
            4 => Ok(Self::CurrentFile),
            5 => Ok(Self::Named),
            other => {
                log::warn!("udf: invalid path component type {}", other);
                Err(UdfError::VolumeCorrupted)
            }
        }
    }
}

/// One path component, borrowing its identifier from the symlink data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathComponent<'a> {
    /// Component type
    pub kind: ComponentType,
    /// Component file version
    pub version: u16,
    /// Compressed identifier (named components only)
    pub identifier: &'a [u8],
}

impl<'a> PathComponent<'a> {
    /// Fixed part
    pub const HEADER_SIZE: usize = 4;

    /// Parse the component at `offset`; returns it and the offset of the next one
    pub fn parse(data: &'a [u8], offset: usize) -> Result<(Self, usize)> {
        let kind = ComponentType::from_byte(u8_at(data, offset)?)?;
        let length = usize::from(u8_at(data, offset + 1)?);
        let version = u16_at(data, offset + 2)?;
        let identifier = slice_at(data, offset + Self::HEADER_SIZE, length).map_err(|e| {
            log::warn!("udf: path component identifier runs past symlink data");
            e
        })?;

        Ok((
            Self {
                kind,
                version,
                identifier,
            },
            offset + Self::HEADER_SIZE + length,
        ))
    }
}

/// Iterator over the components of a symlink body
pub struct PathComponents<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> PathComponents<'a> {
    /// Iterate over `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for PathComponents<'a> {
    type Item = Result<PathComponent<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match PathComponent::parse(self.data, self.offset) {
            Ok((component, next)) => {
                self.offset = next;
                Some(Ok(component))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
