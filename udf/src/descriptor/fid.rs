//! File Identifier Descriptor (ECMA-167 4/14.4)

use crate::descriptor::ad::LongAd;
use crate::descriptor::tag::expect_tag;
use crate::error::{Result, UdfError};
use crate::types::TagIdentifier;
use crate::utils::cursor::{slice_at, u16_at, u8_at};
use crate::utils::osta;
use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;

bitflags! {
    /// File characteristics
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FidCharacteristics: u8 {
        /// Existence bit: hidden from the user
        const HIDDEN = 1 << 0;
        /// Identifies a directory
        const DIRECTORY = 1 << 1;
        /// Deleted entry
        const DELETED = 1 << 2;
        /// Link to the parent directory
        const PARENT = 1 << 3;
        /// Metadata stream
        const METADATA = 1 << 4;
    }
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentifierDescriptor {
    /// File version number
    pub version: u16,
    /// Characteristics
    pub characteristics: FidCharacteristics,
    /// ICB of the named file
    pub icb: LongAd,
    /// Implementation use area
    pub implementation_use: Vec<u8>,
    /// Compressed file identifier (empty for the parent link)
    pub identifier: Vec<u8>,
}

impl FileIdentifierDescriptor {
    /// Fixed part before the implementation use area
    pub const HEADER_SIZE: usize = 38;

    /// Padded on-disk length for the given variable parts
    pub fn padded_length(implementation_use: usize, identifier: usize) -> usize {
        (Self::HEADER_SIZE + implementation_use + identifier + 3) & !3
    }

    /// Parse the descriptor at the start of `data`
    ///
    /// Returns the descriptor and its padded length. The unpadded
    /// descriptor must fit in `data`; the padding may run past it at the end
    /// of a directory.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        expect_tag(data, TagIdentifier::FileIdentifier)?;

        let identifier_length = usize::from(u8_at(data, 19)?);
        let implementation_use_length = usize::from(u16_at(data, 36)?);
        let identifier_start = Self::HEADER_SIZE + implementation_use_length;

        let implementation_use = slice_at(data, Self::HEADER_SIZE, implementation_use_length)
            .map_err(|e| {
                log::warn!("udf: FID implementation use runs past directory data");
                e
            })?;
        let identifier = slice_at(data, identifier_start, identifier_length).map_err(|e| {
            log::warn!("udf: FID identifier runs past directory data");
            e
        })?;

        let mut iu = Vec::new();
        iu.try_reserve_exact(implementation_use.len())?;
        iu.extend_from_slice(implementation_use);
        let mut id = Vec::new();
        id.try_reserve_exact(identifier.len())?;
        id.extend_from_slice(identifier);

        let fid = Self {
            version: u16_at(data, 16)?,
            characteristics: FidCharacteristics::from_bits_retain(u8_at(data, 18)?),
            icb: LongAd::parse(data, 20)?,
            implementation_use: iu,
            identifier: id,
        };

        Ok((fid, Self::padded_length(implementation_use_length, identifier_length)))
    }

    /// Link to the parent directory
    pub fn is_parent(&self) -> bool {
        self.characteristics.contains(FidCharacteristics::PARENT)
    }

    /// Deleted entry
    pub fn is_deleted(&self) -> bool {
        self.characteristics.contains(FidCharacteristics::DELETED)
    }

    /// Names a directory
    pub fn is_directory(&self) -> bool {
        self.characteristics.contains(FidCharacteristics::DIRECTORY)
    }

    /// Hidden from directory listings
    pub fn is_hidden(&self) -> bool {
        self.characteristics.contains(FidCharacteristics::HIDDEN)
    }

    /// Decoded name; empty for the parent link
    pub fn name(&self) -> Result<String> {
        if self.identifier.is_empty() {
            return Ok(String::new());
        }
        osta::decode_file_name(&self.identifier)
    }

    /// Whether the decoded name equals `name`
    pub fn name_matches(&self, name: &str) -> Result<bool> {
        match self.name() {
            Ok(decoded) => Ok(decoded == name),
            Err(UdfError::BufferTooSmall) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
