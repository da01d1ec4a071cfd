//! Extent iteration over a File Entry's allocation descriptors
//!
//! Extents represent contiguous content regions. The walker follows
//! next-extent descriptors into Allocation Extent Descriptors; the current
//! descriptor buffer is only replaced once the new one has been validated.

use crate::descriptor::ad::{AllocationDescriptor, ExtentFlags, LongAd, ShortAd};
use crate::descriptor::file_entry::FileEntry;
use crate::descriptor::icb::AllocationForm;
use crate::descriptor::volume::PartitionDescriptor;
use crate::error::{Result, UdfError};
use crate::extent::{partition_for, read_next_extent, resolve};
use crate::types::{Volume, MAX_INDIRECT_EXTENTS};
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// File extent (contiguous content region)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Relative logical sector (meaningful for recorded extents only)
    pub lsn: u64,

    /// Length in bytes
    pub length: u32,

    /// Extent type
    pub flags: ExtentFlags,
}

impl Extent {
    /// Whether the extent holds recorded content
    pub fn is_recorded(&self) -> bool {
        self.flags == ExtentFlags::Recorded
    }

    /// Number of logical blocks spanned
    pub fn block_count(&self, logical_block_size: u32) -> u64 {
        u64::from(self.length).div_ceil(u64::from(logical_block_size))
    }
}

enum DescriptorBuffer<'e> {
    Entry(&'e [u8]),
    Indirect(Vec<u8>),
}

impl DescriptorBuffer<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Entry(bytes) => bytes,
            Self::Indirect(bytes) => bytes,
        }
    }
}

/// Walks the extents of a short- or long-descriptor File Entry
pub struct ExtentWalker<'e> {
    volume: &'e Volume,
    partition: &'e PartitionDescriptor,
    form: AllocationForm,
    buffer: DescriptorBuffer<'e>,
    offset: usize,
    indirections: usize,
    finished: bool,
}

impl<'e> ExtentWalker<'e> {
    /// Start walking `entry`'s descriptor sequence
    ///
    /// Extended descriptors are unsupported; inline entries have no extents.
    pub fn new(volume: &'e Volume, entry: &'e FileEntry) -> Result<Self> {
        let form = entry.allocation_form();
        match form {
            AllocationForm::Short | AllocationForm::Long => {}
            AllocationForm::Inline => return Err(UdfError::InvalidParameter),
            AllocationForm::Extended | AllocationForm::Reserved(_) => {
                log::warn!("udf: allocation form {:?} not supported", form);
                return Err(UdfError::Unsupported);
            }
        }

        let partition = partition_for(volume, entry.icb().location.partition_reference)?;
        let descriptors = entry.allocation_descriptors()?;

        Ok(Self {
            volume,
            partition,
            form,
            buffer: DescriptorBuffer::Entry(descriptors),
            offset: 0,
            indirections: 0,
            finished: false,
        })
    }

    fn descriptor_size(&self) -> usize {
        match self.form {
            AllocationForm::Short => ShortAd::SIZE,
            _ => LongAd::SIZE,
        }
    }

    fn current_descriptor(&self) -> Result<Option<AllocationDescriptor>> {
        let bytes = self.buffer.bytes();
        if self.offset >= bytes.len() {
            return Ok(None);
        }

        let ad = match self.form {
            AllocationForm::Short => AllocationDescriptor::Short(ShortAd::parse(bytes, self.offset)?),
            _ => AllocationDescriptor::Long(LongAd::parse(bytes, self.offset)?),
        };
        Ok(Some(ad))
    }

    /// Next content extent, or `None` at the end of the sequence
    pub fn next_extent<B: BlockIo>(&mut self, block_io: &mut B) -> Result<Option<Extent>> {
        while !self.finished {
            let Some(ad) = self.current_descriptor()? else {
                self.finished = true;
                break;
            };

            if ad.flags() == ExtentFlags::NextExtent {
                self.indirections += 1;
                if self.indirections > MAX_INDIRECT_EXTENTS {
                    log::warn!("udf: allocation extent chain too long");
                    return Err(UdfError::VolumeCorrupted);
                }
                let sequence = read_next_extent(block_io, self.volume, self.partition, &ad)?;
                self.buffer = DescriptorBuffer::Indirect(sequence);
                self.offset = 0;
                continue;
            }

            if ad.length() == 0 {
                self.finished = true;
                break;
            }

            self.offset += self.descriptor_size();

            let lsn = if ad.flags() == ExtentFlags::Recorded {
                resolve(self.volume, Some(self.partition), &ad)?
            } else {
                0
            };
            let extent = Extent {
                lsn,
                length: ad.length(),
                flags: ad.flags(),
            };
            log::trace!("udf: extent {:?}", extent);
            return Ok(Some(extent));
        }

        Ok(None)
    }
}
