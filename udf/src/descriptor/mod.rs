//! On-disk descriptors
//!
//! Each structure is parsed from a byte slice through the bounds-checked
//! accessors in [`crate::utils::cursor`]. Parsers check the descriptor tag
//! identifier before any other field is read.

pub mod ad;
pub mod aed;
pub mod fid;
pub mod file_entry;
pub mod file_set;
pub mod icb;
pub mod path_component;
pub mod tag;
pub mod volume;

pub use ad::{AllocationDescriptor, ExtentAd, ExtentFlags, LbAddr, LongAd, ShortAd};
pub use fid::{FidCharacteristics, FileIdentifierDescriptor};
pub use file_entry::FileEntry;
pub use icb::{AllocationForm, IcbTag};
pub use tag::DescriptorTag;
