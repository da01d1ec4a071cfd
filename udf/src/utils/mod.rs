//! Helpers shared by the descriptor and file layers

pub mod checksum;
pub mod cursor;
pub mod datetime;
pub mod osta;
pub mod path;
pub mod sector;
