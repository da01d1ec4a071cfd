//! Symbolic link resolution
//!
//! A symlink's content is a sequence of Path Component records. Resolution
//! starts at the directory holding the link and applies each component in
//! turn.

use crate::descriptor::path_component::{ComponentType, PathComponents};
use crate::directory::lookup;
use crate::error::{Result, UdfError};
use crate::file::read_file;
use crate::types::{Node, Volume, MAX_FILE_NAME_LENGTH};
use crate::utils::osta;
use gpt_disk_io::BlockIo;

/// Resolve `link`, found in directory `parent`, to its target
pub fn resolve_symlink<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    parent: &Node,
    link: &Node,
) -> Result<Node> {
    let data = read_file(block_io, volume, &link.entry)?;
    if data.is_empty() {
        log::warn!("udf: empty symlink");
        return Err(UdfError::VolumeCorrupted);
    }

    let mut current = parent.clone();
    for component in PathComponents::new(&data) {
        let component = component?;
        match component.kind {
            ComponentType::RootHierarchy | ComponentType::CurrentDirectory => {}
            ComponentType::Parent => {
                current = lookup(block_io, volume, &current, "..")?;
            }
            ComponentType::CurrentFile => {}
            ComponentType::Named => {
                let units = osta::decompress(component.identifier, MAX_FILE_NAME_LENGTH)
                    .map_err(|e| match e {
                        UdfError::BufferTooSmall => UdfError::Unsupported,
                        other => other,
                    })?;
                let name = osta::units_to_string(&units);
                log::trace!("udf: symlink component {:?}", name);
                current = lookup(block_io, volume, &current, &name)?;
            }
        }
    }

    Ok(current)
}
