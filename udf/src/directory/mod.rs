//! Directory lookup and path resolution
//!
//! Paths use `\` as separator. An empty component (a leading `\`) names
//! the root directory; `.` and `..` are resolved against the directory
//! being walked. Symbolic links are followed once per component.

pub mod iterator;
pub mod symlink;

pub use iterator::{DirectoryCursor, DirectoryIterator};
pub use symlink::resolve_symlink;

use crate::error::{Result, UdfError};
use crate::file::read_file_entry;
use crate::types::{Node, Volume, PATH_SEPARATOR};
use crate::utils::path::mangle_file_name;
use gpt_disk_io::BlockIo;

/// Name matching a directory's parent link
pub const PARENT_NAME: &str = "..";

/// Alternative parent-link name used for root lookups
pub const ROOT_NAME: &str = "\\";

/// Look up `name` in directory `parent`
///
/// `.` returns a copy of `parent`; `..` and `\` match the parent-link
/// entry. Anything else is compared against decoded entry names. The
/// File Entry of the match is read fresh from disk.
pub fn lookup<B: BlockIo>(block_io: &mut B, volume: &Volume, parent: &Node, name: &str) -> Result<Node> {
    if !parent.is_directory() {
        return Err(UdfError::NotFound);
    }
    if name == "." {
        return Ok(parent.clone());
    }

    let want_parent = name == PARENT_NAME || name == ROOT_NAME;
    let mut found = None;
    for entry in DirectoryIterator::new(&mut *block_io, volume, &parent.entry) {
        let fid = entry?;
        let matched = if want_parent {
            fid.is_parent()
        } else {
            !fid.is_parent() && fid.name_matches(name)?
        };
        if matched {
            found = Some(fid);
            break;
        }
    }

    let fid = found.ok_or(UdfError::NotFound)?;
    let entry = read_file_entry(block_io, volume, &fid.icb)?;
    Ok(Node::new(entry, Some(fid)))
}

/// Read the root directory
///
/// The returned node carries the root's parent-link entry.
pub fn find_root_directory<B: BlockIo>(block_io: &mut B, volume: &Volume) -> Result<Node> {
    let entry = read_file_entry(block_io, volume, &volume.file_set.root_directory_icb)?;
    let root = lookup(block_io, volume, &Node::new(entry, None), ROOT_NAME)?;
    log::debug!(
        "udf: root directory at block {}",
        root.entry.icb().location.logical_block
    );
    Ok(root)
}

/// Resolve `path` starting at `parent`
///
/// Empty components resolve to a copy of `root` when one is supplied, or to
/// a parent-link lookup otherwise. Each resolved symlink is replaced by its
/// target before the next component is looked up.
pub fn resolve_path<B: BlockIo>(
    block_io: &mut B,
    volume: &Volume,
    root: Option<&Node>,
    parent: &Node,
    path: &str,
) -> Result<Node> {
    let mut current = parent.clone();

    for component in path.split(PATH_SEPARATOR) {
        let next = if component.is_empty() {
            match root {
                Some(root) => root.clone(),
                None => lookup(block_io, volume, &current, ROOT_NAME)?,
            }
        } else {
            lookup(block_io, volume, &current, component)?
        };

        current = if next.is_symlink() {
            resolve_symlink(block_io, volume, &current, &next)?
        } else {
            next
        };
    }

    Ok(current)
}

/// Find a file or directory by absolute path
///
/// The path is normalized first; one that collapses to nothing is not found.
///
/// # Example
/// ```ignore
/// let volume = mount(&mut block_io)?;
/// let file = find_file(&mut block_io, &volume, "\\VIDEO_TS\\VIDEO_TS.IFO")?;
/// ```
pub fn find_file<B: BlockIo>(block_io: &mut B, volume: &Volume, path: &str) -> Result<Node> {
    let path = mangle_file_name(path);
    if path.is_empty() {
        return Err(UdfError::NotFound);
    }

    let root = find_root_directory(block_io, volume)?;
    resolve_path(block_io, volume, Some(&root), &root, &path)
}
