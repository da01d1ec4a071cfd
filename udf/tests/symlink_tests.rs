//! Symbolic link resolution tests

mod common;

use common::builder::{pattern, Entry, FORM_INLINE, TARGET, TYPE_SYMLINK};
use common::{DirEntry, MemoryBlockDevice, Sample, UdfBuilder};
use udf::directory::{find_root_directory, lookup, resolve_symlink};
use udf::error::UdfError;
use udf::{find_file, mount, read_file, Volume};

/// Sample tree plus extra root entries built by `extra`
fn sample_with(
    extra: impl FnOnce(&mut UdfBuilder) -> Vec<DirEntry>,
) -> (MemoryBlockDevice, Volume, Sample) {
    let mut sample = Sample::new();
    let mut builder = std::mem::replace(&mut sample.builder, UdfBuilder::new());
    let entries = extra(&mut builder);

    let root = builder.reserve();
    let mut all = vec![DirEntry::dir("SubDir", sample.subdir)];
    all.extend(entries);
    builder.directory(root, root, &all);
    // SubDir's parent link must follow the new root
    builder.directory(
        sample.subdir,
        root,
        &[DirEntry::file("file.txt", sample.file), DirEntry::file("link", sample.link)],
    );

    sample.builder = builder;
    sample.root = root;
    let mut device = sample.device();
    let volume = mount(&mut device).unwrap();
    (device, volume, sample)
}

#[test]
fn test_link_to_parent_sibling() {
    let sample = Sample::new();
    let mut device = sample.device();
    let volume = mount(&mut device).unwrap();

    let node = find_file(&mut device, &volume, "\\SubDir\\link").unwrap();
    assert_eq!(node.entry.icb().location.logical_block, sample.target);
    assert!(node.is_file());
    assert_eq!(read_file(&mut device, &volume, &node.entry).unwrap(), TARGET);
}

#[test]
fn test_resolve_symlink_directly() {
    let sample = Sample::new();
    let mut device = sample.device();
    let volume = mount(&mut device).unwrap();
    let root = find_root_directory(&mut device, &volume).unwrap();
    let subdir = lookup(&mut device, &volume, &root, "SubDir").unwrap();
    let link = lookup(&mut device, &volume, &subdir, "link").unwrap();
    assert!(link.is_symlink());

    let target = resolve_symlink(&mut device, &volume, &subdir, &link).unwrap();
    assert_eq!(target.entry.icb().location.logical_block, sample.target);
    assert_eq!(target.name().unwrap(), "target.txt");
}

#[test]
fn test_link_to_directory_is_traversed() {
    let (mut device, volume, sample) = sample_with(|b| {
        let link = b.symlink(&[(5, "SubDir")]);
        vec![DirEntry::file("dirlink", link)]
    });

    let node = find_file(&mut device, &volume, "\\dirlink\\file.txt").unwrap();
    assert_eq!(node.entry.icb().location.logical_block, sample.file);
    assert_eq!(read_file(&mut device, &volume, &node.entry).unwrap(), pattern(4096));
}

#[test]
fn test_multi_component_link() {
    let (mut device, volume, sample) = sample_with(|b| {
        let link = b.symlink(&[(2, ""), (5, "SubDir"), (4, ""), (5, "file.txt")]);
        vec![DirEntry::file("deep", link)]
    });

    let node = find_file(&mut device, &volume, "\\deep").unwrap();
    assert_eq!(node.entry.icb().location.logical_block, sample.file);
}

#[test]
fn test_dangling_link() {
    let (mut device, volume, _) = sample_with(|b| {
        let link = b.symlink(&[(5, "nowhere")]);
        vec![DirEntry::file("dangling", link)]
    });

    assert_eq!(
        find_file(&mut device, &volume, "\\dangling").unwrap_err(),
        UdfError::NotFound
    );
}

#[test]
fn test_empty_link() {
    let (mut device, volume, _) = sample_with(|b| {
        let link = b.reserve();
        b.write_entry(link, &Entry::new(TYPE_SYMLINK, FORM_INLINE, 0, Vec::new()));
        vec![DirEntry::file("empty", link)]
    });

    assert_eq!(
        find_file(&mut device, &volume, "\\empty").unwrap_err(),
        UdfError::VolumeCorrupted
    );
}

#[test]
fn test_invalid_component_type() {
    let (mut device, volume, _) = sample_with(|b| {
        let link = b.symlink(&[(7, "x")]);
        vec![DirEntry::file("bad", link)]
    });

    assert_eq!(
        find_file(&mut device, &volume, "\\bad").unwrap_err(),
        UdfError::VolumeCorrupted
    );
}
