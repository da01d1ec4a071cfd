#![allow(dead_code)]

use crate::common::MemoryBlockDevice;
use udf::utils::checksum::{crc_itu, tag_checksum};
use udf::utils::osta::compress;

pub const SECTOR: usize = 2048;
pub const MVDS_SECTOR: u32 = 32;
pub const LVID_SECTOR: u32 = 48;
pub const ANCHOR_SECTOR: u32 = 256;
pub const PARTITION_START: u32 = 272;

pub const TYPE_DIRECTORY: u8 = 4;
pub const TYPE_REGULAR: u8 = 5;
pub const TYPE_SYMLINK: u8 = 12;

pub const FORM_SHORT: u16 = 0;
pub const FORM_LONG: u16 = 1;
pub const FORM_EXTENDED: u16 = 2;
pub const FORM_INLINE: u16 = 3;

pub const EXTENT_RECORDED: u32 = 0;
pub const EXTENT_NOT_RECORDED: u32 = 1;
pub const EXTENT_NEXT: u32 = 3;

pub const FID_HIDDEN: u8 = 0x01;
pub const FID_DIRECTORY: u8 = 0x02;
pub const FID_DELETED: u8 = 0x04;
pub const FID_PARENT: u8 = 0x08;

/// 2024-05-17 12:30:15, local time, UTC+60
pub const MODIFIED: [u8; 12] = [0x3C, 0x10, 0xE8, 0x07, 5, 17, 12, 30, 15, 0, 0, 0];
/// 2023-01-02 03:04:05, local time, UTC+60
pub const CREATED: [u8; 12] = [0x3C, 0x10, 0xE7, 0x07, 1, 2, 3, 4, 5, 0, 0, 0];

/// One File Identifier Descriptor to place in a directory
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub icb: u32,
    pub characteristics: u8,
}

impl DirEntry {
    pub fn file(name: &str, icb: u32) -> Self {
        Self {
            name: name.to_string(),
            icb,
            characteristics: 0,
        }
    }

    pub fn dir(name: &str, icb: u32) -> Self {
        Self {
            characteristics: FID_DIRECTORY,
            ..Self::file(name, icb)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.characteristics |= FID_HIDDEN;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.characteristics |= FID_DELETED;
        self
    }
}

/// A File Entry to record
#[derive(Debug, Clone)]
pub struct Entry {
    pub file_type: u8,
    pub form: u16,
    pub extended: bool,
    pub information_length: u64,
    pub icb_flags: u16,
    /// Inline content or allocation descriptors
    pub area: Vec<u8>,
}

impl Entry {
    pub fn new(file_type: u8, form: u16, information_length: u64, area: Vec<u8>) -> Self {
        Self {
            file_type,
            form,
            extended: false,
            information_length,
            icb_flags: 0,
            area,
        }
    }
}

/// Builds a single-partition UDF image
///
/// Layout: main descriptor sequence at 32, integrity descriptor at 48,
/// anchor at 256, partition from 272, all in sectors of the block size
/// (2048 unless set). Partition block 0 holds the File Set Descriptor.
pub struct UdfBuilder {
    block_size: usize,
    partition: Vec<u8>,
    revision: u16,
    label: String,
    integrity: bool,
    free_blocks: u32,
}

impl UdfBuilder {
    pub fn new() -> Self {
        Self {
            block_size: SECTOR,
            partition: vec![0u8; SECTOR],
            revision: 0x0150,
            label: "UDF_TEST".to_string(),
            integrity: true,
            free_blocks: 100,
        }
    }

    /// Use one block size for both the media and the logical volume
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self.partition = vec![0u8; block_size];
        self
    }

    pub fn revision(mut self, revision: u16) -> Self {
        self.revision = revision;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn without_integrity(mut self) -> Self {
        self.integrity = false;
        self
    }

    pub fn free_blocks(mut self, blocks: u32) -> Self {
        self.free_blocks = blocks;
        self
    }

    /// Next unused partition block
    pub fn next_block(&self) -> u32 {
        (self.partition.len() / self.block_size) as u32
    }

    /// Allocate one zeroed block
    pub fn reserve(&mut self) -> u32 {
        let block = self.next_block();
        self.partition.resize(self.partition.len() + self.block_size, 0);
        block
    }

    /// Store `bytes` in fresh contiguous blocks; returns the first
    pub fn write_data(&mut self, bytes: &[u8]) -> u32 {
        let block = self.next_block();
        let blocks = bytes.len().div_ceil(self.block_size).max(1);
        let start = self.partition.len();
        self.partition.resize(start + blocks * self.block_size, 0);
        self.partition[start..start + bytes.len()].copy_from_slice(bytes);
        block
    }

    fn block_mut(&mut self, block: u32) -> &mut [u8] {
        let start = block as usize * self.block_size;
        &mut self.partition[start..start + self.block_size]
    }

    /// Record a File Entry or Extended File Entry in `block`
    pub fn write_entry(&mut self, block: u32, entry: &Entry) {
        let (header, id) = if entry.extended { (216, 266u16) } else { (176, 261u16) };
        let mut desc = vec![0u8; header + entry.area.len()];
        assert!(desc.len() <= self.block_size, "entry does not fit in one block");

        // ICB tag
        put_u16(&mut desc, 16 + 4, 4);
        put_u16(&mut desc, 16 + 8, 1);
        desc[16 + 11] = entry.file_type;
        put_u16(&mut desc, 16 + 18, entry.icb_flags | entry.form);

        put_u32(&mut desc, 36, 1000);
        put_u32(&mut desc, 40, 1000);
        put_u32(&mut desc, 44, 0x1084);
        put_u16(&mut desc, 48, 1);
        put_u64(&mut desc, 56, entry.information_length);

        if entry.extended {
            put_u64(&mut desc, 64, entry.information_length);
            put_u64(&mut desc, 72, entry.information_length.div_ceil(self.block_size as u64));
            desc[80..92].copy_from_slice(&MODIFIED);
            desc[92..104].copy_from_slice(&MODIFIED);
            desc[104..116].copy_from_slice(&CREATED);
            desc[116..128].copy_from_slice(&MODIFIED);
            put_u64(&mut desc, 200, u64::from(block));
            put_u32(&mut desc, 212, entry.area.len() as u32);
        } else {
            put_u64(&mut desc, 64, entry.information_length.div_ceil(self.block_size as u64));
            desc[72..84].copy_from_slice(&MODIFIED);
            desc[84..96].copy_from_slice(&MODIFIED);
            desc[96..108].copy_from_slice(&MODIFIED);
            put_u64(&mut desc, 160, u64::from(block));
            put_u32(&mut desc, 172, entry.area.len() as u32);
        }
        desc[header..].copy_from_slice(&entry.area);

        finish_tag(&mut desc, id, block);
        self.block_mut(block)[..desc.len()].copy_from_slice(&desc);
    }

    /// Regular file stored as one short extent per block
    pub fn file(&mut self, content: &[u8]) -> u32 {
        let first = self.write_data(content);
        let area = chunked_ads_with(content.len(), first, self.block_size);
        let block = self.reserve();
        self.write_entry(
            block,
            &Entry::new(TYPE_REGULAR, FORM_SHORT, content.len() as u64, area),
        );
        block
    }

    /// Regular file recorded inside its File Entry
    pub fn inline_file(&mut self, content: &[u8]) -> u32 {
        let block = self.reserve();
        self.write_entry(
            block,
            &Entry::new(TYPE_REGULAR, FORM_INLINE, content.len() as u64, content.to_vec()),
        );
        block
    }

    /// Directory in `block` whose parent link points at `parent`
    pub fn directory(&mut self, block: u32, parent: u32, entries: &[DirEntry]) {
        let mut content = fid(FID_PARENT | FID_DIRECTORY, parent, "");
        for entry in entries {
            content.extend(fid(entry.characteristics, entry.icb, &entry.name));
        }

        let first = self.write_data(&content);
        let area = chunked_ads_with(content.len(), first, self.block_size);
        self.write_entry(
            block,
            &Entry::new(TYPE_DIRECTORY, FORM_SHORT, content.len() as u64, area),
        );
    }

    /// Symbolic link with inline path components
    pub fn symlink(&mut self, components: &[(u8, &str)]) -> u32 {
        let content = path_components(components);
        let block = self.reserve();
        self.write_entry(
            block,
            &Entry::new(TYPE_SYMLINK, FORM_INLINE, content.len() as u64, content),
        );
        block
    }

    /// Allocation Extent Descriptor holding `ads`
    pub fn allocation_extent(&mut self, ads: &[u8]) -> u32 {
        let block = self.reserve();
        let mut desc = vec![0u8; 24 + ads.len()];
        put_u32(&mut desc, 20, ads.len() as u32);
        desc[24..].copy_from_slice(ads);
        finish_tag(&mut desc, 258, block);
        self.block_mut(block)[..desc.len()].copy_from_slice(&desc);
        block
    }

    pub fn build(&self, root: u32) -> MemoryBlockDevice {
        MemoryBlockDevice::with_block_size(self.image(root), self.block_size)
    }

    pub fn image(&self, root: u32) -> Vec<u8> {
        let bs = self.block_size;
        let partition_blocks = self.next_block();
        // File Entries are read 2048 bytes at a time, even from the last block
        let tail = (SECTOR / bs).saturating_sub(1);
        let total = PARTITION_START as usize + partition_blocks as usize + tail;
        let mut data = vec![0u8; total * bs];

        let pd = self.partition_descriptor(partition_blocks);
        let lvd = self.logical_volume_descriptor();
        sector(&mut data, bs, ANCHOR_SECTOR).copy_from_slice(&self.anchor());
        sector(&mut data, bs, MVDS_SECTOR).copy_from_slice(&pd);
        sector(&mut data, bs, MVDS_SECTOR + 1).copy_from_slice(&lvd);
        sector(&mut data, bs, MVDS_SECTOR + 2).copy_from_slice(&terminating_descriptor(bs));
        if self.integrity {
            let lvid = self.integrity_descriptor(partition_blocks);
            sector(&mut data, bs, LVID_SECTOR).copy_from_slice(&lvid);
        }

        let start = PARTITION_START as usize * bs;
        data[start..start + self.partition.len()].copy_from_slice(&self.partition);
        let fsd = self.file_set_descriptor(root);
        data[start..start + bs].copy_from_slice(&fsd);
        data
    }

    fn anchor(&self) -> Vec<u8> {
        let bs = self.block_size as u32;
        let mut desc = vec![0u8; self.block_size];
        put_u32(&mut desc, 16, 16 * bs);
        put_u32(&mut desc, 20, MVDS_SECTOR);
        put_u32(&mut desc, 24, 16 * bs);
        put_u32(&mut desc, 28, MVDS_SECTOR);
        finish_tag(&mut desc, 2, ANCHOR_SECTOR);
        desc
    }

    fn partition_descriptor(&self, blocks: u32) -> Vec<u8> {
        let mut desc = vec![0u8; self.block_size];
        put_u32(&mut desc, 16, 1);
        put_u16(&mut desc, 20, 1);
        put_u16(&mut desc, 22, 0);
        let contents: &[u8] = if self.revision >= 0x0200 { b"+NSR03" } else { b"+NSR02" };
        desc[25..25 + contents.len()].copy_from_slice(contents);
        put_u32(&mut desc, 184, 1);
        put_u32(&mut desc, 188, PARTITION_START);
        put_u32(&mut desc, 192, blocks);
        finish_tag(&mut desc, 5, MVDS_SECTOR);
        desc
    }

    fn logical_volume_descriptor(&self) -> Vec<u8> {
        let bs = self.block_size as u32;
        let mut desc = vec![0u8; self.block_size];
        put_u32(&mut desc, 16, 2);
        desc[84..212].copy_from_slice(&dstring::<128>(&self.label));
        put_u32(&mut desc, 212, bs);
        desc[217..217 + 19].copy_from_slice(b"*OSTA UDF Compliant");
        put_u16(&mut desc, 240, self.revision);
        desc[248..264].copy_from_slice(&long_ad(bs, EXTENT_RECORDED, 0, 0));
        put_u32(&mut desc, 264, 6);
        put_u32(&mut desc, 268, 1);
        if self.integrity {
            put_u32(&mut desc, 432, bs);
            put_u32(&mut desc, 436, LVID_SECTOR);
        }
        desc[440] = 1;
        desc[441] = 6;
        put_u16(&mut desc, 442, 1);
        put_u16(&mut desc, 444, 0);
        finish_tag(&mut desc, 6, MVDS_SECTOR + 1);
        desc
    }

    fn integrity_descriptor(&self, blocks: u32) -> Vec<u8> {
        let mut desc = vec![0u8; self.block_size];
        put_u32(&mut desc, 16, 1);
        put_u32(&mut desc, 72, 1);
        put_u32(&mut desc, 80, self.free_blocks);
        put_u32(&mut desc, 84, blocks);
        finish_tag(&mut desc, 9, LVID_SECTOR);
        desc
    }

    fn file_set_descriptor(&self, root: u32) -> Vec<u8> {
        let mut desc = vec![0u8; self.block_size];
        desc[16..28].copy_from_slice(&MODIFIED);
        put_u16(&mut desc, 28, 3);
        desc[112..240].copy_from_slice(&dstring::<128>(&self.label));
        desc[304..336].copy_from_slice(&dstring::<32>("FILESET"));
        desc[400..416].copy_from_slice(&long_ad(self.block_size as u32, EXTENT_RECORDED, root, 0));
        finish_tag(&mut desc, 256, 0);
        desc
    }
}

fn terminating_descriptor(block_size: usize) -> Vec<u8> {
    let mut desc = vec![0u8; block_size];
    finish_tag(&mut desc, 8, MVDS_SECTOR + 2);
    desc
}

/// Fill in identifier, version, CRC and checksum of a descriptor tag
pub fn finish_tag(desc: &mut [u8], id: u16, location: u32) {
    put_u16(desc, 0, id);
    put_u16(desc, 2, 2);
    let crc_length = (desc.len() - 16).min(u16::MAX as usize);
    let crc = crc_itu(&desc[16..16 + crc_length]);
    put_u16(desc, 8, crc);
    put_u16(desc, 10, crc_length as u16);
    put_u32(desc, 12, location);
    desc[4] = tag_checksum(&desc[..16]);
}

/// Encoded File Identifier Descriptor, padded to four bytes
pub fn fid(characteristics: u8, icb: u32, name: &str) -> Vec<u8> {
    let identifier = if name.is_empty() { Vec::new() } else { compress(name) };
    let len = (38 + identifier.len() + 3) & !3;
    let mut desc = vec![0u8; len];
    put_u16(&mut desc, 16, 1);
    desc[18] = characteristics;
    desc[19] = identifier.len() as u8;
    desc[20..36].copy_from_slice(&long_ad(SECTOR as u32, EXTENT_RECORDED, icb, 0));
    desc[38..38 + identifier.len()].copy_from_slice(&identifier);
    finish_tag(&mut desc, 257, icb);
    desc
}

/// Encoded path components; names are compressed, empty names are omitted
pub fn path_components(components: &[(u8, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (kind, name) in components {
        let identifier = if name.is_empty() { Vec::new() } else { compress(name) };
        out.push(*kind);
        out.push(identifier.len() as u8);
        out.extend_from_slice(&[0, 0]);
        out.extend(identifier);
    }
    out
}

pub fn short_ad(length: u32, flags: u32, block: u32) -> [u8; 8] {
    let mut ad = [0u8; 8];
    ad[0..4].copy_from_slice(&(length | (flags << 30)).to_le_bytes());
    ad[4..8].copy_from_slice(&block.to_le_bytes());
    ad
}

pub fn long_ad(length: u32, flags: u32, block: u32, partition_reference: u16) -> [u8; 16] {
    let mut ad = [0u8; 16];
    ad[0..4].copy_from_slice(&(length | (flags << 30)).to_le_bytes());
    ad[4..8].copy_from_slice(&block.to_le_bytes());
    ad[8..10].copy_from_slice(&partition_reference.to_le_bytes());
    ad
}

/// Short descriptors covering `len` bytes from `first`, one per block
pub fn chunked_ads(len: usize, first: u32) -> Vec<u8> {
    chunked_ads_with(len, first, SECTOR)
}

/// [`chunked_ads`] for blocks of `block_size` bytes
pub fn chunked_ads_with(len: usize, first: u32, block_size: usize) -> Vec<u8> {
    let mut area = Vec::new();
    let mut remaining = len;
    let mut block = first;
    while remaining > 0 {
        let chunk = remaining.min(block_size);
        area.extend_from_slice(&short_ad(chunk as u32, EXTENT_RECORDED, block));
        remaining -= chunk;
        block += 1;
    }
    area
}

/// Fixed-size d-string with 8-bit compression
pub fn dstring<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let encoded = compress(text);
    field[..encoded.len()].copy_from_slice(&encoded);
    field[N - 1] = encoded.len() as u8;
    field
}

/// Byte offset of a partition block inside the image
pub fn block_offset(block: u32) -> usize {
    (PARTITION_START + block) as usize * SECTOR
}

fn sector(data: &mut [u8], block_size: usize, sector: u32) -> &mut [u8] {
    let start = sector as usize * block_size;
    &mut data[start..start + block_size]
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u64(data: &mut [u8], offset: usize, value: u64) {
    data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

/// Deterministic file content
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A small tree used across the test suites
///
/// ```text
/// \readme.txt      inline, "Hello UDF"
/// \target.txt      one extent
/// \hidden.bin      hidden
/// \old.txt         deleted entry
/// \SubDir\file.txt 4096 bytes in two extents
/// \SubDir\link     symlink to ..\target.txt
/// ```
pub struct Sample {
    pub builder: UdfBuilder,
    pub root: u32,
    pub subdir: u32,
    pub file: u32,
    pub readme: u32,
    pub target: u32,
    pub link: u32,
}

pub const README: &[u8] = b"Hello UDF";
pub const TARGET: &[u8] = b"target contents";

impl Sample {
    pub fn new() -> Self {
        Self::with_builder(UdfBuilder::new())
    }

    pub fn with_builder(mut builder: UdfBuilder) -> Self {
        let root = builder.reserve();
        let subdir = builder.reserve();
        let file = builder.file(&pattern(4096));
        let readme = builder.inline_file(README);
        let target = builder.file(TARGET);
        let hidden = builder.inline_file(b"secret");
        let old = builder.inline_file(b"gone");
        let link = builder.symlink(&[(3, ""), (5, "target.txt")]);

        builder.directory(
            root,
            root,
            &[
                DirEntry::dir("SubDir", subdir),
                DirEntry::file("readme.txt", readme),
                DirEntry::file("old.txt", old).deleted(),
                DirEntry::file("target.txt", target),
                DirEntry::file("hidden.bin", hidden).hidden(),
            ],
        );
        builder.directory(
            subdir,
            root,
            &[DirEntry::file("file.txt", file), DirEntry::file("link", link)],
        );

        Self {
            builder,
            root,
            subdir,
            file,
            readme,
            target,
            link,
        }
    }

    pub fn device(&self) -> MemoryBlockDevice {
        self.builder.build(self.root)
    }

    pub fn image(&self) -> Vec<u8> {
        self.builder.image(self.root)
    }
}
