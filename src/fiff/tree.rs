//! FIF directory tree construction.
//!
//! The tree is built by scanning all tag headers sequentially and grouping
//! them into blocks delimited by `FIFF_BLOCK_START` / `FIFF_BLOCK_END` tags.
//! Block kinds are resolved from the `BLOCK_START` payloads, so lookups like
//! [`Node::find_block`] work on the kinds the file declares.
use std::io::{Read, Seek};
use anyhow::Result;

use super::constants::*;
use super::tag::{read_i32, read_tag_header, TagHeader};

// ── Node ─────────────────────────────────────────────────────────────────

/// One node in the FIF tree.
#[derive(Debug, Default, Clone)]
pub struct Node {
    /// Block kind (e.g. `FIFFB_MEAS`, `FIFFB_RAW_DATA`, …).
    /// 0 = root / unknown.
    pub block:    i32,
    /// All non-structural tag headers in this node (not including BLOCK_START/END).
    pub entries:  Vec<TagHeader>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Recursively find the first node with the given block kind.
    pub fn find_block(&self, kind: i32) -> Option<&Node> {
        if self.block == kind {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find_block(kind) {
                return Some(found);
            }
        }
        None
    }

    /// Recursively collect all nodes with the given block kind.
    pub fn find_blocks(&self, kind: i32) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect_blocks(kind, &mut out);
        out
    }

    fn collect_blocks<'a>(&'a self, kind: i32, out: &mut Vec<&'a Node>) {
        if self.block == kind {
            out.push(self);
        }
        for child in &self.children {
            child.collect_blocks(kind, out);
        }
    }

    /// Find the first tag header with the given kind in this node's entries.
    /// Does NOT recurse into children.
    pub fn find_tag(&self, kind: i32) -> Option<&TagHeader> {
        self.entries.iter().find(|e| e.kind == kind)
    }
}

// ── Tree builder ─────────────────────────────────────────────────────────

/// Walk a flat directory and build the tree, resolving block kinds from
/// the `BLOCK_START` payloads.
pub fn read_tree<R: Read + Seek>(reader: &mut R, directory: &[TagHeader]) -> Result<Node> {
    let mut stack: Vec<Node> = vec![Node::default()]; // root

    for &tag in directory {
        match tag.kind {
            FIFF_BLOCK_START => {
                let block = read_i32(reader, &tag)?;
                stack.push(Node { block, ..Node::default() });
            }
            FIFF_BLOCK_END => {
                let finished = stack.pop().unwrap_or_default();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(finished);
                }
            }
            _ => {
                if let Some(node) = stack.last_mut() {
                    node.entries.push(tag);
                }
            }
        }
    }

    // Unclosed blocks (truncated file) still hang off the root.
    while stack.len() > 1 {
        let orphan = stack.pop().unwrap_or_default();
        if let Some(parent) = stack.last_mut() {
            parent.children.push(orphan);
        }
    }

    Ok(stack.pop().unwrap_or_default())
}

// ── Directory scanner ─────────────────────────────────────────────────────

/// Read every tag header by following the `next` pointer chain.
/// The "slow path" — used when there is no pre-built directory.
pub fn scan_directory<R: Read + Seek>(reader: &mut R) -> Result<Vec<TagHeader>> {
    let mut directory = Vec::new();
    let mut pos: Option<u64> = Some(0);
    while let Some(p) = pos {
        let tag = read_tag_header(reader, p)?;
        pos = tag.next_pos();
        directory.push(tag);
    }
    Ok(directory)
}

// ── Fast directory from embedded dir tag ─────────────────────────────────

/// Try to load the pre-built tag directory embedded at the end of the file.
///
/// The second tag of a well-formed file is `FIFF_DIR_POINTER`; if its
/// payload is > 0 it points to a `FIFFT_DIR_ENTRY_STRUCT` tag containing
/// all headers.  Returns `None` if missing or corrupt.
pub fn try_load_directory<R: Read + Seek>(reader: &mut R) -> Result<Option<Vec<TagHeader>>> {
    // First tag must be FIFF_FILE_ID.
    let id_tag = read_tag_header(reader, 0)?;
    if id_tag.kind != FIFF_FILE_ID {
        return Ok(None);
    }
    // Second tag must be FIFF_DIR_POINTER.
    let next = match id_tag.next_pos() {
        Some(p) => p,
        None => return Ok(None),
    };
    let dir_ptr_tag = read_tag_header(reader, next)?;
    if dir_ptr_tag.kind != FIFF_DIR_POINTER {
        return Ok(None);
    }
    let dirpos = read_i32(reader, &dir_ptr_tag)? as i64;
    if dirpos <= 0 {
        return Ok(None);
    }
    let dir_tag = read_tag_header(reader, dirpos as u64)?;
    if dir_tag.ftype != FIFFT_DIR_ENTRY_STRUCT {
        return Ok(None);
    }
    let entries = super::tag::read_directory(reader, &dir_tag)?;
    Ok(Some(entries))
}
