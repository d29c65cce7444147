//! Git tree object
//!
//! Trees represent directory snapshots. Each entry pairs an octal mode and a
//! name with the object ID of a blob or another tree.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Trees written by the builder hold entries sorted ascending by raw name
//! bytes. Trees decoded from external input keep whatever order the input
//! had; they are not re-sorted on read.

use crate::artifacts::objects::entry_mode::TreeEntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Single tree entry: mode, name, and the object it points at
#[derive(Debug, Clone, new)]
pub struct TreeEntry {
    pub mode: TreeEntryMode,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    fn object_type(&self) -> ObjectType {
        if self.mode.is_directory() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries in arbitrary order, sorting them ascending
    /// by raw name bytes as the writer invariant requires.
    pub fn build(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes, GitError> {
        let mut content_bytes = Vec::new();
        for entry in &self.entries {
            let header = format!("{} {}", entry.mode.as_octal(), entry.name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            content_bytes.write_all(&entry.oid.to_raw()?)?;
        }

        let mut tree_bytes = Vec::with_capacity(content_bytes.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self, GitError> {
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(GitError::CorruptObject(
                    "unexpected EOF in tree entry mode".to_string(),
                ));
            }

            let mode_text = std::str::from_utf8(&mode_bytes)
                .map_err(|_| GitError::CorruptObject("tree entry mode is not UTF-8".to_string()))?;
            let mode = TreeEntryMode::from_octal(mode_text)?;

            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                return Err(GitError::CorruptObject(
                    "unexpected EOF in tree entry name".to_string(),
                ));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| GitError::CorruptObject("tree entry name is not UTF-8".to_string()))?;

            let oid = ObjectId::read_raw_from(&mut reader)?;

            // order is preserved exactly as stored
            entries.push(TreeEntry::new(mode, name, oid));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\t{}",
                    entry.mode.as_octal(),
                    entry.object_type().as_str(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::digest(b"fixture")
    }

    fn body_of(tree: &Tree) -> Vec<u8> {
        let encoded = tree.serialize().unwrap();
        let nul = encoded.iter().position(|b| *b == 0).unwrap();
        encoded[nul + 1..].to_vec()
    }

    #[rstest]
    fn build_sorts_entries_by_raw_name_bytes(oid: ObjectId) {
        let tree = Tree::build(vec![
            TreeEntry::new(TreeEntryMode::regular_file(false), "b.txt".into(), oid.clone()),
            TreeEntry::new(TreeEntryMode::directory(), "a".into(), oid.clone()),
            TreeEntry::new(TreeEntryMode::regular_file(true), "B.txt".into(), oid.clone()),
        ]);

        let names: Vec<&str> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        pretty_assertions::assert_eq!(names, vec!["B.txt", "a", "b.txt"]);
    }

    #[rstest]
    fn round_trip_preserves_mode_name_and_oid(oid: ObjectId) {
        let tree = Tree::build(vec![
            TreeEntry::new(TreeEntryMode::directory(), "dir".into(), oid.clone()),
            TreeEntry::new(TreeEntryMode::regular_file(true), "run.sh".into(), oid.clone()),
        ]);

        let decoded = Tree::deserialize(Cursor::new(body_of(&tree))).unwrap();
        pretty_assertions::assert_eq!(decoded.entries().len(), 2);
        pretty_assertions::assert_eq!(decoded.entries()[0].name, "dir");
        pretty_assertions::assert_eq!(decoded.entries()[0].mode, TreeEntryMode::directory());
        pretty_assertions::assert_eq!(
            decoded.entries()[1].mode,
            TreeEntryMode::regular_file(true)
        );
        pretty_assertions::assert_eq!(decoded.entries()[1].oid, oid);
    }

    #[rstest]
    fn deserialize_preserves_stored_order(oid: ObjectId) {
        // hand-build a body whose entries are deliberately unsorted
        let mut body = Vec::new();
        for name in ["zebra", "apple"] {
            body.extend_from_slice(format!("100644 {name}\0").as_bytes());
            body.extend_from_slice(&oid.to_raw().unwrap());
        }

        let decoded = Tree::deserialize(Cursor::new(body)).unwrap();
        let names: Vec<&str> = decoded.entries().iter().map(|e| e.name.as_str()).collect();
        pretty_assertions::assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn empty_tree_is_valid() {
        let tree = Tree::build(Vec::new());
        let decoded = Tree::deserialize(Cursor::new(body_of(&tree))).unwrap();
        assert!(decoded.entries().is_empty());
    }

    #[rstest]
    fn truncated_entry_is_corrupt(oid: ObjectId) {
        let mut body = Vec::new();
        body.extend_from_slice(b"100644 file\0");
        body.extend_from_slice(&oid.to_raw().unwrap()[..10]); // short hash

        assert!(matches!(
            Tree::deserialize(Cursor::new(body)),
            Err(GitError::CorruptObject(_))
        ));
    }
}
