use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::entry_mode::TreeEntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Snapshot the working directory as tree objects and print the root
    /// tree's ID.
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let oid = self.build_tree(Path::new(""))?;

        write!(self.writer(), "{oid}")?;

        Ok(())
    }

    /// Depth-first recursive walk: blobs are stored as they are met,
    /// subdirectories are built before their parent so the child tree's ID
    /// is known. Entry kinds other than files and directories are skipped.
    pub(crate) fn build_tree(&self, dir_path: &Path) -> anyhow::Result<ObjectId> {
        let mut entries = Vec::new();

        for child in self.workspace().list_dir(dir_path)? {
            let name = child
                .file_name()
                .and_then(|name| name.to_str())
                .context("invalid file name in workspace")?
                .to_string();
            let absolute = self.workspace().path().join(&child);

            if absolute.is_dir() {
                let oid = self.build_tree(&child)?;
                entries.push(TreeEntry::new(TreeEntryMode::directory(), name, oid));
            } else if absolute.is_file() {
                let blob = Blob::new(self.workspace().read_file(&child)?);
                let oid = self.database().store(&blob)?;
                let executable = self.workspace().is_executable(&child);
                entries.push(TreeEntry::new(
                    TreeEntryMode::regular_file(executable),
                    name,
                    oid,
                ));
            }
            // symlinks and special files are skipped
        }

        let tree = Tree::build(entries);
        Ok(self.database().store(&tree)?)
    }
}
