use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;

impl Repository {
    /// List a tree's entries, one `<mode> <type> <oid>\t<name>` line each.
    /// Accepts a tree ID, a commit ID (its tree is listed), or `HEAD`.
    pub fn ls_tree(&mut self, object_sha: &str) -> anyhow::Result<()> {
        let oid = if object_sha == "HEAD" {
            self.refs()
                .read_head()?
                .context("HEAD does not point at a commit yet")?
        } else {
            ObjectId::try_parse(object_sha.to_string())?
        };

        let tree = match self.database().load_any(&oid)? {
            ObjectBox::Tree(tree) => *tree,
            ObjectBox::Commit(commit) => self.database().load_tree(commit.tree_oid())?,
            ObjectBox::Blob(_) => anyhow::bail!("object {oid} is not a tree"),
        };

        self.print_tree(&tree)
    }

    fn print_tree(&self, tree: &Tree) -> anyhow::Result<()> {
        for entry in tree.entries() {
            let entry_type = if entry.mode.is_directory() {
                "tree"
            } else {
                "blob"
            };
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode.as_octal(),
                entry_type,
                entry.oid,
                entry.name
            )?;
        }

        Ok(())
    }
}
