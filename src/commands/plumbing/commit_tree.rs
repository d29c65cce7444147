use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Create a commit object for an existing tree and print its ID.
    pub fn commit_tree(
        &mut self,
        tree: &str,
        parent: Option<&str>,
        message: &str,
    ) -> anyhow::Result<()> {
        let tree_oid = ObjectId::try_parse(tree.to_string())?;
        let parent = parent
            .map(|oid| ObjectId::try_parse(oid.to_string()))
            .transpose()?;
        let author = Author::load_from_env()?;

        let commit = Commit::new(tree_oid, parent, author, message.to_string());
        let oid = self.database().store(&commit)?;

        write!(self.writer(), "{oid}")?;

        Ok(())
    }
}
