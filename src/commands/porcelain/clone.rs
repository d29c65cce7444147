use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::artifacts::objects::entry_mode::EntryKind;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::pack::delta;
use crate::artifacts::pack::pack_object::PackObject;
use crate::artifacts::pack::parser::PackParser;
use crate::artifacts::protocol::client::GitClient;
use crate::errors::GitError;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Clone a remote repository over smart HTTP into `destination`.
    ///
    /// Every step's failure aborts the whole operation; objects already
    /// written stay on disk, there is no rollback.
    pub fn clone_from(
        url: &str,
        destination: &Path,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let client = GitClient::new(url);

        let references = client.fetch_references()?;
        let target = references
            .first()
            .context("remote advertised no references")?;

        let pack = client.fetch_pack(&target.oid)?;
        let objects = PackParser::new(&pack).parse()?;

        let repository = Repository::at(destination, writer)?;
        repository.init_template()?;

        // first pass: store every undeltified object, so that any delta's
        // declared base is resolvable by lookup afterwards
        for object in &objects {
            if let PackObject::Undeltified {
                object_type,
                content,
            } = object
            {
                repository.database().store_raw(*object_type, content)?;
            }
        }

        // second pass: resolve deltas against the bases stored above; a
        // base that is itself an unresolved delta is not supported
        for object in &objects {
            if let PackObject::Deltified {
                base_oid,
                target_size,
                instructions,
            } = object
            {
                let base = repository
                    .database()
                    .load_raw(base_oid)
                    .map_err(|err| match err {
                        GitError::ObjectNotFound(_) => {
                            GitError::UnresolvedDeltaBase(base_oid.to_string())
                        }
                        other => other,
                    })?;

                let content = delta::apply(instructions, &base.content, *target_size)?;
                // a delta inherits its base's logical type
                repository
                    .database()
                    .store_raw(base.object_type, &content)?;
            }
        }

        let head_commit = repository.database().load_commit(&target.oid)?;
        let head_tree = repository.database().load_tree(head_commit.tree_oid())?;
        repository.checkout_tree(&head_tree, Path::new(""))?;

        repository.refs().update_ref(DEFAULT_BRANCH, &target.oid)?;

        write!(
            repository.writer(),
            "Cloned repository into {}",
            repository.path().display()
        )?;

        Ok(repository)
    }

    /// Materialize a tree into the workspace: directories are created and
    /// recursed into, blobs are written verbatim. Symlink and gitlink
    /// entries cannot be checked out.
    fn checkout_tree(&self, tree: &Tree, prefix: &Path) -> Result<(), GitError> {
        for entry in tree.entries() {
            let path = prefix.join(&entry.name);

            match entry.mode.kind {
                EntryKind::RegularFile => {
                    let blob = self.database().load_blob(&entry.oid)?;
                    self.workspace()
                        .write_file(&path, blob.content(), entry.mode.executable)?;
                }
                EntryKind::Directory => {
                    let subtree = self.database().load_tree(&entry.oid)?;
                    self.workspace().make_directory(&path)?;
                    self.checkout_tree(&subtree, &path)?;
                }
                EntryKind::SymbolicLink | EntryKind::Gitlink => {
                    return Err(GitError::UnsupportedEntryKind(
                        entry.mode.as_octal().to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
