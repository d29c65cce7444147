//! References (HEAD, branches) and the repository metadata template
//!
//! References are text files containing either a 40-character object ID or
//! `ref: <path>` for symbolic references. No locking protects ref writes;
//! concurrent updaters are not coordinated.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitError;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Branch checked out after `init` and `clone`
pub const DEFAULT_BRANCH: &str = "master";

/// Contents of the config file written at initialization
const CONFIG_TEMPLATE: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n\tlogallrefupdates = false\n";

/// Reference manager rooted at the `.git` directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
}

impl Refs {
    pub fn git_path(&self) -> &Path {
        &self.path
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn head_file(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn config_file(&self) -> PathBuf {
        self.path.join("config")
    }

    /// Point HEAD at a branch symbolically
    pub fn set_head_to_branch(&self, branch: &str) -> Result<(), GitError> {
        std::fs::write(self.head_file(), format!("ref: refs/heads/{branch}\n"))?;

        Ok(())
    }

    /// Write the initial config template
    pub fn write_config_template(&self) -> Result<(), GitError> {
        std::fs::write(self.config_file(), CONFIG_TEMPLATE)?;

        Ok(())
    }

    /// Write a branch ref to point at a commit
    pub fn update_ref(&self, branch: &str, oid: &ObjectId) -> Result<(), GitError> {
        let heads = self.heads_path();
        std::fs::create_dir_all(&heads)?;
        std::fs::write(heads.join(branch), format!("{oid}\n"))?;

        Ok(())
    }

    /// Resolve HEAD to an object ID, following one level of symbolic
    /// indirection. Returns `None` when HEAD or its target branch has no
    /// commit yet.
    pub fn read_head(&self) -> Result<Option<ObjectId>, GitError> {
        let Some(content) = Self::read_ref_file(&self.head_file())? else {
            return Ok(None);
        };

        let symref = regex::Regex::new(SYMREF_REGEX)
            .map_err(|err| GitError::CorruptObject(format!("symref pattern: {err}")))?
            .captures(&content)
            .map(|captures| captures[1].to_string());

        match symref {
            Some(target) => {
                let Some(target_content) = Self::read_ref_file(&self.path.join(target))? else {
                    return Ok(None);
                };
                Ok(Some(ObjectId::try_parse(target_content)?))
            }
            None => Ok(Some(ObjectId::try_parse(content)?)),
        }
    }

    fn read_ref_file(path: &Path) -> Result<Option<String>, GitError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(content.to_string()))
    }
}
