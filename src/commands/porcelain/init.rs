use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::errors::GitError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.init_template()
            .context("Failed to initialize repository")?;

        write!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.path().display()
        )?;

        Ok(())
    }

    /// Create the metadata directory template: objects/, an empty refs/,
    /// HEAD pointing at the default branch, and the config file. Fails
    /// without touching anything if the metadata directory already exists.
    pub(crate) fn init_template(&self) -> Result<(), GitError> {
        let git_path = self.refs().git_path();
        if git_path.exists() {
            return Err(GitError::RepositoryAlreadyExists(git_path.to_path_buf()));
        }

        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.refs().refs_path())?;

        self.refs().set_head_to_branch(DEFAULT_BRANCH)?;
        self.refs().write_config_template()?;

        Ok(())
    }
}
