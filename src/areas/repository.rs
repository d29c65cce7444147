use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::GitError;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the reserved metadata directory
pub const METADATA_DIR: &str = ".git";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open an existing repository; the metadata directory must be present.
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self, GitError> {
        let path = path.canonicalize()?;

        if !path.join(METADATA_DIR).exists() {
            return Err(GitError::RepositoryNotFound(path));
        }

        Ok(Self::assemble(path, writer))
    }

    /// Bind to a root that is not required to be a repository yet, creating
    /// the directory if absent. Used by `init` and `clone`.
    pub fn at(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self, GitError> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        Ok(Self::assemble(path, writer))
    }

    fn assemble(path: std::path::PathBuf, writer: Box<dyn std::io::Write>) -> Self {
        let database = Database::new(
            path.join(METADATA_DIR)
                .join("objects")
                .into_boxed_path(),
        );
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(METADATA_DIR).into_boxed_path());

        Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
