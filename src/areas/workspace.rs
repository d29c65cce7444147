//! Working directory file system operations
//!
//! All paths handed in and out are relative to the workspace root. The
//! `.git` metadata directory is never listed.

use crate::errors::GitError;
use bytes::Bytes;
use is_executable::IsExecutable;
use std::path::{Path, PathBuf};

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the immediate children of a directory, excluding the reserved
    /// metadata entries, as paths relative to the workspace root.
    pub fn list_dir(&self, dir_path: &Path) -> Result<Vec<PathBuf>, GitError> {
        let absolute = self.path.join(dir_path);

        let mut children = Vec::new();
        for entry in std::fs::read_dir(&absolute)? {
            let entry = entry?;
            if let Some(path) = self.check_if_not_ignored_path(&entry.path()) {
                children.push(path);
            }
        }

        Ok(children)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_path(&self, path: &Path) -> Option<PathBuf> {
        if !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes, GitError> {
        let content = std::fs::read(self.path.join(file_path))?;

        Ok(content.into())
    }

    /// Query the executable bit for a file, defaulting to non-executable
    /// where the platform cannot answer.
    pub fn is_executable(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_executable()
    }

    /// Write a file during checkout, creating or truncating it, and mark it
    /// executable where the platform supports permissions.
    pub fn write_file(
        &self,
        file_path: &Path,
        data: &[u8],
        executable: bool,
    ) -> Result<(), GitError> {
        let absolute = self.path.join(file_path);
        std::fs::write(&absolute, data)?;

        #[cfg(unix)]
        if executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&absolute, std::fs::Permissions::from_mode(0o755))?;
        }
        #[cfg(not(unix))]
        let _ = executable;

        Ok(())
    }

    pub fn make_directory(&self, dir_path: &Path) -> Result<(), GitError> {
        std::fs::create_dir_all(self.path.join(dir_path))?;

        Ok(())
    }
}
