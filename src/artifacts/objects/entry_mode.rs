//! Tree entry modes
//!
//! Modes are stored as octal text in tree entries and classify what the
//! entry points at. Only regular files carry a permission distinction
//! (executable or not); every other kind is permissionless.

use crate::errors::GitError;

/// What a tree entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    RegularFile,
    Directory,
    SymbolicLink,
    Gitlink,
}

/// Mode of a tree entry: its kind plus the executable bit for regular files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeEntryMode {
    pub kind: EntryKind,
    pub executable: bool,
}

impl TreeEntryMode {
    pub fn regular_file(executable: bool) -> Self {
        TreeEntryMode {
            kind: EntryKind::RegularFile,
            executable,
        }
    }

    pub fn directory() -> Self {
        TreeEntryMode {
            kind: EntryKind::Directory,
            executable: false,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Octal text form written into tree entries, always 6 digits.
    pub fn as_octal(&self) -> &'static str {
        match (self.kind, self.executable) {
            (EntryKind::RegularFile, false) => "100644",
            (EntryKind::RegularFile, true) => "100755",
            (EntryKind::Directory, _) => "040000",
            (EntryKind::SymbolicLink, _) => "120000",
            (EntryKind::Gitlink, _) => "160000",
        }
    }

    /// Parse an octal mode string from a tree entry.
    ///
    /// The value is matched against the closed set of known modes; anything
    /// else (e.g. `100000`) is a decode failure.
    pub fn from_octal(text: &str) -> Result<Self, GitError> {
        let value = u32::from_str_radix(text, 8)
            .map_err(|_| GitError::CorruptObject(format!("invalid entry mode: {text}")))?;

        match value {
            0o100644 => Ok(TreeEntryMode::regular_file(false)),
            0o100755 => Ok(TreeEntryMode::regular_file(true)),
            0o040000 => Ok(TreeEntryMode::directory()),
            0o120000 => Ok(TreeEntryMode {
                kind: EntryKind::SymbolicLink,
                executable: false,
            }),
            0o160000 => Ok(TreeEntryMode {
                kind: EntryKind::Gitlink,
                executable: false,
            }),
            _ => Err(GitError::CorruptObject(format!(
                "invalid entry mode: {text}"
            ))),
        }
    }
}

impl std::fmt::Display for TreeEntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_octal())
    }
}
