//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings identifying all objects
//! in the store. Trees and pack entries carry them as 20 raw bytes instead.
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use crate::errors::GitError;
use sha1::{Digest, Sha1};
use std::io::Read;
use std::path::PathBuf;

/// Validated 40-character hexadecimal object identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    pub fn try_parse(id: String) -> Result<Self, GitError> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(GitError::CorruptObject(format!(
                "invalid object ID length: {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GitError::CorruptObject(format!(
                "invalid object ID characters: {id}"
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Hash an encoded object and return its ID
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Build an object ID from its 20 raw bytes
    pub fn from_raw(bytes: &[u8]) -> Result<Self, GitError> {
        if bytes.len() != OBJECT_ID_RAW_LENGTH {
            return Err(GitError::CorruptObject(format!(
                "invalid raw object ID length: {}",
                bytes.len()
            )));
        }
        Ok(Self(hex::encode(bytes)))
    }

    /// Raw 20-byte form, as embedded in tree entries and pack headers
    pub fn to_raw(&self) -> Result<Vec<u8>, GitError> {
        hex::decode(&self.0)
            .map_err(|err| GitError::CorruptObject(format!("invalid object ID hex: {err}")))
    }

    /// Read an object ID from its binary form (20 bytes)
    pub fn read_raw_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self, GitError> {
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];
        reader
            .read_exact(&mut raw)
            .map_err(|_| GitError::CorruptObject("unexpected EOF in object ID".to_string()))?;
        Self::from_raw(&raw)
    }

    /// Convert to the file system path used by object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
