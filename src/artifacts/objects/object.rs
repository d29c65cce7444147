use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::GitError;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;
use std::path::PathBuf;

pub trait Packable {
    /// Full on-disk encoding, including the `<type> <length>\0` header.
    fn serialize(&self) -> Result<Bytes, GitError>;
}

pub trait Unpackable {
    /// Decode an object body; the header has already been consumed.
    fn deserialize(reader: impl BufRead) -> Result<Self, GitError>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId, GitError> {
        Ok(ObjectId::digest(&self.serialize()?))
    }

    fn object_path(&self) -> Result<PathBuf, GitError> {
        Ok(self.object_id()?.to_path())
    }
}

/// Closed union over the decodable object types, used where the caller does
/// not know the type up front (e.g. `cat-file`).
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}

/// Untyped view of a stored object: its type tag and encoded body bytes.
///
/// Used for delta base lookup and pack ingestion, where the content is moved
/// around without being decoded.
#[derive(Debug, Clone, new)]
pub struct RawObject {
    pub object_type: ObjectType,
    pub content: Bytes,
}
