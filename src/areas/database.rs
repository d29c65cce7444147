//! Content-addressed object database
//!
//! Objects live at `.git/objects/<hash[0:2]>/<hash[2:40]>` as zlib-compressed
//! `<type> <length>\0<body>` buffers. The store is append-only: writing the
//! same logical content always produces the same hash and the same bytes, so
//! an existing file is never rewritten. There is no locking and no atomic
//! rename; a crash mid-write can leave a truncated object file.
//!
//! On read, the header embedded in the stored bytes is authoritative for
//! type and length; content is not re-hashed against the object ID.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, RawObject, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::GitError;
use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use std::path::Path;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Encode, hash, compress, and persist an object. Returns its ID.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId, GitError> {
        let data = object.serialize()?;
        self.write_encoded(&data)
    }

    /// Persist already-encoded content under the given type, prepending the
    /// `<type> <length>\0` header. Used for pack ingestion, where the type
    /// comes from the entry header rather than a decoded object.
    pub fn store_raw(&self, object_type: ObjectType, content: &[u8]) -> Result<ObjectId, GitError> {
        let mut data = Vec::with_capacity(content.len() + 16);
        write!(data, "{} {}\0", object_type.as_str(), content.len())?;
        data.extend_from_slice(content);

        self.write_encoded(&data)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> Result<Blob, GitError> {
        Blob::deserialize(self.typed_reader(oid, ObjectType::Blob)?)
    }

    pub fn load_tree(&self, oid: &ObjectId) -> Result<Tree, GitError> {
        Tree::deserialize(self.typed_reader(oid, ObjectType::Tree)?)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit, GitError> {
        Commit::deserialize(self.typed_reader(oid, ObjectType::Commit)?)
    }

    /// Decode whatever type the stored header names.
    pub fn load_any(&self, oid: &ObjectId) -> Result<ObjectBox, GitError> {
        let (object_type, _, reader) = self.open_object(oid)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    /// Return the stored type tag and exactly the declared number of content
    /// bytes, without type-specific decoding. Used for delta base lookup.
    pub fn load_raw(&self, oid: &ObjectId) -> Result<RawObject, GitError> {
        let (object_type, length, mut reader) = self.open_object(oid)?;

        let mut content = vec![0u8; length];
        reader.read_exact(&mut content).map_err(|_| {
            GitError::CorruptObject(format!("object {oid} shorter than its declared length"))
        })?;

        Ok(RawObject::new(object_type, Bytes::from(content)))
    }

    fn typed_reader(
        &self,
        oid: &ObjectId,
        expected: ObjectType,
    ) -> Result<Cursor<Bytes>, GitError> {
        let (actual, _, reader) = self.open_object(oid)?;

        if actual != expected {
            return Err(GitError::TypeMismatch {
                expected: expected.as_str().to_string(),
                actual: actual.as_str().to_string(),
            });
        }

        Ok(reader)
    }

    fn open_object(
        &self,
        oid: &ObjectId,
    ) -> Result<(ObjectType, usize, Cursor<Bytes>), GitError> {
        let content = self.read_object(oid)?;
        let mut reader = Cursor::new(content);

        let (object_type, length) = ObjectType::parse_header(&mut reader)?;

        Ok((object_type, length, reader))
    }

    fn read_object(&self, oid: &ObjectId) -> Result<Bytes, GitError> {
        let object_path = self.path.join(oid.to_path());

        let compressed = std::fs::read(&object_path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => GitError::ObjectNotFound(oid.to_string()),
            _ => GitError::Io(err),
        })?;

        Self::decompress(&compressed)
    }

    fn write_encoded(&self, data: &[u8]) -> Result<ObjectId, GitError> {
        let oid = ObjectId::digest(data);
        let object_path = self.path.join(oid.to_path());

        // identical content always serializes to identical bytes, so an
        // existing file never needs rewriting
        if object_path.exists() {
            return Ok(oid);
        }

        let object_dir = object_path.parent().ok_or_else(|| {
            GitError::CorruptObject(format!("invalid object path {}", object_path.display()))
        })?;
        std::fs::create_dir_all(object_dir)?;

        let compressed = Self::compress(data)?;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&object_path)?;
        file.write_all(&compressed)?;

        Ok(oid)
    }

    fn compress(data: &[u8]) -> Result<Bytes, GitError> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        Ok(encoder.finish()?.into())
    }

    fn decompress(data: &[u8]) -> Result<Bytes, GitError> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        Ok(decompressed.into())
    }
}
