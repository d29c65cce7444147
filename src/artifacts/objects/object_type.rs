use crate::errors::GitError;
use std::io::BufRead;

/// Registry mapping stored type names to tags, built once at compile time.
pub const OBJECT_TYPES: phf::Map<&'static str, ObjectType> = phf::phf_map! {
    "blob" => ObjectType::Blob,
    "tree" => ObjectType::Tree,
    "commit" => ObjectType::Commit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parse the loose object header `<type> <length>\0` from a reader,
    /// returning the stored type and its declared body length.
    ///
    /// The length is taken at face value; it is not re-validated against the
    /// bytes that actually follow.
    pub fn parse_header(reader: &mut impl BufRead) -> Result<(ObjectType, usize), GitError> {
        let mut type_bytes = Vec::new();
        reader.read_until(b' ', &mut type_bytes)?;
        if type_bytes.pop() != Some(b' ') {
            return Err(GitError::CorruptObject(
                "object header has no space after type".to_string(),
            ));
        }

        let type_name = String::from_utf8(type_bytes)
            .map_err(|_| GitError::CorruptObject("object type is not UTF-8".to_string()))?;
        let object_type = ObjectType::try_from(type_name.as_str())?;

        let mut length_bytes = Vec::new();
        reader.read_until(b'\0', &mut length_bytes)?;
        if length_bytes.pop() != Some(b'\0') {
            return Err(GitError::CorruptObject(
                "object header has no NUL after length".to_string(),
            ));
        }

        let length = std::str::from_utf8(&length_bytes)
            .ok()
            .and_then(|text| text.parse::<usize>().ok())
            .ok_or_else(|| {
                GitError::CorruptObject("object header length is not a decimal number".to_string())
            })?;

        Ok((object_type, length))
    }

    /// Map a pack entry type tag to an object type.
    ///
    /// Tags 6 (offset delta) and 7 (reference delta) are handled by the pack
    /// parser before this point; tag 4 (annotated tag) has no decoder in this
    /// store and tag 5 is reserved.
    pub fn from_pack_tag(tag: u8) -> Result<ObjectType, GitError> {
        match tag {
            1 => Ok(ObjectType::Commit),
            2 => Ok(ObjectType::Tree),
            3 => Ok(ObjectType::Blob),
            4 => Err(GitError::UnknownObjectType("tag".to_string())),
            other => Err(GitError::UnknownObjectType(format!("pack tag {other}"))),
        }
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = GitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        OBJECT_TYPES
            .get(value)
            .copied()
            .ok_or_else(|| GitError::UnknownObjectType(value.to_string()))
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
