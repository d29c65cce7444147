//! Git commit object
//!
//! Commits tie a tree snapshot to its history and authorship.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The parent line is absent for a root commit.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Author or committer signature
///
/// Textual form: `<name> <<email>> <epoch-seconds> <±HHMM>`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a signature stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format the full signature as stored in commit objects
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load author information from GIT_AUTHOR_NAME / GIT_AUTHOR_EMAIL,
    /// stamping with GIT_AUTHOR_DATE when set and parseable.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = GitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let corrupt = || GitError::CorruptObject(format!("invalid signature: {value}"));

        // Split from the right: "<name> <<email>> <epoch> <±HHMM>"
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(corrupt());
        }
        let (offset_text, epoch_text, name_email) = (parts[0], parts[1], parts[2]);

        let epoch = epoch_text.parse::<i64>().map_err(|_| corrupt())?;
        let offset = parse_utc_offset(offset_text).ok_or_else(corrupt)?;

        let email_start = name_email.find('<').ok_or_else(corrupt)?;
        let email_end = name_email.find('>').ok_or_else(corrupt)?;
        if email_end < email_start {
            return Err(corrupt());
        }
        let name = name_email[..email_start].trim().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let timestamp = chrono::DateTime::from_timestamp(epoch, 0)
            .ok_or_else(corrupt)?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Parse a `±HHMM` UTC offset
fn parse_utc_offset(text: &str) -> Option<chrono::FixedOffset> {
    if text.len() != 5 {
        return None;
    }
    let sign = match &text[..1] {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let hours: i32 = text[1..3].parse().ok()?;
    let minutes: i32 = text[3..5].parse().ok()?;

    chrono::FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Git commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    /// Parent commit ID; absent for the initial commit
    parent: Option<ObjectId>,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author also signs as committer
    pub fn new(
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            tree_oid,
            parent,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes, GitError> {
        let content = self.display();

        let mut commit_bytes = Vec::with_capacity(content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> Result<Self, GitError> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)
            .map_err(|_| GitError::CorruptObject("commit is not UTF-8".to_string()))?;

        let corrupt = |what: &str| GitError::CorruptObject(format!("commit missing {what}"));
        let mut lines = content.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| corrupt("tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines.next().ok_or_else(|| corrupt("author line"))?;
        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                next_line = lines.next().ok_or_else(|| corrupt("author line"))?;
                Some(ObjectId::try_parse(parent_oid.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| corrupt("author line"))?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| corrupt("committer line"))?;
        let committer = Author::try_from(committer)?;

        // skip the blank separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Commit {
            tree_oid,
            parent,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}
