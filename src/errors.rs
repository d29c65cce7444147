//! Error kinds surfaced by the core
//!
//! Every failure is fatal to the operation in progress and propagates to the
//! caller; nothing is retried and nothing already written is rolled back.
//! The command layer is responsible for rendering these and exiting non-zero.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    /// `init` on a root that already has a `.git` directory.
    #[error("git repository already exists at {}", .0.display())]
    RepositoryAlreadyExists(PathBuf),

    /// An operation other than `init` on a root with no `.git` directory.
    #[error("no git repository found at {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// No object file at the path derived from the hash.
    #[error("object {0} not found")]
    ObjectNotFound(String),

    /// The decompressed object or delta stream is malformed.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// The stored header names a different type than the one requested.
    #[error("trying to read {actual} as {expected}")]
    TypeMismatch { expected: String, actual: String },

    /// Pack header or entry shape this parser does not handle.
    #[error("unsupported pack format: {0}")]
    UnsupportedPackFormat(String),

    /// The pack buffer ran out of bytes for a declared field.
    #[error("truncated pack: {0}")]
    TruncatedPack(String),

    /// An object type name or pack type tag outside the known set.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// Delta application did not fill the declared target size exactly.
    #[error("delta reconstruction produced {actual} bytes, expected {expected}")]
    ReconstructionSizeMismatch { expected: usize, actual: usize },

    /// A deltified entry names a base that is not in the store after the
    /// first pass; delta chains are not resolved.
    #[error("unresolved delta base {0}")]
    UnresolvedDeltaBase(String),

    /// Checkout met a tree entry kind it cannot materialize.
    #[error("unsupported entry kind during checkout: {0}")]
    UnsupportedEntryKind(String),

    /// HTTP transport failure or malformed pkt-line framing.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
