//! Plumbing commands (low-level object operations)
//!
//! ## Commands
//!
//! - `cat-file`: print an object's content
//! - `hash-object`: compute an object ID and optionally store the object
//! - `ls-tree`: list a tree's entries
//! - `write-tree`: snapshot the working directory as tree objects
//! - `commit-tree`: create a commit object

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
