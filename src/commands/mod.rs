//! Command implementations
//!
//! This module contains all command implementations, organized into two
//! categories following git's architecture:
//!
//! - `plumbing`: low-level object manipulation (hash-object, ls-tree, ...)
//! - `porcelain`: user-facing workflows (init, clone)
//!
//! Commands are thin: they parse nothing themselves and only compose the
//! areas and artifacts underneath.

pub mod plumbing;
pub mod porcelain;
