//! A minimal git implementation: loose object storage, tree building,
//! packfile parsing with ref-delta resolution, and a smart-HTTP clone client.
//!
//! - `areas`: the repository's core components (database, workspace, refs)
//! - `artifacts`: git data structures and wire formats (objects, pack, protocol)
//! - `commands`: plumbing and porcelain command implementations
//! - `errors`: structured error kinds surfaced by the core

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
