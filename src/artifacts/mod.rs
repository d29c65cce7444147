//! Git data structures and wire formats
//!
//! This module contains the core git types and codecs:
//!
//! - `objects`: git object types (blob, tree, commit) and their encodings
//! - `pack`: packfile parsing and delta instruction streams
//! - `protocol`: smart-HTTP transport and pkt-line framing

pub mod objects;
pub mod pack;
pub mod protocol;
