//! Packfile parsing
//!
//! A pack bundles many objects into one binary transfer: a `PACK` header,
//! a sequence of entries (raw zlib-compressed objects or deltas against a
//! base object in the same pack), and a trailing checksum this parser does
//! not validate.
//!
//! - `pack_object`: the parsed entry variants
//! - `delta`: delta instruction stream decoding and application
//! - `parser`: the sequential entry parser

pub mod delta;
pub mod pack_object;
pub mod parser;
