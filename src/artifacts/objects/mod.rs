//! Git object types and their binary encodings
//!
//! Every object serializes as `<type> <byte-length>\0<body>` and is addressed
//! by the SHA-1 of that full encoding.

pub mod blob;
pub mod commit;
pub mod entry_mode;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of an object ID in hexadecimal characters
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an object ID in raw bytes
pub const OBJECT_ID_RAW_LENGTH: usize = 20;
