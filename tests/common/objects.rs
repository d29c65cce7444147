//! Hand-built object encodings for fixtures
//!
//! These helpers construct object bytes and hashes directly from the on-disk
//! format, independently of the library's own encoders, so fixture packs
//! exercise the real codecs instead of echoing them.

use sha1::{Digest, Sha1};

/// Full encoding: `<type> <length>\0<body>`
pub fn encode_object(object_type: &str, body: &[u8]) -> Vec<u8> {
    let mut data = format!("{} {}\0", object_type, body.len()).into_bytes();
    data.extend_from_slice(body);
    data
}

/// Hex object ID of an encoded object
pub fn object_id(object_type: &str, body: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(encode_object(object_type, body));
    hex::encode(hasher.finalize())
}

/// One tree entry: `<mode> <name>\0<20 raw hash bytes>`
pub fn tree_entry(mode: &str, name: &str, oid_hex: &str) -> Vec<u8> {
    let mut entry = format!("{mode} {name}\0").into_bytes();
    entry.extend_from_slice(&hex::decode(oid_hex).expect("fixture oid is hex"));
    entry
}

/// Commit body pointing at a tree, with a fixed fixture signature
pub fn commit_body(tree_oid: &str, message: &str) -> Vec<u8> {
    let signature = "Ada Fixture <ada@example.com> 1700000000 +0000";
    format!("tree {tree_oid}\nauthor {signature}\ncommitter {signature}\n\n{message}")
        .into_bytes()
}
