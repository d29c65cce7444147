//! Hand-built packfile fixtures
//!
//! Entries are assembled byte by byte from the pack format: varint entry
//! headers, zlib streams, and a trailing whole-pack checksum.

use sha1::{Digest, Sha1};
use std::io::Write;

pub const COMMIT_TAG: u8 = 1;
pub const TREE_TAG: u8 = 2;
pub const BLOB_TAG: u8 = 3;
pub const REF_DELTA_TAG: u8 = 7;

/// One pack entry before compression
pub struct PackEntry {
    pub tag: u8,
    /// Base object hash, only for ref-delta entries
    pub base_oid: Option<String>,
    /// Uncompressed payload: object body, or delta stream for ref-deltas
    pub payload: Vec<u8>,
}

impl PackEntry {
    pub fn undeltified(tag: u8, payload: Vec<u8>) -> Self {
        PackEntry {
            tag,
            base_oid: None,
            payload,
        }
    }

    pub fn ref_delta(base_oid: &str, delta_stream: Vec<u8>) -> Self {
        PackEntry {
            tag: REF_DELTA_TAG,
            base_oid: Some(base_oid.to_string()),
            payload: delta_stream,
        }
    }
}

/// Delta stream for rebuilding `helloHELLO world`-style targets: declared
/// sizes followed by raw instruction bytes supplied by the caller.
pub fn delta_stream(base_size: usize, target_size: usize, instructions: &[u8]) -> Vec<u8> {
    let mut stream = varint(base_size);
    stream.extend(varint(target_size));
    stream.extend_from_slice(instructions);
    stream
}

fn varint(mut value: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
        if value == 0 {
            return bytes;
        }
    }
}

fn entry_header(tag: u8, mut size: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut first = (tag << 4) | (size & 0x0f) as u8;
    size >>= 4;
    while size > 0 {
        bytes.push(first | 0x80);
        first = (size & 0x7f) as u8;
        size >>= 7;
    }
    bytes.push(first);
    bytes
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).expect("compressing fixture bytes");
    encoder.finish().expect("finishing fixture compression")
}

/// Assemble a version-2 pack with a trailing checksum
pub fn build_pack(entries: &[PackEntry]) -> Vec<u8> {
    let mut pack = Vec::new();
    pack.extend_from_slice(b"PACK");
    pack.extend_from_slice(&2u32.to_be_bytes());
    pack.extend_from_slice(&(entries.len() as u32).to_be_bytes());

    for entry in entries {
        pack.extend(entry_header(entry.tag, entry.payload.len()));
        if let Some(base_oid) = &entry.base_oid {
            pack.extend(hex::decode(base_oid).expect("fixture oid is hex"));
        }
        pack.extend(compress(&entry.payload));
    }

    let mut hasher = Sha1::new();
    hasher.update(&pack);
    let checksum = hasher.finalize();
    pack.extend_from_slice(&checksum);

    pack
}
