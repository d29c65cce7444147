//! Sequential packfile parser
//!
//! Consumes an in-memory pack buffer: a 12-byte header (`PACK`, version 2,
//! object count), then that many entries back to back. Each entry opens with
//! a varint whose first byte carries a 3-bit type tag and 4 size bits, the
//! low 7 bits of every following byte extending the size little-endian.
//!
//! Entry payloads are zlib streams. Reference deltas (tag 7) prefix the
//! stream with the 20 raw bytes of the base object's hash. Offset deltas
//! (tag 6) are not resolved here and fail loudly. The trailing pack checksum
//! is not validated.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_RAW_LENGTH;
use crate::artifacts::pack::delta;
use crate::artifacts::pack::pack_object::PackObject;
use crate::errors::GitError;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use std::io::Read;

const PACK_SIGNATURE: &[u8; 4] = b"PACK";
const SUPPORTED_VERSION: u32 = 2;
const HEADER_LENGTH: usize = 12;

const TYPE_BITS: u8 = 3;
const TYPE_BYTE_SIZE_BITS: u8 = 4;
const VAR_INT_CONTINUE_FLAG: u8 = 1 << 7;

const OFFSET_DELTA_TAG: u8 = 6;
const REFERENCE_DELTA_TAG: u8 = 7;

pub struct PackParser<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> PackParser<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        PackParser { buffer, cursor: 0 }
    }

    /// Parse the whole buffer into its entries, in pack order.
    pub fn parse(mut self) -> Result<Vec<PackObject>, GitError> {
        let count = self.parse_header()?;

        let mut objects = Vec::with_capacity(count as usize);
        for _ in 0..count {
            objects.push(self.parse_entry()?);
        }

        // a trailing whole-pack checksum, if present, is not validated
        Ok(objects)
    }

    fn parse_header(&mut self) -> Result<u32, GitError> {
        if self.buffer.len() < HEADER_LENGTH {
            return Err(GitError::TruncatedPack(format!(
                "header needs {HEADER_LENGTH} bytes, got {}",
                self.buffer.len()
            )));
        }
        if &self.buffer[..4] != PACK_SIGNATURE {
            return Err(GitError::UnsupportedPackFormat(
                "missing PACK signature".to_string(),
            ));
        }

        let version = BigEndian::read_u32(&self.buffer[4..8]);
        if version != SUPPORTED_VERSION {
            return Err(GitError::UnsupportedPackFormat(format!(
                "pack version {version}"
            )));
        }

        let count = BigEndian::read_u32(&self.buffer[8..12]);
        self.cursor = HEADER_LENGTH;

        Ok(count)
    }

    fn parse_entry(&mut self) -> Result<PackObject, GitError> {
        let (tag, size) = self.read_entry_header()?;

        match tag {
            OFFSET_DELTA_TAG => Err(GitError::UnsupportedPackFormat(
                "offset-delta entries are not supported".to_string(),
            )),
            REFERENCE_DELTA_TAG => {
                let base_oid = self.read_base_oid()?;
                let delta_stream = self.inflate(size)?;
                let (_base_size, target_size, instructions) =
                    delta::parse_delta_stream(&delta_stream)?;

                Ok(PackObject::Deltified {
                    base_oid,
                    target_size,
                    instructions,
                })
            }
            tag => {
                let object_type = ObjectType::from_pack_tag(tag)?;
                let content = self.inflate(size)?;

                Ok(PackObject::Undeltified {
                    object_type,
                    content,
                })
            }
        }
    }

    /// Entry header varint: bits 4-6 of the first byte are the type tag, its
    /// low 4 bits start the size, each continuation byte adds 7 more bits.
    fn read_entry_header(&mut self) -> Result<(u8, usize), GitError> {
        let first = self.next_byte("entry header")?;
        let tag = (first >> TYPE_BYTE_SIZE_BITS) & ((1 << TYPE_BITS) - 1);
        let mut size = (first & ((1 << TYPE_BYTE_SIZE_BITS) - 1)) as usize;
        let mut shift = TYPE_BYTE_SIZE_BITS as usize;

        let mut byte = first;
        while byte & VAR_INT_CONTINUE_FLAG != 0 {
            byte = self.next_byte("entry header")?;
            size |= ((byte & !VAR_INT_CONTINUE_FLAG) as usize) << shift;
            shift += 7;
        }

        Ok((tag, size))
    }

    fn next_byte(&mut self, field: &str) -> Result<u8, GitError> {
        let byte = *self
            .buffer
            .get(self.cursor)
            .ok_or_else(|| GitError::TruncatedPack(format!("unexpected end of {field}")))?;
        self.cursor += 1;

        Ok(byte)
    }

    fn read_base_oid(&mut self) -> Result<ObjectId, GitError> {
        let end = self.cursor + OBJECT_ID_RAW_LENGTH;
        let raw = self.buffer.get(self.cursor..end).ok_or_else(|| {
            GitError::TruncatedPack("unexpected end of delta base hash".to_string())
        })?;
        let oid = ObjectId::from_raw(raw)?;
        self.cursor = end;

        Ok(oid)
    }

    /// Inflate the zlib stream at the cursor, which must decompress to
    /// exactly `expected` bytes, and advance past its compressed form.
    fn inflate(&mut self, expected: usize) -> Result<Bytes, GitError> {
        let mut decoder = flate2::bufread::ZlibDecoder::new(&self.buffer[self.cursor..]);
        let mut content = Vec::with_capacity(expected);
        decoder
            .read_to_end(&mut content)
            .map_err(|err| GitError::TruncatedPack(format!("zlib stream: {err}")))?;

        if content.len() != expected {
            return Err(GitError::TruncatedPack(format!(
                "entry inflated to {} bytes, expected {expected}",
                content.len()
            )));
        }

        self.cursor += decoder.total_in() as usize;

        Ok(Bytes::from(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::pack::delta::DeltaInstruction;
    use std::io::Write;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
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

    fn pack_with(count: u32, entries: &[u8]) -> Vec<u8> {
        let mut pack = Vec::new();
        pack.extend_from_slice(b"PACK");
        pack.extend_from_slice(&2u32.to_be_bytes());
        pack.extend_from_slice(&count.to_be_bytes());
        pack.extend_from_slice(entries);
        pack
    }

    #[test]
    fn parses_undeltified_entries_in_order() {
        let mut entries = Vec::new();
        entries.extend(entry_header(3, 5));
        entries.extend(compress(b"alpha"));
        entries.extend(entry_header(1, 4));
        entries.extend(compress(b"beta"));

        let objects = PackParser::new(&pack_with(2, &entries)).parse().unwrap();
        pretty_assertions::assert_eq!(objects.len(), 2);
        assert!(matches!(
            &objects[0],
            PackObject::Undeltified { object_type: ObjectType::Blob, content } if &content[..] == b"alpha"
        ));
        assert!(matches!(
            &objects[1],
            PackObject::Undeltified { object_type: ObjectType::Commit, content } if &content[..] == b"beta"
        ));
    }

    #[test]
    fn parses_reference_delta_entry() {
        let base_oid = ObjectId::digest(b"base");

        // delta stream: base size 11, target size 16, copy(0,5) insert("HELLO") copy(5,6)
        let mut delta_stream = vec![11u8, 16u8];
        delta_stream.extend_from_slice(&[0b1001_0000, 5]);
        delta_stream.push(5);
        delta_stream.extend_from_slice(b"HELLO");
        delta_stream.extend_from_slice(&[0b1001_0001, 5, 6]);

        let mut entries = Vec::new();
        entries.extend(entry_header(7, delta_stream.len()));
        entries.extend(base_oid.to_raw().unwrap());
        entries.extend(compress(&delta_stream));

        let objects = PackParser::new(&pack_with(1, &entries)).parse().unwrap();
        match &objects[0] {
            PackObject::Deltified {
                base_oid: oid,
                target_size,
                instructions,
            } => {
                pretty_assertions::assert_eq!(oid, &base_oid);
                pretty_assertions::assert_eq!(*target_size, 16);
                pretty_assertions::assert_eq!(instructions.len(), 3);
                assert!(matches!(
                    instructions[0],
                    DeltaInstruction::Copy { offset: 0, size: 5 }
                ));
            }
            other => panic!("expected deltified entry, got {other:?}"),
        }
    }

    #[test]
    fn large_entry_size_spans_header_bytes() {
        let content = vec![b'x'; 300];
        let mut entries = Vec::new();
        entries.extend(entry_header(3, content.len()));
        entries.extend(compress(&content));

        let objects = PackParser::new(&pack_with(1, &entries)).parse().unwrap();
        assert!(matches!(
            &objects[0],
            PackObject::Undeltified { content, .. } if content.len() == 300
        ));
    }

    #[test]
    fn rejects_wrong_version() {
        let mut pack = Vec::new();
        pack.extend_from_slice(b"PACK");
        pack.extend_from_slice(&3u32.to_be_bytes());
        pack.extend_from_slice(&0u32.to_be_bytes());

        assert!(matches!(
            PackParser::new(&pack).parse(),
            Err(GitError::UnsupportedPackFormat(_))
        ));
    }

    #[test]
    fn rejects_missing_signature() {
        let pack = b"JUNK\x00\x00\x00\x02\x00\x00\x00\x00".to_vec();
        assert!(matches!(
            PackParser::new(&pack).parse(),
            Err(GitError::UnsupportedPackFormat(_))
        ));
    }

    #[test]
    fn rejects_offset_delta_entries() {
        let mut entries = Vec::new();
        entries.extend(entry_header(6, 4));
        entries.extend(compress(b"1234"));

        assert!(matches!(
            PackParser::new(&pack_with(1, &entries)).parse(),
            Err(GitError::UnsupportedPackFormat(_))
        ));
    }

    #[test]
    fn reserved_tag_is_unknown() {
        let mut entries = Vec::new();
        entries.extend(entry_header(5, 4));
        entries.extend(compress(b"1234"));

        assert!(matches!(
            PackParser::new(&pack_with(1, &entries)).parse(),
            Err(GitError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn truncated_entry_is_fatal() {
        let mut entries = Vec::new();
        entries.extend(entry_header(3, 5));
        let compressed = compress(b"alpha");
        entries.extend(&compressed[..compressed.len() / 2]);

        assert!(matches!(
            PackParser::new(&pack_with(1, &entries)).parse(),
            Err(GitError::TruncatedPack(_))
        ));
    }

    #[test]
    fn declared_size_must_match_inflated_length() {
        let mut entries = Vec::new();
        entries.extend(entry_header(3, 9));
        entries.extend(compress(b"alpha"));

        assert!(matches!(
            PackParser::new(&pack_with(1, &entries)).parse(),
            Err(GitError::TruncatedPack(_))
        ));
    }
}
