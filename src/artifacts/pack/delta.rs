//! Delta instruction streams
//!
//! A delta describes one object's content as a sequence of copies out of a
//! base object plus inserted literals. The stream opens with two varints
//! (base size, target size) followed by op codes until exhaustion:
//!
//! - msb set: copy. The low 7 bits are a presence mask over up to four
//!   offset bytes (bits 0-3) and three size bytes (bits 4-6), accumulated
//!   little-endian. A decoded size of zero means 0x10000.
//! - msb clear, nonzero: insert of that many literal bytes.
//! - zero: invalid.

use crate::errors::GitError;
use bytes::Bytes;
use std::io::{ErrorKind, Read};

const COPY_INSTRUCTION_FLAG: u8 = 1 << 7; // msb set => copy from base, otherwise inline data
const COPY_OFFSET_BYTES: u8 = 4;
const COPY_SIZE_BYTES: u8 = 3;
const COPY_ZERO_SIZE: usize = 0x10000;

const VAR_INT_ENCODING_BITS: u8 = 7;
const VAR_INT_CONTINUE_FLAG: u8 = 1 << VAR_INT_ENCODING_BITS;

/// One decoded delta instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaInstruction {
    /// Copy `size` bytes from the base content starting at `offset`
    Copy { offset: usize, size: usize },
    /// Append the literal bytes
    Insert { data: Bytes },
}

/// Read exactly `N` bytes from the stream into a fixed array.
#[inline]
fn read_bytes<R: Read, const N: usize>(stream: &mut R) -> std::io::Result<[u8; N]> {
    let mut bytes = [0; N];
    stream.read_exact(&mut bytes)?;

    Ok(bytes)
}

/// Read a varint: little-endian 7-bit chunks, msb as continue flag.
pub fn read_size_encoding<R: Read>(stream: &mut R) -> Result<usize, GitError> {
    let mut value = 0;
    let mut length = 0;

    loop {
        let [byte] = read_bytes(stream)
            .map_err(|_| GitError::CorruptObject("unexpected EOF in varint".to_string()))?;
        value |= ((byte & !VAR_INT_CONTINUE_FLAG) as usize) << length;
        if byte & VAR_INT_CONTINUE_FLAG == 0 {
            return Ok(value);
        }

        length += VAR_INT_ENCODING_BITS;
    }
}

/// Read a partial integer according to presence bits (copy instructions):
/// for each set bit, consume one byte and accumulate it little-endian.
fn read_partial_int<R: Read>(
    stream: &mut R,
    bytes: u8,
    present_bytes: &mut u8,
) -> Result<usize, GitError> {
    let mut value: usize = 0;

    for byte_index in 0..bytes {
        if *present_bytes & 1 != 0 {
            let [byte] = read_bytes(stream).map_err(|_| {
                GitError::CorruptObject("unexpected EOF in copy instruction".to_string())
            })?;
            value |= (byte as usize) << (byte_index * 8);
        }

        *present_bytes >>= 1;
    }

    Ok(value)
}

/// Parse a decompressed delta stream into its declared sizes and ordered
/// instruction list. The running total is not checked against the target
/// size here; application enforces it.
pub fn parse_delta_stream(data: &[u8]) -> Result<(usize, usize, Vec<DeltaInstruction>), GitError> {
    let mut stream = data;

    let base_size = read_size_encoding(&mut stream)?;
    let target_size = read_size_encoding(&mut stream)?;

    let mut instructions = Vec::new();
    loop {
        let instruction = match read_bytes(&mut stream) {
            Ok([instruction]) => instruction,
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(GitError::Io(err)),
        };

        if instruction & COPY_INSTRUCTION_FLAG != 0 {
            let mut present_bytes = instruction & !COPY_INSTRUCTION_FLAG;
            let offset = read_partial_int(&mut stream, COPY_OFFSET_BYTES, &mut present_bytes)?;
            let mut size = read_partial_int(&mut stream, COPY_SIZE_BYTES, &mut present_bytes)?;
            if size == 0 {
                size = COPY_ZERO_SIZE;
            }
            instructions.push(DeltaInstruction::Copy { offset, size });
        } else if instruction == 0 {
            return Err(GitError::CorruptObject(
                "delta instruction opcode zero".to_string(),
            ));
        } else {
            let mut data = vec![0; instruction as usize];
            stream.read_exact(&mut data).map_err(|_| {
                GitError::CorruptObject("unexpected EOF in insert instruction".to_string())
            })?;
            instructions.push(DeltaInstruction::Insert {
                data: Bytes::from(data),
            });
        }
    }

    Ok((base_size, target_size, instructions))
}

/// Apply instructions in order against the base content, producing exactly
/// `target_size` bytes.
pub fn apply(
    instructions: &[DeltaInstruction],
    base: &[u8],
    target_size: usize,
) -> Result<Bytes, GitError> {
    let mut output = Vec::with_capacity(target_size);

    for instruction in instructions {
        match instruction {
            DeltaInstruction::Copy { offset, size } => {
                let copied = base.get(*offset..offset + size).ok_or_else(|| {
                    GitError::CorruptObject(format!(
                        "copy range {}..{} outside base of {} bytes",
                        offset,
                        offset + size,
                        base.len()
                    ))
                })?;
                output.extend_from_slice(copied);
            }
            DeltaInstruction::Insert { data } => output.extend_from_slice(data),
        }
    }

    if output.len() != target_size {
        return Err(GitError::ReconstructionSizeMismatch {
            expected: target_size,
            actual: output.len(),
        });
    }

    Ok(Bytes::from(output))
}
