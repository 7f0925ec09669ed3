/*!
  This module is responsible for the encoding and decoding of binary instructions.

  Every instruction occupies one 11 byte record:

    [A:4][B:28]  bytes 0..4,  little-endian, A in the low nibble of byte 0
    [C:32]       bytes 4..8,  little-endian
    [D:24]       bytes 8..11, little-endian

  Fields wider than their slot are masked, never rejected. In particular `D` has no fourth byte,
  so anything above bit 23 is lost.
*/
use std::convert::TryFrom;

use super::Instruction;
use crate::error::{Result, UvmError};

// If you change these you must also change `encode_instruction` and `unpack`.
pub const RECORD_SIZE: usize = 11;
pub type Record = [u8; RECORD_SIZE];

pub const A_MASK: u64 = 0xF;
pub const B_MASK: u64 = 0x0FFF_FFFF;
pub const C_MASK: u64 = 0xFFFF_FFFF;
pub const D_MASK: u64 = 0x00FF_FFFF;

/// Encodes the instruction into its record, keeping only the low bits of each field.
pub fn encode_instruction(instruction: &Instruction) -> Record {
  let mut record: Record = [0; RECORD_SIZE];

  // [A:4][B:28]
  let head = (instruction.a & A_MASK) | ((instruction.b & B_MASK) << 4);
  record[0..4].copy_from_slice(&(head as u32).to_le_bytes());
  // [C:32]
  record[4..8].copy_from_slice(&((instruction.c & C_MASK) as u32).to_le_bytes());
  // [D:24], the high byte of the u32 is dropped.
  record[8..11].copy_from_slice(&((instruction.d & D_MASK) as u32).to_le_bytes()[..3]);

  record
}

/// Decodes a record. Any 11 bytes decode to some instruction; opcode legality is the
/// interpreter's concern.
pub fn decode_record(record: &Record) -> Instruction {
  unpack(record)
}

/**
  Decodes a single record given as a slice. Fails with `UvmError::Format` when the slice is not
  exactly one record long. Use `records` to walk a whole program image.
*/
pub fn decode_instruction(bytes: &[u8]) -> Result<Instruction> {
  let record = <&Record>::try_from(bytes)
    .map_err(|_| UvmError::Format { length: bytes.len() })?;
  Ok(decode_record(record))
}

/**
  Iterates over the complete records of a program image, yielding each instruction with the byte
  offset of its record. A trailing partial record is skipped.
*/
pub fn records(image: &[u8]) -> impl Iterator<Item = (usize, Instruction)> + '_ {
  image
    .chunks_exact(RECORD_SIZE)
    .enumerate()
    .map(|(i, chunk)| (i * RECORD_SIZE, unpack(chunk)))
}

/// Number of complete records in the image.
pub fn record_count(image: &[u8]) -> usize {
  image.len() / RECORD_SIZE
}

// `bytes` must be at least `RECORD_SIZE` long.
fn unpack(bytes: &[u8]) -> Instruction {
  let head = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64;
  let c    = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as u64;
  let d    = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], 0]) as u64;

  Instruction {
    a: head & A_MASK,
    b: head >> 4,
    c,
    d
  }
}
