use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use super::binary::A_MASK;

/**
  Opcodes of the virtual machine. The discriminant is the value of the `A` field, so the
  numbering is fixed by the binary format and is not consecutive. Every other value of `A`
  decodes to `Operation::Unknown`.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "store_indexed")]
  StoreIndexed = 3, // memory[B + C] = memory[D]
  #[strum(serialize = "store")]
  Store        = 5, // memory[B] = C
  #[strum(serialize = "copy")]
  Copy         = 7, // memory[B] = memory[C]
  #[strum(serialize = "xor")]
  Xor          = 9, // memory[B] = memory[C] ^ memory[D]
}

/**
  The four raw fields of an instruction, as the assembler hands them to the encoder or as they
  come out of the decoder. Assembly values arrive as their low 64 bits; narrowing to the field
  widths of the binary format happens in the encoder.
*/
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub a: u64,
  pub b: u64,
  pub c: u64,
  pub d: u64
}

impl Instruction {
  pub fn new(a: u64, b: u64, c: u64, d: u64) -> Instruction {
    Instruction { a, b, c, d }
  }

  /// The opcode named by `A`, if `A` names one.
  pub fn opcode(&self) -> Option<Opcode> {
    Opcode::try_from((self.a & A_MASK) as u8).ok()
  }
}

/// Prints the instruction in assembly syntax.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "A={}, B={}, C={}, D={}", self.a, self.b, self.c, self.d)
  }
}

/**
  A decoded instruction with its operands named by role. Values of `A` that are not opcodes
  are kept as `Unknown` so that execution can skip them and diagnostics can still print them.
*/
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
  /// [A=5] `memory[address] = value`
  Store {
    address: u64,
    value: u32
  },
  /// [A=7] `memory[destination] = memory[source]`
  Copy {
    destination: u64,
    source: u64
  },
  /// [A=3] `memory[base + offset] = memory[source]`
  StoreIndexed {
    base: u64,
    offset: u64,
    source: u64
  },
  /// [A=9] `memory[destination] = memory[left] ^ memory[right]`
  Xor {
    destination: u64,
    left: u64,
    right: u64
  },
  Unknown(Instruction),
}

impl Operation {
  pub fn opcode(&self) -> Option<Opcode> {
    match self {
      Operation::Store { .. }        => Some(Opcode::Store),
      Operation::Copy { .. }         => Some(Opcode::Copy),
      Operation::StoreIndexed { .. } => Some(Opcode::StoreIndexed),
      Operation::Xor { .. }          => Some(Opcode::Xor),
      Operation::Unknown(_)          => None
    }
  }
}

impl From<Instruction> for Operation {
  fn from(instruction: Instruction) -> Operation {
    let Instruction { b, c, d, .. } = instruction;
    match instruction.opcode() {
      Some(Opcode::Store)        => Operation::Store { address: b, value: c as u32 },
      Some(Opcode::Copy)         => Operation::Copy { destination: b, source: c },
      Some(Opcode::StoreIndexed) => Operation::StoreIndexed { base: b, offset: c, source: d },
      Some(Opcode::Xor)          => Operation::Xor { destination: b, left: c, right: d },
      None                       => Operation::Unknown(instruction)
    }
  }
}

impl Display for Operation {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Operation::Store { address, value } => {
        write!(f, "{}({}, {})", Opcode::Store, address, value)
      }

      Operation::Copy { destination, source } => {
        write!(f, "{}({}, {})", Opcode::Copy, destination, source)
      }

      Operation::StoreIndexed { base, offset, source } => {
        write!(f, "{}({}, {}, {})", Opcode::StoreIndexed, base, offset, source)
      }

      Operation::Xor { destination, left, right } => {
        write!(f, "{}({}, {}, {})", Opcode::Xor, destination, left, right)
      }

      Operation::Unknown(instruction) => {
        write!(f, "unknown({})", instruction)
      }

    }
  }
}
