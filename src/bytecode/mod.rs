/*!

  The VM has a single instruction format. Every instruction is one 11 byte record holding four
  unsigned fields:

    A:  4 bits   opcode
    B: 28 bits   first operand
    C: 32 bits   second operand
    D: 24 bits   third operand

  A program image is nothing but records laid end to end, with no header and no padding. There
  are no jumps, so the order of records is the order of execution.

  Decoding never fails for a full record. Whether `A` names an opcode is only decided when the
  raw `Instruction` is turned into an `Operation`, which is a tagged union with one variant per
  opcode plus `Unknown` for everything else. The interpreter matches on `Operation`, so adding an
  opcode is a compile error everywhere it has to be handled.

*/

mod binary;
mod instruction;
mod assembly;

pub use binary::{encode_instruction, decode_instruction, decode_record, records, record_count,
                 Record, RECORD_SIZE, A_MASK, B_MASK, C_MASK, D_MASK};
pub use instruction::{Instruction, Opcode, Operation};
pub use assembly::{assemble, disassemble, parse_line, Assembler, Assembly, Field, FieldMap,
                   TraceRecord};
