/*!
  Assembler and interpreter for the UVM, a flat-memory virtual machine with four opcodes and a
  fixed 11 byte instruction record.

  ```text
  text  --[bytecode::assemble]-->  image  --[machine::execute]-->  memory  --[report_slice]-->  cells
  ```

  The two directions only share the codec in `bytecode`.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

#[macro_use]
pub mod log;
pub mod error;
pub mod bytecode;
pub mod machine;
pub mod report;
pub mod table;
pub mod files;

pub use error::{Result, SyntaxError, UvmError};
pub use machine::{execute, Memory, UVM, MEMORY_SIZE};
pub use report::{report_slice, MemoryCell, MemoryRange};
