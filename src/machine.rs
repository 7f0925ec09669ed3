//! Memory and the interpreter loop of the UVM, the flat-memory virtual machine.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use prettytable::Table;

use crate::bytecode::{records, Operation};
use crate::error::{Result, UvmError};
use crate::report::{report_slice, MemoryCell, MemoryRange};
use crate::table::make_memory_table;

/// Number of cells in memory. Valid addresses are `0..MEMORY_SIZE`.
pub const MEMORY_SIZE: usize = 1024;

/// An address that does not name a memory cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AddressOutOfRange(pub u64);

/// The VM's only state: `MEMORY_SIZE` cells of 32 bits each, all zero when created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Memory {
  cells: Vec<u32>
}

impl Memory {
  pub fn new() -> Memory {
    Memory {
      cells: vec![0; MEMORY_SIZE]
    }
  }

  fn idx(address: u64) -> std::result::Result<usize, AddressOutOfRange> {
    match usize::try_from(address) {
      Ok(i) if i < MEMORY_SIZE => Ok(i),
      _                        => Err(AddressOutOfRange(address))
    }
  }

  pub fn read(&self, address: u64) -> std::result::Result<u32, AddressOutOfRange> {
    Ok(self.cells[Memory::idx(address)?])
  }

  /// Writes `value` and returns the index written to.
  pub fn write(&mut self, address: u64, value: u32) -> std::result::Result<usize, AddressOutOfRange> {
    let i = Memory::idx(address)?;
    self.cells[i] = value;
    Ok(i)
  }

  pub fn cells(&self) -> &[u32] {
    &self.cells
  }

  pub fn clear(&mut self) {
    self.cells.iter_mut().for_each(|cell| *cell = 0);
  }
}

impl Default for Memory {
  fn default() -> Memory {
    Memory::new()
  }
}

/**
  Executes one operation. Returns the index of the cell written, or `None` for an unknown
  opcode. Sources are read before the destination is checked, so a faulting instruction never
  writes anything.
*/
pub fn step(memory: &mut Memory, operation: &Operation)
  -> std::result::Result<Option<usize>, AddressOutOfRange>
{
  let written =
    match *operation {

      Operation::Store { address, value } => {
        memory.write(address, value)?
      }

      Operation::Copy { destination, source } => {
        let value = memory.read(source)?;
        memory.write(destination, value)?
      }

      Operation::StoreIndexed { base, offset, source } => {
        let value = memory.read(source)?;
        memory.write(base.saturating_add(offset), value)?
      }

      Operation::Xor { destination, left, right } => {
        let value = memory.read(left)? ^ memory.read(right)?;
        memory.write(destination, value)?
      }

      Operation::Unknown(_) => return Ok(None)

    };
  Ok(Some(written))
}

/**
  Runs every complete record of `image` against `memory`, in order, and returns how many were
  executed. Trailing bytes that do not make up a whole record are ignored.

  The first out-of-range address stops the run with `UvmError::MemoryFault`. Writes made by
  earlier instructions stay in `memory`.
*/
pub fn execute(image: &[u8], memory: &mut Memory) -> Result<usize> {
  execute_observed(image, memory, |_, _, _, _| {})
}

// The record loop shared by `execute` and `UVM::run`. `after_step` sees memory, the record
// offset, the operation and the cell written, once per instruction that completed.
fn execute_observed<F>(image: &[u8], memory: &mut Memory, mut after_step: F) -> Result<usize>
  where F: FnMut(&Memory, usize, &Operation, Option<usize>)
{
  let mut executed = 0;
  for (offset, instruction) in records(image) {
    let operation = Operation::from(instruction);
    let written =
      step(memory, &operation)
        .map_err(|AddressOutOfRange(address)| UvmError::MemoryFault { offset, address })?;
    executed += 1;
    after_step(memory, offset, &operation, written);
  }
  Ok(executed)
}

// The non-zero cells, plus the last one written even if it is zero.
fn memory_table(memory: &Memory, last_write: Option<usize>) -> Table {
  let cells =
    memory.cells()
          .iter()
          .enumerate()
          .filter(|(i, value)| **value != 0 || Some(*i) == last_write)
          .map(|(i, value)| (i, *value));
  make_memory_table('M', cells, last_write)
}

/// A machine that owns its memory and remembers the last cell it wrote, for display.
#[derive(Clone, Debug, Default)]
pub struct UVM {
  memory     : Memory,
  last_write : Option<usize>, // Highlighted when displayed
  executed   : usize          // Instructions executed by the last run
}

impl UVM {

  pub fn new() -> UVM {
    UVM {
      memory     : Memory::new(),
      last_write : None,
      executed   : 0
    }
  }

  /**
    Clears memory and executes the image. Same contract as `execute`; on a fault, the
    instructions executed before it are still counted by `executed()`.
  */
  pub fn run(&mut self, image: &[u8]) -> Result<usize> {
    let UVM { memory, last_write, executed } = self;
    memory.clear();
    *last_write = None;
    *executed = 0;

    execute_observed(image, memory, |_memory, _offset, _operation, written| {
      if written.is_some() {
        *last_write = written;
      }
      *executed += 1;

      #[cfg(feature = "trace_execution")] {
        println!("[{:>6}] {}", _offset, _operation);
        println!("Executed: {}\n{}", executed, memory_table(_memory, *last_write));
      }
    })
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn executed(&self) -> usize {
    self.executed
  }

  pub fn report(&self, range: MemoryRange) -> Vec<MemoryCell> {
    report_slice(&self.memory, range)
  }
}

/// Shows the non-zero cells of memory.
impl Display for UVM {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Executed: {}\n{}", self.executed, memory_table(&self.memory, self.last_write))
  }
}
