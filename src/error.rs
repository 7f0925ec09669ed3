//! Error types for the assembler, the codec and the interpreter.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UvmError {
  /// A malformed assembly line. `line` counts from 1.
  #[error("Error on line {line}: {kind}")]
  Parse {
    line: usize,
    #[source]
    kind: SyntaxError
  },

  /// A record handed to the codec was not exactly one record long.
  #[error("Format error: expected an 11 byte record, got {length} bytes")]
  Format {
    length: usize
  },

  /// An instruction touched a cell outside of memory. `offset` is the byte offset of the
  /// faulting record within the program image.
  #[error("Memory fault at image offset {offset}: address {address} is out of range")]
  MemoryFault {
    offset: usize,
    address: u64
  },

  #[error("Invalid memory range {start}:{end}")]
  Range {
    start: usize,
    end: usize
  },

  #[error("Malformed memory range `{0}`, expected `start:end`")]
  BadRange(String),

  /// Missing or conflicting command line options.
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("IO error on {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error
  },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

/// What is wrong with a single assembly line.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SyntaxError {
  #[error("expected `key=value`, found `{0}`")]
  MissingEquals(String),

  #[error("`{0}` is not an integer")]
  NotAnInteger(String),

  #[error("unrecognized key `{0}`")]
  UnknownKey(String),

  #[error("key `{0}` given more than once")]
  DuplicateKey(String),

  #[error("missing required key `{0}`")]
  MissingKey(&'static str),
}

pub type Result<T> = std::result::Result<T, UvmError>;
