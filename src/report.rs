//! The slice of memory handed back to the caller after a run.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::{
  character::complete::{char as one_char, digit1, space0},
  combinator::{all_consuming, map_res},
  sequence::{delimited, separated_pair},
  IResult
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UvmError};
use crate::machine::{Memory, MEMORY_SIZE};

/// A half-open range `start..end` of memory addresses.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MemoryRange {
  start: usize,
  end: usize
}

impl MemoryRange {
  /// Fails unless `start <= end <= MEMORY_SIZE`.
  pub fn new(start: usize, end: usize) -> Result<MemoryRange> {
    if start > end || end > MEMORY_SIZE {
      return Err(UvmError::Range { start, end });
    }
    Ok(MemoryRange { start, end })
  }

  pub fn start(&self) -> usize {
    self.start
  }

  pub fn end(&self) -> usize {
    self.end
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

impl Display for MemoryRange {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.start, self.end)
  }
}

fn address_p(input: &str) -> IResult<&str, usize> {
  map_res(delimited(space0, digit1, space0), usize::from_str)(input)
}

fn range_p(input: &str) -> IResult<&str, (usize, usize)> {
  all_consuming(separated_pair(address_p, one_char(':'), address_p))(input)
}

/// Parses `start:end`.
impl FromStr for MemoryRange {
  type Err = UvmError;

  fn from_str(text: &str) -> Result<MemoryRange> {
    let (_, (start, end)) =
      range_p(text.trim()).map_err(|_| UvmError::BadRange(text.to_string()))?;
    MemoryRange::new(start, end)
  }
}

/**
  One reported cell. `index` counts from the start of the reported range, not from address
  zero: reporting `5:7` gives indices 0 and 1. Result files call the field `address`.
*/
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemoryCell {
  #[serde(rename = "address")]
  pub index: usize,
  pub value: u32
}

/// The cells `memory[range.start..range.end]`, numbered from zero.
pub fn report_slice(memory: &Memory, range: MemoryRange) -> Vec<MemoryCell> {
  memory.cells()[range.start..range.end]
    .iter()
    .enumerate()
    .map(|(index, value)| MemoryCell { index, value: *value })
    .collect()
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_range(){
    assert_eq!("5:7".parse::<MemoryRange>().unwrap(), MemoryRange { start: 5, end: 7 });
    assert_eq!(" 0 : 1024 ".parse::<MemoryRange>().unwrap(), MemoryRange { start: 0, end: 1024 });
    assert!("3:3".parse::<MemoryRange>().unwrap().is_empty());
    assert_eq!(MemoryRange::new(5, 7).unwrap().to_string(), "5:7");
  }

  #[test]
  fn malformed_range(){
    for text in &["", "5", "5:", ":7", "5-7", "a:b", "-1:3", "1:2:3"] {
      match text.parse::<MemoryRange>() {
        Err(UvmError::BadRange(_)) => {}
        other => panic!("`{}` should be malformed, got {:?}", text, other)
      }
    }
  }

  #[test]
  fn out_of_bounds_range(){
    match "7:5".parse::<MemoryRange>() {
      Err(UvmError::Range { start, end }) => assert_eq!((start, end), (7, 5)),
      other => panic!("expected a range error, got {:?}", other)
    }
    assert!(MemoryRange::new(0, 1025).is_err());
    assert!(MemoryRange::new(1024, 1024).is_ok());
  }

  #[test]
  fn report_is_relative(){
    let mut memory = Memory::new();
    memory.write(5, 99).unwrap();
    memory.write(6, 100).unwrap();

    let report = report_slice(&memory, MemoryRange::new(5, 7).unwrap());
    assert_eq!(
      report,
      vec![MemoryCell { index: 0, value: 99 }, MemoryCell { index: 1, value: 100 }]
    );
    assert_eq!(
      serde_json::to_value(&report).unwrap(),
      serde_json::json!([{"address": 0, "value": 99}, {"address": 1, "value": 100}])
    );
  }

  #[test]
  fn empty_report(){
    let memory = Memory::new();
    assert!(report_slice(&memory, MemoryRange::new(10, 10).unwrap()).is_empty());
  }
}
