/*!
  The human readable textual form of bytecode is called assembly. One instruction is written per
  line as comma separated `KEY=value` pairs:

  ```text
  A=5, B=10, C=42
  A=3, B=0, C=1, D=1
  ```

  `A`, `B` and `C` are required, `D` defaults to zero. Blank lines are skipped. There are no
  labels, comments or mnemonics; the disassembler writes the same syntax back out.
*/

use std::str::FromStr;

use nom::{
  bytes::complete::is_not,
  character::complete::{
    char as one_char,
    digit1,
    one_of,
    space0
  },
  combinator::{all_consuming, opt, recognize, rest},
  sequence::{delimited, pair, separated_pair},
  IResult
};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, IntoStaticStr};

use crate::bytecode::{encode_instruction, records, Instruction, Record};
use crate::error::{Result, SyntaxError, UvmError};

/// The field names accepted on the left of `=`.
#[derive(EnumString, IntoStaticStr, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
  A,
  B,
  C,
  D
}

/// The fields given on one line as written, before defaults are applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldMap {
  pub a: Option<i128>,
  pub b: Option<i128>,
  pub c: Option<i128>,
  pub d: Option<i128>
}

impl FieldMap {
  pub fn get(&self, field: Field) -> Option<i128> {
    match field {
      Field::A => self.a,
      Field::B => self.b,
      Field::C => self.c,
      Field::D => self.d,
    }
  }

  fn slot(&mut self, field: Field) -> &mut Option<i128> {
    match field {
      Field::A => &mut self.a,
      Field::B => &mut self.b,
      Field::C => &mut self.c,
      Field::D => &mut self.d,
    }
  }

  /// The written values in `A`, `B`, `C`, `D` order, with a missing `D` taken as zero.
  fn values(&self) -> std::result::Result<[i128; 4], SyntaxError> {
    let required = |field: Field| {
      self.get(field).ok_or_else(|| SyntaxError::MissingKey(field.into()))
    };

    Ok([
      required(Field::A)?,
      required(Field::B)?,
      required(Field::C)?,
      self.d.unwrap_or(0)
    ])
  }

  /**
    Builds the instruction, with a missing `D` taken as zero. Values are narrowed to their low
    64 bits, so negative values reach the encoder in two's complement.
  */
  pub fn to_instruction(&self) -> std::result::Result<Instruction, SyntaxError> {
    let [a, b, c, d] = self.values()?;
    Ok(Instruction::new(a as u64, b as u64, c as u64, d as u64))
  }
}

/// One entry of the assembler log: the fields as written and the record they encode to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
  #[serde(rename = "A")]
  pub a: i128,
  #[serde(rename = "B")]
  pub b: i128,
  #[serde(rename = "C")]
  pub c: i128,
  #[serde(rename = "D")]
  pub d: i128,
  pub result: Record
}

/// The output of a successful assembly run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assembly {
  pub image: Vec<u8>,
  pub trace: Vec<TraceRecord>
}

// `key=value`, split at the first `=`.
fn field_p(input: &str) -> IResult<&str, (&str, &str)> {
  separated_pair(is_not("="), one_char('='), rest)(input)
}

// An optionally signed decimal literal with surrounding blanks.
fn integer_p(input: &str) -> IResult<&str, &str> {
  all_consuming(
    delimited(
      space0,
      recognize(pair(opt(one_of("+-")), digit1)),
      space0
    )
  )(input)
}

/**
  Parses a signed decimal literal. A literal too wide for `i128` is reduced modulo 2^128; its low
  64 bits, which are all the encoder looks at, are unchanged by the reduction.
*/
fn parse_value(text: &str) -> std::result::Result<i128, SyntaxError> {
  let (_, literal) =
    integer_p(text).map_err(|_| SyntaxError::NotAnInteger(text.trim().to_string()))?;

  if let Ok(value) = literal.parse::<i128>() {
    return Ok(value);
  }

  let (negative, digits) = match literal.as_bytes()[0] {
    b'-' => (true, &literal[1..]),
    b'+' => (false, &literal[1..]),
    _    => (false, literal)
  };
  let magnitude =
    digits.bytes()
          .fold(0u128, |acc, digit| acc.wrapping_mul(10).wrapping_add(u128::from(digit - b'0')));
  let bits = if negative { magnitude.wrapping_neg() } else { magnitude };
  Ok(bits as i128)
}

/**
  Parses one line of assembly into its fields. Keys and values may be surrounded by blanks.
  Fails on a token without `=`, a key other than `A`–`D`, a repeated key, or a value that is not
  a decimal integer. Required keys are checked by `FieldMap::to_instruction`.
*/
pub fn parse_line(text: &str) -> std::result::Result<FieldMap, SyntaxError> {
  let mut fields = FieldMap::default();

  for token in text.split(',') {
    let (key, value) = match field_p(token) {
      Ok((_, pair)) => pair,
      Err(_)        => return Err(SyntaxError::MissingEquals(token.trim().to_string()))
    };

    let key   = key.trim();
    let field = Field::from_str(key).map_err(|_| SyntaxError::UnknownKey(key.to_string()))?;
    let slot  = fields.slot(field);
    if slot.is_some() {
      return Err(SyntaxError::DuplicateKey(key.to_string()));
    }
    *slot = Some(parse_value(value)?);
  }

  Ok(fields)
}

/**
  Accumulates the program image and the assembler log line by line. The caller owns the
  assembler and decides what to do with the result, so nothing is written anywhere until
  `finish` is called.
*/
#[derive(Debug, Default)]
pub struct Assembler {
  image: Vec<u8>,
  trace: Vec<TraceRecord>
}

impl Assembler {
  pub fn new() -> Assembler {
    Assembler::default()
  }

  /// Assembles one source line. `line` is the 1-based line number used in errors.
  pub fn push_line(&mut self, line: usize, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
      return Ok(());
    }

    parse_line(text)
      .and_then(|fields| self.push(&fields))
      .map(|_| ())
      .map_err(|kind| UvmError::Parse { line, kind })
  }

  /**
    Encodes a complete line, appends it to the image and records it in the log with its values
    as written. Fails only when a required field is missing.
  */
  pub fn push(&mut self, fields: &FieldMap) -> std::result::Result<Record, SyntaxError> {
    let [a, b, c, d] = fields.values()?;
    let record = encode_instruction(&fields.to_instruction()?);
    self.image.extend_from_slice(&record);
    self.trace.push(TraceRecord { a, b, c, d, result: record });
    Ok(record)
  }

  pub fn finish(self) -> Assembly {
    Assembly {
      image: self.image,
      trace: self.trace
    }
  }
}

/// Assembles a whole listing. Stops at the first bad line; no partial image is returned.
pub fn assemble(text: &str) -> Result<Assembly> {
  let mut assembler = Assembler::new();
  for (index, line) in text.lines().enumerate() {
    assembler.push_line(index + 1, line)?;
  }
  Ok(assembler.finish())
}

/// Renders every complete record of the image as a line of assembly.
pub fn disassemble(image: &[u8]) -> String {
  records(image)
    .map(|(_, instruction)| format!("{}\n", instruction))
    .collect()
}
