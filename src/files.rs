//! Reading and writing program listings, images, and JSON logs and reports.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::error::{Result, UvmError};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> UvmError + '_ {
  move |source| UvmError::Io { path: path.to_path_buf(), source }
}

pub fn read_text(path: &Path) -> Result<String> {
  fs::read_to_string(path).map_err(io_error(path))
}

pub fn read_binary(path: &Path) -> Result<Vec<u8>> {
  fs::read(path).map_err(io_error(path))
}

/**
  The output files of one run. Each file is first written to a temporary file in the directory
  of its target; `commit` renames all of them into place. Dropping the set without committing
  removes the temporary files, so a failed run leaves no outputs behind.
*/
#[derive(Default)]
pub struct Outputs {
  staged: Vec<(NamedTempFile, PathBuf)>
}

impl Outputs {
  pub fn new() -> Outputs {
    Outputs::default()
  }

  pub fn stage(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _                                              => Path::new(".")
    };
    let mut file = NamedTempFile::new_in(dir).map_err(io_error(path))?;
    file.write_all(bytes).map_err(io_error(path))?;
    self.staged.push((file, path.to_path_buf()));
    Ok(())
  }

  /// Moves every staged file to its target, returning the targets in staging order.
  pub fn commit(self) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(self.staged.len());
    for (file, path) in self.staged {
      file.persist(&path)
          .map_err(|error| UvmError::Io { path: path.clone(), source: error.error })?;
      written.push(path);
    }
    Ok(written)
  }
}

/// Serializes `value` as JSON indented by four spaces.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
  let mut out = Vec::new();
  let mut serializer =
    serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
  value.serialize(&mut serializer)?;
  Ok(out)
}
