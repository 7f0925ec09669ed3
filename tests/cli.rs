//! End to end runs of the `uvm` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn uvm(dir: &Path, args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_uvm"))
    .current_dir(dir)
    .args(args)
    .output()
    .expect("failed to run uvm")
}

fn read_json(path: &Path) -> Value {
  serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn assemble_then_interpret(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("xor.asm"), "A=5,B=0,C=6\nA=5,B=1,C=3\n\nA=9,B=2,C=0,D=1\n").unwrap();

  let out = uvm(dir.path(), &["assemble", "xor.asm", "xor.bin", "--log_file", "log.json"]);
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(fs::read(dir.path().join("xor.bin")).unwrap().len(), 33);

  let log = read_json(&dir.path().join("log.json"));
  assert_eq!(log.as_array().unwrap().len(), 3);
  assert_eq!(log[2], json!({"A": 9, "B": 2, "C": 0, "D": 1, "result": [41, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0]}));

  let out = uvm(
    dir.path(),
    &["interpret", "xor.bin", "unused", "--result_file", "result.json", "--memory_range", "0:3"]
  );
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(
    read_json(&dir.path().join("result.json")),
    json!([
      {"address": 0, "value": 6},
      {"address": 1, "value": 3},
      {"address": 2, "value": 5}
    ])
  );
  assert!(!dir.path().join("unused").exists());
}

#[test]
fn report_goes_to_output_without_result_file(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.asm"), "A=5,B=5,C=99\nA=5,B=6,C=100\n").unwrap();
  assert!(uvm(dir.path(), &["assemble", "p.asm", "p.bin"]).status.success());

  let out = uvm(dir.path(), &["interpret", "p.bin", "report.json", "--memory-range", "5:7"]);
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(
    read_json(&dir.path().join("report.json")),
    json!([{"address": 0, "value": 99}, {"address": 1, "value": 100}])
  );
}

#[test]
fn parse_error_writes_nothing(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("bad.asm"), "A=5,B=0,C=1\nA=5,B=10\n").unwrap();

  let out = uvm(dir.path(), &["assemble", "bad.asm", "bad.bin", "--log_file", "log.json"]);
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("line 2"));
  assert!(!dir.path().join("bad.bin").exists());
  assert!(!dir.path().join("log.json").exists());
}

#[test]
fn failed_log_write_leaves_no_image(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.asm"), "A=5,B=0,C=1\n").unwrap();

  let out = uvm(dir.path(), &["assemble", "p.asm", "p.bin", "--log_file", "missing_dir/log.json"]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("missing_dir"), "{}", stderr);
  assert!(!stderr.contains("written"), "{}", stderr);
  assert!(!dir.path().join("p.bin").exists());

  let mut left: Vec<_> =
    fs::read_dir(dir.path()).unwrap().map(|entry| entry.unwrap().file_name()).collect();
  left.sort();
  assert_eq!(left, vec!["p.asm"]);
}

#[test]
fn piped_stderr_is_not_colored(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.asm"), "A=5,B=0,C=1\n").unwrap();

  let out = uvm(dir.path(), &["assemble", "p.asm", "p.bin"]);
  assert!(out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.starts_with("[INFO ] Binary written to p.bin"), "{}", stderr);
  assert!(!stderr.contains('\x1b'), "{:?}", stderr);
}

#[test]
fn interpret_requires_memory_range(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.bin"), [0u8; 11]).unwrap();

  let out = uvm(dir.path(), &["interpret", "p.bin", "out.json"]);
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("memory_range"));
  assert!(!dir.path().join("out.json").exists());
}

#[test]
fn memory_fault_writes_no_report(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("f.asm"), "A=5,B=1,C=1\nA=7,B=2,C=2048\n").unwrap();
  assert!(uvm(dir.path(), &["assemble", "f.asm", "f.bin"]).status.success());

  let out = uvm(dir.path(), &["interpret", "f.bin", "out.json", "--memory_range", "0:4"]);
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("offset 11"));
  assert!(!dir.path().join("out.json").exists());
}

#[test]
fn empty_range_gives_empty_report(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.bin"), [0u8; 11]).unwrap();

  let out = uvm(dir.path(), &["interpret", "p.bin", "out.json", "--memory_range", "4:4"]);
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert!(String::from_utf8_lossy(&out.stderr).contains("[WARN ] Memory range 4:4 is empty"));
  assert_eq!(read_json(&dir.path().join("out.json")), json!([]));
}

#[test]
fn bad_range_is_rejected(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.bin"), [0u8; 11]).unwrap();

  for range in &["7:5", "0:1025", "five:six"] {
    let out = uvm(dir.path(), &["interpret", "p.bin", "out.json", "--memory_range", *range]);
    assert!(!out.status.success(), "range {} should be rejected", range);
  }
}

#[test]
fn disassemble_listing(){
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("p.asm"), "A=5, B=10, C=42\nA=7,B=20,C=10,D=16777217\n").unwrap();
  assert!(uvm(dir.path(), &["assemble", "p.asm", "p.bin"]).status.success());

  let out = uvm(dir.path(), &["disassemble", "p.bin", "p.txt"]);
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(
    fs::read_to_string(dir.path().join("p.txt")).unwrap(),
    "A=5, B=10, C=42, D=0\nA=7, B=20, C=10, D=1\n"
  );
}
