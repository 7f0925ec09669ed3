//! Command line front end: `uvm <assemble|interpret|disassemble> <input> <output> [options]`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use uvm::bytecode::{assemble, disassemble, record_count, RECORD_SIZE};
use uvm::files::{read_binary, read_text, to_json, Outputs};
use uvm::table::{make_report_table, make_trace_table};
use uvm::{error, info, warn, MemoryRange, Result, UvmError, UVM};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Mode {
  /// Compile a text listing into a binary image
  Assemble,
  /// Run a binary image and report a slice of memory
  Interpret,
  /// Print a binary image as a text listing
  Disassemble,
}

#[derive(Parser, Debug)]
#[command(name = "uvm", version, about = "Assembler and interpreter for UVM")]
struct Args {
  #[arg(value_enum)]
  mode: Mode,

  input_file: PathBuf,

  /// Image (assemble), listing (disassemble), or result file when --result_file is absent
  output_file: PathBuf,

  /// Assembler log file (JSON)
  #[arg(long = "log_file", visible_alias = "log-file")]
  log_file: Option<PathBuf>,

  /// Result file for the interpreter (JSON)
  #[arg(long = "result_file", visible_alias = "result-file")]
  result_file: Option<PathBuf>,

  /// Memory range reported by the interpreter, as start:end
  #[arg(long = "memory_range", visible_alias = "memory-range")]
  memory_range: Option<String>,

  /// Also print the assembler log or the memory report as a table
  #[arg(long)]
  table: bool,

  /// Only print warnings and errors
  #[arg(short, long)]
  quiet: bool,
}

fn assemble_file(args: &Args) -> Result<()> {
  let text     = read_text(&args.input_file)?;
  let assembly = assemble(&text)?;

  let mut outputs = Outputs::new();
  outputs.stage(&args.output_file, &assembly.image)?;
  if let Some(path) = &args.log_file {
    outputs.stage(path, &to_json(&assembly.trace)?)?;
  }
  outputs.commit()?;

  info!("Binary written to {} ({} instructions)", args.output_file.display(), assembly.trace.len());
  if let Some(path) = &args.log_file {
    info!("Log written to {}", path.display());
  }

  if args.table {
    println!("{}", make_trace_table(&assembly.trace));
  }
  Ok(())
}

fn interpret_file(args: &Args) -> Result<()> {
  // Checked before touching any file.
  let range: MemoryRange =
    args.memory_range
        .as_deref()
        .ok_or_else(|| UvmError::Config("--memory_range is required to interpret".to_string()))?
        .parse()?;
  let result_file = args.result_file.as_ref().unwrap_or(&args.output_file);
  if range.is_empty() {
    warn!("Memory range {} is empty; the result will be an empty list", range);
  }

  let image = read_binary(&args.input_file)?;
  let trailing = image.len() % RECORD_SIZE;
  if trailing != 0 {
    warn!(
      "{} is {} bytes long; the last {} bytes do not form a whole instruction and are ignored",
      args.input_file.display(), image.len(), trailing
    );
  }

  let mut machine = UVM::new();
  let executed = machine.run(&image)?;
  info!("Executed {} of {} instructions", executed, record_count(&image));

  let report = machine.report(range);
  let mut outputs = Outputs::new();
  outputs.stage(result_file, &to_json(&report)?)?;
  outputs.commit()?;
  info!("Result for {} written to {}", range, result_file.display());

  if args.table {
    println!("{}", make_report_table(&report));
  }
  Ok(())
}

fn disassemble_file(args: &Args) -> Result<()> {
  let image = read_binary(&args.input_file)?;
  let mut outputs = Outputs::new();
  outputs.stage(&args.output_file, disassemble(&image).as_bytes())?;
  outputs.commit()?;
  info!("Listing written to {}", args.output_file.display());
  Ok(())
}

fn main() -> ExitCode {
  let args = Args::parse();
  uvm::log::set_verbose(!args.quiet);

  let result = match args.mode {
    Mode::Assemble    => assemble_file(&args),
    Mode::Interpret   => interpret_file(&args),
    Mode::Disassemble => disassemble_file(&args),
  };

  match result {
    Ok(())     => ExitCode::SUCCESS,
    Err(error) => {
      error!("{}", error);
      ExitCode::FAILURE
    }
  }
}
