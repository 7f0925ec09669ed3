//! Leveled, colored status messages on stderr. Use the `info!`, `warn!` and `error!` macros.

use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
  Info  = 1,
  Warn  = 2,
  Error = 3,
}

impl Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Level::Info  => f.pad("INFO"),
      Level::Warn  => f.pad("WARN"),
      Level::Error => f.pad("ERROR"),
    }
  }
}

/// When false, `info!` messages are dropped. Warnings and errors are always shown.
pub static VERBOSE: AtomicBool = AtomicBool::new(true);

pub fn set_verbose(verbose: bool) {
  VERBOSE.store(verbose, Ordering::Relaxed);
}

fn color_spec(level: Level) -> ColorSpec {
  let mut spec = ColorSpec::new();
  match level {
    Level::Warn  => { spec.set_fg(Some(Color::Yellow)).set_bold(true); }
    Level::Error => { spec.set_fg(Some(Color::Red)).set_bold(true); }
    Level::Info  => { spec.set_fg(Some(Color::Green)); }
  }
  spec
}

// `ColorChoice::Auto` only looks at `TERM` and `NO_COLOR`, so pipes and files need `Never`.
fn color_choice(is_terminal: bool) -> ColorChoice {
  match is_terminal {
    true  => ColorChoice::Auto,
    false => ColorChoice::Never
  }
}

/// The text of a log line. Color, when stderr is a terminal, is added around it.
pub fn format_line(level: Level, message: &str) -> String {
  format!("[{:5}] {}", level, message)
}

#[doc(hidden)]
pub fn log(level: Level, message: &str) {
  if level == Level::Info && !VERBOSE.load(Ordering::Relaxed) {
    return;
  }

  let mut stderr = StandardStream::stderr(color_choice(std::io::stderr().is_terminal()));
  let _ = stderr.set_color(&color_spec(level));
  let _ = writeln!(stderr, "{}", format_line(level, message));
  let _ = stderr.reset();
}

#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => {{
    if cfg!(not(test)) {
      $crate::log::log($crate::log::Level::Info, &format!($($arg)*));
    }
  }};
}

#[macro_export]
macro_rules! warn {
  ($($arg:tt)*) => {{
    if cfg!(not(test)) {
      $crate::log::log($crate::log::Level::Warn, &format!($($arg)*));
    }
  }};
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => {{
    if cfg!(not(test)) {
      $crate::log::log($crate::log::Level::Error, &format!($($arg)*));
    }
  }};
}
