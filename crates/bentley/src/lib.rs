//! ## Features
//!
//! - Level-prefixed, colored log lines on stderr (info, warn, error, debug, success, verbose)
//! - Multi-line message support with consistent formatting
//! - Banner display for startup and shutdown announcements
//! - `tracing` subscriber setup shared by every lookout binary
//!
//! ## Usage
//!
//! Call `init_tracing()` once at the top of `main`, then log human-facing lines with the
//! `info!`, `warn!`, `error!`, `debug!`, `success!` and `verbose!` macros. They take the same
//! arguments as `format!`.

use colored::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Console log level, each with its own colored prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Verbose,
  Info,
  Warn,
  Error,
  Debug,
  Success,
}

impl Level {
  /// Short tag shown between brackets; at most five characters
  pub fn tag(self) -> &'static str {
    match self {
      Level::Verbose => "verb",
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Debug => "debug",
      Level::Success => "sccs",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Verbose => Color::Cyan,
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Debug => Color::Magenta,
      Level::Success => Color::Green,
    }
  }
}

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  let pad = 7usize.saturating_sub(prefix.len() + 2);
  format!("[{}]{:<pad$}", prefix.color(color).bold(), "")
}

/// Render every line of `message` with the prefix for `level`
pub fn render(level: Level, message: &str) -> Vec<String> {
  let prefix = format_prefix(level.color(), level.tag());
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

/// Write `message` to stderr at the given level
pub fn emit(level: Level, message: &str) {
  for line in render(level, message) {
    log(&line);
  }
}

pub fn verbose(message: &str) {
  emit(Level::Verbose, message);
}

/// Info level logging - general information
pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  emit(Level::Error, message);
}

/// Debug level logging - detailed diagnostic information
pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Theatrical announcement, framed by dashes
pub fn announce(message: &str) {
  let banner = banner_line(50, '-');
  for line in [banner.as_str(), message, banner.as_str()] {
    log(&line.blue().bold().to_string());
  }
}

/// Build the `EnvFilter` directive string for a binary whose own crate is `crate_name`
///
/// `RUST_LOG` still wins when set; this is only the fallback.
pub fn filter_directives(crate_name: &str, verbose: bool) -> String {
  if verbose {
    format!("debug,{crate_name}=trace,hyper=info,rustls=info")
  } else {
    format!("{crate_name}=info,tower_http=info,warn")
  }
}

/// Install the global `tracing` subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(crate_name: &str, verbose: bool) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(filter_directives(crate_name, verbose)));

  let _ = tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init();
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => {
    $crate::info(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($($arg:tt)*) => {
    $crate::warn(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => {
    $crate::error(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! verbose {
  ($($arg:tt)*) => {
    $crate::verbose(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => {
    $crate::debug(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => {
    $crate::success(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! announce {
  ($($arg:tt)*) => {
    $crate::announce(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}
