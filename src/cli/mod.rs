//! CLI module for cluegen
//!
//! ## Commands
//!
//! - `clues <file>` - Print the field set of every class in a schema document
//! - `show <file>` - Construct the document's sample instances and print them
//! - `slots <file>` - Print which slots of each class are still pending
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<String>` (the text to print) instead of printing or calling
//! `process::exit`. Only the top-level `run()` function prints, handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic (code, causes, help) as the failure message.
    pub fn diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Inspect lazily generated record methods declared in a schema document
#[derive(Parser, Debug)]
#[command(name = "cluegen")]
#[command(version = VERSION)]
#[command(about = "Inspect lazily generated record methods", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the field set of every class
    Clues {
        /// Schema document (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Only print this class
        #[arg(long, value_name = "NAME")]
        class: Option<String>,
    },

    /// Construct the sample instances and print them
    Show {
        /// Schema document (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Also compare every pair of samples
        #[arg(long)]
        compare: bool,
    },

    /// Print the slots of every class and whether each is still pending
    Slots {
        /// Schema document (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Construct the sample instances first
        #[arg(long)]
        samples: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return its output.
pub fn execute(cli: Cli) -> CliResult<String> {
    match cli.command {
        Command::Clues { file, class } => commands::clues(&file, class.as_deref()),
        Command::Show { file, compare } => commands::show(&file, compare),
        Command::Slots { file, samples } => commands::slots(&file, samples),
    }
}

// ============================================================================
// Tests
// ============================================================================
