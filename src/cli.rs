//! Command-line interface for Tarn.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Tarn - parse a source file and print its declarations
#[derive(Debug, Parser)]
#[command(name = "tarn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file to parse
    pub file: PathBuf,

    /// Output path (reserved for code generation, currently ignored)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Log each compilation phase to stderr
    #[arg(long)]
    pub verbose: bool,

    /// When to color diagnostic prefixes
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `auto` against whether stderr is a terminal.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl Cli {
    /// Default tracing directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "tarn=debug"
        } else {
            "tarn=error"
        }
    }
}
