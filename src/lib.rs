//! # Introduction
//!
//! Tarn is the front end of a compiler for a small statically-typed
//! language. It lexes a source file, parses its imports and type
//! declarations into an AST, and prints the tree back as canonical source.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenStream → Parser → Program → Printer
//! ```
//!
//! 1. [`source`] registers buffers and hands out [`source::FileId`]s, so
//!    every location names its file without global state.
//! 2. [`parser`] tokenises the source and builds the AST.
//! 3. [`printer`] renders a [`Program`] back to text.
//! 4. [`diagnostics`] turns errors into the one-line reports the CLI prints.
//!
//! Errors are values: nothing in the library exits the process.

pub mod diagnostics;
pub mod parser;
pub mod printer;
pub mod source;

use std::io;
use std::path::{Path, PathBuf};

use parser::lexer::{LexError, Lexer};
use source::{FileId, SourceMap};
use thiserror::Error;
use tracing::debug;

pub use parser::ast::Program;
pub use parser::ParseError;

/// Anything that can stop a compilation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(ParseError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => Error::Lex(err),
            other => Error::Parse(other),
        }
    }
}

/// Lex and parse a file already registered in `sources`.
///
/// Recoverable lexer warnings are appended to `warnings` whether or not the
/// parse succeeds. An id the map does not know parses as an empty buffer.
pub fn parse_source(
    sources: &SourceMap,
    file: FileId,
    warnings: &mut Vec<LexError>,
) -> Result<Program, Error> {
    let text = sources.text(file).unwrap_or_default();

    let mut lexer = Lexer::new(text, file);
    let tokens = lexer.tokenize();
    warnings.append(&mut lexer.take_diagnostics());

    Ok(parser::parse(tokens?)?)
}

/// Parse a standalone string under [`FileId::ANONYMOUS`], dropping warnings.
pub fn parse_str(source: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(source, FileId::ANONYMOUS).tokenize()?;
    Ok(parser::parse(tokens)?)
}

/// Read `path`, register it in `sources` and parse it.
pub fn compile_file(
    sources: &mut SourceMap,
    path: &Path,
    warnings: &mut Vec<LexError>,
) -> Result<(FileId, Program), Error> {
    let text = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file = sources.add(path.display().to_string(), text);
    debug!(path = %path.display(), %file, "registered source");
    let program = parse_source(sources, file, warnings)?;
    Ok((file, program))
}
