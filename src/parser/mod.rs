//! Tarn source parser
//!
//! This module transforms Tarn source text into an Abstract Syntax Tree (AST):
//! - [`token`]: Token kinds and keywords
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`stream`]: Token cursor with single-token lookahead
//! - [`parse`]: Parser coordinator and error type
//! - [`declarations`]: Grammar rules for imports and type declarations
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! The parser builds the declaration layer of a Tarn module:
//! - Imports: absolute (`import std.io.Writer;`), relative (`import .util;`),
//!   optionally renamed with `as`
//! - Type declarations: aliases, records, unions and enums, with generic
//!   parameters and `export`
//!
//! Functions, external functions and test blocks are recognized and
//! rejected. Their AST nodes exist so later stages can share one model.
//!
//! # Parser Implementation
//!
//! Hand-written LL(1) recursive descent parser. No external parser generator
//! dependencies.

pub mod ast;
pub mod declarations;
pub mod lexer;
pub mod parse;
pub mod stream;
pub mod token;

pub use parse::{parse, ParseError, Parser};
