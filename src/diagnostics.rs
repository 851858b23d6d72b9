//! One-line error reports
//!
//! Lexical problems render as `Parsing Error <file>:<line>: <message>`,
//! syntax problems as `Syntax error <file>:<line> ...`. File names come from
//! the [`SourceMap`]; the prefix is colored when the caller asks for it.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::ParseError;
use crate::source::SourceMap;
use crate::Error;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;

const LEXICAL: &str = "Parsing Error";
const SYNTAX: &str = "Syntax error";
const GENERIC: &str = "Error";

/// Whether stderr is attached to a terminal.
pub fn stderr_is_terminal() -> bool {
    std::io::stderr().is_tty()
}

pub struct Reporter<'a> {
    sources: &'a SourceMap,
    color: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(sources: &'a SourceMap, color: bool) -> Self {
        Self { sources, color }
    }

    pub fn render(&self, err: &Error) -> String {
        match err {
            Error::Io { .. } => format!("{}: {err}", self.prefix(GENERIC)),
            Error::Lex(err) => self.render_lex(err),
            Error::Parse(err) => self.render_parse(err),
        }
    }

    /// Fatal and recoverable lexer problems share one format.
    pub fn render_lex(&self, err: &LexError) -> String {
        format!(
            "{} {}: {}",
            self.prefix(LEXICAL),
            self.position(err.location),
            err.kind
        )
    }

    pub fn render_parse(&self, err: &ParseError) -> String {
        match err {
            ParseError::UnexpectedToken {
                found, location, ..
            } => format!(
                "{} {} unexpected token {found}",
                self.prefix(SYNTAX),
                self.position(*location)
            ),
            ParseError::UnexpectedEndOfStream { location, .. } => format!(
                "{} {} unexpected end of file",
                self.prefix(SYNTAX),
                self.position(*location)
            ),
            ParseError::Unsupported {
                construct,
                location,
            } => format!(
                "{} {} {construct} declarations are not supported yet",
                self.prefix(SYNTAX),
                self.position(*location)
            ),
            ParseError::NestingTooDeep { limit, location } => format!(
                "{} {} type arguments nested deeper than {limit}",
                self.prefix(SYNTAX),
                self.position(*location)
            ),
            ParseError::Lex(err) => self.render_lex(err),
        }
    }

    fn position(&self, location: SourceLocation) -> String {
        format!("{}:{}", self.sources.name(location.file), location.line)
    }

    fn prefix(&self, text: &'static str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
