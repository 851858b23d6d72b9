//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a hand-written LL(1) recursive descent parser:
//! - This module: Parser struct, `expect_*` helpers, and coordination
//! - `declarations`: imports, type headers, type expressions, field lists and
//!   the four type declaration shapes
//!
//! Parsing is fail-fast. The first error is returned and no partial
//! [`Program`] is ever produced.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::stream::TokenStream;
use crate::parser::token::{Token, TokenKind};
use crate::source::FileId;
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {}: expected {expected}, found {found}", .location.line)]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        location: SourceLocation,
    },

    #[error("line {}: expected {expected}, found end of file", .location.line)]
    UnexpectedEndOfStream {
        expected: String,
        location: SourceLocation,
    },

    /// Declarations the grammar recognizes but does not build nodes for yet.
    #[error("line {}: {construct} declarations are not supported yet", .location.line)]
    Unsupported {
        construct: &'static str,
        location: SourceLocation,
    },

    #[error("line {}: type arguments nested deeper than {limit}", .location.line)]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEndOfStream { location, .. }
            | ParseError::Unsupported { location, .. }
            | ParseError::NestingTooDeep { location, .. } => *location,
            ParseError::Lex(err) => err.location,
        }
    }
}

/// Parse an already lexed token sequence.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Recursive descent parser for Tarn declarations
pub struct Parser {
    pub(crate) tokens: TokenStream,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
        }
    }

    /// Lex `source` and wrap the result; recoverable lexer diagnostics are
    /// logged and dropped.
    pub fn from_source<S>(source: &S, file: FileId) -> Result<Self, ParseError>
    where
        S: AsRef<[u8]> + ?Sized,
    {
        let mut lexer = Lexer::new(source, file);
        let tokens = lexer.tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.tokens.is_at_end() {
            let decl = self.parse_top_level_declaration()?;
            program.declarations.push(decl);
        }

        debug!(
            declarations = program.declarations.len(),
            "parsed program"
        );

        Ok(program)
    }

    // ===== Helper methods =====

    /// Error for the token at the cursor, given what the grammar wanted there.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.tokens.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEndOfStream {
                expected: expected.into(),
                location: token.location,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.into(),
                found: token.kind.clone(),
                location: token.location,
            }
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        expected: &str,
    ) -> Result<(), ParseError> {
        if self.tokens.match_token(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::Semicolon, &format!("';' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::LBrace, &format!("'{{' {ctx}"))
    }

    pub(crate) fn expect_colon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&TokenKind::Colon, &format!("':' {ctx}"))
    }

    /// Close a generic list, splitting `>>` / `>=` / `>>=` when needed.
    pub(crate) fn expect_closing_angle(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.tokens.split_closing_angle() {
            Ok(())
        } else {
            Err(self.unexpected(format!("'>' {ctx}")))
        }
    }

    pub(crate) fn expect_upper_name(&mut self, ctx: &str) -> Result<String, ParseError> {
        if let TokenKind::UpperName(name) = self.tokens.peek_kind() {
            let name = name.clone();
            self.tokens.advance();
            Ok(name)
        } else {
            Err(self.unexpected(format!("type name {ctx}")))
        }
    }

    pub(crate) fn expect_lower_name(&mut self, ctx: &str) -> Result<String, ParseError> {
        if let TokenKind::LowerName(name) = self.tokens.peek_kind() {
            let name = name.clone();
            self.tokens.advance();
            Ok(name)
        } else {
            Err(self.unexpected(format!("name {ctx}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(source: &str) -> Result<Program, ParseError> {
        Parser::from_source(source, FileId::ANONYMOUS)?.parse_program()
    }

    #[test]
    fn test_parse_empty_program() {
        let program = parse_str("// nothing here\n").unwrap();
        assert!(program.declarations.is_empty());
    }

    #[test]
    fn test_parse_alias() {
        let program = parse_str("type Box<T> = T;").unwrap();

        assert_eq!(program.declarations.len(), 1);
        match &program.declarations[0] {
            Declaration::Type(decl) => {
                assert!(!decl.exported);
                assert_eq!(decl.header.name, "Box");
                assert_eq!(decl.header.params, vec!["T".to_string()]);
                assert_eq!(decl.body, TypeDeclBody::Alias(Type::new("T")));
            }
            _ => panic!("Expected type declaration"),
        }
    }

    #[test]
    fn test_parse_record() {
        let program = parse_str("type Pair { first: Int; second: Int; };").unwrap();

        match &program.declarations[0] {
            Declaration::Type(decl) => match &decl.body {
                TypeDeclBody::Record(fields) => {
                    assert_eq!(fields.len(), 2);
                    assert_eq!(fields[0], Field::new("first", Type::new("Int")));
                    assert_eq!(fields[1], Field::new("second", Type::new("Int")));
                }
                other => panic!("Expected record, got {:?}", other),
            },
            _ => panic!("Expected type declaration"),
        }
    }

    #[test]
    fn test_lex_error_surfaces_as_parse_error() {
        let err = parse_str("type A = $;").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
        assert_eq!(err.location().line, 1);
    }

    #[test]
    fn test_end_of_stream_error() {
        let err = parse_str("type A =").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfStream { .. }));
    }

    #[test]
    fn test_unexpected_token_reports_kind() {
        let err = parse_str("type A = B\ntype C = D;").unwrap_err();
        match err {
            ParseError::UnexpectedToken { found, location, .. } => {
                assert_eq!(found, TokenKind::Keyword(crate::parser::token::Keyword::Type));
                assert_eq!(location.line, 2);
            }
            other => panic!("Expected unexpected token, got {:?}", other),
        }
    }
}
