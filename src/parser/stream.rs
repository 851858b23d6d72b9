//! Token stream with single-token lookahead
//!
//! Owns the lexer's output and hands it to the parser one token at a time.
//! The stream never moves past its trailing [`TokenKind::Eof`], so `peek` is
//! always defined.

use super::ast::SourceLocation;
use super::token::{Keyword, Token, TokenKind};
use crate::source::FileId;

pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Wrap a token sequence, appending the end marker if the producer left it out.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let (location, end) = match tokens.last() {
                Some(last) => (last.location, last.span.end),
                None => (SourceLocation::new(FileId::ANONYMOUS, 1, 1), 0),
            };
            tokens.push(Token::new(TokenKind::Eof, location, end..end));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Consume the current token and return it; stays put on `Eof`.
    pub fn advance(&mut self) -> &Token {
        let current = self.position;
        if !self.is_at_end() {
            self.position += 1;
        }
        &self.tokens[current]
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Same variant as `kind`, payload ignored.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind().same_kind(kind)
    }

    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek_kind().is_keyword(keyword)
    }

    pub fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Consume one `>` at the cursor.
    ///
    /// `>>`, `>=` and `>>=` are single tokens, so closing a generic list in
    /// front of one of them rewrites the token in place to what remains after
    /// its first `>` instead of consuming it.
    pub fn split_closing_angle(&mut self) -> bool {
        let rest = match self.peek_kind() {
            TokenKind::Gt => {
                self.advance();
                return true;
            }
            TokenKind::GtGt => TokenKind::Gt,
            TokenKind::Ge => TokenKind::Eq,
            TokenKind::GtGtEq => TokenKind::Ge,
            _ => return false,
        };

        let token = &mut self.tokens[self.position];
        token.kind = rest;
        token.span.start += 1;
        token.location.column += 1;
        true
    }
}
