//! Lexer (tokenizer) for Tarn source code
//!
//! Converts a source buffer into a flat [`Token`] sequence terminated by a
//! single [`TokenKind::Eof`] sentinel. The lexer works on raw bytes: names,
//! keywords and operators are ASCII, while comments and string literal bodies
//! are copied through untouched, so neither UTF-8 text nor stray Latin-1 bytes
//! stop a file from lexing.
//!
//! Every error except [`LexErrorKind::IllegalEscapeSequence`] is fatal and
//! stops lexing at once. Bad escapes are recorded in
//! [`Lexer::diagnostics`], kept verbatim in the literal, and lexing goes on.

use super::ast::SourceLocation;
use super::token::{Keyword, Token, TokenKind};
use crate::source::FileId;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, warn};

/// What went wrong while lexing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("illegal character '{}'", .0.escape_debug())]
    IllegalCharacter(char),

    /// A byte that does not start a UTF-8 character, outside comments and strings.
    #[error("illegal byte 0x{0:02X}")]
    IllegalByte(u8),

    #[error("illegal escape character '{}'", .0.escape_debug())]
    IllegalEscapeSequence(char),

    #[error("illegal new line in string literal")]
    IllegalNewlineInString,

    #[error("illegal name after '{0}', expected a lowercase letter")]
    IllegalIdentifierAfterPrefix(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOverflow(String),

    #[error("malformed number literal {0}")]
    MalformedNumber(String),
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {}: {kind}", .location.line)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

impl LexError {
    /// Only bad escapes let lexing continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind, LexErrorKind::IllegalEscapeSequence(_))
    }
}

/// Operators and punctuation, longest spelling first so that the first hit is
/// the maximal munch.
static OPERATORS: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::LtLtEq),
    (">>=", TokenKind::GtGtEq),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("&=", TokenKind::AmpEq),
    ("|=", TokenKind::PipeEq),
    ("~=", TokenKind::TildeEq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("=", TokenKind::Eq),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
];

/// Tokenize a whole buffer, discarding recoverable diagnostics after logging them.
pub fn tokenize<S>(source: &S, file: FileId) -> Result<Vec<Token>, LexError>
where
    S: AsRef<[u8]> + ?Sized,
{
    Lexer::new(source, file).tokenize()
}

/// Lexer for Tarn source code
pub struct Lexer<'a> {
    input: &'a [u8],
    file: FileId,
    position: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source buffer (`&str` or raw bytes).
    pub fn new<S: AsRef<[u8]> + ?Sized>(source: &'a S, file: FileId) -> Self {
        Self {
            input: source.as_ref(),
            file,
            position: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                let loc = self.current_location();
                tokens.push(Token::new(TokenKind::Eof, loc, self.position..self.position));
                break;
            }

            tokens.push(self.next_token()?);
        }

        debug!(
            file = %self.file,
            tokens = tokens.len(),
            warnings = self.diagnostics.len(),
            "lexed source"
        );

        Ok(tokens)
    }

    /// Recoverable problems found so far.
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let loc = self.current_location();

        let kind = match self.peek() {
            Some(b'"') => self.string_literal(loc)?,
            Some(b'0'..=b'9') => self.number_literal(loc)?,
            Some(b'A'..=b'Z') => TokenKind::UpperName(self.name()),
            Some(b'a'..=b'z') => {
                let word = self.name();
                match Keyword::lookup(&word) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::LowerName(word),
                }
            }
            Some(prefix @ (b'.' | b'@')) => self.prefixed_name(prefix, loc)?,
            _ => self.operator(loc)?,
        };

        Ok(Token::new(kind, loc, start..self.position))
    }

    /// Greedy match against [`OPERATORS`]
    fn operator(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let input = self.input;
        let rest = &input[self.position..];

        for (spelling, kind) in OPERATORS {
            if rest.starts_with(spelling.as_bytes()) {
                for _ in 0..spelling.len() {
                    self.advance();
                }
                return Ok(kind.clone());
            }
        }

        let kind = match self.current_char() {
            Some((ch, _)) => LexErrorKind::IllegalCharacter(ch),
            None => LexErrorKind::IllegalByte(rest[0]),
        };
        Err(self.error(kind, loc))
    }

    /// `[A-Za-z][A-Za-z0-9]*`, starting at the current byte
    fn name(&mut self) -> String {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        self.slice(start).into_owned()
    }

    /// `.name` / `@name`, or a bare `.` in front of an uppercase name
    fn prefixed_name(&mut self, prefix: u8, loc: SourceLocation) -> Result<TokenKind, LexError> {
        self.advance(); // skip prefix

        match self.peek() {
            Some(c) if c.is_ascii_lowercase() => {
                let name = self.name();
                Ok(if prefix == b'.' {
                    TokenKind::DotName(name)
                } else {
                    TokenKind::AtName(name)
                })
            }
            // Qualified type name: `a.b.C`
            Some(c) if prefix == b'.' && c.is_ascii_uppercase() => Ok(TokenKind::Dot),
            _ => Err(self.error(
                LexErrorKind::IllegalIdentifierAfterPrefix(prefix as char),
                loc,
            )),
        }
    }

    /// Parse numeric literal: decimal or `0x` integer, or a float.
    /// There are no octal literals; a leading `0` is still decimal.
    fn number_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let start = self.position;

        if self.peek() == Some(b'0')
            && matches!(self.peek_ahead(1), Some(b'x' | b'X'))
            && self.peek_ahead(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance(); // skip '0'
            self.advance(); // skip 'x'
            let digits_start = self.position;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = self.slice(digits_start);
            return u64::from_str_radix(&digits, 16)
                .map(TokenKind::UintLiteral)
                .map_err(|_| {
                    let text = self.slice(start).into_owned();
                    self.error(LexErrorKind::IntegerOverflow(text), loc)
                });
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if matches!(self.peek(), Some(b'.' | b'e' | b'E')) {
            return self.float_literal(start, loc);
        }

        let text = self.slice(start);
        text.parse::<u64>()
            .map(TokenKind::UintLiteral)
            .map_err(|_| self.error(LexErrorKind::IntegerOverflow(text.into_owned()), loc))
    }

    /// Continue a digit run as `[. digits*] [(e|E) [+|-] digits]`
    fn float_literal(&mut self, start: usize, loc: SourceLocation) -> Result<TokenKind, LexError> {
        if self.peek() == Some(b'.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                let text = self.slice(start).into_owned();
                return Err(self.error(LexErrorKind::MalformedNumber(text), loc));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.slice(start);
        text.parse::<f64>()
            .map(TokenKind::FloatLiteral)
            .map_err(|_| self.error(LexErrorKind::MalformedNumber(text.into_owned()), loc))
    }

    /// Parse string literal, decoding escapes into raw bytes
    fn string_literal(&mut self, loc: SourceLocation) -> Result<TokenKind, LexError> {
        self.advance(); // skip opening quote
        let mut bytes = Vec::new();

        loop {
            let Some(ch) = self.peek() else {
                return Err(self.error(LexErrorKind::UnterminatedString, loc));
            };

            match ch {
                b'"' => {
                    self.advance(); // consume closing quote
                    return Ok(TokenKind::StringLiteral(bytes));
                }
                b'\n' => {
                    let at = self.current_location();
                    return Err(self.error(LexErrorKind::IllegalNewlineInString, at));
                }
                b'\\' => {
                    let at = self.current_location();
                    self.advance();
                    self.escape_sequence(&mut bytes, loc, at)?;
                }
                _ => {
                    bytes.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Decode the escape whose backslash was just consumed
    fn escape_sequence(
        &mut self,
        out: &mut Vec<u8>,
        literal: SourceLocation,
        at: SourceLocation,
    ) -> Result<(), LexError> {
        let Some(escaped) = self.peek() else {
            return Err(self.error(LexErrorKind::UnterminatedString, literal));
        };

        let decoded = match escaped {
            b'\\' => b'\\',
            b'"' => b'"',
            b'\'' => b'\'',
            b'b' => 0x08,
            b'a' => 0x07,
            b'e' => 0x1b,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'x' => {
                self.hex_escape(out, at);
                return Ok(());
            }
            b'\n' => return Err(self.error(LexErrorKind::IllegalNewlineInString, at)),
            _ => {
                // Keep `\c` verbatim as a placeholder
                let (ch, width) = self.current_char().unwrap_or(('\u{fffd}', 1));
                self.report(LexErrorKind::IllegalEscapeSequence(ch), at);
                out.push(b'\\');
                for _ in 0..width {
                    if let Some(byte) = self.advance() {
                        out.push(byte);
                    }
                }
                return Ok(());
            }
        };

        self.advance();
        out.push(decoded);
        Ok(())
    }

    /// `\xHH`, exactly two hex digits
    fn hex_escape(&mut self, out: &mut Vec<u8>, at: SourceLocation) {
        self.advance(); // skip 'x'

        let high = self.peek().and_then(hex_value);
        let low = self.peek_ahead(1).and_then(hex_value);

        match (high, low) {
            (Some(high), Some(low)) => {
                self.advance();
                self.advance();
                out.push((high << 4) | low);
            }
            _ => {
                self.report(LexErrorKind::IllegalEscapeSequence('x'), at);
                out.extend_from_slice(b"\\x");
            }
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c) => {
                    self.advance();
                }
                Some(b'/') => {
                    if self.peek_ahead(1) == Some(b'/') {
                        // Single-line comment
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some(b'*') {
                        // Multi-line comment
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == b'\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */), no nesting
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some(b'*') && self.peek_ahead(1) == Some(b'/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(self.error(LexErrorKind::UnterminatedComment, start_loc))
    }

    /// Record a recoverable diagnostic
    fn report(&mut self, kind: LexErrorKind, location: SourceLocation) {
        warn!(file = %self.file, line = location.line, "{}", kind);
        self.diagnostics.push(LexError { kind, location });
    }

    fn error(&self, kind: LexErrorKind, location: SourceLocation) -> LexError {
        LexError { kind, location }
    }

    /// Peek at current byte without consuming
    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n bytes
    fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.input.get(self.position + n).copied()
    }

    /// The (possibly multi-byte) character at the cursor and its width in
    /// bytes, or `None` when the bytes there are not valid UTF-8
    fn current_char(&self) -> Option<(char, usize)> {
        let rest = self.input.get(self.position..).unwrap_or_default();
        let head = &rest[..rest.len().min(4)];
        let valid = match std::str::from_utf8(head) {
            Ok(text) => text,
            Err(err) => std::str::from_utf8(&head[..err.valid_up_to()]).unwrap_or_default(),
        };
        valid.chars().next().map(|ch| (ch, ch.len_utf8()))
    }

    /// Text from `start` to the cursor. Only called on ASCII runs.
    fn slice(&self, start: usize) -> Cow<'a, str> {
        let input = self.input;
        String::from_utf8_lossy(&input[start..self.position])
    }

    /// Advance to next byte
    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.file, self.line, self.column)
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
