//! Token definitions shared by the lexer, the token stream and the parser.

use crate::parser::ast::SourceLocation;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

/// Reserved lowercase words.
///
/// Only `import`, `as`, `type`, `export`, `external`, `func`, `cfunc`, `test`,
/// `ref`, `enum` and `union` are consumed by the declaration grammar; the rest
/// belong to the statement grammar and are reserved so that they can never be
/// used as plain names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Import,
    As,
    Type,
    Export,
    External,
    Func,
    CFunc,
    Test,
    Ref,
    Enum,
    Union,
    Var,
    Const,
    If,
    Else,
    Switch,
    Case,
    Default,
    Do,
    While,
    For,
    In,
    Loop,
    Return,
    SelfValue,
}

impl Keyword {
    pub const ALL: [Keyword; 25] = [
        Keyword::Import,
        Keyword::As,
        Keyword::Type,
        Keyword::Export,
        Keyword::External,
        Keyword::Func,
        Keyword::CFunc,
        Keyword::Test,
        Keyword::Ref,
        Keyword::Enum,
        Keyword::Union,
        Keyword::Var,
        Keyword::Const,
        Keyword::If,
        Keyword::Else,
        Keyword::Switch,
        Keyword::Case,
        Keyword::Default,
        Keyword::Do,
        Keyword::While,
        Keyword::For,
        Keyword::In,
        Keyword::Loop,
        Keyword::Return,
        Keyword::SelfValue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Import => "import",
            Keyword::As => "as",
            Keyword::Type => "type",
            Keyword::Export => "export",
            Keyword::External => "external",
            Keyword::Func => "func",
            Keyword::CFunc => "cfunc",
            Keyword::Test => "test",
            Keyword::Ref => "ref",
            Keyword::Enum => "enum",
            Keyword::Union => "union",
            Keyword::Var => "var",
            Keyword::Const => "const",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::Do => "do",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Loop => "loop",
            Keyword::Return => "return",
            Keyword::SelfValue => "self",
        }
    }

    /// Exact, whole-word lookup.
    pub fn lookup(word: &str) -> Option<Keyword> {
        static TABLE: OnceLock<FxHashMap<&'static str, Keyword>> = OnceLock::new();
        TABLE
            .get_or_init(|| Keyword::ALL.iter().map(|k| (k.as_str(), *k)).collect())
            .get(word)
            .copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds, with the literal payload carried by the variants that have one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    UintLiteral(u64),
    FloatLiteral(f64),
    StringLiteral(Vec<u8>),

    // Names
    UpperName(String),
    LowerName(String),
    DotName(String), // .name (payload without the dot)
    AtName(String),  // @name (payload without the at)

    Keyword(Keyword),

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    TildeEq,   // ~=
    LtLtEq,    // <<=
    GtGtEq,    // >>=

    // Punctuation
    Dot,       // . (only before an uppercase name)
    Colon,     // :
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    // End of input
    Eof,
}

impl TokenKind {
    /// Whether two kinds are the same variant, ignoring payloads.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && match (self, other) {
                (TokenKind::Keyword(a), TokenKind::Keyword(b)) => a == b,
                _ => true,
            }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::UintLiteral(n) => write!(f, "integer literal {}", n),
            TokenKind::FloatLiteral(x) => write!(f, "float literal {}", x),
            TokenKind::StringLiteral(bytes) => {
                write!(f, "string literal \"{}\"", String::from_utf8_lossy(bytes).escape_debug())
            }
            TokenKind::UpperName(s) => write!(f, "type name '{}'", s),
            TokenKind::LowerName(s) => write!(f, "name '{}'", s),
            TokenKind::DotName(s) => write!(f, "dot name '.{}'", s),
            TokenKind::AtName(s) => write!(f, "at name '@{}'", s),
            TokenKind::Keyword(k) => write!(f, "'{}'", k),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::LtLt => write!(f, "'<<'"),
            TokenKind::GtGt => write!(f, "'>>'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::PlusEq => write!(f, "'+='"),
            TokenKind::MinusEq => write!(f, "'-='"),
            TokenKind::StarEq => write!(f, "'*='"),
            TokenKind::SlashEq => write!(f, "'/='"),
            TokenKind::PercentEq => write!(f, "'%='"),
            TokenKind::AmpEq => write!(f, "'&='"),
            TokenKind::PipeEq => write!(f, "'|='"),
            TokenKind::TildeEq => write!(f, "'~='"),
            TokenKind::LtLtEq => write!(f, "'<<='"),
            TokenKind::GtGtEq => write!(f, "'>>='"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A lexed token: kind (with payload), where it starts, and its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation, span: Range<usize>) -> Self {
        Self {
            kind,
            location,
            span,
        }
    }

    /// The exact source bytes this token was read from.
    pub fn lexeme<'a, S: AsRef<[u8]> + ?Sized>(&self, source: &'a S) -> &'a [u8] {
        source.as_ref().get(self.span.clone()).unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}
