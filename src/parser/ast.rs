// AST (Abstract Syntax Tree) definitions for the Tarn front end

use crate::source::FileId;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: FileId,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: FileId, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

/// Dotted name such as `std.io.Writer`.
///
/// A path always has at least one segment: it is created from its first
/// segment and can only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new(first: impl Into<String>) -> Self {
        Path {
            segments: vec![first.into()],
        }
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.push(segment);
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

/// `import a.b.C as x;`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Written as a dotted tail (`import .sibling;`), resolved relative to the importing file.
    pub relative: bool,
    pub path: Path,
    pub alias: Option<String>,
    pub location: SourceLocation,
}

/// Declared type name plus its generic parameter names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    pub name: String,
    pub params: Vec<String>,
}

impl TypeHeader {
    pub fn new(name: impl Into<String>) -> Self {
        TypeHeader {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }
}

/// Type expression: `[ref] Name[<Arg, ...>]`
///
/// Argument counts are not checked against the declaration's header here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub is_ref: bool,
    pub name: String,
    pub args: Vec<Type>,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Type {
            is_ref: false,
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_ref(mut self) -> Self {
        self.is_ref = true;
        self
    }

    pub fn with_arg(mut self, arg: Type) -> Self {
        self.args.push(arg);
        self
    }

    /// Nesting depth of the argument tree (`Int` is 0, `List<Int>` is 1).
    pub fn depth(&self) -> usize {
        self.args.iter().map(|a| a.depth() + 1).max().unwrap_or(0)
    }
}

/// Record / union member, also used for function parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Field {
            name: name.into(),
            field_type,
        }
    }
}

/// Enum case, with or without a payload type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumField {
    Untyped(String),
    Typed { name: String, payload: Type },
}

impl EnumField {
    pub fn name(&self) -> &str {
        match self {
            EnumField::Untyped(name) => name,
            EnumField::Typed { name, .. } => name,
        }
    }
}

/// The four shapes a type declaration can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDeclBody {
    Alias(Type),
    Enum(Vec<EnumField>),
    Union(Vec<Field>),
    Record(Vec<Field>),
}

/// `[export] type Header <body>;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub exported: bool,
    pub header: TypeHeader,
    pub body: TypeDeclBody,
    pub location: SourceLocation,
}

// ---------------------------------------------------------------------------
// Expressions and statements.
//
// The parser does not build these yet; they are constructed by hand (tests,
// future passes) and rendered by the printer.
// ---------------------------------------------------------------------------

/// Binding strength of prefix operators and casts.
pub const UNARY_PRECEDENCE: u8 = 10;

/// Assignment binds weakest of all and groups to the right.
pub const ASSIGNMENT_PRECEDENCE: u8 = 0;

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Ref,    // &x
    Deref,  // *x
    Neg,    // -x
    BitNot, // ~x
    Not,    // !x
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Ref => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    // Bitwise
    BitAnd,
    BitOr,
    Shl,
    Shr,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Precedence ladder, higher binds tighter:
    ///
    /// ```text
    /// 10  unary (cast, ref, deref, negate, bitwise-not, logical-not)
    ///  9  * / %
    ///  8  + -
    ///  7  << >>
    ///  6  < > <= >=
    ///  5  == !=
    ///  4  &
    ///  3  |
    ///  2  &&
    ///  1  ||
    ///  0  assignment (right-associative)
    /// ```
    ///
    /// Every binary operator is left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 9,
            BinaryOp::Add | BinaryOp::Sub => 8,
            BinaryOp::Shl | BinaryOp::Shr => 7,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 6,
            BinaryOp::Eq | BinaryOp::Ne => 5,
            BinaryOp::BitAnd => 4,
            BinaryOp::BitOr => 3,
            BinaryOp::And => 2,
            BinaryOp::Or => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(Vec<u8>),
    Float(f64),
    Uint(u64),
    Name(Path),
}

/// `name(arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Cast {
        expr: Box<Expression>,
        target: Type,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// Field read: `object.field`
    Get {
        object: Box<Expression>,
        field: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call(Call),
    Literal(Literal),
}

impl Expression {
    pub fn name(name: impl Into<String>) -> Self {
        Expression::Literal(Literal::Name(Path::new(name)))
    }

    pub fn uint(value: u64) -> Self {
        Expression::Literal(Literal::Uint(value))
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Binding strength of the outermost operator; atoms bind tightest.
    pub fn precedence(&self) -> u8 {
        match self {
            Expression::Binary { op, .. } => op.precedence(),
            Expression::Cast { .. } | Expression::Unary { .. } => UNARY_PRECEDENCE,
            Expression::Get { .. } | Expression::Call(_) | Expression::Literal(_) => {
                UNARY_PRECEDENCE + 1
            }
        }
    }
}

/// One `case` arm of a switch
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Literal,
    pub body: Vec<Statement>,
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Name(String),
    /// Store through a dereference or field access.
    Place(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var {
        name: String,
        value: Expression,
    },
    Const {
        name: String,
        value: Expression,
    },
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        else_block: Option<Vec<Statement>>,
    },
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Statement>>,
    },
    /// Condition-last loop
    DoWhile {
        label: Option<String>,
        body: Vec<Statement>,
        condition: Expression,
    },
    /// Condition-first loop
    While {
        label: Option<String>,
        condition: Expression,
        body: Vec<Statement>,
    },
    /// Counted loop: `for i in range`
    For {
        label: Option<String>,
        var: String,
        range: Expression,
        body: Vec<Statement>,
    },
    Loop {
        label: Option<String>,
        body: Vec<Statement>,
    },
    Return(Option<Expression>),
    Assign {
        target: AssignTarget,
        value: Expression,
    },
    Call(Call),
}

/// `self` binding of a method: `func (self: List<T>) len() ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    pub name: String,
    pub header: TypeHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub exported: bool,
    pub external: bool,
    pub receiver: Option<Receiver>,
    pub name: String,
    pub params: Vec<Field>,
    pub returns: Option<Type>,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

/// Function with C linkage
#[derive(Debug, Clone, PartialEq)]
pub struct CFuncDecl {
    pub name: String,
    pub params: Vec<Field>,
    pub returns: Option<Type>,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestBlock {
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Import(Import),
    Type(TypeDecl),
    Func(FuncDecl),
    CFunc(CFuncDecl),
    Test(TestBlock),
}

impl Declaration {
    /// Get the source location of this declaration
    pub fn location(&self) -> &SourceLocation {
        match self {
            Declaration::Import(import) => &import.location,
            Declaration::Type(decl) => &decl.location,
            Declaration::Func(func) => &func.location,
            Declaration::CFunc(func) => &func.location,
            Declaration::Test(test) => &test.location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>, // In source order
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Type(decl) => Some(decl),
            _ => None,
        })
    }
}
