//! AST printer: renders a [`Program`] back to Tarn source text.
//!
//! The output is deterministic and re-parseable. Printing a parsed program,
//! parsing the result and printing again yields the same text.
//!
//! # Layout
//!
//! ```text
//! import std.io.Writer as writer;
//! import .util;
//!
//! type Box<T> = T;
//!
//! export type Pair<A, B> {
//!     first: A;
//!     second: B;
//! };
//! ```
//!
//! Imports go one per line. Every other declaration is preceded by a blank
//! line unless it opens the file. Members and statements are indented four
//! spaces per level. Expressions carry only the parentheses the precedence
//! ladder in [`BinaryOp::precedence`] requires.

use crate::parser::ast::*;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Render a whole program.
#[must_use]
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::default();
    for (i, decl) in program.declarations.iter().enumerate() {
        if i > 0 && !matches!(decl, Declaration::Import(_)) {
            printer.out.push('\n');
        }
        printer.declaration(decl);
    }
    printer.out
}

/// Render a single declaration, without the separating blank line.
#[must_use]
pub fn print_declaration(decl: &Declaration) -> String {
    let mut printer = Printer::default();
    printer.declaration(decl);
    printer.out
}

/// Render a statement list at indentation level zero.
#[must_use]
pub fn print_statements(body: &[Statement]) -> String {
    let mut printer = Printer::default();
    printer.statements(body);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{text}");
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Import(import) => self.line(import),
            Declaration::Type(decl) => self.type_decl(decl),
            Declaration::Func(func) => self.func_decl(func),
            Declaration::CFunc(func) => {
                let signature = format!(
                    "cfunc {}({}){}",
                    func.name,
                    Params(&func.params),
                    Returns(func.returns.as_ref())
                );
                self.block(&signature, &func.body);
            }
            Declaration::Test(test) => self.block("test", &test.body),
        }
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        let export = if decl.exported { "export " } else { "" };
        let head = format!("{export}type {}", decl.header);

        match &decl.body {
            TypeDeclBody::Alias(aliased) => self.line(format_args!("{head} = {aliased};")),
            TypeDeclBody::Record(fields) => {
                self.line(format_args!("{head} {{"));
                self.fields(fields);
                self.line("};");
            }
            TypeDeclBody::Union(fields) => {
                self.line(format_args!("{head} union {{"));
                self.fields(fields);
                self.line("};");
            }
            TypeDeclBody::Enum(cases) => {
                self.line(format_args!("{head} enum {{"));
                self.nested(|p| {
                    for case in cases {
                        match case {
                            EnumField::Untyped(name) => p.line(format_args!("{name};")),
                            EnumField::Typed { name, payload } => {
                                p.line(format_args!("{name}: {payload};"))
                            }
                        }
                    }
                });
                self.line("};");
            }
        }
    }

    fn fields(&mut self, fields: &[Field]) {
        self.nested(|p| {
            for field in fields {
                p.line(format_args!("{field};"));
            }
        });
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        let mut signature = String::new();
        if func.exported {
            signature.push_str("export ");
        }
        if func.external {
            signature.push_str("external ");
        }
        signature.push_str("func ");
        if let Some(receiver) = &func.receiver {
            let _ = write!(signature, "({}: {}) ", receiver.name, receiver.header);
        }
        let _ = write!(
            signature,
            "{}({}){}",
            func.name,
            Params(&func.params),
            Returns(func.returns.as_ref())
        );

        if func.external && func.body.is_empty() {
            self.line(format_args!("{signature};"));
        } else {
            self.block(&signature, &func.body);
        }
    }

    /// `head {`, the indented body, then `}`
    fn block(&mut self, head: &str, body: &[Statement]) {
        self.line(format_args!("{head} {{"));
        self.nested(|p| p.statements(body));
        self.line("}");
    }

    fn statements(&mut self, body: &[Statement]) {
        for stmt in body {
            self.statement(stmt);
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Var { name, value } => self.line(format_args!("var {name} = {value};")),
            Statement::Const { name, value } => {
                self.line(format_args!("const {name} = {value};"))
            }
            Statement::If {
                condition,
                then_block,
                else_block,
            } => {
                self.line(format_args!("if {condition} {{"));
                self.nested(|p| p.statements(then_block));
                if let Some(else_block) = else_block {
                    self.line("} else {");
                    self.nested(|p| p.statements(else_block));
                }
                self.line("}");
            }
            Statement::Switch {
                subject,
                cases,
                default,
            } => {
                self.line(format_args!("switch {subject} {{"));
                self.nested(|p| {
                    for case in cases {
                        p.block(&format!("case {}", case.value), &case.body);
                    }
                    if let Some(default) = default {
                        p.block("default", default);
                    }
                });
                self.line("}");
            }
            Statement::DoWhile {
                label,
                body,
                condition,
            } => {
                self.line(format_args!("{}do {{", Label(label.as_deref())));
                self.nested(|p| p.statements(body));
                self.line(format_args!("}} while {condition};"));
            }
            Statement::While {
                label,
                condition,
                body,
            } => {
                let head = format!("{}while {condition}", Label(label.as_deref()));
                self.block(&head, body);
            }
            Statement::For {
                label,
                var,
                range,
                body,
            } => {
                let head = format!("{}for {var} in {range}", Label(label.as_deref()));
                self.block(&head, body);
            }
            Statement::Loop { label, body } => {
                let head = format!("{}loop", Label(label.as_deref()));
                self.block(&head, body);
            }
            Statement::Return(None) => self.line("return;"),
            Statement::Return(Some(value)) => self.line(format_args!("return {value};")),
            Statement::Assign { target, value } => match target {
                AssignTarget::Name(name) => self.line(format_args!("{name} = {value};")),
                AssignTarget::Place(place) => self.line(format_args!("{place} = {value};")),
            },
            Statement::Call(call) => self.line(format_args!("{call};")),
        }
    }
}

struct Label<'a>(Option<&'a str>);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(label) => write!(f, "@{label} "),
            None => Ok(()),
        }
    }
}

struct Params<'a>(&'a [Field]);

impl fmt::Display for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        comma_separated(f, self.0)
    }
}

struct Returns<'a>(Option<&'a Type>);

impl fmt::Display for Returns<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ty) => write!(f, ": {ty}"),
            None => Ok(()),
        }
    }
}

fn comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn angle_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    comma_separated(f, items)?;
    f.write_str(">")
}

// ===== Display for AST nodes =====

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        if self.relative {
            f.write_str(".")?;
        }
        write!(f, "{}", self.path)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        f.write_str(";")
    }
}

impl fmt::Display for TypeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        angle_list(f, &self.params)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ref {
            f.write_str("ref ")?;
        }
        f.write_str(&self.name)?;
        angle_list(f, &self.args)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(bytes) => {
                f.write_str("\"")?;
                for &byte in bytes {
                    match byte {
                        b'\\' => f.write_str("\\\\")?,
                        b'"' => f.write_str("\\\"")?,
                        b'\n' => f.write_str("\\n")?,
                        b'\r' => f.write_str("\\r")?,
                        b'\t' => f.write_str("\\t")?,
                        0x20..=0x7e => f.write_char(byte as char)?,
                        _ => write!(f, "\\x{byte:02x}")?,
                    }
                }
                f.write_str("\"")
            }
            // Spellings the lexer reads back: `1e999` overflows to infinity.
            Literal::Float(value) if value.is_nan() => f.write_str("(0.0 / 0.0)"),
            Literal::Float(value) if value.is_infinite() => {
                let sign = if value.is_sign_negative() { "-" } else { "" };
                write!(f, "{sign}1e999")
            }
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::Uint(value) => write!(f, "{value}"),
            Literal::Name(path) => write!(f, "{path}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        comma_separated(f, &self.args)?;
        f.write_str(")")
    }
}

/// Writes `expr`, wrapped in parentheses when `wrap` holds.
struct Operand<'a> {
    expr: &'a Expression,
    wrap: bool,
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wrap {
            write!(f, "({})", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{literal}"),
            Expression::Call(call) => write!(f, "{call}"),
            Expression::Get { object, field } => {
                // `1.x` would lex as the float `1.` followed by a name.
                let numeric = matches!(
                    **object,
                    Expression::Literal(Literal::Uint(_) | Literal::Float(_))
                );
                let object = Operand {
                    expr: object,
                    wrap: numeric || object.precedence() <= UNARY_PRECEDENCE,
                };
                write!(f, "{object}.{field}")
            }
            Expression::Cast { expr, target } => {
                let expr = Operand {
                    expr,
                    wrap: expr.precedence() < UNARY_PRECEDENCE,
                };
                write!(f, "{expr} as {target}")
            }
            Expression::Unary { op, operand } => {
                // `&&x` would lex as a single `&&`, so stacked prefixes get a space.
                let spacer = if matches!(**operand, Expression::Unary { .. }) {
                    " "
                } else {
                    ""
                };
                let operand = Operand {
                    expr: operand,
                    wrap: operand.precedence() < UNARY_PRECEDENCE
                        || matches!(**operand, Expression::Cast { .. }),
                };
                write!(f, "{}{spacer}{operand}", op.symbol())
            }
            Expression::Binary { op, left, right } => {
                let level = op.precedence();
                let left = Operand {
                    expr: left,
                    wrap: left.precedence() < level,
                };
                let right = Operand {
                    expr: right,
                    wrap: right.precedence() <= level,
                };
                write!(f, "{left} {} {right}", op.symbol())
            }
        }
    }
}
