//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations in Tarn programs:
//!
//! - Imports: `import std.io.Writer as writer;`, `import .sibling;`
//! - Type declarations: aliases, enums, unions and records
//! - Type expressions with nested generic arguments
//!
//! Function, external-function and test declarations are recognized by their
//! keywords and rejected with [`ParseError::Unsupported`].
//!
//! # Grammar
//!
//! ```text
//! declaration ::= import | ["export"] type_decl
//! import      ::= "import" (path | dot_name+) ["as" lower_name] ";"
//! path        ::= (upper_name | lower_name) (dot_name | "." upper_name)*
//! type_decl   ::= "type" header ( "=" type ";"
//!                               | "enum" enum_body [";"]
//!                               | "union" field_list [";"]
//!                               | field_list [";"] )
//! header      ::= upper_name ["<" upper_name ("," upper_name)* ">"]
//! type        ::= ["ref"] upper_name ["<" type ("," type)* ">"]
//! field_list  ::= "{" (lower_name ":" type ";")+ "}"
//! enum_body   ::= "{" (lower_name [":" type] ";")+ "}"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::{Keyword, TokenKind};
use tracing::trace;

/// How many generic argument lists may enclose one another in a type.
pub const MAX_TYPE_NESTING: usize = 256;

impl Parser {
    /// Parse a top-level declaration, dispatching on its leading keyword
    pub(crate) fn parse_top_level_declaration(&mut self) -> Result<Declaration, ParseError> {
        let loc = self.tokens.current_location();
        trace!(line = loc.line, token = %self.tokens.peek(), "top-level declaration");

        let keyword = match self.tokens.peek_kind() {
            TokenKind::Keyword(keyword) => *keyword,
            _ => return Err(self.unexpected("a top-level declaration")),
        };

        match keyword {
            Keyword::Import => {
                self.tokens.advance();
                Ok(Declaration::Import(self.parse_import(loc)?))
            }
            Keyword::Type => {
                self.tokens.advance();
                Ok(Declaration::Type(self.parse_type_decl(false, loc)?))
            }
            Keyword::Export => {
                self.tokens.advance();
                if self.tokens.match_keyword(Keyword::Type) {
                    Ok(Declaration::Type(self.parse_type_decl(true, loc)?))
                } else if self.tokens.check_keyword(Keyword::Func) {
                    Err(unsupported("exported function", loc))
                } else {
                    Err(self.unexpected("'type' or 'func' after 'export'"))
                }
            }
            Keyword::External => {
                self.tokens.advance();
                if self.tokens.check_keyword(Keyword::Func) {
                    Err(unsupported("external function", loc))
                } else {
                    Err(self.unexpected("'func' after 'external'"))
                }
            }
            Keyword::Func => Err(unsupported("function", loc)),
            Keyword::CFunc => Err(unsupported("cfunc", loc)),
            Keyword::Test => Err(unsupported("test", loc)),
            _ => Err(self.unexpected("a top-level declaration")),
        }
    }

    /// Parse import after the `import` keyword: `path ["as" name] ";"`
    pub(crate) fn parse_import(&mut self, location: SourceLocation) -> Result<Import, ParseError> {
        let (relative, path) = match self.tokens.peek_kind() {
            TokenKind::UpperName(_) | TokenKind::LowerName(_) => (false, self.parse_path()?),
            TokenKind::DotName(_) => (true, self.parse_path_tail()?),
            _ => return Err(self.unexpected("a module path after 'import'")),
        };

        let alias = if self.tokens.match_keyword(Keyword::As) {
            Some(self.expect_lower_name("after 'as'")?)
        } else {
            None
        };

        self.expect_semicolon("after import")?;

        Ok(Import {
            relative,
            path,
            alias,
            location,
        })
    }

    /// Parse a qualified name: `a.b.C`
    pub(crate) fn parse_path(&mut self) -> Result<Path, ParseError> {
        let first = match self.tokens.peek_kind() {
            TokenKind::UpperName(name) | TokenKind::LowerName(name) => name.clone(),
            _ => return Err(self.unexpected("a name")),
        };
        self.tokens.advance();

        let mut path = Path::new(first);
        self.parse_path_segments(&mut path)?;
        Ok(path)
    }

    /// Parse a path written only as dotted segments: `.a.b`
    pub(crate) fn parse_path_tail(&mut self) -> Result<Path, ParseError> {
        let first = match self.tokens.peek_kind() {
            TokenKind::DotName(name) => name.clone(),
            _ => return Err(self.unexpected("'.name'")),
        };
        self.tokens.advance();

        let mut path = Path::new(first);
        self.parse_path_segments(&mut path)?;
        Ok(path)
    }

    /// Append `.name` and `.Name` segments until something else shows up
    fn parse_path_segments(&mut self, path: &mut Path) -> Result<(), ParseError> {
        loop {
            match self.tokens.peek_kind() {
                TokenKind::DotName(name) => {
                    let name = name.clone();
                    self.tokens.advance();
                    path.push(name);
                }
                TokenKind::Dot => {
                    self.tokens.advance();
                    path.push(self.expect_upper_name("after '.'")?);
                }
                _ => return Ok(()),
            }
        }
    }

    /// Parse type header: `Name[<P, Q>]`
    pub(crate) fn parse_type_header(&mut self) -> Result<TypeHeader, ParseError> {
        let name = self.expect_upper_name("in type declaration")?;
        let mut header = TypeHeader::new(name);

        if self.tokens.match_token(&TokenKind::Lt) {
            loop {
                header
                    .params
                    .push(self.expect_upper_name("as generic parameter")?);

                if !self.tokens.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing_angle("after generic parameters")?;
        }

        Ok(header)
    }

    /// Parse type: `[ref] Name[<Type, ...>]`
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.parse_type_at(0)
    }

    /// `depth` counts the argument lists already open around this type.
    fn parse_type_at(&mut self, depth: usize) -> Result<Type, ParseError> {
        let is_ref = self.tokens.match_keyword(Keyword::Ref);
        let name = self.expect_upper_name("in type")?;

        let mut args = Vec::new();
        if self.tokens.check(&TokenKind::Lt) {
            if depth == MAX_TYPE_NESTING {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_TYPE_NESTING,
                    location: self.tokens.current_location(),
                });
            }
            self.tokens.advance();

            loop {
                args.push(self.parse_type_at(depth + 1)?);

                if !self.tokens.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closing_angle("after type arguments")?;
        }

        Ok(Type { is_ref, name, args })
    }

    /// Parse field list: `{ name: Type; ... }`, at least one field
    pub(crate) fn parse_field_list(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect_lbrace("to open field list")?;

        let mut fields = Vec::new();
        loop {
            let name = self.expect_lower_name("as field name")?;
            self.expect_colon("after field name")?;
            let field_type = self.parse_type()?;
            self.expect_semicolon("after field")?;

            fields.push(Field { name, field_type });

            if self.tokens.match_token(&TokenKind::RBrace) {
                break;
            }
        }

        Ok(fields)
    }

    /// Parse enum body: `{ name; name: Type; ... }`, at least one case
    pub(crate) fn parse_enum_field_list(&mut self) -> Result<Vec<EnumField>, ParseError> {
        self.expect_lbrace("to open enum body")?;

        let mut cases = Vec::new();
        loop {
            let name = self.expect_lower_name("as enum case")?;

            if self.tokens.match_token(&TokenKind::Colon) {
                let payload = self.parse_type()?;
                cases.push(EnumField::Typed { name, payload });
            } else {
                cases.push(EnumField::Untyped(name));
            }

            self.expect_semicolon("after enum case")?;

            if self.tokens.match_token(&TokenKind::RBrace) {
                break;
            }
        }

        Ok(cases)
    }

    /// Parse type declaration after the `type` keyword
    pub(crate) fn parse_type_decl(
        &mut self,
        exported: bool,
        location: SourceLocation,
    ) -> Result<TypeDecl, ParseError> {
        let header = self.parse_type_header()?;

        let body = if self.tokens.match_token(&TokenKind::Eq) {
            let aliased = self.parse_type()?;
            self.expect_semicolon("after type alias")?;
            TypeDeclBody::Alias(aliased)
        } else if self.tokens.match_keyword(Keyword::Enum) {
            let cases = self.parse_enum_field_list()?;
            self.tokens.match_token(&TokenKind::Semicolon);
            TypeDeclBody::Enum(cases)
        } else if self.tokens.match_keyword(Keyword::Union) {
            let fields = self.parse_field_list()?;
            self.tokens.match_token(&TokenKind::Semicolon);
            TypeDeclBody::Union(fields)
        } else if self.tokens.check(&TokenKind::LBrace) {
            let fields = self.parse_field_list()?;
            self.tokens.match_token(&TokenKind::Semicolon);
            TypeDeclBody::Record(fields)
        } else {
            return Err(self.unexpected("'=', 'enum', 'union' or '{' after type header"));
        };

        Ok(TypeDecl {
            exported,
            header,
            body,
            location,
        })
    }
}

fn unsupported(construct: &'static str, location: SourceLocation) -> ParseError {
    ParseError::Unsupported {
        construct,
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FileId;

    fn parser(source: &str) -> Parser {
        Parser::from_source(source, FileId::ANONYMOUS).unwrap()
    }

    fn parse_decl(source: &str) -> Result<Declaration, ParseError> {
        parser(source).parse_top_level_declaration()
    }

    #[test]
    fn test_import_path() {
        match parse_decl("import a.b.C;").unwrap() {
            Declaration::Import(import) => {
                assert!(!import.relative);
                assert_eq!(import.path.segments(), ["a", "b", "C"]);
                assert_eq!(import.alias, None);
            }
            other => panic!("Expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_import_rename() {
        match parse_decl("import a.b.C as x;").unwrap() {
            Declaration::Import(import) => {
                assert_eq!(import.path.segments(), ["a", "b", "C"]);
                assert_eq!(import.alias.as_deref(), Some("x"));
            }
            other => panic!("Expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_import_relative_tail() {
        match parse_decl("import .util.strings;").unwrap() {
            Declaration::Import(import) => {
                assert!(import.relative);
                assert_eq!(import.path.segments(), ["util", "strings"]);
            }
            other => panic!("Expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_import_rename_must_be_lowercase() {
        let err = parse_decl("import a as X;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { found: TokenKind::UpperName(_), .. }
        ));
    }

    #[test]
    fn test_nested_generic_type() {
        let ty = parser("Type<Type<Type>>").parse_type().unwrap();
        assert_eq!(ty.depth(), 2);
        assert_eq!(ty.args.len(), 1);
        assert_eq!(ty.args[0].args[0], Type::new("Type"));
    }

    fn nested(depth: usize) -> String {
        format!("{}B{}", "B<".repeat(depth), ">".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_the_limit_parses() {
        let ty = parser(&nested(MAX_TYPE_NESTING)).parse_type().unwrap();
        assert_eq!(ty.depth(), MAX_TYPE_NESTING);
    }

    #[test]
    fn test_nesting_past_the_limit_is_an_error() {
        let source = format!("\n{}", nested(MAX_TYPE_NESTING + 1));
        let err = parser(&source).parse_type().unwrap_err();

        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_TYPE_NESTING,
                location: SourceLocation::new(
                    FileId::ANONYMOUS,
                    2,
                    2 * MAX_TYPE_NESTING + 2
                ),
            }
        );
    }

    #[test]
    fn test_unbalanced_generic_type() {
        let err = parser("Type<Type<Type>").parse_type().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfStream { .. }));
    }

    #[test]
    fn test_ref_type_with_several_args() {
        let ty = parser("ref Map<String, ref List<Int>>").parse_type().unwrap();
        assert_eq!(
            ty,
            Type::new("Map")
                .with_ref()
                .with_arg(Type::new("String"))
                .with_arg(Type::new("List").with_ref().with_arg(Type::new("Int")))
        );
    }

    #[test]
    fn test_type_header_params() {
        let header = parser("Map<K, V>").parse_type_header().unwrap();
        assert_eq!(header, TypeHeader::new("Map").with_param("K").with_param("V"));
    }

    #[test]
    fn test_header_closed_by_greater_equal() {
        // `>=` is one token; the header takes its `>` and leaves `=`.
        let decl = parse_decl("type Box<T>= T;").unwrap();
        match decl {
            Declaration::Type(decl) => {
                assert_eq!(decl.header.params, vec!["T".to_string()]);
                assert_eq!(decl.body, TypeDeclBody::Alias(Type::new("T")));
            }
            other => panic!("Expected type declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_cases() {
        let decl = parse_decl("type Shape enum { empty; circle: Circle; square: Square; };").unwrap();
        match decl {
            Declaration::Type(TypeDecl {
                body: TypeDeclBody::Enum(cases),
                ..
            }) => {
                assert_eq!(cases.len(), 3);
                assert_eq!(cases[0], EnumField::Untyped("empty".into()));
                assert_eq!(
                    cases[1],
                    EnumField::Typed {
                        name: "circle".into(),
                        payload: Type::new("Circle"),
                    }
                );
                assert_eq!(cases[2].name(), "square");
            }
            other => panic!("Expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_union_fields() {
        let decl = parse_decl("export type Number union { i: Int; f: Float; };").unwrap();
        match decl {
            Declaration::Type(TypeDecl {
                exported,
                body: TypeDeclBody::Union(fields),
                ..
            }) => {
                assert!(exported);
                assert_eq!(fields.len(), 2);
            }
            other => panic!("Expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bodies_are_rejected() {
        for source in [
            "type A {};",
            "type A union {};",
            "type A enum {};",
        ] {
            let err = parse_decl(source).unwrap_err();
            assert!(
                matches!(err, ParseError::UnexpectedToken { found: TokenKind::RBrace, .. }),
                "{source}: {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_field_semicolon_is_rejected() {
        for source in [
            "type A { x: Int };",
            "type A union { x: Int };",
            "type A enum { x };",
        ] {
            let err = parse_decl(source).unwrap_err();
            assert!(
                matches!(err, ParseError::UnexpectedToken { found: TokenKind::RBrace, .. }),
                "{source}: {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_body_is_rejected() {
        let err = parse_decl("type A struct { x: Int; };").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_functions_and_tests_are_unsupported() {
        for (source, construct) in [
            ("func main() {}", "function"),
            ("export func main() {}", "exported function"),
            ("external func puts(s: String);", "external function"),
            ("cfunc puts(s: String) {}", "cfunc"),
            ("test { }", "test"),
        ] {
            match parse_decl(source).unwrap_err() {
                ParseError::Unsupported { construct: c, .. } => assert_eq!(c, construct),
                other => panic!("{source}: expected unsupported, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_export_needs_type_or_func() {
        let err = parse_decl("export import a;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_stray_token_at_top_level() {
        let err = parse_decl("x;").unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, .. } => {
                assert_eq!(expected, "a top-level declaration")
            }
            other => panic!("Expected unexpected token, got {:?}", other),
        }
    }
}
