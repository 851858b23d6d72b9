// Integration tests for the Tarn front end

use tarn::parser::ast::{Declaration, EnumField, Field, Type, TypeDeclBody};
use tarn::parser::lexer::{tokenize, LexErrorKind};
use tarn::parser::token::{Keyword, TokenKind};
use tarn::printer::print_program;
use tarn::source::{FileId, SourceMap};
use tarn::{parse_source, parse_str, Error, ParseError};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, FileId::ANONYMOUS)
        .expect("Lexing failed")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_keywords_need_a_boundary() {
    for keyword in Keyword::ALL {
        let word = keyword.as_str();
        assert_eq!(kinds(word)[0], TokenKind::Keyword(keyword), "{word}");

        for suffix in ["x", "9", "Z"] {
            let glued = format!("{word}{suffix}");
            assert_eq!(
                kinds(&glued)[0],
                TokenKind::LowerName(glued.clone()),
                "{glued} must not lex as a keyword"
            );
        }
    }
}

#[test]
fn test_maximal_munch() {
    assert_eq!(kinds(">>="), vec![TokenKind::GtGtEq, TokenKind::Eof]);
    assert_eq!(
        kinds("a<<=b"),
        vec![
            TokenKind::LowerName("a".into()),
            TokenKind::LtLtEq,
            TokenKind::LowerName("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""\x41""#)[0],
        TokenKind::StringLiteral(b"A".to_vec())
    );
    assert_eq!(
        kinds(r#""\n""#)[0],
        TokenKind::StringLiteral(b"\n".to_vec())
    );
}

#[test]
fn test_integer_overflow_is_fatal() {
    let err = tokenize("18446744073709551616", FileId::ANONYMOUS).unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::IntegerOverflow(_)));

    assert_eq!(
        kinds("18446744073709551615")[0],
        TokenKind::UintLiteral(u64::MAX)
    );
}

#[test]
fn test_nested_generics() {
    let program = parse_str("type A = Type<Type<Type>>;").expect("Parsing failed");
    let decl = program.type_decls().next().expect("type declaration");

    match &decl.body {
        TypeDeclBody::Alias(ty) => {
            assert_eq!(ty.depth(), 2);
            assert_eq!(
                *ty,
                Type::new("Type").with_arg(Type::new("Type").with_arg(Type::new("Type")))
            );
        }
        other => panic!("Expected alias, got {:?}", other),
    }

    let err = parse_str("type A = Type<Type<Type>;").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::UnexpectedToken {
            found: TokenKind::Semicolon,
            ..
        })
    ));
}

#[test]
fn test_import_paths() {
    let program = parse_str("import a.b.C;\nimport a.b.C as x;").expect("Parsing failed");
    let imports: Vec<_> = program.imports().collect();

    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].path.segments(), ["a", "b", "C"]);
    assert_eq!(imports[0].alias, None);
    assert_eq!(imports[1].path, imports[0].path);
    assert_eq!(imports[1].alias.as_deref(), Some("x"));
    assert_eq!(imports[1].location.line, 2);
}

#[test]
fn test_bodies_need_fields_and_semicolons() {
    let rejected = [
        "type A {};",
        "type A union {};",
        "type A enum {};",
        "type A { x: Int };",
        "type A union { x: Int };",
        "type A enum { x: Int };",
    ];

    for source in rejected {
        assert!(
            matches!(parse_str(source), Err(Error::Parse(_))),
            "{source} should be rejected"
        );
    }
}

#[test]
fn test_alias_end_to_end() {
    let program = parse_str("type Box<T> = T;").expect("Parsing failed");

    assert_eq!(program.declarations.len(), 1);
    match &program.declarations[0] {
        Declaration::Type(decl) => {
            assert_eq!(decl.header.name, "Box");
            assert_eq!(decl.header.params, vec!["T".to_string()]);
            assert_eq!(decl.body, TypeDeclBody::Alias(Type::new("T")));
        }
        other => panic!("Expected type declaration, got {:?}", other),
    }

    assert_eq!(print_program(&program), "type Box<T> = T;\n");
}

#[test]
fn test_record_end_to_end() {
    let program = parse_str("type Pair { first: Int; second: Int; }").expect("Parsing failed");

    match &program.declarations[0] {
        Declaration::Type(decl) => {
            assert_eq!(
                decl.body,
                TypeDeclBody::Record(vec![
                    Field::new("first", Type::new("Int")),
                    Field::new("second", Type::new("Int")),
                ])
            );
        }
        other => panic!("Expected type declaration, got {:?}", other),
    }
}

#[test]
fn test_module_with_every_declaration_shape() {
    let source = r#"
        // std imports
        import std.io.Writer as writer;
        import .shapes;

        /* aliases */
        export type Handle = ref Int;
        type Table<K, V> = Map<K, List<V>>;

        type Point {
            x: Float;
            y: Float;
        };

        type Number union {
            small: Int;
            big: ref BigInt;
        };

        export type Shape<T> enum {
            empty;
            circle: Circle<T>;
        };
    "#;

    let program = parse_str(source).expect("Parsing failed");
    assert_eq!(program.imports().count(), 2);
    assert_eq!(program.type_decls().count(), 5);

    let shape = program.type_decls().last().expect("enum declaration");
    assert!(shape.exported);
    match &shape.body {
        TypeDeclBody::Enum(cases) => {
            assert_eq!(cases[0], EnumField::Untyped("empty".into()));
            assert_eq!(cases[1].name(), "circle");
        }
        other => panic!("Expected enum, got {:?}", other),
    }

    let lines: Vec<usize> = program
        .declarations
        .iter()
        .map(|decl| decl.location().line)
        .collect();
    assert_eq!(lines, vec![3, 4, 7, 8, 10, 15, 20]);
}

#[test]
fn test_locations_carry_their_file() {
    let mut sources = SourceMap::new();
    let first = sources.add("first.tarn", "import a;");
    let second = sources.add("second.tarn", "\n\nimport b;");

    let a = parse_source(&sources, first, &mut Vec::new()).expect("Parsing failed");
    let b = parse_source(&sources, second, &mut Vec::new()).expect("Parsing failed");

    assert_eq!(a.declarations[0].location().file, first);
    assert_eq!(b.declarations[0].location().file, second);
    assert_eq!(b.declarations[0].location().line, 3);
}

#[test]
fn test_fail_fast_reports_first_error_only() {
    let err = parse_str("type A = ;\ntype B = ;").unwrap_err();
    match err {
        Error::Parse(err) => assert_eq!(err.location().line, 1),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_unsupported_declarations() {
    for (source, construct) in [
        ("func main() { return; }", "function"),
        ("cfunc main() {}", "cfunc"),
        ("test { }", "test"),
        ("external func puts(s: String);", "external function"),
        ("export func main() {}", "exported function"),
    ] {
        match parse_str(source) {
            Err(Error::Parse(ParseError::Unsupported { construct: c, .. })) => {
                assert_eq!(c, construct)
            }
            other => panic!("{source}: expected unsupported, got {:?}", other),
        }
    }
}

#[test]
fn test_very_deep_generic_nesting_returns_an_error() {
    let depth = 100_000;
    let source = format!("type A = {}B{};", "B<".repeat(depth), ">".repeat(depth));

    match parse_str(&source) {
        Err(Error::Parse(ParseError::NestingTooDeep { limit, location })) => {
            assert_eq!(limit, tarn::parser::declarations::MAX_TYPE_NESTING);
            assert_eq!(location.line, 1);
        }
        other => panic!("Expected a nesting error, got {:?}", other),
    }
}
