// End-to-end tests for the `tarn` binary

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn write_source(name: &str, text: impl AsRef<[u8]>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tarn-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let path = dir.join(name);
    fs::write(&path, text).expect("Failed to write source");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tarn"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run tarn")
}

#[test]
fn test_prints_program_and_exits_zero() {
    let path = write_source("ok.tarn", "import a.b.C as x;\ntype Box<T>= T;\n");
    let output = run(&[path.to_str().unwrap(), "--color", "never"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "import a.b.C as x;\n\ntype Box<T> = T;\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn test_output_flag_is_accepted_and_ignored() {
    let path = write_source("out.tarn", "type A = B;");
    let target = path.with_extension("bin");
    let output = run(&[path.to_str().unwrap(), "-o", target.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(!target.exists());
}

#[test]
fn test_syntax_error_exits_one() {
    let path = write_source("bad.tarn", "type A {\n    x: Int\n}\n");
    let output = run(&[path.to_str().unwrap(), "--color", "never"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.trim_end(),
        format!("Syntax error {}:3 unexpected token '}}'", path.display())
    );
}

#[test]
fn test_lexical_error_exits_one() {
    let path = write_source("lex.tarn", "import a;\n$\n");
    let output = run(&[path.to_str().unwrap(), "--color", "never"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with(&format!("Parsing Error {}:2: ", path.display())));
}

#[test]
fn test_latin1_comment_is_not_an_io_error() {
    let path = write_source("latin1.tarn", b"type A = B;\n// caf\xe9\n");
    let output = run(&[path.to_str().unwrap(), "--color", "never"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "type A = B;\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_deep_generic_nesting_is_a_syntax_error() {
    let depth = 20_000;
    let source = format!("type A = {}B{};\n", "B<".repeat(depth), ">".repeat(depth));
    let path = write_source("deep.tarn", source);
    let output = run(&[path.to_str().unwrap(), "--color", "never"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.trim_end(),
        format!(
            "Syntax error {}:1 type arguments nested deeper than 256",
            path.display()
        )
    );
}

#[test]
fn test_missing_file_exits_one() {
    let output = run(&["/no/such/file.tarn", "--color", "never"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: cannot read /no/such/file.tarn"));
}

#[test]
fn test_missing_argument_is_usage_error() {
    let output = run(&[]);
    assert!(!output.status.success());
}
