use std::process::{Command, Output};

fn r9cc(args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_r9cc"))
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .expect("failed to spawn r9cc")
}

fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn compiles_a_program_to_stdout() {
  let output = r9cc(&["a=1;b=2;a+b;"]);
  assert_eq!(output.status.code(), Some(0));
  let asm = stdout(&output);
  assert!(asm.starts_with(".intel_syntax noprefix\n"));
  assert!(asm.contains(".section .note.GNU-stack,\"\",@progbits\n"));
  assert!(asm.contains(".global main\nmain:\n"));
  assert!(asm.ends_with("  mov rsp, rbp\n  pop rbp\n  ret\n"));
  assert!(stderr(&output).is_empty());
}

#[test]
fn source_may_start_with_a_minus() {
  let output = r9cc(&["-5+8;"]);
  assert_eq!(output.status.code(), Some(0));
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
  let output = r9cc(&[]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());

  let output = r9cc(&["1;", "2;"]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
}

#[test]
fn lex_error_exits_without_assembly() {
  let output = r9cc(&["1 + @;"]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert_eq!(stderr(&output).trim_end(), "error: cannot tokenize: @;");
}

#[test]
fn missing_semicolon_exits_without_assembly() {
  let output = r9cc(&["1+2"]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert!(stderr(&output).contains("expected ';'"));
}

#[test]
fn unclosed_paren_exits_without_assembly() {
  let output = r9cc(&["(1+2;"]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert!(stderr(&output).contains("expected ')'"));
}

#[test]
fn emit_tokens_lists_one_token_per_line() {
  let output = r9cc(&["--emit", "tokens", "a>=10;"]);
  assert_eq!(output.status.code(), Some(0));
  let lines: Vec<_> = stdout(&output).lines().map(str::to_owned).collect();
  assert_eq!(
    lines,
    vec![
      "   0 a",
      "   1 >=",
      "   3 10",
      "   5 ;",
      "   6 EOF",
    ]
  );
}

#[test]
fn emit_ast_shows_normalised_comparisons() {
  let output = r9cc(&["--emit", "ast", "3>2;"]);
  assert_eq!(output.status.code(), Some(0));
  let ast = stdout(&output);
  assert!(ast.contains("Lt"));
  assert!(!ast.contains("Gt"));
}

#[test]
fn diagnostic_is_a_single_line() {
  let output = r9cc(&["1\n2\n;"]);
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(stderr(&output), "error: expected ';': 2\n");

  let output = r9cc(&["1;\n@\nfoo;"]);
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(stderr(&output), "error: cannot tokenize: @\n");
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
  let source = format!("{}1{};", "(".repeat(5000), ")".repeat(5000));
  let output = r9cc(&[source.as_str()]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).is_empty());
  assert!(stderr(&output).contains("expression nested too deeply"));

  let source = format!("{}1;", "-".repeat(60000));
  let output = r9cc(&[source.as_str()]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("expression nested too deeply"));
}

#[test]
fn moderate_nesting_compiles() {
  let source = format!("{}1{};", "(".repeat(100), ")".repeat(100));
  let output = r9cc(&[source.as_str()]);
  assert_eq!(output.status.code(), Some(0));
}
