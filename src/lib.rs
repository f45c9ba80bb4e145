//! Crate root: wires together the compilation pipeline.
//!
//! The stages are small and run strictly one after another:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the statement list.
//! - `codegen` lowers the statements into x86-64 Intel-syntax assembly.
//! - `error` holds the diagnostics shared by the other modules.

pub mod codegen;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use error::{CompileError, CompileResult};
pub use parser::{AstNode, BinaryOp, Program, Stmt};
pub use tokenizer::{Token, TokenKind};

/// Tokenize and parse a source string.
pub fn parse_program(source: &str) -> CompileResult<Program> {
  let tokens = tokenizer::tokenize(source)?;
  parser::parse(tokens, source)
}

/// Compile a source string into assembly.
pub fn generate_assembly(source: &str) -> CompileResult<String> {
  let program = parse_program(source)?;
  Ok(codegen::generate(&program))
}
