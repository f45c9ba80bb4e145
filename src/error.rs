//! Shared error utilities used across the compilation pipeline.
//!
//! Every failure is fatal: the first error aborts compilation and is reported
//! as a single line that quotes the input from the offending byte to the end
//! of that source line, the way the chibicc family of compilers does it.

use snafu::Snafu;
use std::num::ParseIntError;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
  /// A character that starts no token.
  #[snafu(display("cannot tokenize: {rest}"))]
  Lex { loc: usize, rest: String },

  /// A digit run that does not fit in a machine word.
  #[snafu(display("invalid number '{text}': {source}"))]
  InvalidNumber {
    loc: usize,
    text: String,
    source: ParseIntError,
  },

  /// The token at `loc` is not what the grammar allows here.
  #[snafu(display("{message}: {near}"))]
  Parse {
    loc: usize,
    message: String,
    near: String,
  },
}

impl CompileError {
  /// Construct a lexical error anchored at byte `loc` of `source`.
  pub fn lex(source: &str, loc: usize) -> Self {
    LexSnafu {
      loc,
      rest: line_from(source, loc),
    }
    .build()
  }

  /// Construct a syntax error anchored at byte `loc` of `source`.
  pub fn parse(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let rest = line_from(source, loc);
    let near = if rest.is_empty() {
      "EOF".to_string()
    } else {
      rest.to_string()
    };
    ParseSnafu {
      loc,
      message,
      near,
    }
    .build()
  }

  /// Byte offset into the source where the error was detected.
  pub fn loc(&self) -> usize {
    match self {
      Self::Lex { loc, .. } | Self::InvalidNumber { loc, .. } | Self::Parse { loc, .. } => *loc,
    }
  }
}

/// The source text from `loc` up to the end of its line.
fn line_from(source: &str, loc: usize) -> &str {
  let rest = &source[loc.min(source.len())..];
  rest.split('\n').next().unwrap_or(rest).trim_end()
}
