//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond recognising operators, numeric literals and one-letter variables.
//! Multi-character punctuators are matched before single-character ones to
//! avoid ambiguity.

use std::fmt;

use snafu::ResultExt;

use crate::error::{CompileError, CompileResult, InvalidNumberSnafu};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Num(i64),
  Ident(char),
  Semicolon,
  Assign,
  Lt,
  Gt,
  Plus,
  Minus,
  Star,
  Slash,
  LParen,
  RParen,
  EqEq,
  Ne,
  Le,
  Ge,
  Eof,
}

const TWO_CHAR_PUNCTUATORS: [(&str, TokenKind); 4] = [
  ("==", TokenKind::EqEq),
  ("!=", TokenKind::Ne),
  ("<=", TokenKind::Le),
  (">=", TokenKind::Ge),
];

impl TokenKind {
  fn punctuator(c: u8) -> Option<Self> {
    let kind = match c {
      b';' => Self::Semicolon,
      b'=' => Self::Assign,
      b'<' => Self::Lt,
      b'>' => Self::Gt,
      b'+' => Self::Plus,
      b'-' => Self::Minus,
      b'*' => Self::Star,
      b'/' => Self::Slash,
      b'(' => Self::LParen,
      b')' => Self::RParen,
      _ => return None,
    };
    Some(kind)
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Num(value) => write!(f, "{value}"),
      Self::Ident(name) => write!(f, "{name}"),
      Self::Semicolon => f.write_str(";"),
      Self::Assign => f.write_str("="),
      Self::Lt => f.write_str("<"),
      Self::Gt => f.write_str(">"),
      Self::Plus => f.write_str("+"),
      Self::Minus => f.write_str("-"),
      Self::Star => f.write_str("*"),
      Self::Slash => f.write_str("/"),
      Self::LParen => f.write_str("("),
      Self::RParen => f.write_str(")"),
      Self::EqEq => f.write_str("=="),
      Self::Ne => f.write_str("!="),
      Self::Le => f.write_str("<="),
      Self::Ge => f.write_str(">="),
      Self::Eof => f.write_str("EOF"),
    }
  }
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }
}

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if let Some((op, kind)) = TWO_CHAR_PUNCTUATORS
      .into_iter()
      .find(|(op, _)| input[i..].starts_with(op))
    {
      tokens.push(Token::new(kind, i, op.len()));
      i += op.len();
      continue;
    }

    if let Some(kind) = TokenKind::punctuator(c) {
      tokens.push(Token::new(kind, i, 1));
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let text = &input[start..i];
      let value = text
        .parse::<i64>()
        .context(InvalidNumberSnafu { loc: start, text })?;
      tokens.push(Token::new(TokenKind::Num(value), start, i - start));
      continue;
    }

    if c.is_ascii_lowercase() {
      tokens.push(Token::new(TokenKind::Ident(c as char), i, 1));
      i += 1;
      continue;
    }

    return Err(CompileError::lex(input, i));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0));
  log::debug!("tokenized {} bytes into {} tokens", input.len(), tokens.len());
  for token in &tokens {
    log::trace!("{:>4} {:?}", token.loc, token.kind);
  }
  Ok(tokens)
}
