//! Recursive-descent parser producing a statement list and expression AST.
//!
//! The parser mirrors the classic chibicc structure: a precedence-climbing set
//! of helpers, one per grammar level, sharing a single cursor over the token
//! vector. Every decision is made by peeking at one token.
//!
//! ```text
//! program    = stmt*
//! stmt       = expr ";"
//! expr       = assign
//! assign     = equality ("=" assign)?
//! equality   = relational ("==" relational | "!=" relational)*
//! relational = add ("<" add | "<=" add | ">" add | ">=" add)*
//! add        = mul ("+" mul | "-" mul)*
//! mul        = unary ("*" unary | "/" unary)*
//! unary      = ("+" | "-")? unary | primary
//! primary    = num | ident | "(" expr ")"
//! ```

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind};

/// Bound on the nesting of one expression: parenthesised groups, chained
/// assignments, prefix operators and binary operators along a single path
/// of the tree. Keeps the parser and the code generator off the end of the
/// native stack.
pub const MAX_DEPTH: usize = 256;

/// Binary operators recognised by the language. `>` and `>=` never reach the
/// tree: the parser swaps their operands and emits `Lt`/`Le` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i64,
  },
  Var {
    name: char,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
  /// Store into a variable; evaluates to the stored value.
  Assign {
    name: char,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn var(name: char) -> Self {
    Self::Var { name }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  pub fn assign(name: char, rhs: AstNode) -> Self {
    Self::Assign {
      name,
      rhs: Box::new(rhs),
    }
  }
}

/// An expression statement. `loc` is the byte offset of its first token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
  pub expr: AstNode,
  pub loc: usize,
}

/// The whole translation unit, statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  pub body: Vec<Stmt>,
}

/// Parse a sequence of statements from the token stream.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Program> {
  let mut stream = TokenStream::new(tokens, source);
  let mut body = Vec::new();

  while !stream.is_eof() {
    let stmt = parse_stmt(&mut stream)?;
    log::trace!("stmt @{}: {:?}", stmt.loc, stmt.expr);
    body.push(stmt);
  }

  log::debug!("parsed {} statement(s)", body.len());
  Ok(Program { body })
}

fn parse_stmt(stream: &mut TokenStream) -> CompileResult<Stmt> {
  let loc = stream.loc();
  let expr = parse_expr(stream)?;
  stream.skip(TokenKind::Semicolon, "expected ';'")?;
  Ok(Stmt { expr, loc })
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  parse_assign(stream)
}

fn parse_assign(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let lhs_loc = stream.loc();
  let depth = stream.descend()?;
  let node = parse_equality(stream)?;

  if stream.equal(TokenKind::Assign) {
    let AstNode::Var { name } = node else {
      return Err(CompileError::parse(
        stream.source,
        lhs_loc,
        "left-hand side of assignment is not a variable",
      ));
    };
    let rhs = parse_assign(stream)?;
    stream.depth = depth;
    return Ok(AstNode::assign(name, rhs));
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_equality(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let depth = stream.depth;
  let mut node = parse_relational(stream)?;

  loop {
    let op = match stream.peek_kind() {
      TokenKind::EqEq => BinaryOp::Eq,
      TokenKind::Ne => BinaryOp::Ne,
      _ => break,
    };
    stream.advance();
    stream.descend()?;
    let rhs = parse_relational(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_relational(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let depth = stream.depth;
  let mut node = parse_add(stream)?;

  loop {
    let (op, swapped) = match stream.peek_kind() {
      TokenKind::Lt => (BinaryOp::Lt, false),
      TokenKind::Le => (BinaryOp::Le, false),
      TokenKind::Gt => (BinaryOp::Lt, true),
      TokenKind::Ge => (BinaryOp::Le, true),
      _ => break,
    };
    stream.advance();
    stream.descend()?;
    let rhs = parse_add(stream)?;
    node = if swapped {
      AstNode::binary(op, rhs, node)
    } else {
      AstNode::binary(op, node, rhs)
    };
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_add(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let depth = stream.depth;
  let mut node = parse_mul(stream)?;

  loop {
    let op = match stream.peek_kind() {
      TokenKind::Plus => BinaryOp::Add,
      TokenKind::Minus => BinaryOp::Sub,
      _ => break,
    };
    stream.advance();
    stream.descend()?;
    let rhs = parse_mul(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let depth = stream.depth;
  let mut node = parse_unary(stream)?;

  loop {
    let op = match stream.peek_kind() {
      TokenKind::Star => BinaryOp::Mul,
      TokenKind::Slash => BinaryOp::Div,
      _ => break,
    };
    stream.advance();
    stream.descend()?;
    let rhs = parse_unary(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let depth = stream.depth;
  let mut negations = 0;
  loop {
    if stream.equal(TokenKind::Plus) {
      stream.descend()?;
    } else if stream.equal(TokenKind::Minus) {
      stream.descend()?;
      negations += 1;
    } else {
      break;
    }
  }

  let mut node = parse_primary(stream)?;
  for _ in 0..negations {
    node = AstNode::binary(BinaryOp::Sub, AstNode::number(0), node);
  }
  stream.depth = depth;
  Ok(node)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.equal(TokenKind::LParen) {
    let node = parse_expr(stream)?;
    stream.skip(TokenKind::RParen, "expected ')'")?;
    return Ok(node);
  }

  let node = match stream.peek_kind() {
    TokenKind::Num(value) => AstNode::number(value),
    TokenKind::Ident(name) => AstNode::var(name),
    _ => {
      return Err(CompileError::parse(
        stream.source,
        stream.loc(),
        "expected a number, an identifier, or '('",
      ));
    }
  };
  stream.advance();
  Ok(node)
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
  depth: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
      depth: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Kind of the current token; running off the end reads as `Eof`.
  fn peek_kind(&self) -> TokenKind {
    self.peek().map_or(TokenKind::Eof, |token| token.kind)
  }

  /// Byte offset of the current token, or end of input.
  fn loc(&self) -> usize {
    self.peek().map_or(self.source.len(), |token| token.loc)
  }

  fn advance(&mut self) {
    if self.pos < self.tokens.len() {
      self.pos += 1;
    }
  }

  /// Consume the current token if it has the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    if self.peek_kind() == kind && kind != TokenKind::Eof {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, kind: TokenKind, message: &str) -> CompileResult<()> {
    if self.equal(kind) {
      Ok(())
    } else {
      Err(CompileError::parse(self.source, self.loc(), message))
    }
  }

  /// Go one level deeper, failing past `MAX_DEPTH`. Returns the depth
  /// before descending so the caller can restore it.
  fn descend(&mut self) -> CompileResult<usize> {
    let depth = self.depth;
    if depth >= MAX_DEPTH {
      return Err(CompileError::parse(
        self.source,
        self.loc(),
        "expression nested too deeply",
      ));
    }
    self.depth += 1;
    Ok(depth)
  }

  fn is_eof(&self) -> bool {
    self.peek_kind() == TokenKind::Eof
  }
}
