//! Code generation: lower the parsed AST into Intel-syntax x86-64 assembly.
//!
//! The emitter uses a simple stack machine: every expression leaves exactly
//! one value on the stack and each statement pops its result into `rax`, so
//! whatever the last statement computed becomes the return value of `main`.
//! The 26 variables `a`..`z` live in fixed 8-byte slots below `rbp`.

use crate::parser::{AstNode, BinaryOp, Program};

const SLOT_SIZE: usize = 8;
const SLOT_COUNT: usize = 26;

/// Bytes reserved in the prologue for all variable slots.
pub const FRAME_SIZE: usize = SLOT_SIZE * SLOT_COUNT;

/// Offset of the variable `name` below the frame pointer.
pub fn slot_offset(name: char) -> usize {
  debug_assert!(name.is_ascii_lowercase(), "variable '{name}' has no slot");
  (name as usize - 'a' as usize + 1) * SLOT_SIZE
}

/// Emit assembly for a whole program.
pub fn generate(program: &Program) -> String {
  let mut asm = String::new();
  asm.push_str(".intel_syntax noprefix\n");
  asm.push_str(".section .note.GNU-stack,\"\",@progbits\n");
  asm.push_str(".text\n");
  asm.push_str(".global main\n");
  asm.push_str("main:\n");
  asm.push_str("  push rbp\n");
  asm.push_str("  mov rbp, rsp\n");
  asm.push_str(&format!("  sub rsp, {FRAME_SIZE}\n"));

  if program.body.is_empty() {
    asm.push_str("  mov rax, 0\n");
  }

  for stmt in &program.body {
    emit_expr(&stmt.expr, &mut asm);
    // Discard the statement's value; after the last one it is the result.
    asm.push_str("  pop rax\n");
  }

  asm.push_str("  mov rsp, rbp\n");
  asm.push_str("  pop rbp\n");
  asm.push_str("  ret\n");

  log::debug!(
    "emitted {} lines for {} statement(s)",
    asm.lines().count(),
    program.body.len()
  );
  asm
}

/// Emit stack-based code for a single expression node.
fn emit_expr(node: &AstNode, asm: &mut String) {
  match node {
    AstNode::Num { value } => {
      asm.push_str(&format!("  mov rax, {value}\n"));
      asm.push_str("  push rax\n");
    }
    AstNode::Var { name } => {
      emit_addr(*name, asm);
      asm.push_str("  pop rax\n");
      asm.push_str("  mov rax, [rax]\n");
      asm.push_str("  push rax\n");
    }
    AstNode::Assign { name, rhs } => {
      emit_addr(*name, asm);
      emit_expr(rhs, asm);
      asm.push_str("  pop rdi\n");
      asm.push_str("  pop rax\n");
      asm.push_str("  mov [rax], rdi\n");
      asm.push_str("  push rdi\n");
    }
    AstNode::Binary { op, lhs, rhs } => {
      emit_expr(lhs, asm);
      emit_expr(rhs, asm);
      asm.push_str("  pop rdi\n");
      asm.push_str("  pop rax\n");
      match op {
        BinaryOp::Add => asm.push_str("  add rax, rdi\n"),
        BinaryOp::Sub => asm.push_str("  sub rax, rdi\n"),
        BinaryOp::Mul => asm.push_str("  imul rax, rdi\n"),
        BinaryOp::Div => {
          asm.push_str("  cqo\n");
          asm.push_str("  idiv rdi\n");
        }
        BinaryOp::Eq => emit_compare("sete", asm),
        BinaryOp::Ne => emit_compare("setne", asm),
        BinaryOp::Lt => emit_compare("setl", asm),
        BinaryOp::Le => emit_compare("setle", asm),
      }
      asm.push_str("  push rax\n");
    }
  }
}

/// Compare `rax` with `rdi` and leave 0 or 1 in `rax`.
fn emit_compare(set: &str, asm: &mut String) {
  asm.push_str("  cmp rax, rdi\n");
  asm.push_str(&format!("  {set} al\n"));
  asm.push_str("  movzb rax, al\n");
}

/// Push the address of a variable slot.
fn emit_addr(name: char, asm: &mut String) {
  let offset = slot_offset(name);
  asm.push_str(&format!("  lea rax, [rbp-{offset}]\n"));
  asm.push_str("  push rax\n");
}
