//! Code generation: lower the expression tree into Intel-syntax x86-64.
//!
//! The emitter is a plain stack machine. Every node leaves exactly one value
//! on the hardware stack; a binary node pops its right operand into `rdi` and
//! its left operand into `rax`, computes into `rax` and pushes the result.
//! The program epilogue pops the last value into `rax` as `main`'s return
//! value.

use tracing::debug;

use crate::parser::{BinaryOp, Node};

/// Line-oriented assembly buffer.
struct Emitter {
  asm: String,
  instructions: usize,
}

impl Emitter {
  fn new() -> Self {
    Self {
      asm: String::new(),
      instructions: 0,
    }
  }

  /// Assembler directives and labels go in column zero.
  fn directive(&mut self, line: &str) {
    self.asm.push_str(line);
    self.asm.push('\n');
  }

  fn ins(&mut self, line: impl AsRef<str>) {
    self.asm.push_str("    ");
    self.asm.push_str(line.as_ref());
    self.asm.push('\n');
    self.instructions += 1;
  }
}

/// Emit a complete program whose `main` returns the value of `node`.
pub fn generate(node: &Node) -> String {
  let mut out = Emitter::new();
  out.directive(".intel_syntax noprefix");
  out.directive(".global main");
  out.directive("main:");

  emit_expr(node, &mut out);

  out.ins("pop rax");
  out.ins("ret");

  debug!(instructions = out.instructions, "generated assembly");
  out.asm
}

fn emit_expr(node: &Node, out: &mut Emitter) {
  match node {
    Node::Num(value) => {
      // `push imm` only takes a sign-extended 32-bit immediate.
      if i32::try_from(*value).is_ok() {
        out.ins(format!("push {value}"));
      } else {
        out.ins(format!("mov rax, {value}"));
        out.ins("push rax");
      }
    }
    Node::Binary { op, lhs, rhs } => {
      emit_expr(lhs, out);
      emit_expr(rhs, out);
      out.ins("pop rdi");
      out.ins("pop rax");
      match op {
        BinaryOp::Add => out.ins("add rax, rdi"),
        BinaryOp::Sub => out.ins("sub rax, rdi"),
        BinaryOp::Mul => out.ins("imul rax, rdi"),
        BinaryOp::Div => {
          // Sign-extend rax into rdx:rax; idiv leaves the quotient in rax.
          out.ins("cqo");
          out.ins("idiv rdi");
        }
        BinaryOp::Eq => emit_compare("sete", out),
        BinaryOp::Ne => emit_compare("setne", out),
        BinaryOp::Lt => emit_compare("setl", out),
        BinaryOp::Le => emit_compare("setle", out),
      }
      out.ins("push rax");
    }
  }
}

/// Compare rax with rdi and turn the flag selected by `set` into 0 or 1.
fn emit_compare(set: &str, out: &mut Emitter) {
  out.ins("cmp rax, rdi");
  out.ins(format!("{set} al"));
  out.ins("movzb rax, al");
}
