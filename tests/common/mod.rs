//! A tiny interpreter for the instruction subset the code generator emits,
//! so tests can check what a program computes rather than how it is spelled.

#![allow(dead_code)]

use std::cmp::Ordering;

#[derive(Default)]
struct Machine {
  rax: i64,
  rdi: i64,
  rdx: i64,
  al: Option<bool>,
  flags: Option<Ordering>,
  stack: Vec<i64>,
}

impl Machine {
  fn reg(&self, name: &str) -> i64 {
    match name {
      "rax" => self.rax,
      "rdi" => self.rdi,
      other => panic!("unexpected register {other}"),
    }
  }

  fn set_reg(&mut self, name: &str, value: i64) {
    match name {
      "rax" => self.rax = value,
      "rdi" => self.rdi = value,
      other => panic!("unexpected register {other}"),
    }
  }

  fn operand(&self, text: &str) -> i64 {
    text.parse().unwrap_or_else(|_| self.reg(text))
  }

  fn set_flag(&mut self, test: fn(Ordering) -> bool) {
    let flags = self.flags.expect("setcc without a preceding cmp");
    self.al = Some(test(flags));
  }
}

/// Run the `main` body of `asm` and return what it leaves in `rax`.
pub fn run(asm: &str) -> i64 {
  let mut lines = asm.lines();
  assert_eq!(lines.next(), Some(".intel_syntax noprefix"));
  assert_eq!(lines.next(), Some(".global main"));
  assert_eq!(lines.next(), Some("main:"));

  let mut m = Machine::default();
  for line in lines {
    let line = line.trim();
    let (mnemonic, rest) = line.split_once(' ').unwrap_or((line, ""));
    let args: Vec<&str> = rest.split(", ").filter(|arg| !arg.is_empty()).collect();

    match (mnemonic, args.as_slice()) {
      ("push", [src]) => {
        let value = m.operand(src);
        m.stack.push(value);
      }
      ("pop", [dst]) => {
        let value = m.stack.pop().expect("pop from empty stack");
        m.set_reg(dst, value);
      }
      ("mov", ["rax", imm]) => m.rax = imm.parse().expect("mov immediate"),
      ("add", ["rax", "rdi"]) => m.rax = m.rax.wrapping_add(m.rdi),
      ("sub", ["rax", "rdi"]) => m.rax = m.rax.wrapping_sub(m.rdi),
      ("imul", ["rax", "rdi"]) => m.rax = m.rax.wrapping_mul(m.rdi),
      ("cqo", []) => m.rdx = if m.rax < 0 { -1 } else { 0 },
      ("idiv", ["rdi"]) => {
        assert!(m.rdx == 0 || m.rdx == -1, "cqo must precede idiv");
        m.rax = m.rax.wrapping_div(m.rdi);
      }
      ("cmp", ["rax", "rdi"]) => m.flags = Some(m.rax.cmp(&m.rdi)),
      ("sete", ["al"]) => m.set_flag(Ordering::is_eq),
      ("setne", ["al"]) => m.set_flag(Ordering::is_ne),
      ("setl", ["al"]) => m.set_flag(Ordering::is_lt),
      ("setle", ["al"]) => m.set_flag(Ordering::is_le),
      ("movzb", ["rax", "al"]) => {
        m.rax = i64::from(m.al.take().expect("movzb without setcc"));
      }
      ("ret", []) => {
        assert!(m.stack.is_empty(), "stack not balanced at ret: {:?}", m.stack);
        return m.rax;
      }
      _ => panic!("unsupported instruction: {line}"),
    }
  }

  panic!("program fell off the end without ret");
}

/// Compile `source` and evaluate the result.
pub fn eval(source: &str) -> i64 {
  let asm = ninecc::compile(source).unwrap_or_else(|err| panic!("{source:?} failed:\n{err}"));
  run(&asm)
}
