//! Recursive-descent parser producing a binary expression tree.
//!
//! Each precedence level is one method on `Parser` that parses its operands
//! through the next tighter level and folds repetitions into a
//! left-associative chain. From loosest to tightest:
//!
//! ```text
//! expr       = equality ("+" equality | "-" equality)*
//! equality   = relational ("==" relational | "!=" relational)*
//! relational = add ("<" add | "<=" add | ">" add | ">=" add)*
//! add        = mul ("+" mul | "-" mul)*
//! mul        = unary ("*" unary | "/" unary)*
//! unary      = ("+" | "-")? primary
//! primary    = "(" expr ")" | num
//! ```
//!
//! `expr` sits above `equality` with its own `+`/`-` loop. `add` consumes
//! every `+`/`-` before control gets back there, so the loop never fires in
//! practice, but the layering is kept as is.

use std::fmt;

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind};

/// Binary operators. `>` and `>=` are parsed into `Lt`/`Le` with swapped
/// operands, so they have no variant of their own.
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

impl BinaryOp {
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
      BinaryOp::Lt => "<",
      BinaryOp::Le => "<=",
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Num(i64),
  Binary {
    op: BinaryOp,
    lhs: Box<Node>,
    rhs: Box<Node>,
  },
}

impl Node {
  pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Fully parenthesised rendering, e.g. `((1 + 2) * 3)`.
impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Node::Num(value) => write!(f, "{value}"),
      Node::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
    }
  }
}

/// Parse one expression from the token stream.
///
/// Tokens after the expression are left unread, so `1 2` parses as `1`.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<Node> {
  let mut parser = Parser::new(tokens, source);
  let node = parser.expr()?;

  if !parser.at_eof() {
    debug!(
      offset = parser.current().loc,
      "ignoring tokens after the expression"
    );
  }
  debug!(ast = %node, "parsed expression");
  Ok(node)
}

/// Cursor over the token vector. The position only ever moves forward.
struct Parser<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> Parser<'a> {
  fn new(mut tokens: Vec<Token>, source: &'a str) -> Self {
    if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
      tokens.push(Token {
        kind: TokenKind::Eof,
        loc: source.len(),
        len: 0,
      });
    }
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn expr(&mut self) -> CompileResult<Node> {
    let mut node = self.equality()?;

    while let Some(op) = self.consume_any(&[("+", BinaryOp::Add), ("-", BinaryOp::Sub)]) {
      let rhs = self.equality()?;
      node = Node::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn equality(&mut self) -> CompileResult<Node> {
    let mut node = self.relational()?;

    while let Some(op) = self.consume_any(&[("==", BinaryOp::Eq), ("!=", BinaryOp::Ne)]) {
      let rhs = self.relational()?;
      node = Node::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn relational(&mut self) -> CompileResult<Node> {
    // The flag marks `>`/`>=`, which flip their operands.
    const OPS: [(&str, (BinaryOp, bool)); 4] = [
      ("<", (BinaryOp::Lt, false)),
      ("<=", (BinaryOp::Le, false)),
      (">", (BinaryOp::Lt, true)),
      (">=", (BinaryOp::Le, true)),
    ];

    let mut node = self.add()?;

    loop {
      let Some((op, swapped)) = self.consume_any(&OPS) else {
        break;
      };

      let rhs = self.add()?;
      node = if swapped {
        Node::binary(op, rhs, node)
      } else {
        Node::binary(op, node, rhs)
      };
    }

    Ok(node)
  }

  fn add(&mut self) -> CompileResult<Node> {
    let mut node = self.mul()?;

    while let Some(op) = self.consume_any(&[("+", BinaryOp::Add), ("-", BinaryOp::Sub)]) {
      let rhs = self.mul()?;
      node = Node::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn mul(&mut self) -> CompileResult<Node> {
    let mut node = self.unary()?;

    while let Some(op) = self.consume_any(&[("*", BinaryOp::Mul), ("/", BinaryOp::Div)]) {
      let rhs = self.unary()?;
      node = Node::binary(op, node, rhs);
    }

    Ok(node)
  }

  fn unary(&mut self) -> CompileResult<Node> {
    if self.consume("+") {
      return self.primary();
    }

    if self.consume("-") {
      let operand = self.primary()?;
      return Ok(Node::binary(BinaryOp::Sub, Node::Num(0), operand));
    }

    self.primary()
  }

  fn primary(&mut self) -> CompileResult<Node> {
    if self.consume("(") {
      let node = self.expr()?;
      self.expect(")")?;
      return Ok(node);
    }

    let value = self.expect_number()?;
    Ok(Node::Num(value))
  }

  /// The token under the cursor. The trailing `Eof` is never consumed, so
  /// this stays in bounds.
  fn current(&self) -> &Token {
    &self.tokens[self.pos]
  }

  fn at_eof(&self) -> bool {
    self.current().kind == TokenKind::Eof
  }

  fn advance(&mut self) {
    if !self.at_eof() {
      self.pos += 1;
    }
  }

  /// Consume the current token if it is the punctuator `op`.
  fn consume(&mut self, op: &str) -> bool {
    if self.current().is(op, self.source) {
      self.advance();
      return true;
    }
    false
  }

  /// Consume the current token if it matches any entry of `table`, returning
  /// the value paired with it.
  fn consume_any<T: Copy>(&mut self, table: &[(&str, T)]) -> Option<T> {
    let (_, value) = table
      .iter()
      .find(|(op, _)| self.current().is(op, self.source))?;
    self.advance();
    Some(*value)
  }

  fn expect(&mut self, op: &str) -> CompileResult<()> {
    if self.consume(op) {
      return Ok(());
    }

    let token = self.current();
    Err(CompileError::syntax(
      self.source,
      token.loc,
      format!("expected \"{op}\", but got \"{}\"", token.describe(self.source)),
    ))
  }

  fn expect_number(&mut self) -> CompileResult<i64> {
    let token = *self.current();
    if let TokenKind::Num(value) = token.kind {
      self.advance();
      return Ok(value);
    }

    Err(CompileError::syntax(
      self.source,
      token.loc,
      format!(
        "expected a number, but got \"{}\"",
        token.describe(self.source)
      ),
    ))
  }
}
