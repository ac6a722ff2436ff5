//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! Only operators, parentheses and decimal integers exist. Two-character
//! comparison operators are tried before single characters so `<=` never
//! splits into `<` and `=`.

use tracing::{debug, trace};

use crate::error::{CompileError, CompileResult};

const TWO_CHAR_PUNCTS: [&str; 4] = ["==", "!=", "<=", ">="];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Punct,
  Num(i64),
  Eof,
}

/// A token is a kind plus the byte span it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self { kind, loc, len }
  }

  /// The slice of `source` this token was lexed from.
  pub fn text<'a>(&self, source: &'a str) -> &'a str {
    &source[self.loc..self.loc + self.len]
  }

  /// Whether this is the punctuator `op`.
  pub fn is(&self, op: &str, source: &str) -> bool {
    self.kind == TokenKind::Punct && self.text(source) == op
  }

  /// Human-friendly description used in diagnostics.
  pub fn describe(&self, source: &str) -> String {
    match self.kind {
      TokenKind::Eof => "EOF".to_string(),
      _ => self.text(source).to_string(),
    }
  }
}

/// Lex `input` into a flat vector of tokens terminated by a single `Eof`.
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

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let value = input[start..i].parse::<i64>().map_err(|_| {
        CompileError::lex(input, start, "number is too large for a 64-bit integer")
      })?;
      tokens.push(Token::new(TokenKind::Num(value), start, i - start));
      continue;
    }

    if let Some(op) = TWO_CHAR_PUNCTS
      .into_iter()
      .find(|op| input[i..].starts_with(op))
    {
      tokens.push(Token::new(TokenKind::Punct, i, op.len()));
      i += op.len();
      continue;
    }

    if matches!(c, b'+' | b'-' | b'*' | b'/' | b'(' | b')' | b'<' | b'>') {
      tokens.push(Token::new(TokenKind::Punct, i, 1));
      i += 1;
      continue;
    }

    // Everything consumed so far is ASCII, so `i` is on a char boundary.
    let invalid = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex(
      input,
      i,
      format!("invalid token: '{invalid}'"),
    ));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0));
  debug!(count = tokens.len(), "tokenized input");
  trace!(?tokens);
  Ok(tokens)
}
