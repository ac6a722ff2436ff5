//! Diagnostics shared by the tokenizer and the parser.
//!
//! Every error is anchored at a byte offset in the source. Rendering prints
//! the line holding that offset and a caret underneath it, in the style of
//! chibicc:
//!
//! ```text
//! 1+@
//!   ^ invalid token: '@'
//! ```

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// A character that does not start any token, or a literal that overflows.
  #[snafu(display("{line}\n{marker} {message}"))]
  Lex {
    line: String,
    marker: String,
    message: String,
    offset: usize,
  },

  /// The parser wanted a specific token and found something else.
  #[snafu(display("{line}\n{marker} {message}"))]
  Syntax {
    line: String,
    marker: String,
    message: String,
    offset: usize,
  },
}

impl CompileError {
  /// Construct a lexical error anchored at byte offset `loc` of `source`.
  pub fn lex(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, marker) = point_at(source, loc);
    Self::Lex {
      line,
      marker,
      message: message.into(),
      offset: loc,
    }
  }

  /// Construct a syntax error anchored at byte offset `loc` of `source`.
  pub fn syntax(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, marker) = point_at(source, loc);
    Self::Syntax {
      line,
      marker,
      message: message.into(),
      offset: loc,
    }
  }

  /// Byte offset into the source where the error was detected.
  pub fn offset(&self) -> usize {
    match self {
      Self::Lex { offset, .. } | Self::Syntax { offset, .. } => *offset,
    }
  }

  /// The message printed after the caret.
  pub fn message(&self) -> &str {
    match self {
      Self::Lex { message, .. } | Self::Syntax { message, .. } => message,
    }
  }
}

/// Cut out the source line containing `loc` and build the caret marker.
///
/// The marker is indented by the number of characters (not bytes) between the
/// start of the line and `loc`, so it lines up under multi-byte input too.
fn point_at(source: &str, loc: usize) -> (String, String) {
  let mut loc = loc.min(source.len());
  while !source.is_char_boundary(loc) {
    loc -= 1;
  }

  let start = source[..loc].rfind('\n').map_or(0, |i| i + 1);
  let end = source[loc..].find('\n').map_or(source.len(), |i| loc + i);
  let column = source[start..loc].chars().count();

  let line = source[start..end].to_string();
  let marker = format!("{}^", " ".repeat(column));
  (line, marker)
}
