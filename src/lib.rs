//! Crate root: wires together the compilation pipeline.
//!
//! Source text flows one way through three stages:
//! - `tokenizer` splits the input into punctuators and integer literals.
//! - `parser` builds a binary expression tree by recursive descent.
//! - `codegen` walks the tree and emits stack-machine x86-64 assembly.
//!
//! `error` holds the caret diagnostics the first two stages report.

pub mod error;
pub mod parser;
pub mod tokenizer;

mod codegen;

pub use error::{CompileError, CompileResult};

/// Compile an expression into Intel-syntax assembly for a `main` function
/// returning its value.
///
/// Nothing is produced unless every stage succeeds.
pub fn compile(source: &str) -> CompileResult<String> {
  let tokens = tokenizer::tokenize(source)?;
  let node = parser::parse(tokens, source)?;
  Ok(codegen::generate(&node))
}
