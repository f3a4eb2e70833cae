//! # Introduction
//!
//! minic is the front end for a small C-like language: a tokenizer that turns
//! source text into located tokens, and a recursive descent parser that turns
//! those tokens into an AST.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`] tokenises the source. Lexical errors are collected as
//!    [`diagnostics::Diagnostic`]s and never stop the scan.
//! 2. [`parser::parse`] builds a [`parser::ast::Program`]. The first syntax
//!    error aborts the parse.
//! 3. [`parser::printer`] renders a tree back to source text.
//! 4. [`diagnostics`] formats errors for a terminal, optionally in color.
//!
//! [`parser::parse_source`] runs both stages and returns an [`error::CompileError`]
//! on failure.
//!
//! ```
//! let program = minic::parser::parse_source("int main() { return 1 + 2; }").unwrap();
//! assert_eq!(program.functions[0].name.lexeme, "main");
//! ```

pub mod diagnostics;
pub mod error;
pub mod parser;
