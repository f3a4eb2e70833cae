use crate::diagnostics::Diagnostic;
use crate::parser::parse::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<Diagnostic>),

    #[error("Syntax error at {}:{}: {}", .0.location.line, .0.location.column, .0.message)]
    Parse(#[from] ParseError),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Diagnostics to show the user. I/O failures have no source location and
    /// produce none.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Lex(diagnostics) => diagnostics.clone(),
            CompileError::Parse(err) => vec![err.to_diagnostic()],
            CompileError::Io { .. } => Vec::new(),
        }
    }
}
