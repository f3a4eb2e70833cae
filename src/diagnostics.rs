//! Diagnostics produced by the front end
//!
//! Both stages report problems as [`Diagnostic`] values instead of printing
//! them. The tokenizer collects every lexical error it finds; the parser stops
//! at the first syntax error and reports exactly one.
//!
//! [`Renderer`] turns diagnostics into text, optionally colored with crossterm
//! and followed by the offending source line with a caret under the column.

use crate::parser::ast::SourceLocation;
use crossterm::style::Stylize;
use std::fmt;
use std::io::{self, Write};

/// The stage that reported a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexer => write!(f, "lexer"),
            Stage::Parser => write!(f, "parser"),
        }
    }
}

/// A single error report: where it happened, what went wrong, and who noticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub location: SourceLocation,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            stage,
            location,
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: error: {}:{}: {}",
            self.stage,
            self.line(),
            self.column(),
            self.message
        )
    }
}

/// Writes diagnostics to a terminal or any other [`Write`] sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    pub color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render one diagnostic. When `source` is given, the offending line is
    /// echoed underneath with a caret pointing at the column.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        diagnostic: &Diagnostic,
        source: Option<&str>,
    ) -> io::Result<()> {
        let location = format!("{}:{}:", diagnostic.line(), diagnostic.column());
        if self.color {
            writeln!(
                out,
                "{} {} {} {}",
                format!("{}:", diagnostic.stage).bold(),
                "error:".red().bold(),
                location,
                diagnostic.message.as_str().bold()
            )?;
        } else {
            writeln!(out, "{diagnostic}")?;
        }

        let Some(line) = source.and_then(|src| src.lines().nth(diagnostic.line().saturating_sub(1)))
        else {
            return Ok(());
        };

        let gutter = format!("{:>4} | ", diagnostic.line());
        let line_len = line.chars().count();
        let caret_offset = diagnostic.column().saturating_sub(1).min(line_len);
        let padding = " ".repeat(gutter.len() + caret_offset);

        writeln!(out, "{gutter}{line}")?;
        if self.color {
            writeln!(out, "{padding}{}", "^".green().bold())
        } else {
            writeln!(out, "{padding}^")
        }
    }

    pub fn render_all<W: Write>(
        &self,
        out: &mut W,
        diagnostics: &[Diagnostic],
        source: Option<&str>,
    ) -> io::Result<()> {
        for diagnostic in diagnostics {
            self.render(out, diagnostic, source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_plain(diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut out = Vec::new();
        Renderer::new(false)
            .render(&mut out, diagnostic, source)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_format() {
        let diag = Diagnostic::new(Stage::Lexer, SourceLocation::new(3, 7), "Invalid character '$'");
        assert_eq!(diag.to_string(), "lexer: error: 3:7: Invalid character '$'");
    }

    #[test]
    fn test_render_with_source_caret() {
        let diag = Diagnostic::new(Stage::Parser, SourceLocation::new(2, 5), "Expected ';'");
        let rendered = render_plain(&diag, Some("int main() {\n    x\n}"));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "parser: error: 2:5: Expected ';'");
        assert_eq!(lines[1], "   2 |     x");
        assert_eq!(lines[2], "           ^");
    }

    #[test]
    fn test_render_caret_clamped_to_line_end() {
        let diag = Diagnostic::new(Stage::Parser, SourceLocation::new(1, 40), "Cannot peek beyond end of input");
        let rendered = render_plain(&diag, Some("x"));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "   1 | x");
        assert_eq!(lines[2], "        ^");
    }

    #[test]
    fn test_render_without_source() {
        let diag = Diagnostic::new(Stage::Lexer, SourceLocation::new(1, 1), "Unterminated string literal");
        assert_eq!(
            render_plain(&diag, None),
            "lexer: error: 1:1: Unterminated string literal\n"
        );
    }

    #[test]
    fn test_render_colored_contains_message() {
        let diag = Diagnostic::new(Stage::Lexer, SourceLocation::new(1, 2), "boom");
        let mut out = Vec::new();
        Renderer::new(true).render(&mut out, &diag, None).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("boom"));
        assert!(rendered.contains("1:2:"));
    }
}
