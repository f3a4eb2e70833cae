//! Lexer (tokenizer) for minic source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//!
//! The lexer never gives up: an invalid character, an unterminated string or a
//! malformed number is recorded as a [`Diagnostic`] and scanning resumes right
//! after it. Callers must check [`Lexed::had_error`] before trusting the tokens.

use super::ast::SourceLocation;
use crate::diagnostics::{Diagnostic, Stage};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, trace};

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    Comma,        // ,
    Semicolon,    // ;
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]

    // Operators
    Equals,            // =
    EqualsEquals,      // ==
    BangEquals,        // !=
    LessThan,          // <
    LessThanEquals,    // <=
    GreaterThan,       // >
    GreaterThanEquals, // >=
    Plus,              // +
    Minus,             // -
    Star,              // *
    Slash,             // /
    Caret,             // ^
    Percent,           // %

    // Literals
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    Return,
    If,
    Else,
    While,
    For,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Equals => "EQUALS",
            TokenKind::EqualsEquals => "EQUALS_EQUALS",
            TokenKind::BangEquals => "BANG_EQUALS",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::LessThanEquals => "LESS_THAN_EQUALS",
            TokenKind::GreaterThan => "GREATER_THAN",
            TokenKind::GreaterThanEquals => "GREATER_THAN_EQUALS",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Caret => "CARET",
            TokenKind::Percent => "PERCENT",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
        };
        write!(f, "{name}")
    }
}

/// A lexeme together with its kind and the exact span it was read from.
///
/// `end` is the location just past the last character of the lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub begin: SourceLocation,
    pub end: SourceLocation,
    pub lexeme: String,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        begin: SourceLocation,
        end: SourceLocation,
        lexeme: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            begin,
            end,
            lexeme: lexeme.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.lexeme)
    }
}

/// Output of a full tokenizer run
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lexed {
    /// True once any lexical error was reported; the flag never resets.
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Tokenize `source` in one left-to-right pass.
pub fn tokenize(source: &str) -> Lexed {
    Lexer::new(source).tokenize()
}

/// Lexer for minic source code
pub struct Lexer {
    input: Vec<char>,
    /// Start of the token being scanned
    begin: usize,
    /// Scan position
    end: usize,
    begin_location: SourceLocation,
    end_location: SourceLocation,
    keywords: FxHashMap<&'static str, TokenKind>,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        let keywords = FxHashMap::from_iter([
            ("return", TokenKind::Return),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("while", TokenKind::While),
            ("for", TokenKind::For),
        ]);

        Self {
            input: input.chars().collect(),
            begin: 0,
            end: 0,
            begin_location: SourceLocation::start(),
            end_location: SourceLocation::start(),
            keywords,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Lexed {
        while !self.is_at_end() {
            self.lex_token();

            self.begin = self.end;
            self.begin_location = self.end_location;
        }

        debug!(
            tokens = self.tokens.len(),
            errors = self.diagnostics.len(),
            "tokenized input"
        );

        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Scan one lexeme starting at `begin`, emitting at most one token.
    fn lex_token(&mut self) {
        let Some(ch) = self.advance() else {
            return;
        };

        match ch {
            ' ' | '\t' | '\n' | '\r' => {}

            ',' => self.emit(TokenKind::Comma),
            ';' => self.emit(TokenKind::Semicolon),
            '(' => self.emit(TokenKind::LeftParen),
            ')' => self.emit(TokenKind::RightParen),
            '{' => self.emit(TokenKind::LeftBrace),
            '}' => self.emit(TokenKind::RightBrace),
            '[' => self.emit(TokenKind::LeftBracket),
            ']' => self.emit(TokenKind::RightBracket),

            '=' => {
                if self.match_char('=') {
                    self.emit(TokenKind::EqualsEquals)
                } else {
                    self.emit(TokenKind::Equals)
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.emit(TokenKind::LessThanEquals)
                } else {
                    self.emit(TokenKind::LessThan)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.emit(TokenKind::GreaterThanEquals)
                } else {
                    self.emit(TokenKind::GreaterThan)
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.emit(TokenKind::BangEquals)
                } else {
                    self.error(self.begin_location, "Expected '=' after '!'");
                }
            }
            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else {
                    self.emit(TokenKind::Slash)
                }
            }

            '+' => self.emit(TokenKind::Plus),
            '-' => self.emit(TokenKind::Minus),
            '*' => self.emit(TokenKind::Star),
            '^' => self.emit(TokenKind::Caret),
            '%' => self.emit(TokenKind::Percent),

            '"' => self.string_literal(),

            '0'..='9' => self.number_literal(),

            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),

            _ => self.error(self.begin_location, format!("Invalid character '{ch}'")),
        }
    }

    /// Scan the rest of a string literal; the opening quote is already consumed.
    ///
    /// String literals may not span lines. On error nothing is emitted and the
    /// offending newline is left for the next scan.
    fn string_literal(&mut self) {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    self.emit(TokenKind::StringLiteral);
                    return;
                }
                Some('\n') | None => {
                    self.error(self.begin_location, "Unterminated string literal");
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan an integer or float literal; the first digit is already consumed.
    ///
    /// Once a decimal point has been seen, further points are reported but do
    /// not end the literal: the whole run of digits and dots becomes one
    /// FLOAT_LITERAL.
    fn number_literal(&mut self) {
        self.skip_digits();

        if !self.match_char('.') {
            self.emit(TokenKind::IntLiteral);
            return;
        }

        while let Some(ch) = self.peek() {
            if ch == '.' {
                let dot_location = self.end_location;
                self.advance();
                self.error(
                    dot_location,
                    "Float literals must only contain one decimal point",
                );
            } else if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        self.emit(TokenKind::FloatLiteral);
    }

    /// Scan an identifier or keyword; the first character is already consumed.
    fn identifier_or_keyword(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.advance();
        }

        let lexeme = self.lexeme();
        let kind = self
            .keywords
            .get(lexeme.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.push_token(kind, lexeme);
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Skip a `//` comment up to, but not including, the next newline.
    fn skip_line_comment(&mut self) {
        while matches!(self.peek(), Some(ch) if ch != '\n') {
            self.advance();
        }
    }

    fn emit(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.push_token(kind, lexeme);
    }

    fn push_token(&mut self, kind: TokenKind, lexeme: String) {
        trace!(
            %kind,
            %lexeme,
            line = self.begin_location.line,
            column = self.begin_location.column,
            "emit token"
        );
        self.tokens.push(Token::new(
            kind,
            self.begin_location,
            self.end_location,
            lexeme,
        ));
    }

    fn error(&mut self, location: SourceLocation, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(Stage::Lexer, location, message));
    }

    /// Current lexeme: everything between `begin` and `end`
    fn lexeme(&self) -> String {
        self.input[self.begin..self.end].iter().collect()
    }

    /// Consume the next character if it equals `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.end).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.end += 1;

        if ch == '\n' {
            self.end_location.line += 1;
            self.end_location.column = 1;
        } else {
            self.end_location.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.end >= self.input.len()
    }
}
