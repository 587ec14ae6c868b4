//! This module provides the scanner that turns automaton source text into a flat sequence of
//! tokens. It tracks line numbers, skips whitespace and `#` comments, and always terminates the
//! sequence with a single end-of-source token.

use crate::types::AutomatonError;
use serde::Serialize;
use std::fmt;

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Comma,
    Arrow,
    LeftParen,
    RightParen,
    Semicolon,
    State,
    Symbol,
    /// `B`, the Turing Machine blank symbol.
    Blank,
    MoveLeft,
    MoveRight,
    /// `{`, the pushdown automaton input-end marker.
    InputEnd,
    /// `}`, the pushdown automaton stack-start marker.
    StackStart,
    EndOfSource,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Arrow => write!(f, "'>'"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::State => write!(f, "state"),
            TokenKind::Symbol => write!(f, "symbol"),
            TokenKind::Blank => write!(f, "blank symbol"),
            TokenKind::MoveLeft => write!(f, "move left"),
            TokenKind::MoveRight => write!(f, "move right"),
            TokenKind::InputEnd => write!(f, "input end"),
            TokenKind::StackStart => write!(f, "stack start"),
            TokenKind::EndOfSource => write!(f, "end of source"),
        }
    }
}

/// A single scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token; empty for the end-of-source token.
    pub literal: String,
    /// 1-based source line the token was found on.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
        }
    }
}

/// Scans the whole source into tokens.
///
/// This is the main entry point of the scanner. The returned sequence always ends with
/// exactly one [`TokenKind::EndOfSource`] token carrying the final line number.
///
/// # Errors
///
/// * `AutomatonError::Lex` if a character starts no token.
pub fn scan(source: &str) -> Result<Vec<Token>, AutomatonError> {
    Lexer::new(source).scan_tokens()
}

/// Cursor over the source characters.
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    line: usize,
    // Start of the token being scanned.
    start: usize,
    // Next unread character (exclusive end of the current token).
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            line: 1,
            start: 0,
            current: 0,
        }
    }

    /// Consumes the lexer and produces the token sequence.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, AutomatonError> {
        loop {
            self.skip_whitespace();
            self.skip_comments();
            self.start = self.current;
            let Some(c) = self.advance() else {
                break;
            };
            let token = self.scan_token(c)?;
            self.tokens.push(token);
        }

        self.tokens
            .push(Token::new(TokenKind::EndOfSource, "", self.line));
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    /// Scans the token starting with `c`, which has already been consumed.
    fn scan_token(&mut self, c: char) -> Result<Token, AutomatonError> {
        let kind = match c {
            'q' => {
                self.read_alphanumeric();
                TokenKind::State
            }
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '>' => TokenKind::Arrow,
            'L' => TokenKind::MoveLeft,
            'R' => TokenKind::MoveRight,
            'B' => TokenKind::Blank,
            '}' => TokenKind::StackStart,
            '{' => TokenKind::InputEnd,
            c if c.is_alphanumeric() => {
                self.read_alphanumeric();
                TokenKind::Symbol
            }
            character => {
                return Err(AutomatonError::Lex {
                    line: self.line,
                    character,
                })
            }
        };

        Ok(Token::new(kind, self.fragment(), self.line))
    }

    /// Advances over a maximal run of letters and digits.
    fn read_alphanumeric(&mut self) {
        while self.peek().is_some_and(char::is_alphanumeric) {
            self.current += 1;
        }
    }

    fn fragment(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            if c == '\n' {
                self.line += 1;
            }
            self.current += 1;
        }
    }

    fn skip_comments(&mut self) {
        while self.peek() == Some('#') {
            self.skip_line();
            self.skip_whitespace();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                self.line += 1;
                break;
            }
        }
    }
}
