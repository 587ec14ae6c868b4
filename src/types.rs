//! This module defines the core data structures shared by the compiler and the execution
//! engine: states, symbol tables, reserved symbols, move directions and the error type.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The symbol written on unvisited Turing Machine tape cells.
pub const BLANK_SYMBOL: &str = "B";
/// Marker appended to every pushdown automaton input.
pub const INPUT_END_SYMBOL: &str = "{";
/// Permanent bottom element of every pushdown automaton stack.
pub const STACK_START_SYMBOL: &str = "}";
/// Separator used when rendering tapes, stacks and inputs.
pub const SYMBOL_SEPARATOR: &str = "|";

/// A declared automaton state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    /// The unique name of the state, including its leading `q`.
    pub name: String,
    /// Whether the state is listed in the accepting section.
    pub accepting: bool,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepting: false,
        }
    }

    pub fn accepting(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepting: true,
        }
    }
}

/// All declared states, keyed by name.
pub type StateTable = HashMap<String, State>;

/// All declared symbols, including the reserved ones seeded by the compiler.
pub type SymbolTable = HashSet<String>;

/// Represents the two directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
}

/// The three automaton models the description language compiles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AutomatonKind {
    /// Deterministic finite automaton.
    Dfa,
    /// Pushdown automaton.
    Pda,
    /// Turing machine.
    Tm,
}

impl AutomatonKind {
    /// Infers the kind from a program file extension (`dfa`, `pa` or `tm`).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "dfa" => Some(Self::Dfa),
            "pa" | "pda" => Some(Self::Pda),
            "tm" => Some(Self::Tm),
            _ => None,
        }
    }

    /// The canonical file extension for programs of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dfa => "dfa",
            Self::Pda => "pa",
            Self::Tm => "tm",
        }
    }
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dfa => write!(f, "DFA"),
            Self::Pda => write!(f, "PA"),
            Self::Tm => write!(f, "TM"),
        }
    }
}

impl FromStr for AutomatonKind {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfa" => Ok(Self::Dfa),
            "pa" | "pda" => Ok(Self::Pda),
            "tm" => Ok(Self::Tm),
            _ => Err(AutomatonError::Config(format!(
                "unsupported automaton type: '{s}'"
            ))),
        }
    }
}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexing,
    Compiling,
    Running,
    Io,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexing => write!(f, "lexing"),
            Stage::Compiling => write!(f, "compiling"),
            Stage::Running => write!(f, "running"),
            Stage::Io => write!(f, "io"),
        }
    }
}

/// Represents every error produced while scanning, compiling or running an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The scanner met a character that starts no token.
    #[error("[Line {line}] unknown symbol {character}")]
    Lex { line: usize, character: char },
    /// A token of an unexpected kind, or a section missing its terminator.
    #[error("[Line {line}] {message}")]
    Syntax { line: usize, message: String },
    /// A duplicate declaration, an undeclared reference or an empty states section.
    #[error("[Line {line}] {message}")]
    Semantic { line: usize, message: String },
    /// Missing or extra tokens around the end of the source.
    #[error("{0}")]
    Structural(String),
    /// The automaton could not apply its next move.
    #[error("cannot continue calculations, {0}")]
    Runtime(String),
    /// The run deadline elapsed before the automaton finished.
    #[error("timeout reached")]
    Timeout,
    /// The run options or the requested automaton kind are unusable.
    #[error("{0}")]
    Config(String),
    /// Writing a snapshot to the output sink failed.
    #[error("failed to write output: {0}")]
    Output(String),
    /// Reading a program source failed.
    #[error("File error: {0}")]
    FileError(String),
}

impl AutomatonError {
    /// Returns the pipeline stage this error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            AutomatonError::Lex { .. } => Stage::Lexing,
            AutomatonError::Syntax { .. }
            | AutomatonError::Semantic { .. }
            | AutomatonError::Structural(_) => Stage::Compiling,
            AutomatonError::Runtime(_) | AutomatonError::Timeout => Stage::Running,
            AutomatonError::Config(_)
            | AutomatonError::Output(_)
            | AutomatonError::FileError(_) => Stage::Io,
        }
    }

    /// The source line for line-decorated errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            AutomatonError::Lex { line, .. }
            | AutomatonError::Syntax { line, .. }
            | AutomatonError::Semantic { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Joins symbol names the way tapes, stacks and inputs are rendered.
pub(crate) fn join_symbols<S: AsRef<str>>(symbols: &[S]) -> String {
    symbols
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SYMBOL_SEPARATOR)
}
