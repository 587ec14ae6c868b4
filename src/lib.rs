//! This crate compiles a small description language into deterministic finite automata,
//! pushdown automata or Turing Machines and executes them.
//! It includes modules for scanning and compiling programs, the automaton models, the execution
//! driver with tracing and timeouts, and a collection of sample programs.

pub mod automaton;
pub mod compiler;
pub mod lexer;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod types;

/// Re-exports the automaton sum type and its result and snapshot views.
pub use automaton::{Automaton, Outcome, Snapshot};
/// Re-exports the compiler entry points.
pub use compiler::{compile, compile_tokens};
/// Re-exports the scanner entry point and token types.
pub use lexer::{scan, Token, TokenKind};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the execution driver.
pub use machine::{run, run_counted, Execution, RunOptions};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the shared types.
pub use types::{
    AutomatonError, AutomatonKind, Direction, Stage, State, BLANK_SYMBOL, INPUT_END_SYMBOL,
    STACK_START_SYMBOL,
};
