//! This module defines the runtime representation of compiled automata.
//!
//! The three models are a closed set, so they are held in the [`Automaton`] enum and every
//! capability (snapshot, termination check, result, single move) dispatches with an exhaustive
//! match. Each variant owns its compiled definition together with its execution cursor.

pub mod dfa;
pub mod pda;
pub mod tm;

pub use dfa::{Dfa, DfaKey};
pub use pda::{Pda, PdaKey, PdaMove};
pub use tm::{trim_tape, TmKey, TmMove, TuringMachine};

use crate::types::{join_symbols, AutomatonError, AutomatonKind, State};
use serde::Serialize;
use std::fmt;

/// A compiled automaton ready to be executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Automaton {
    Dfa(Dfa),
    Pda(Pda),
    Tm(TuringMachine),
}

impl Automaton {
    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Dfa(_) => AutomatonKind::Dfa,
            Automaton::Pda(_) => AutomatonKind::Pda,
            Automaton::Tm(_) => AutomatonKind::Tm,
        }
    }

    /// Captures the current state and the remaining input, stack or tape.
    pub fn snapshot(&self) -> Snapshot {
        match self {
            Automaton::Dfa(dfa) => dfa.snapshot(),
            Automaton::Pda(pda) => pda.snapshot(),
            Automaton::Tm(tm) => tm.snapshot(),
        }
    }

    /// Checks whether the run is over.
    ///
    /// DFA and PA finish once the whole input is consumed, a Turing Machine finishes once it
    /// enters an accepting state.
    pub fn is_finished(&self) -> bool {
        match self {
            Automaton::Dfa(dfa) => dfa.is_finished(),
            Automaton::Pda(pda) => pda.is_finished(),
            Automaton::Tm(tm) => tm.is_finished(),
        }
    }

    pub fn result(&self) -> Outcome {
        match self {
            Automaton::Dfa(dfa) => dfa.result(),
            Automaton::Pda(pda) => pda.result(),
            Automaton::Tm(tm) => tm.result(),
        }
    }

    /// Applies exactly one move.
    ///
    /// # Errors
    ///
    /// * `AutomatonError::Runtime` on a missing transition, an empty stack, or a head moving
    ///   off the left end of the tape.
    pub fn apply_move(&mut self) -> Result<(), AutomatonError> {
        match self {
            Automaton::Dfa(dfa) => dfa.apply_move(),
            Automaton::Pda(pda) => pda.apply_move(),
            Automaton::Tm(tm) => tm.apply_move(),
        }
    }

    /// The name of the state the automaton is currently in.
    pub fn state(&self) -> &str {
        match self {
            Automaton::Dfa(dfa) => dfa.state(),
            Automaton::Pda(pda) => pda.state(),
            Automaton::Tm(tm) => tm.state(),
        }
    }
}

/// A point-in-time view of a running automaton, written to the output sink when tracing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Snapshot {
    Dfa {
        state: State,
        input_left: Vec<String>,
    },
    Pda {
        state: State,
        input_left: Vec<String>,
        stack: Vec<String>,
    },
    Tm {
        state: State,
        tape: Vec<String>,
        head: usize,
    },
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Dfa { state, input_left } => writeln!(
                f,
                "current state: {}, input left: {}",
                state.name,
                join_symbols(input_left)
            ),
            Snapshot::Pda {
                state,
                input_left,
                stack,
            } => writeln!(
                f,
                "current state: {}, input left: {}, stack: {}",
                state.name,
                join_symbols(input_left),
                join_symbols(stack)
            ),
            Snapshot::Tm { state, tape, head } => {
                let prefix = format!("current state: {}, tape: ", state.name);
                writeln!(f, "{prefix}{}", join_symbols(tape))?;

                // Caret under the first character of the cell below the head.
                let offset = prefix.chars().count()
                    + tape
                        .iter()
                        .take(*head)
                        .map(|cell| cell.chars().count() + 1)
                        .sum::<usize>();
                writeln!(f, "{}^", " ".repeat(offset))
            }
        }
    }
}

/// The result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Dfa {
        final_state: State,
    },
    Pda {
        final_state: State,
        stack: Vec<String>,
    },
    /// The tape is trimmed to at most one trailing blank cell.
    Tm {
        final_state: State,
        tape: Vec<String>,
    },
}

impl Outcome {
    pub fn final_state(&self) -> &State {
        match self {
            Outcome::Dfa { final_state }
            | Outcome::Pda { final_state, .. }
            | Outcome::Tm { final_state, .. } => final_state,
        }
    }

    pub fn accepted(&self) -> bool {
        self.final_state().accepting
    }

    /// The remaining stack (PA) or trimmed tape (TM); DFA results have none.
    pub fn remainder(&self) -> Option<&[String]> {
        match self {
            Outcome::Dfa { .. } => None,
            Outcome::Pda { stack, .. } => Some(stack),
            Outcome::Tm { tape, .. } => Some(tape),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Dfa { final_state } => writeln!(
                f,
                "final state: {}, accepted: {}",
                final_state.name, final_state.accepting
            ),
            Outcome::Pda { final_state, stack } => writeln!(
                f,
                "final state: {}, accepted: {}, stack: {}",
                final_state.name,
                final_state.accepting,
                join_symbols(stack)
            ),
            Outcome::Tm { final_state, tape } => writeln!(
                f,
                "final state: {}, tape: {}",
                final_state.name,
                join_symbols(tape)
            ),
        }
    }
}
