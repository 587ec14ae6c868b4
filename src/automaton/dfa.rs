//! Deterministic finite automaton: consumes one input symbol per move.

use super::{Outcome, Snapshot};
use crate::types::{AutomatonError, State, StateTable, SymbolTable};
use std::collections::HashMap;

/// Left-hand side of a DFA transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DfaKey {
    pub state: String,
    pub symbol: String,
}

impl DfaKey {
    pub fn new(state: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            symbol: symbol.into(),
        }
    }
}

/// Maps `(state, symbol)` to the next state.
pub type DfaTransitions = HashMap<DfaKey, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Dfa {
    states: StateTable,
    symbols: SymbolTable,
    transitions: DfaTransitions,
    state: String,
    input: Vec<String>,
    position: usize,
}

impl Dfa {
    /// Creates a DFA positioned at the start of `input`.
    pub fn new(
        states: StateTable,
        symbols: SymbolTable,
        transitions: DfaTransitions,
        initial_state: String,
        input: Vec<String>,
    ) -> Self {
        Self {
            states,
            symbols,
            transitions,
            state: initial_state,
            input,
            position: 0,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn transitions(&self) -> &DfaTransitions {
        &self.transitions
    }

    pub fn input(&self) -> &[String] {
        &self.input
    }

    /// Index of the next input symbol.
    pub fn position(&self) -> usize {
        self.position
    }

    fn current(&self) -> State {
        self.states
            .get(&self.state)
            .cloned()
            .unwrap_or_else(|| State::new(&self.state))
    }

    fn input_left(&self) -> Vec<String> {
        self.input
            .get(self.position..)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::Dfa {
            state: self.current(),
            input_left: self.input_left(),
        }
    }

    /// A DFA stops when the input is exhausted, whatever state it is in.
    pub fn is_finished(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn result(&self) -> Outcome {
        Outcome::Dfa {
            final_state: self.current(),
        }
    }

    pub fn apply_move(&mut self) -> Result<(), AutomatonError> {
        let symbol = self
            .input
            .get(self.position)
            .ok_or_else(|| AutomatonError::Runtime("input is exhausted".to_string()))?;

        let key = DfaKey::new(self.state.as_str(), symbol.as_str());
        let next = self.transitions.get(&key).ok_or_else(|| {
            AutomatonError::Runtime(format!(
                "missing transition for state {} and symbol {}",
                key.state, key.symbol
            ))
        })?;

        self.state = next.clone();
        self.position += 1;

        Ok(())
    }
}
