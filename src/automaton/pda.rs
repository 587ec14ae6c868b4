//! Pushdown automaton: every move pops the stack top, consumes one input symbol and pushes
//! the symbols listed by the matching transition.

use super::{Outcome, Snapshot};
use crate::types::{AutomatonError, State, StateTable, SymbolTable};
use std::collections::HashMap;

/// Left-hand side of a PA transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdaKey {
    pub state: String,
    pub input: String,
    pub stack: String,
}

impl PdaKey {
    pub fn new(
        state: impl Into<String>,
        input: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            input: input.into(),
            stack: stack.into(),
        }
    }
}

/// Right-hand side of a PA transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaMove {
    pub state: String,
    /// Pushed in order, so the last symbol becomes the new stack top.
    pub push: Vec<String>,
}

pub type PdaTransitions = HashMap<PdaKey, PdaMove>;

#[derive(Debug, Clone, PartialEq)]
pub struct Pda {
    states: StateTable,
    symbols: SymbolTable,
    transitions: PdaTransitions,
    state: String,
    input: Vec<String>,
    position: usize,
    // Last element is the top.
    stack: Vec<String>,
}

impl Pda {
    /// Creates a PA positioned at the start of `input` with the given initial stack.
    ///
    /// The compiler appends the input-end marker to `input` and seeds the stack with the
    /// stack-start marker.
    pub fn new(
        states: StateTable,
        symbols: SymbolTable,
        transitions: PdaTransitions,
        initial_state: String,
        input: Vec<String>,
        stack: Vec<String>,
    ) -> Self {
        Self {
            states,
            symbols,
            transitions,
            state: initial_state,
            input,
            position: 0,
            stack,
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

    pub fn transitions(&self) -> &PdaTransitions {
        &self.transitions
    }

    pub fn input(&self) -> &[String] {
        &self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    fn current(&self) -> State {
        self.states
            .get(&self.state)
            .cloned()
            .unwrap_or_else(|| State::new(&self.state))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::Pda {
            state: self.current(),
            input_left: self
                .input
                .get(self.position..)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            stack: self.stack.clone(),
        }
    }

    /// Finished once the whole input, including the input-end marker, is consumed.
    pub fn is_finished(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn result(&self) -> Outcome {
        Outcome::Pda {
            final_state: self.current(),
            stack: self.stack.clone(),
        }
    }

    pub fn apply_move(&mut self) -> Result<(), AutomatonError> {
        let input = self
            .input
            .get(self.position)
            .ok_or_else(|| AutomatonError::Runtime("input is exhausted".to_string()))?;

        let top = self
            .stack
            .pop()
            .ok_or_else(|| AutomatonError::Runtime("stack is empty".to_string()))?;

        let key = PdaKey::new(self.state.as_str(), input.as_str(), top);
        let next = self.transitions.get(&key).ok_or_else(|| {
            AutomatonError::Runtime(format!(
                "missing transition for state {}, symbol {} and stack symbol {}",
                key.state, key.input, key.stack
            ))
        })?;

        self.state = next.state.clone();
        self.position += 1;
        self.stack.extend(next.push.iter().cloned());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{INPUT_END_SYMBOL, STACK_START_SYMBOL};

    fn strings(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    // Accepts a^n b^n by pushing A for every a and popping it for every b.
    fn create_anbn_pda(input: &[&str]) -> Pda {
        let states = StateTable::from([
            ("qA".to_string(), State::new("qA")),
            ("qB".to_string(), State::new("qB")),
            ("qOk".to_string(), State::accepting("qOk")),
        ]);
        let symbols = SymbolTable::from(
            ["a", "b", "A", INPUT_END_SYMBOL, STACK_START_SYMBOL].map(String::from),
        );
        let push = |state: &str, push: &[&str]| PdaMove {
            state: state.to_string(),
            push: strings(push),
        };
        let transitions = PdaTransitions::from([
            (PdaKey::new("qA", "a", "}"), push("qA", &["}", "A"])),
            (PdaKey::new("qA", "a", "A"), push("qA", &["A", "A"])),
            (PdaKey::new("qA", "b", "A"), push("qB", &[])),
            (PdaKey::new("qB", "b", "A"), push("qB", &[])),
            (PdaKey::new("qB", "{", "}"), push("qOk", &["}"])),
        ]);

        let mut input = strings(input);
        input.push(INPUT_END_SYMBOL.to_string());

        Pda::new(
            states,
            symbols,
            transitions,
            "qA".to_string(),
            input,
            strings(&[STACK_START_SYMBOL]),
        )
    }

    #[test]
    fn test_pda_push_order() {
        let mut pda = create_anbn_pda(&["a", "a", "b", "b"]);

        pda.apply_move().unwrap();
        assert_eq!(pda.stack(), strings(&["}", "A"]).as_slice());

        pda.apply_move().unwrap();
        assert_eq!(pda.stack(), strings(&["}", "A", "A"]).as_slice());
    }

    #[test]
    fn test_pda_accepts_balanced_input() {
        let mut pda = create_anbn_pda(&["a", "a", "b", "b"]);

        while !pda.is_finished() {
            pda.apply_move().unwrap();
        }

        let result = pda.result();
        assert!(result.accepted());
        assert_eq!(result.final_state().name, "qOk");
        assert_eq!(result.remainder(), Some(strings(&["}"]).as_slice()));
    }

    #[test]
    fn test_pda_missing_transition_names_all_parts() {
        let mut pda = create_anbn_pda(&["a", "a", "b"]);

        pda.apply_move().unwrap();
        pda.apply_move().unwrap();
        pda.apply_move().unwrap();
        assert_eq!(pda.state(), "qB");

        let error = pda.apply_move().unwrap_err();
        assert_eq!(
            error,
            AutomatonError::Runtime(
                "missing transition for state qB, symbol { and stack symbol A".to_string()
            )
        );
    }

    #[test]
    fn test_pda_empty_stack_is_reported() {
        let mut pda = create_anbn_pda(&["b"]);
        pda.stack.clear();

        assert_eq!(
            pda.apply_move().unwrap_err(),
            AutomatonError::Runtime("stack is empty".to_string())
        );
        assert_eq!(pda.position(), 0);
    }

    #[test]
    fn test_pda_popping_the_last_symbol_without_push_empties_stack() {
        let mut pda = create_anbn_pda(&["a", "b"]);
        let pop_only = PdaMove {
            state: "qA".to_string(),
            push: Vec::new(),
        };
        pda.transitions.insert(PdaKey::new("qA", "a", "}"), pop_only);

        pda.apply_move().unwrap();
        assert!(pda.stack().is_empty());
        assert_eq!(
            pda.apply_move().unwrap_err(),
            AutomatonError::Runtime("stack is empty".to_string())
        );
    }

    #[test]
    fn test_pda_snapshot() {
        let pda = create_anbn_pda(&["a"]);

        assert_eq!(
            pda.snapshot().to_string(),
            "current state: qA, input left: a|{, stack: }\n"
        );
    }

    #[test]
    fn test_pda_move_after_input_exhausted_keeps_stack() {
        let mut pda = create_anbn_pda(&["a", "b"]);
        while !pda.is_finished() {
            pda.apply_move().unwrap();
        }
        assert_eq!(pda.stack(), strings(&["}"]).as_slice());

        assert_eq!(
            pda.apply_move().unwrap_err(),
            AutomatonError::Runtime("input is exhausted".to_string())
        );
        assert_eq!(pda.stack(), strings(&["}"]).as_slice());
        assert_eq!(pda.state(), "qOk");
    }
}
