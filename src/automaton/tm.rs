//! This module defines the `TuringMachine` variant, which simulates a single-tape Turing
//! Machine. The tape grows to the right on demand; moving left of the first cell fails.

use super::{Outcome, Snapshot};
use crate::types::{AutomatonError, Direction, State, StateTable, SymbolTable, BLANK_SYMBOL};
use std::collections::HashMap;

/// Left-hand side of a Turing Machine transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TmKey {
    pub state: String,
    pub symbol: String,
}

impl TmKey {
    pub fn new(state: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            symbol: symbol.into(),
        }
    }
}

/// Right-hand side of a Turing Machine transition: write, change state, then move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmMove {
    pub state: String,
    pub write: String,
    pub direction: Direction,
}

pub type TmTransitions = HashMap<TmKey, TmMove>;

/// Represents a single-tape Turing Machine.
///
/// The machine keeps its compiled definition together with the tape and the head position.
/// Unlike the other variants it stops as soon as it enters an accepting state.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine {
    states: StateTable,
    symbols: SymbolTable,
    transitions: TmTransitions,
    state: String,
    tape: Vec<String>,
    head: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` with the head on the first cell of `tape`.
    ///
    /// An empty tape is replaced by a single blank cell.
    pub fn new(
        states: StateTable,
        symbols: SymbolTable,
        transitions: TmTransitions,
        initial_state: String,
        tape: Vec<String>,
    ) -> Self {
        let tape = if tape.is_empty() {
            vec![BLANK_SYMBOL.to_string()]
        } else {
            tape
        };

        Self {
            states,
            symbols,
            transitions,
            state: initial_state,
            tape,
            head: 0,
        }
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn transitions(&self) -> &TmTransitions {
        &self.transitions
    }

    pub fn tape(&self) -> &[String] {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Option<&str> {
        self.tape.get(self.head).map(String::as_str)
    }

    fn current(&self) -> State {
        self.states
            .get(&self.state)
            .cloned()
            .unwrap_or_else(|| State::new(&self.state))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::Tm {
            state: self.current(),
            tape: self.tape.clone(),
            head: self.head,
        }
    }

    /// Checks if the machine is in an accepting state.
    pub fn is_finished(&self) -> bool {
        self.states
            .get(&self.state)
            .is_some_and(|state| state.accepting)
    }

    pub fn result(&self) -> Outcome {
        Outcome::Tm {
            final_state: self.current(),
            tape: trim_tape(&self.tape),
        }
    }

    /// Executes a single step: write the replacement symbol, change state, move the head.
    pub fn apply_move(&mut self) -> Result<(), AutomatonError> {
        let symbol = self
            .tape
            .get(self.head)
            .ok_or_else(|| AutomatonError::Runtime("turing machine went out of tape".to_string()))?;

        let key = TmKey::new(self.state.as_str(), symbol.as_str());
        let next = self.transitions.get(&key).ok_or_else(|| {
            AutomatonError::Runtime(format!(
                "missing transition for state {} and symbol {}",
                key.state, key.symbol
            ))
        })?;

        self.tape[self.head] = next.write.clone();
        self.state = next.state.clone();

        match next.direction {
            Direction::Left => {
                self.head = self.head.checked_sub(1).ok_or_else(|| {
                    AutomatonError::Runtime("turing machine went out of tape".to_string())
                })?;
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(BLANK_SYMBOL.to_string());
                }
            }
        }

        Ok(())
    }
}

/// Collapses a run of trailing blank cells down to a single blank.
///
/// Cells before the trailing run are kept as they are, so trimming is idempotent.
pub fn trim_tape<S: AsRef<str> + Clone + Into<String>>(tape: &[S]) -> Vec<String> {
    let mut end = tape.len();
    while end >= 2
        && tape[end - 1].as_ref() == BLANK_SYMBOL
        && tape[end - 2].as_ref() == BLANK_SYMBOL
    {
        end -= 1;
    }

    tape[..end].iter().cloned().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn create_machine(
        accepting: &[&str],
        rules: &[(&str, &str, &str, &str, Direction)],
        tape: &[&str],
    ) -> TuringMachine {
        let mut states = StateTable::new();
        for (from, _, to, _, _) in rules {
            for name in [from, to] {
                states.insert(name.to_string(), State::new(*name));
            }
        }
        for name in accepting {
            states.insert(name.to_string(), State::accepting(*name));
        }

        let mut symbols = SymbolTable::from([BLANK_SYMBOL.to_string()]);
        symbols.extend(tape.iter().map(|s| s.to_string()));

        let transitions = rules
            .iter()
            .map(|(from, read, to, write, direction)| {
                (
                    TmKey::new(*from, *read),
                    TmMove {
                        state: to.to_string(),
                        write: write.to_string(),
                        direction: *direction,
                    },
                )
            })
            .collect();

        let initial = rules.first().map_or(accepting[0], |r| r.0).to_string();
        TuringMachine::new(states, symbols, transitions, initial, strings(tape))
    }

    #[test]
    fn test_machine_creation_defaults_to_blank_tape() {
        let machine = create_machine(&["qState2"], &[], &[]);

        assert_eq!(machine.tape(), strings(&["B"]).as_slice());
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.symbol(), Some("B"));
    }

    #[test]
    fn test_single_step_grows_tape() {
        let mut machine = create_machine(
            &["qState2"],
            &[("qState", "B", "qState2", "B", Direction::Right)],
            &[],
        );
        assert!(!machine.is_finished());

        machine.apply_move().unwrap();

        assert_eq!(machine.state(), "qState2");
        assert_eq!(machine.tape(), strings(&["B", "B"]).as_slice());
        assert_eq!(machine.head(), 1);
        assert!(machine.is_finished());

        let result = machine.result();
        assert_eq!(result.final_state().name, "qState2");
        assert_eq!(result.remainder(), Some(strings(&["B"]).as_slice()));
    }

    #[test]
    fn test_write_then_move_left() {
        let mut machine = create_machine(
            &["qEnd"],
            &[
                ("qStart", "a", "qBack", "x", Direction::Right),
                ("qBack", "b", "qEnd", "y", Direction::Left),
            ],
            &["a", "b"],
        );

        machine.apply_move().unwrap();
        machine.apply_move().unwrap();

        assert_eq!(machine.tape(), strings(&["x", "y"]).as_slice());
        assert_eq!(machine.head(), 0);
        assert!(machine.is_finished());
    }

    #[test]
    fn test_moving_left_of_first_cell_fails() {
        let mut machine = create_machine(
            &["qEnd"],
            &[("qState", "symbol1", "qState", "B", Direction::Left)],
            &["symbol1"],
        );

        let error = machine.apply_move().unwrap_err();
        assert_eq!(
            error.to_string(),
            "cannot continue calculations, turing machine went out of tape"
        );
    }

    #[test]
    fn test_missing_transition() {
        let mut machine = create_machine(
            &["qEnd"],
            &[("qState", "a", "qEnd", "a", Direction::Right)],
            &["b"],
        );

        assert_eq!(
            machine.apply_move().unwrap_err(),
            AutomatonError::Runtime("missing transition for state qState and symbol b".to_string())
        );
    }

    #[test]
    fn test_trim_tape() {
        assert_eq!(trim_tape(&["s1", "s2", "B", "B", "B"]), strings(&["s1", "s2", "B"]));
        assert_eq!(trim_tape(&["B", "B"]), strings(&["B"]));
        assert_eq!(trim_tape(&["B", "a", "B"]), strings(&["B", "a", "B"]));
        assert_eq!(trim_tape(&["a", "b"]), strings(&["a", "b"]));
        assert_eq!(trim_tape::<&str>(&[]), Vec::<String>::new());
    }

    #[test]
    fn test_trim_tape_is_idempotent() {
        let tapes = [
            strings(&["B", "B", "B", "B"]),
            strings(&["a", "B", "B", "b", "B", "B"]),
            strings(&["a"]),
        ];

        for tape in tapes {
            let once = trim_tape(&tape);
            assert_eq!(trim_tape(&once), once);
            assert!(!once.ends_with(&strings(&["B", "B"])));
        }
    }
}
