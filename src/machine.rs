//! This module provides the execution driver shared by all automaton variants. It repeatedly
//! traces, checks for termination and applies moves until the automaton finishes, fails, or
//! the deadline passes.

use crate::automaton::{Automaton, Outcome};
use crate::types::AutomatonError;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

/// Options controlling a single run.
///
/// The output sink is borrowed for the duration of the run; flushing and closing it is left
/// to the caller.
#[derive(Default)]
pub struct RunOptions<'w> {
    output: Option<&'w mut dyn Write>,
    include_trace: bool,
    deadline: Option<Instant>,
}

impl<'w> RunOptions<'w> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sink snapshots are written to.
    pub fn with_output(mut self, output: &'w mut dyn Write) -> Self {
        self.output = Some(output);
        self
    }

    /// Writes a snapshot before every termination check when enabled.
    pub fn with_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }

    /// Bounds the run to `timeout` from now. A zero duration means no bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);
        self
    }

    /// Bounds the run to an absolute point in time.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn include_trace(&self) -> bool {
        self.include_trace
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn validate(&self) -> Result<(), AutomatonError> {
        if self.include_trace && self.output.is_none() {
            return Err(AutomatonError::Config(
                "an output sink must be set when tracing is enabled".to_string(),
            ));
        }
        Ok(())
    }

    fn expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl fmt::Debug for RunOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("output", &self.output.is_some())
            .field("include_trace", &self.include_trace)
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// A finished run together with the number of moves it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub outcome: Outcome,
    pub steps: usize,
}

/// Runs `automaton` to completion and returns its result.
///
/// # Errors
///
/// * `AutomatonError::Config` if tracing is requested without an output sink.
/// * `AutomatonError::Timeout` if the deadline passes before the automaton finishes.
/// * `AutomatonError::Runtime` if a move cannot be applied.
/// * `AutomatonError::Output` if writing a snapshot fails.
pub fn run(automaton: Automaton, options: RunOptions) -> Result<Outcome, AutomatonError> {
    run_counted(automaton, options).map(|execution| execution.outcome)
}

/// Like [`run`], but also reports how many moves were applied.
pub fn run_counted(
    mut automaton: Automaton,
    mut options: RunOptions,
) -> Result<Execution, AutomatonError> {
    options.validate()?;

    log::debug!(
        "running {} from state {}",
        automaton.kind(),
        automaton.state()
    );

    let mut steps = 0;
    loop {
        // Checked before anything else so an overrun is bounded by one iteration.
        if options.expired() {
            log::info!("timeout reached after {steps} moves");
            return Err(AutomatonError::Timeout);
        }

        if options.include_trace {
            if let Some(output) = options.output.as_mut() {
                write!(output, "{}", automaton.snapshot())
                    .map_err(|e| AutomatonError::Output(e.to_string()))?;
            }
        }

        if automaton.is_finished() {
            let outcome = automaton.result();
            log::info!(
                "finished in state {} after {steps} moves",
                outcome.final_state().name
            );
            return Ok(Execution { outcome, steps });
        }

        if let Err(e) = automaton.apply_move() {
            log::info!("stopped after {steps} moves: {e}");
            return Err(e);
        }
        steps += 1;
        log::trace!("move {steps}: now in state {}", automaton.state());
    }
}
