use crate::automaton::Automaton;
use crate::compiler::compile;
use crate::types::{AutomatonError, AutomatonKind};

// Default embedded programs
const PROGRAM_SOURCES: [(&str, AutomatonKind, &str); 4] = [
    (
        "Even Ones",
        AutomatonKind::Dfa,
        include_str!("../programs/even-ones.dfa"),
    ),
    (
        "Balanced Words",
        AutomatonKind::Pda,
        include_str!("../programs/balanced.pa"),
    ),
    (
        "Binary Increment",
        AutomatonKind::Tm,
        include_str!("../programs/binary-increment.tm"),
    ),
    (
        "Oscillator",
        AutomatonKind::Tm,
        include_str!("../programs/oscillator.tm"),
    ),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = PROGRAM_SOURCES
        .iter()
        .enumerate()
        .map(|(index, &(name, kind, source))| ProgramInfo {
            index,
            name: name.to_string(),
            kind,
            source,
        })
        .collect();
}

/// A sample program shipped with the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub kind: AutomatonKind,
    pub source: &'static str,
}

impl ProgramInfo {
    /// Compiles a fresh automaton from the program source.
    pub fn compile(&self) -> Result<Automaton, AutomatonError> {
        compile(self.kind, self.source)
    }
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static ProgramInfo, AutomatonError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| AutomatonError::Config(format!("Program index {} out of range", index)))
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<&'static ProgramInfo, AutomatonError> {
        PROGRAMS
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| AutomatonError::Config(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .filter(|program| program.name.to_lowercase().contains(&query))
            .map(|program| program.index)
            .collect()
    }
}
