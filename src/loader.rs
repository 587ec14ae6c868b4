//! This module provides the `ProgramLoader` struct, responsible for loading automaton programs
//! from files and strings and compiling them.

use crate::automaton::Automaton;
use crate::compiler::compile;
use crate::types::{AutomatonError, AutomatonKind};
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading automaton programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all program files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads the source text of a program file.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the file content.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    pub fn load_source(path: &Path) -> Result<String, AutomatonError> {
        fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Loads and compiles a single program of the given kind from `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the file is read and compiled successfully.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * Any scanning or compilation error if the content is not a valid program.
    pub fn load_program(path: &Path, kind: AutomatonKind) -> Result<Automaton, AutomatonError> {
        let source = Self::load_source(path)?;
        compile(kind, &source)
    }

    /// Compiles a program from string content, e.g. piped from stdin.
    pub fn load_program_from_string(
        content: &str,
        kind: AutomatonKind,
    ) -> Result<Automaton, AutomatonError> {
        compile(kind, content)
    }

    /// Loads all program files (`.dfa`, `.pa` and `.tm`) from a given directory.
    ///
    /// The automaton kind of each file is taken from its extension. Directories and files with
    /// other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Automaton), AutomatonError>>` - one entry per program file,
    ///   either the compiled automaton with its path or the error that prevented loading it.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Automaton), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();
                if path.is_dir() {
                    return None;
                }

                let kind = Self::kind_of(&path)?;
                match Self::load_program(&path, kind) {
                    Ok(automaton) => Some(Ok((path, automaton))),
                    Err(e) => {
                        log::warn!("failed to load {}: {}", path.display(), e);
                        Some(Err(e))
                    }
                }
            })
            .collect()
    }

    /// Infers the automaton kind from the file extension.
    pub fn kind_of(path: &Path) -> Option<AutomatonKind> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(AutomatonKind::from_extension)
    }
}
