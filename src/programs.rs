//! Sample programs shipped with the crate, compiled on first use and kept in a shared registry.

use crate::graph::Graph;
use crate::parser::parse;
use crate::types::{TapeArity, TuringMachineError};
use lazy_static::lazy_static;
use std::sync::RwLock;
use tracing::warn;

// Embedded programs and the tape arity each one is written for
const PROGRAM_TEXTS: [(&str, TapeArity); 6] = [
    (
        include_str!("../programs/divisible-by-3.tm"),
        TapeArity::Single,
    ),
    (include_str!("../programs/even-zeros.tm"), TapeArity::Single),
    (include_str!("../programs/palindrome.tm"), TapeArity::Single),
    (
        include_str!("../programs/fast-palindrome.tm"),
        TapeArity::Double,
    ),
    (
        include_str!("../programs/decimal-to-binary.tm"),
        TapeArity::Single,
    ),
    (
        include_str!("../programs/logarithm-of-length.tm"),
        TapeArity::Double,
    ),
];

/// A compiled bundled program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub arity: TapeArity,
    pub graph: Graph,
}

lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Compiles the embedded programs into the registry. Programs that fail to compile are
    /// logged and skipped.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut programs = Vec::new();

        for (text, arity) in PROGRAM_TEXTS {
            match parse(text, arity) {
                Ok(graph) => programs.push(Program {
                    name: graph.name.clone().unwrap_or_default(),
                    arity,
                    graph,
                }),
                Err(e) => warn!(error = %e, "failed to compile bundled program"),
            }
        }

        let mut write_guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;
        *write_guard = programs;

        Ok(())
    }

    /// Loads the registry unless it is already populated.
    fn ensure_loaded() {
        let loaded = PROGRAMS
            .read()
            .map(|programs| !programs.is_empty())
            .unwrap_or(false);
        if !loaded {
            if let Err(e) = Self::load() {
                warn!(error = %e, "failed to load bundled programs");
            }
        }
    }

    pub fn get_program_count() -> usize {
        Self::ensure_loaded();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    pub fn list_program_names() -> Vec<String> {
        Self::ensure_loaded();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name,
            arity: program.arity,
            start_state: program.graph.start_state.clone(),
            state_count: program.graph.nodes.len(),
            transition_count: program.graph.transition_count(),
        })
    }

    /// Returns the indices of programs whose name contains `query`, ignoring case.
    pub fn search_programs(query: &str) -> Vec<usize> {
        Self::ensure_loaded();
        let query = query.to_lowercase();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .enumerate()
                    .filter(|(_, program)| program.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the source text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS
            .get(index)
            .map(|(text, _)| *text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!(
                    "Program text index {} out of range",
                    index
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub arity: TapeArity,
    pub start_state: String,
    /// States with at least one outgoing transition.
    pub state_count: usize,
    pub transition_count: usize,
}
