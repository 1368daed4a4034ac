//! This module provides the `ProgramLoader` struct, responsible for loading programs from
//! files and strings and compiling them for a given tape arity.

use crate::graph::Graph;
use crate::parser::parse;
use crate::types::{TapeArity, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of program sources.
pub const PROGRAM_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all `.tm` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads and compiles a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Graph)` if the file is successfully read and compiled.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Syntax)` if the file content is not a valid program.
    pub fn load_program(path: &Path, arity: TapeArity) -> Result<Graph, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content, arity)
    }

    /// Compiles a program from the provided string content, e.g. text taken from an editor.
    ///
    /// Content larger than [`MAX_PROGRAM_SIZE`] is refused before compiling.
    pub fn load_program_from_string(
        content: &str,
        arity: TapeArity,
    ) -> Result<Graph, TuringMachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::ValidationError(format!(
                "Program is {} bytes, the limit is {} bytes",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        Ok(parse(content, arity)?)
    }

    /// Loads all program files (`.tm` extension) from a given directory.
    ///
    /// Directories and other files are skipped. Every program file yields one entry, either
    /// its path and compiled graph or the error that stopped it.
    pub fn load_programs(
        directory: &Path,
        arity: TapeArity,
    ) -> Vec<Result<(PathBuf, Graph), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                Some(Self::load_program(&path, arity).map(|graph| (path, graph)))
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "name: Test Program\ninit: q0\naccept: qf\nq0,a\nqf,b,>";

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");
        write_file(&file_path, VALID);

        let graph = ProgramLoader::load_program(&file_path, TapeArity::Single).unwrap();
        assert_eq!(graph.name.as_deref(), Some("Test Program"));
        assert_eq!(graph.start_state, "q0");
        assert!(graph.node("q0").is_some());
    }

    #[test]
    fn test_load_invalid_program_keeps_line_number() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");
        write_file(&file_path, "name: x\ninit: q0\naccept: qf\nq0,a,b\nqf,b,>");

        match ProgramLoader::load_program(&file_path, TapeArity::Single) {
            Err(TuringMachineError::Syntax(error)) => assert_eq!(error.line_number, 4),
            other => panic!("Expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("missing.tm"), TapeArity::Single);
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_program() {
        let content = format!("{VALID}\n{}", "// padding\n".repeat(MAX_PROGRAM_SIZE / 10));

        let result = ProgramLoader::load_program_from_string(&content, TapeArity::Single);
        assert!(matches!(result, Err(TuringMachineError::ValidationError(_))));
        assert!(crate::parser::parse(&content, TapeArity::Single).is_ok());
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.tm"), VALID);
        write_file(&dir.path().join("invalid.tm"), "This is not a valid program");
        write_file(&dir.path().join("ignored.txt"), "This file should be ignored");

        let results = ProgramLoader::load_programs(dir.path(), TapeArity::Single);

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("nope"), TapeArity::Single);

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
