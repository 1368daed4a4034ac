//! This module defines the core data structures and types shared by the compiler pipeline
//! and the simulator, including tape arity, head directions, step outcomes and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The reserved blank symbol. Unwritten tape cells read as this symbol and programs may
/// read or write it like any other symbol.
pub const BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a program source in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// The number of parallel tapes a program is written for.
///
/// The arity is chosen by the caller, not declared in the program text, and every
/// transition's read, write and move patterns must have exactly this many entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapeArity {
    #[default]
    Single,
    Double,
    Triple,
}

impl TapeArity {
    /// Returns the number of tapes as a plain count.
    pub fn count(self) -> usize {
        match self {
            TapeArity::Single => 1,
            TapeArity::Double => 2,
            TapeArity::Triple => 3,
        }
    }
}

impl TryFrom<usize> for TapeArity {
    type Error = TuringMachineError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(TapeArity::Single),
            2 => Ok(TapeArity::Double),
            3 => Ok(TapeArity::Triple),
            _ => Err(TuringMachineError::ValidationError(format!(
                "Unsupported tape count {count}: expected 1, 2 or 3"
            ))),
        }
    }
}

impl fmt::Display for TapeArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TapeArity::Single => "single",
            TapeArity::Double => "double",
            TapeArity::Triple => "triple",
        };
        f.write_str(name)
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Parses a move token: `<` is left, `>` is right and `-` is stay.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Direction::Left),
            ">" => Some(Direction::Right),
            "-" => Some(Direction::Stay),
            _ => None,
        }
    }

    /// Returns the source token for this direction.
    pub fn as_token(self) -> &'static str {
        match self {
            Direction::Left => "<",
            Direction::Right => ">",
            Direction::Stay => "-",
        }
    }

    /// Returns the head offset applied by this direction.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

/// Represents the outcome of a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// The machine fired a transition into a non-accepting state; step again.
    Continue,
    /// The machine has halted with a verdict.
    Halt(Halt),
}

/// The verdict of a halted machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    Accept,
    Reject,
}

impl Step {
    /// Returns `true` for any outcome other than `Continue`.
    pub fn is_halted(&self) -> bool {
        matches!(self, Step::Halt(_))
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Step::Halt(Halt::Accept))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Continue => f.write_str("continue"),
            Step::Halt(Halt::Accept) => f.write_str("accepted"),
            Step::Halt(Halt::Reject) => f.write_str("rejected"),
        }
    }
}

/// A grammar violation found while validating program text.
///
/// `line_number` is the 1-based physical source line. Zero marks an error that
/// belongs to the program as a whole, such as a missing declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", render_syntax_error(.message, .line_number))]
pub struct SyntaxError {
    pub message: String,
    pub line_number: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line_number: usize) -> Self {
        Self {
            message: message.into(),
            line_number,
        }
    }
}

fn render_syntax_error(message: &str, line_number: &usize) -> String {
    if *line_number == 0 {
        format!("program: {message}")
    } else {
        format!("line {line_number}: {message}")
    }
}

/// Represents errors raised around the core pipeline: loading programs, configuring
/// tapes and wrapping syntax errors for callers that deal with all of them at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates that the program text violates the grammar.
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Indicates an invalid request against a program or machine, such as a bad tape index.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let right_json = serde_json::to_string(&Direction::Right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!(Direction::from_token(">"), Some(Direction::Right));
        assert_eq!(Direction::from_token("<"), Some(Direction::Left));
        assert_eq!(Direction::from_token("-"), Some(Direction::Stay));
        assert_eq!(Direction::from_token("->"), None);
        assert_eq!(Direction::from_token("R"), None);

        for direction in [Direction::Left, Direction::Right, Direction::Stay] {
            assert_eq!(Direction::from_token(direction.as_token()), Some(direction));
        }
    }

    #[test]
    fn test_tape_arity_conversion() {
        assert_eq!(TapeArity::try_from(1).unwrap(), TapeArity::Single);
        assert_eq!(TapeArity::try_from(3).unwrap().count(), 3);
        assert!(matches!(
            TapeArity::try_from(4),
            Err(TuringMachineError::ValidationError(_))
        ));
        assert!(TapeArity::try_from(0).is_err());
        assert_eq!(TapeArity::Double.to_string(), "double");
    }

    #[test]
    fn test_step_predicates() {
        assert!(!Step::Continue.is_halted());
        assert!(Step::Halt(Halt::Reject).is_halted());
        assert!(!Step::Halt(Halt::Reject).is_accepted());
        assert!(Step::Halt(Halt::Accept).is_accepted());
        assert_eq!(Step::Halt(Halt::Accept).to_string(), "accepted");
    }

    #[test]
    fn test_syntax_error_display() {
        let error = SyntaxError::new("Multiple NAME definitions", 4);
        assert_eq!(error.to_string(), "line 4: Multiple NAME definitions");

        let error = SyntaxError::new("Missing INIT definition", 0);
        assert_eq!(error.to_string(), "program: Missing INIT definition");

        let wrapped: TuringMachineError = SyntaxError::new("oops", 2).into();
        assert_eq!(wrapped.to_string(), "Syntax error: line 2: oops");
    }
}
