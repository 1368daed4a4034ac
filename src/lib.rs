//! This crate compiles a small line-oriented language describing multi-tape deterministic
//! Turing Machines into a transition graph, and steps that graph over one, two or three tapes.
//!
//! The compile pipeline runs [`lines::split_lines`], [`validator::validate`] and
//! [`builder::build`] in order; [`parse`] wraps all three. A [`TuringMachine`] then executes
//! the resulting [`Graph`] one [`TuringMachine::step`] at a time.

pub mod builder;
pub mod graph;
pub mod lines;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod types;
pub mod validator;

/// Re-exports the graph model.
pub use graph::{Graph, Node, Transition};
/// Re-exports the line records produced by the normalizer.
pub use lines::{Line, LineKind};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the simulator and its tape type.
pub use machine::{Snapshot, Tape, TuringMachine};
/// Re-exports the compile entry points.
pub use parser::{parse, parse_with};
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports shared types and errors.
pub use types::{
    Direction, Halt, Step, SyntaxError, TapeArity, TuringMachineError, BLANK_SYMBOL,
    MAX_PROGRAM_SIZE,
};
