//! This module defines the `TuringMachine` struct, which steps a compiled [`Graph`] over
//! one, two or three sparse tapes. It owns the tapes, head positions and current state;
//! the graph itself is shared read-only.

use crate::graph::{Graph, Transition};
use crate::types::{Halt, Step, TapeArity, TuringMachineError, BLANK_SYMBOL};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// A sparse, unbounded tape. Cells may have negative indices and unwritten cells read
/// as [`BLANK_SYMBOL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
}

impl Tape {
    pub fn read(&self, cell: i64) -> char {
        self.cells.get(&cell).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Overwrites `cell`. Writing the blank symbol is stored like any other write.
    pub fn write(&mut self, cell: i64, symbol: char) {
        self.cells.insert(cell, symbol);
    }

    /// Replaces the tape content with `content`, starting at cell 0.
    pub fn load(&mut self, content: &str) {
        self.cells.clear();
        for (cell, symbol) in (0..).zip(content.chars()) {
            self.cells.insert(cell, symbol);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Returns the lowest and highest written cell, if any.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let first = self.cells.keys().next()?;
        let last = self.cells.keys().next_back()?;
        Some((*first, *last))
    }

    /// Renders cells `from..=to` as a string, blanks included.
    pub fn render(&self, from: i64, to: i64) -> String {
        (from..=to).map(|cell| self.read(cell)).collect()
    }
}

/// A point-in-time view of a machine, for drivers that display or export progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: String,
    pub step_count: usize,
    pub heads: Vec<i64>,
    pub tapes: Vec<Tape>,
    pub last_step: Option<Step>,
}

/// Represents a multi-tape Turing Machine running a compiled [`Graph`].
pub struct TuringMachine {
    graph: Arc<Graph>,
    arity: TapeArity,
    state: String,
    tapes: Vec<Tape>,
    heads: Vec<i64>,
    step_count: usize,
    last_step: Option<Step>,
}

impl TuringMachine {
    /// Creates a machine positioned at the graph's start state with `arity` empty tapes
    /// and every head at cell 0.
    ///
    /// `arity` must be the arity `graph` was compiled for. A graph does not record it, and
    /// with any other arity no read pattern can match, so the first step rejects.
    pub fn new(graph: Arc<Graph>, arity: TapeArity) -> Self {
        debug_assert!(
            graph.fits_arity(arity),
            "graph transitions do not match a {arity} tape machine"
        );
        let count = arity.count();
        Self {
            state: graph.start_state.clone(),
            graph,
            arity,
            tapes: vec![Tape::default(); count],
            heads: vec![0; count],
            step_count: 0,
            last_step: None,
        }
    }

    /// Executes a single step.
    ///
    /// A state without a node rejects, even when it is an accept state. Otherwise the first
    /// transition whose read pattern matches the symbols under the heads fires: its symbols
    /// are written, the heads move and the machine accepts if the destination is an accept
    /// state. When nothing matches the machine halts in place, accepting only if the
    /// current state is an accept state.
    ///
    /// Stepping after a halt is not guarded; drivers stop on the first halting outcome.
    pub fn step(&mut self) -> Step {
        let graph = Arc::clone(&self.graph);
        let symbols = self.symbols();

        let step = match graph.node(&self.state) {
            None => {
                debug!(state = %self.state, "no transitions defined for state");
                Step::Halt(Halt::Reject)
            }
            Some(node) => match node.matching(&symbols) {
                Some(transition) => {
                    self.apply(transition);
                    if graph.is_accept_state(&self.state) {
                        Step::Halt(Halt::Accept)
                    } else {
                        Step::Continue
                    }
                }
                None if graph.is_accept_state(&self.state) => Step::Halt(Halt::Accept),
                None => Step::Halt(Halt::Reject),
            },
        };

        self.step_count += 1;
        self.last_step = Some(step);

        trace!(
            step = self.step_count,
            state = %self.state,
            ?symbols,
            ?step,
            "step executed"
        );
        if step.is_halted() {
            debug!(state = %self.state, steps = self.step_count, outcome = %step, "machine halted");
        }

        step
    }

    fn apply(&mut self, transition: &Transition) {
        let moves = transition.write.iter().zip(&transition.directions);
        for ((tape, head), (&symbol, direction)) in
            self.tapes.iter_mut().zip(self.heads.iter_mut()).zip(moves)
        {
            tape.write(*head, symbol);
            *head += direction.offset();
        }

        self.state = transition.to_state.clone();
    }

    /// Returns the first transition that would fire from the current configuration.
    pub fn transition(&self) -> Option<&Transition> {
        self.graph.node(&self.state)?.matching(&self.symbols())
    }

    /// Returns the symbols currently under each head, blanks included.
    pub fn symbols(&self) -> Vec<char> {
        self.tapes
            .iter()
            .zip(&self.heads)
            .map(|(tape, &head)| tape.read(head))
            .collect()
    }

    /// Writes `symbol` into one cell of one tape, leaving the head where it is.
    pub fn write_cell(
        &mut self,
        tape_index: usize,
        cell: i64,
        symbol: char,
    ) -> Result<(), TuringMachineError> {
        self.tape_mut(tape_index)?.write(cell, symbol);
        Ok(())
    }

    /// Replaces the content of a tape with `content`, starting at cell 0.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the tape was successfully set
    /// * `Err(TuringMachineError)` if the tape index is invalid
    pub fn set_tape_content(
        &mut self,
        tape_index: usize,
        content: &str,
    ) -> Result<(), TuringMachineError> {
        self.tape_mut(tape_index)?.load(content);
        Ok(())
    }

    /// Sets the content of the first `contents.len()` tapes.
    pub fn set_tapes_content(&mut self, contents: &[String]) -> Result<(), TuringMachineError> {
        if contents.len() > self.tapes.len() {
            return Err(TuringMachineError::ValidationError(format!(
                "Too many tape contents provided: {} contents for {} tapes",
                contents.len(),
                self.tapes.len()
            )));
        }

        for (i, content) in contents.iter().enumerate() {
            self.set_tape_content(i, content)?;
        }

        Ok(())
    }

    fn tape_mut(&mut self, tape_index: usize) -> Result<&mut Tape, TuringMachineError> {
        let count = self.tapes.len();
        self.tapes.get_mut(tape_index).ok_or_else(|| {
            TuringMachineError::ValidationError(format!(
                "Tape index {tape_index} is out of bounds (machine has {count} tapes)"
            ))
        })
    }

    /// Resets the machine to the start state with empty tapes and heads at cell 0.
    pub fn reset(&mut self) {
        self.state = self.graph.start_state.clone();
        self.tapes.iter_mut().for_each(Tape::clear);
        self.heads.iter_mut().for_each(|head| *head = 0);
        self.step_count = 0;
        self.last_step = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            step_count: self.step_count,
            heads: self.heads.clone(),
            tapes: self.tapes.clone(),
            last_step: self.last_step,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn arity(&self) -> TapeArity {
        self.arity
    }

    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    pub fn heads(&self) -> &[i64] {
        &self.heads
    }

    /// Returns the number of `step` calls since creation or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the outcome of the most recent step, if any.
    pub fn last_step(&self) -> Option<Step> {
        self.last_step
    }
}
