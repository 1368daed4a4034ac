//! This module turns validated program lines into a [`Graph`].
//!
//! The builder trusts its input: it assumes the lines already passed
//! [`validate`](crate::validator::validate) and performs no grammar checks of its own.
//! Malformed input produces an unspecified graph rather than an error.

use crate::graph::{Graph, Transition};
use crate::lines::{Line, LineKind};
use crate::types::Direction;

/// Builds the transition graph from validated lines.
pub fn build(lines: &[Line]) -> Graph {
    let mut graph = Graph::default();
    let mut lines = lines.iter();

    while let Some(line) = lines.next() {
        match line.kind() {
            LineKind::Name => graph.name = Some(line.value().to_string()),
            LineKind::Init => graph.start_state = line.value().to_string(),
            LineKind::Accept => graph
                .accept_states
                .extend(line.value().split_whitespace().map(str::to_string)),
            LineKind::TransitionHalf => {
                let Some(write_move) = lines.next() else {
                    break;
                };
                if let Some((state, transition)) = parse_transition(line, write_move) {
                    graph.upsert_transition(state, transition);
                }
            }
        }
    }

    graph
}

/// Combines a read line and its write/move line into the source state and a transition.
fn parse_transition<'a>(read: &'a Line, write_move: &Line) -> Option<(&'a str, Transition)> {
    let read_tokens = read.tokens();
    let (state, read_symbols) = read_tokens.split_first()?;
    let read: Vec<char> = read_symbols.iter().filter_map(|t| t.chars().next()).collect();

    let tokens = write_move.tokens();
    let (to_state, rest) = tokens.split_first()?;
    let split = read.len().min(rest.len());
    let (write, moves) = rest.split_at(split);

    Some((
        *state,
        Transition {
            to_state: to_state.to_string(),
            read,
            write: write.iter().filter_map(|t| t.chars().next()).collect(),
            directions: moves
                .iter()
                .filter_map(|t| Direction::from_token(t))
                .collect(),
        },
    ))
}
