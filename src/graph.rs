//! This module defines the compiled transition graph: the machine's name, start state,
//! accept states and, per source state, the ordered list of outgoing transitions.

use crate::types::{Direction, TapeArity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A compiled Turing Machine program.
///
/// Built once per successful compile and read-only afterwards, so it can be shared by any
/// number of simulators. States that only ever appear as a destination or an accept state
/// have no entry in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub name: Option<String>,
    pub start_state: String,
    pub accept_states: BTreeSet<String>,
    /// Source state to node, in order of first definition.
    pub nodes: IndexMap<String, Node>,
}

/// The outgoing transitions of one state, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub transitions: Vec<Transition>,
}

/// Represents a single transition rule.
///
/// `read`, `write` and `directions` each hold one entry per tape, in tape order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub to_state: String,
    pub read: Vec<char>,
    pub write: Vec<char>,
    pub directions: Vec<Direction>,
}

impl Graph {
    pub fn node(&self, state: &str) -> Option<&Node> {
        self.nodes.get(state)
    }

    pub fn is_accept_state(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Adds `transition` to the node of `state`, creating the node on first use.
    pub fn upsert_transition(&mut self, state: &str, transition: Transition) {
        self.nodes
            .entry(state.to_string())
            .or_default()
            .upsert(transition);
    }

    /// Returns `true` if every transition has one read, write and move entry per tape.
    pub fn fits_arity(&self, arity: TapeArity) -> bool {
        let count = arity.count();
        self.nodes
            .values()
            .flat_map(|node| &node.transitions)
            .all(|t| {
                t.read.len() == count && t.write.len() == count && t.directions.len() == count
            })
    }

    pub fn transition_count(&self) -> usize {
        self.nodes.values().map(|node| node.transitions.len()).sum()
    }
}

impl Node {
    /// Stores `transition`, replacing an existing one with the same read pattern.
    ///
    /// A replaced transition keeps its slot, so the first definition of a read pattern fixes
    /// its matching priority while the last definition supplies its value.
    pub fn upsert(&mut self, transition: Transition) {
        match self
            .transitions
            .iter_mut()
            .find(|existing| existing.read == transition.read)
        {
            Some(existing) => *existing = transition,
            None => self.transitions.push(transition),
        }
    }

    /// Returns the first transition whose read pattern equals `symbols`.
    pub fn matching(&self, symbols: &[char]) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|transition| transition.read == symbols)
    }
}
