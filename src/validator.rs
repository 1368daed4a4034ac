//! This module checks normalized program lines against the grammar in a single forward pass.
//!
//! Header lines (`name:`, `init:`, `accept:`) must each appear exactly once and before any
//! transition. Transitions are pairs of lines: a read line `state,sym...` followed by a
//! write/move line `state,sym...,move...`, each carrying one entry per tape. The first
//! violation aborts validation with a [`SyntaxError`] positioned at the offending line.

use crate::lines::{Line, LineKind};
use crate::types::{Direction, SyntaxError, TapeArity};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STATE_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap();
    static ref SYMBOL: Regex = Regex::new(r"^[A-Za-z0-9_]$").unwrap();
}

/// Which half of a transition the next transition line is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Half {
    Read,
    WriteMove,
}

/// Validates `lines` for a machine with the given tape arity.
///
/// `on_line` is invoked once per line in processing order. Header lines are reported
/// after they pass their checks, transition lines as soon as they are reached.
pub fn validate<F>(lines: &[Line], arity: TapeArity, mut on_line: F) -> Result<(), SyntaxError>
where
    F: FnMut(&Line),
{
    let mut has_name = false;
    let mut has_init = false;
    let mut has_accept = false;
    let mut seen_transition = false;
    let mut expecting = Half::Read;
    let mut last_read_line = 0;

    for line in lines {
        let kind = line.kind();

        match kind {
            LineKind::Name | LineKind::Init | LineKind::Accept => {
                let keyword = keyword(kind);
                if seen_transition {
                    return Err(error(
                        format!("{keyword} must be defined before transitions"),
                        line,
                    ));
                }

                let seen = match kind {
                    LineKind::Name => &mut has_name,
                    LineKind::Init => &mut has_init,
                    _ => &mut has_accept,
                };
                if *seen {
                    return Err(error(format!("Multiple {keyword} definitions"), line));
                }

                match kind {
                    LineKind::Init => check_init(line)?,
                    LineKind::Accept => check_accept(line)?,
                    _ => {}
                }

                *seen = true;
                on_line(line);
            }
            LineKind::TransitionHalf => {
                seen_transition = true;
                on_line(line);

                expecting = match expecting {
                    Half::Read => {
                        check_read_line(line, arity)?;
                        last_read_line = line.line_number;
                        Half::WriteMove
                    }
                    Half::WriteMove => {
                        check_write_move_line(line, arity)?;
                        Half::Read
                    }
                };
            }
        }
    }

    if !has_init {
        return Err(SyntaxError::new("Missing INIT definition", 0));
    }
    if !has_name {
        return Err(SyntaxError::new("Missing NAME definition", 0));
    }
    if !has_accept {
        return Err(SyntaxError::new("Missing ACCEPT definition", 0));
    }
    if expecting == Half::WriteMove {
        return Err(SyntaxError::new(
            "Unmatched READ line without WRITE/MOVE",
            last_read_line,
        ));
    }

    Ok(())
}

fn keyword(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Name => "NAME",
        LineKind::Init => "INIT",
        LineKind::Accept => "ACCEPT",
        LineKind::TransitionHalf => unreachable!("transition lines carry no keyword"),
    }
}

fn check_init(line: &Line) -> Result<(), SyntaxError> {
    let states: Vec<&str> = line.value().split_whitespace().collect();
    if states.len() != 1 {
        return Err(error("There must be exactly one INIT state", line));
    }

    check_state_name(states[0], line)
}

fn check_accept(line: &Line) -> Result<(), SyntaxError> {
    let mut states = line.value().split_whitespace().peekable();
    if states.peek().is_none() {
        return Err(error("ACCEPT requires at least one state", line));
    }

    states.try_for_each(|state| check_state_name(state, line))
}

/// `state,sym{N}`
fn check_read_line(line: &Line, arity: TapeArity) -> Result<(), SyntaxError> {
    let tokens = line.tokens();
    let expected = arity.count();
    let got = tokens.len().saturating_sub(1);

    if got != expected {
        return Err(error(
            format!(
                "Invalid symbol count: expected {expected} symbols for {arity} tape, but got {got}"
            ),
            line,
        ));
    }

    check_state_name(tokens[0], line)?;
    tokens[1..]
        .iter()
        .try_for_each(|token| check_symbol(token, line))
}

/// `state,sym{N},move{N}`
fn check_write_move_line(line: &Line, arity: TapeArity) -> Result<(), SyntaxError> {
    let tokens = line.tokens();
    let n = arity.count();
    let got = tokens.len().saturating_sub(1);

    if got != 2 * n {
        return Err(error(
            format!(
                "Invalid write/move count: expected {} tokens ({n} write + {n} move) for {arity} tape, but got {got}",
                2 * n
            ),
            line,
        ));
    }

    check_state_name(tokens[0], line)?;
    let (writes, moves) = tokens[1..].split_at(n);
    writes
        .iter()
        .try_for_each(|token| check_symbol(token, line))?;
    moves
        .iter()
        .try_for_each(|token| check_direction(token, line))
}

fn check_state_name(name: &str, line: &Line) -> Result<(), SyntaxError> {
    if STATE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(error(format!("Invalid state name '{name}'"), line))
    }
}

fn check_symbol(symbol: &str, line: &Line) -> Result<(), SyntaxError> {
    if SYMBOL.is_match(symbol) {
        Ok(())
    } else {
        Err(error(format!("Invalid symbol '{symbol}'"), line))
    }
}

fn check_direction(token: &str, line: &Line) -> Result<(), SyntaxError> {
    match Direction::from_token(token) {
        Some(_) => Ok(()),
        None => Err(error(format!("Invalid move direction '{token}'"), line)),
    }
}

fn error(message: impl Into<String>, line: &Line) -> SyntaxError {
    SyntaxError::new(message, line.line_number)
}
