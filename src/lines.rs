//! This module splits raw program text into numbered line records and classifies them.
//!
//! Comments start at `//` and run to the end of the physical line. Blank and
//! comment-only lines produce no record but still advance the line counter, so the
//! numbers carried by each [`Line`] always match the original source.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref KEYWORD: Regex = Regex::new(r"^(name|init|accept)\s*:").unwrap();
}

/// A single non-empty logical line of program text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// 1-based physical line number in the source.
    pub line_number: usize,
    /// Comment-stripped text, untrimmed.
    pub raw_text: String,
    /// Comment-stripped, trimmed text.
    pub normalized_text: String,
}

/// The kind of a line, derived from its normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Name,
    Init,
    Accept,
    /// Either half of a transition: the read line or the write/move line that follows it.
    TransitionHalf,
}

impl Line {
    fn new(line_number: usize, raw_text: String) -> Self {
        let normalized_text = raw_text.trim().to_string();
        Self {
            line_number,
            raw_text,
            normalized_text,
        }
    }

    pub fn kind(&self) -> LineKind {
        classify_line(&self.normalized_text)
    }

    /// Returns the text after the first colon, trimmed. Empty for lines without a colon.
    pub fn value(&self) -> &str {
        self.normalized_text
            .split_once(':')
            .map(|(_, value)| value.trim())
            .unwrap_or("")
    }

    /// Splits the line on commas, trimming every token and dropping empty ones.
    pub fn tokens(&self) -> Vec<&str> {
        self.normalized_text
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Classifies a normalized line by its leading keyword.
///
/// The keyword must open the line; whitespace is allowed between it and the colon.
pub fn classify_line(text: &str) -> LineKind {
    match KEYWORD.captures(text).and_then(|caps| caps.get(1)) {
        Some(keyword) => match keyword.as_str() {
            "name" => LineKind::Name,
            "init" => LineKind::Init,
            _ => LineKind::Accept,
        },
        None => LineKind::TransitionHalf,
    }
}

/// Splits program text into [`Line`] records, stripping `//` comments.
pub fn split_lines(input: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line_number = 1;
    let mut current = String::new();
    let mut in_comment = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                push_line(&mut lines, line_number, std::mem::take(&mut current));
                line_number += 1;
                in_comment = false;
            }
            '/' if chars.peek() == Some(&'/') => in_comment = true,
            _ if in_comment => {}
            _ => current.push(c),
        }
    }

    push_line(&mut lines, line_number, current);

    lines
}

fn push_line(lines: &mut Vec<Line>, line_number: usize, raw_text: String) {
    let line = Line::new(line_number, raw_text);
    if !line.normalized_text.is_empty() {
        lines.push(line);
    }
}
