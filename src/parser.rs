//! This module wires the compile pipeline together: line splitting, validation and graph
//! construction. It is the entry point callers use to turn program text into a [`Graph`].

use crate::builder::build;
use crate::graph::Graph;
use crate::lines::{split_lines, Line};
use crate::types::{SyntaxError, TapeArity};
use crate::validator::validate;
use tracing::debug;

/// Compiles program text for a machine with `arity` tapes.
///
/// # Returns
///
/// * `Ok(Graph)` if the text is valid.
/// * `Err(SyntaxError)` carrying the first violation and its line number.
pub fn parse(input: &str, arity: TapeArity) -> Result<Graph, SyntaxError> {
    parse_with(input, arity, |_| {})
}

/// Like [`parse`], reporting each line to `on_line` as the validator reaches it.
pub fn parse_with<F>(input: &str, arity: TapeArity, on_line: F) -> Result<Graph, SyntaxError>
where
    F: FnMut(&Line),
{
    let lines = split_lines(input);
    validate(&lines, arity, on_line)?;
    let graph = build(&lines);

    debug!(
        name = graph.name.as_deref().unwrap_or_default(),
        %arity,
        states = graph.nodes.len(),
        transitions = graph.transition_count(),
        "program compiled"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_parse_simple_program() {
        let input = r#"
name: Unary walk
init: q0
accept: qf

q0,0
q0,0,>

q0,_
qf,_,-
"#;

        let graph = parse(input, TapeArity::Single).unwrap();
        assert_eq!(graph.name.as_deref(), Some("Unary walk"));
        assert_eq!(graph.start_state, "q0");
        assert!(graph.is_accept_state("qf"));
        assert_eq!(graph.node("q0").unwrap().transitions.len(), 2);
    }

    #[test]
    fn test_parse_reports_arity_mismatch() {
        let input = "name: t\ninit: q0\naccept: qf\nq0,0,1\nqf,0,1,0,>,>,>";

        let error = parse(input, TapeArity::Triple).unwrap_err();
        assert_eq!(error.line_number, 4);
        assert!(error.message.contains("expected 3"));
        assert!(error.message.contains("got 2"));
    }

    #[test]
    fn test_same_text_compiles_for_matching_arity_only() {
        let input = "name: t\ninit: q0\naccept: qf\nq0,0,_\nqf,_,0,>,>";

        let graph = parse(input, TapeArity::Double).unwrap();
        assert_eq!(
            graph.node("q0").unwrap().transitions[0].directions,
            vec![Direction::Right, Direction::Right]
        );
        assert!(parse(input, TapeArity::Single).is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "name: t\ninit: q0\naccept: qa qb\nq1,0\nq0,1,<\nq0,0\nq1,1,>\nq1,0\nqa,0,-";
        assert_eq!(
            parse(input, TapeArity::Single).unwrap(),
            parse(input, TapeArity::Single).unwrap()
        );
    }

    #[test]
    fn test_parse_with_reports_lines() {
        let input = "// header\nname: t\ninit: q0\naccept: qf\nq0,0\nqf,0,-";
        let mut numbers = Vec::new();

        parse_with(input, TapeArity::Single, |line| numbers.push(line.line_number)).unwrap();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_has_no_size_limit() {
        let mut input = String::from("name: Long walk\ninit: q0\naccept: qf\n");
        for i in 0..4000 {
            input.push_str(&format!("q{i},0\nq{},0,>\n", i + 1));
        }
        input.push_str(&"// padding\n".repeat(2000));
        assert!(input.len() > 65536);

        let graph = parse(&input, TapeArity::Single).unwrap();
        assert_eq!(graph.nodes.len(), 4000);
        assert_eq!(graph.node("q3999").unwrap().transitions[0].to_state, "q4000");
    }
}
