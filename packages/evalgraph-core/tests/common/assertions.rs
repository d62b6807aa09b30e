//! Custom assertions for flow graph tests

use evalgraph_core::{Cursor, DataFlowGraph, EdgeKind, Phase, ProgramPoint, SyntaxTree};
use pretty_assertions::assert_eq;

/// Cursor of the first node (post-order) printing as `snippet`
pub fn find(tree: &SyntaxTree, snippet: &str) -> Cursor {
    tree.find_program_point(snippet)
        .unwrap_or_else(|| panic!("no program point prints as `{snippet}`"))
}

pub fn print(tree: &SyntaxTree, point: &ProgramPoint) -> String {
    tree.print(point.cursor).unwrap()
}

/// `(phase, printed text)` of each predecessor, in result order
pub fn previous(graph: &DataFlowGraph<'_>, snippet: &str, phase: Phase) -> Vec<(Phase, String)> {
    let tree = graph.tree();
    graph
        .previous_in(find(tree, snippet), phase)
        .unwrap_or_else(|e| panic!("previous({snippet}, {phase}) failed: {e}"))
        .iter()
        .map(|p| (p.phase, print(tree, p)))
        .collect()
}

/// Predecessor texts only
pub fn assert_previous(graph: &DataFlowGraph<'_>, snippet: &str, phase: Phase, expected: &[&str]) {
    let actual: Vec<String> = previous(graph, snippet, phase)
        .into_iter()
        .map(|(_, text)| text)
        .collect();
    assert_eq!(actual, expected, "previous({snippet}, {phase})");
}

/// Predecessor phases and texts
pub fn assert_previous_points(
    graph: &DataFlowGraph<'_>,
    snippet: &str,
    phase: Phase,
    expected: &[(Phase, &str)],
) {
    let actual = previous(graph, snippet, phase);
    let expected: Vec<(Phase, String)> = expected
        .iter()
        .map(|(phase, text)| (*phase, text.to_string()))
        .collect();
    assert_eq!(actual, expected, "previous({snippet}, {phase})");
}

/// `(printed text, edge kind)` of each incoming edge
pub fn incoming(graph: &DataFlowGraph<'_>, snippet: &str, phase: Phase) -> Vec<(String, EdgeKind)> {
    let tree = graph.tree();
    let point = ProgramPoint::new(find(tree, snippet), phase);
    graph
        .incoming_edges(point)
        .unwrap_or_else(|e| panic!("incoming({snippet}, {phase}) failed: {e}"))
        .iter()
        .map(|edge| (print(tree, &edge.from), edge.kind))
        .collect()
}

pub fn assert_incoming(
    graph: &DataFlowGraph<'_>,
    snippet: &str,
    phase: Phase,
    expected: &[(&str, EdgeKind)],
) {
    let expected: Vec<(String, EdgeKind)> = expected
        .iter()
        .map(|(text, kind)| (text.to_string(), *kind))
        .collect();
    assert_eq!(incoming(graph, snippet, phase), expected, "incoming({snippet}, {phase})");
}
