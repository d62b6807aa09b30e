//! Straight-line evaluation order over real Java source
//!
//! Declarations, binary operators, array access and calls between `a();`
//! and `b();`.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use evalgraph_core::Phase::{Entry, Exit};
use evalgraph_core::{DataFlowGraph, FlowGraphError, Phase, ProgramPoint};

// ═══════════════════════════════════════════════════════════════════════════
// Declarators
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_multiple_declarators() {
    let tree = parse(
        r#"
class C {
    void a() {}
    void b() {}
    void m() {
        a();
        int i = u + v, j = w;
        b();
    }
}
"#,
    );
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous_points(&graph, "b()", Entry, &[(Exit, "j = w")]);
    assert_previous_points(&graph, "j = w", Exit, &[(Entry, "j = w")]);
    assert_previous_points(&graph, "j = w", Entry, &[(Exit, "w")]);
    assert_previous_points(&graph, "w", Exit, &[(Entry, "w")]);
    assert_previous_points(&graph, "w", Entry, &[(Exit, "i = u + v")]);
    assert_previous_points(&graph, "i = u + v", Exit, &[(Entry, "i = u + v")]);
    assert_previous_points(&graph, "i = u + v", Entry, &[(Exit, "u + v")]);
    assert_previous_points(&graph, "u + v", Exit, &[(Entry, "u + v")]);
    assert_previous_points(&graph, "u + v", Entry, &[(Exit, "v")]);
    assert_previous_points(&graph, "v", Exit, &[(Entry, "v")]);
    assert_previous_points(&graph, "v", Entry, &[(Exit, "u")]);
    assert_previous_points(&graph, "u", Exit, &[(Entry, "u")]);
    assert_previous_points(&graph, "u", Entry, &[(Exit, "a()")]);
}

#[test]
fn scenario_array_access_assignment() {
    let tree = parse_fragment("s = str[0];");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous_points(&graph, "s = str[0]", Entry, &[(Exit, "str[0]")]);
    assert_previous_points(&graph, "str[0]", Entry, &[(Exit, "0")]);
    assert_previous_points(&graph, "0", Entry, &[(Exit, "str")]);
    assert_previous_points(&graph, "str", Entry, &[(Exit, "a()")]);
    assert_previous_points(&graph, "b()", Entry, &[(Exit, "s = str[0]")]);
}

#[test]
fn scenario_call_arguments() {
    let tree = parse_fragment("abc = myMethod(a1, b1);");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous_points(
        &graph,
        "abc = myMethod(a1, b1)",
        Entry,
        &[(Exit, "myMethod(a1, b1)")],
    );
    assert_previous_points(&graph, "myMethod(a1, b1)", Entry, &[(Exit, "b1")]);
    assert_previous_points(&graph, "b1", Entry, &[(Exit, "a1")]);
    assert_previous_points(&graph, "a1", Entry, &[(Exit, "a()")]);
}

#[test]
fn scenario_empty_block() {
    let tree = parse_fragment("{}");
    let graph = DataFlowGraph::new(&tree).unwrap();

    // ENTRY and EXIT of `{}` coincide with whatever precedes the block
    assert_previous_points(&graph, "{}", Entry, &[(Exit, "a()")]);
    assert_previous_points(&graph, "{}", Exit, &[(Exit, "a()")]);
    assert_previous_points(&graph, "b()", Entry, &[(Exit, "a()")]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_select_before_arguments() {
    let tree = parse_fragment("u.concat(v);");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "v", Entry, &["u"]);
    assert_previous(&graph, "u.concat(v)", Entry, &["v"]);
}

#[test]
fn test_indexed_write_evaluates_value_first() {
    let tree = parse_fragment("arr[k] = f(u);");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "u", Entry, &["a()"]);
    assert_previous(&graph, "arr", Entry, &["f(u)"]);
    assert_previous(&graph, "k", Entry, &["arr"]);
    assert_previous(&graph, "arr[k] = f(u)", Entry, &["k"]);
}

#[test]
fn test_plain_write_target_is_not_a_point() {
    let tree = parse_fragment("s = u;");
    let graph = DataFlowGraph::new(&tree).unwrap();

    let target = find(&tree, "s");
    let err = graph.previous_in(target, Entry).unwrap_err();
    assert!(matches!(err, FlowGraphError::NotAProgramPoint(_)));
    assert!(err.is_caller_error());
    assert!(graph.next_from(target, Exit).is_err());
}

#[test]
fn test_new_object_and_array() {
    let tree = parse_fragment("Object o = new Pair(u, new int[] { 1, 2 });");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "1", Entry, &["u"]);
    assert_previous(&graph, "2", Entry, &["1"]);
    assert_previous(&graph, "{ 1, 2 }", Entry, &["2"]);
    assert_previous(&graph, "new int[] { 1, 2 }", Entry, &["{ 1, 2 }"]);
    assert_previous(&graph, "new Pair(u, new int[] { 1, 2 })", Entry, &["new int[] { 1, 2 }"]);
}

#[test]
fn test_unary_and_cast() {
    let tree = parse_fragment("int n = -u.length(); Object o = (Object) v.trim();");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "u.length()", Entry, &["u"]);
    assert_previous(&graph, "-u.length()", Entry, &["u.length()"]);
    assert_previous(&graph, "v", Entry, &["n = -u.length()"]);
    assert_previous(&graph, "(Object) v.trim()", Entry, &["v.trim()"]);
}

#[test]
fn test_parentheses_are_transparent() {
    let tree = parse_fragment("int n = (u + v) * 2;");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "2", Entry, &["u + v"]);
    assert_previous(&graph, "(u + v) * 2", Entry, &["2"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Scopes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_method_parameters_run_first() {
    let tree = parse_fragment("");
    let graph = DataFlowGraph::new(&tree).unwrap();
    let m = method(&tree, "m");

    assert_previous(&graph, "String u", Entry, &[tree.print(m).unwrap().as_str()]);
    assert_previous(&graph, "String v", Entry, &["String u"]);
    assert_previous(&graph, "a()", Entry, &["String v"]);

    let exit = graph.previous_in(m, Exit).unwrap();
    let printed: Vec<String> = exit.iter().map(|p| tree.print(p.cursor).unwrap()).collect();
    assert_eq!(printed, vec!["b()"]);
}

#[test]
fn test_compilation_unit_is_the_only_root() {
    let tree = parse_fragment("int i = u.length();");
    let graph = DataFlowGraph::new(&tree).unwrap();

    let roots: Vec<ProgramPoint> = graph
        .program_points()
        .into_iter()
        .filter(|&p| graph.predecessors(p).unwrap().is_empty())
        .collect();
    assert_eq!(roots, vec![ProgramPoint::entry(tree.root())]);
}

#[test]
fn test_query_is_deterministic() {
    let tree = parse_fragment("if (u.isEmpty()) { v.trim(); } else { u.trim(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    let b = find(&tree, "b()");
    let first = graph.previous_in(b, Phase::Entry).unwrap();
    graph.clear_cache();
    let second = graph.previous_in(b, Phase::Entry).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
