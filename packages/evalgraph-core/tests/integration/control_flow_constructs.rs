//! Branches, loops, switches and lambdas

#[path = "../common/mod.rs"]
mod common;
use common::*;

use evalgraph_core::EdgeKind::{
    FalseBranch, Fallthrough, Jump, LoopBack, Sequential, ShortCircuit, SwitchCase, TrueBranch,
};
use evalgraph_core::Phase::{Entry, Exit};
use evalgraph_core::{DataFlowGraph, FlowGraphConfig, Preset};

// ═══════════════════════════════════════════════════════════════════════════
// Branches
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_if_without_else() {
    let tree = parse_fragment("if (c) { x(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "c", Entry, &[("a()", Sequential)]);
    assert_incoming(&graph, "x()", Entry, &[("c", TrueBranch)]);
    assert_incoming(&graph, "b()", Entry, &[("x()", Sequential), ("c", FalseBranch)]);
}

#[test]
fn test_if_else_joins_both_branches() {
    let tree = parse_fragment("if (c) { x(); } else { y(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "y()", Entry, &[("c", FalseBranch)]);
    assert_previous_points(&graph, "b()", Entry, &[(Exit, "x()"), (Exit, "y()")]);
}

#[test]
fn test_ternary() {
    let tree = parse_fragment("int t = c ? p : q;");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "c", Entry, &["a()"]);
    assert_incoming(&graph, "p", Entry, &[("c", TrueBranch)]);
    assert_incoming(&graph, "q", Entry, &[("c", FalseBranch)]);
    assert_previous(&graph, "t = c ? p : q", Entry, &["p", "q"]);
}

#[test]
fn test_short_circuit_edges_follow_config() {
    let tree = parse_fragment("boolean r = p && q;");

    let graph = DataFlowGraph::new(&tree).unwrap();
    assert_incoming(&graph, "p && q", Entry, &[("q", Sequential), ("p", ShortCircuit)]);

    let minimal = FlowGraphConfig::preset(Preset::Minimal);
    let graph = DataFlowGraph::with_config(&tree, minimal).unwrap();
    assert_incoming(&graph, "p && q", Entry, &[("q", Sequential)]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Loops
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_while_loop() {
    let tree = parse_fragment("while (c) { x(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "c", Entry, &[("a()", Sequential), ("x()", LoopBack)]);
    assert_incoming(&graph, "x()", Entry, &[("c", TrueBranch)]);
    assert_incoming(&graph, "b()", Entry, &[("c", FalseBranch)]);
}

#[test]
fn test_do_while_loop() {
    let tree = parse_fragment("do { x(); } while (c);");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "x()", Entry, &[("a()", Sequential), ("c", LoopBack)]);
    assert_incoming(&graph, "c", Entry, &[("x()", Sequential)]);
    assert_incoming(&graph, "b()", Entry, &[("c", FalseBranch)]);
}

#[test]
fn test_for_loop() {
    let tree = parse_fragment("for (int k = 0; k < n; k++) { x(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "0", Entry, &["a()"]);
    assert_incoming(&graph, "k", Entry, &[("k = 0", Sequential), ("k++", LoopBack)]);
    assert_incoming(&graph, "x()", Entry, &[("k < n", TrueBranch)]);
    assert_incoming(&graph, "b()", Entry, &[("k < n", FalseBranch)]);

    // `k` of the update runs after the body
    let update_k = tree.find_all("k")[1];
    let preds = graph.previous_in(update_k, Entry).unwrap();
    assert_eq!(preds.len(), 1);
    assert_eq!(tree.print(preds[0].cursor).unwrap(), "x()");
}

#[test]
fn test_for_loop_without_parts_terminates() {
    let tree = parse_fragment("for (;;) { x(); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "x()", Entry, &[("a()", Sequential), ("x()", LoopBack)]);
    // nothing leaves an infinite loop without `break`
    assert!(incoming(&graph, "b()", Entry).is_empty());
}

#[test]
fn test_empty_infinite_loop_resolves() {
    let tree = parse_fragment("for (;;) {}");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert!(incoming(&graph, "b()", Entry).is_empty());
    assert_previous(&graph, "{}", Entry, &["a()"]);
}

#[test]
fn test_for_each_loop() {
    let tree = parse_fragment("for (String s : list) { x(s); }");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "list", Entry, &["a()"]);
    assert_incoming(&graph, "s", Entry, &[("list", Sequential), ("x(s)", LoopBack)]);
    assert_incoming(
        &graph,
        "b()",
        Entry,
        &[("list", FalseBranch), ("x(s)", FalseBranch)],
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Switch
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_switch_fallthrough_and_break() {
    let tree = parse_fragment(
        "switch (k) {
            case 1:
                x();
            case 2:
                y();
                break;
            default:
                z();
        }",
    );
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "x()", Entry, &[("k", SwitchCase)]);
    assert_incoming(&graph, "y()", Entry, &[("k", SwitchCase), ("x()", Fallthrough)]);
    // `break;` never falls into `default`
    assert_incoming(&graph, "z()", Entry, &[("k", SwitchCase)]);
    assert_incoming(&graph, "b()", Entry, &[("z()", Sequential), ("break;", Jump)]);
}

#[test]
fn test_switch_without_default_can_skip() {
    let tree = parse_fragment(
        "switch (k) {
            case 1:
                x();
        }",
    );
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "b()", Entry, &[("x()", Sequential), ("k", SwitchCase)]);
}

#[test]
fn test_arrow_switch_has_no_fallthrough() {
    let tree = parse_fragment(
        "switch (k) {
            case 1 -> x();
            default -> y();
        }",
    );
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_incoming(&graph, "y()", Entry, &[("k", SwitchCase)]);
    assert_previous(&graph, "b()", Entry, &["x()", "y()"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Lambdas
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_lambda_body_is_opaque() {
    let tree = parse_fragment("Runnable r = () -> x();");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous(&graph, "() -> x()", Entry, &["a()"]);
    assert_previous_points(&graph, "r = () -> x()", Entry, &[(Exit, "() -> x()")]);
    // inside, the body starts at the lambda
    assert_previous_points(&graph, "x()", Entry, &[(Entry, "() -> x()")]);
    assert_previous(&graph, "b()", Entry, &["r = () -> x()"]);
}

#[test]
fn test_lambda_parameters_precede_body() {
    let tree = parse_fragment("Function<String, Integer> f = (String s) -> { return s.length(); };");
    let graph = DataFlowGraph::new(&tree).unwrap();

    assert_previous_points(
        &graph,
        "String s",
        Entry,
        &[(Entry, "(String s) -> { return s.length(); }")],
    );
    assert_previous(&graph, "s", Entry, &["String s"]);
}
