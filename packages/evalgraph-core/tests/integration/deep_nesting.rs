//! Deeply nested but valid sources
//!
//! Long `else if` chains and long concatenations nest one tree level per
//! branch or term. Lowering and queries must either answer or stop
//! at the configured depth limit, never overflow the stack.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use evalgraph_core::Phase::{Entry, Exit};
use evalgraph_core::{DataFlowGraph, FlowGraphConfig, FlowGraphError};

/// `if (c0) f0(); else if (c1) f1(); ... else g();`
fn else_if_chain(branches: usize) -> String {
    let arms: Vec<String> = (0..branches)
        .map(|i| format!("if (c{i}) f{i}();"))
        .collect();
    format!("{} else g(); h();", arms.join(" else "))
}

/// `String s = v0 + v1 + ... ;`
fn concatenation(terms: usize) -> String {
    let operands: Vec<String> = (0..terms).map(|i| format!("v{i}")).collect();
    format!("String s = {};", operands.join(" + "))
}

#[test]
fn test_long_else_if_chain_resolves() {
    let tree = parse_fragment(&else_if_chain(1_000));
    let graph = DataFlowGraph::new(&tree).unwrap();

    let preds = previous(&graph, "h()", Entry);
    assert_eq!(preds.len(), 1_001);
    assert_eq!(preds[0], (Exit, "f0()".to_string()));
    assert_eq!(preds[999], (Exit, "f999()".to_string()));
    assert_eq!(preds[1_000], (Exit, "g()".to_string()));
}

#[test]
fn test_long_else_if_chain_hits_depth_limit() {
    let tree = parse_fragment(&else_if_chain(1_000));
    let config = FlowGraphConfig::default().with_max_resolution_depth(256);
    let graph = DataFlowGraph::with_config(&tree, config).unwrap();

    let err = graph
        .previous_in(find(&tree, "h()"), Entry)
        .unwrap_err();
    assert!(
        matches!(err, FlowGraphError::ResolutionDepthExceeded { limit: 256 }),
        "{err}"
    );
}

#[test]
fn test_long_concatenation_resolves() {
    let tree = parse_fragment(&concatenation(1_000));
    let graph = DataFlowGraph::new(&tree).unwrap();

    // the leftmost operand runs first, right after the previous statement
    assert_previous(&graph, "v0", Entry, &["a()"]);
    // the last operand follows the sum of all the others
    let prefix: Vec<String> = (0..999).map(|i| format!("v{i}")).collect();
    assert_previous(&graph, "v999", Entry, &[prefix.join(" + ").as_str()]);
}

#[test]
fn test_successor_index_over_deep_source() {
    // builds the index on rayon workers when `parallel` is on
    let tree = parse_fragment(&concatenation(1_000));
    let graph = DataFlowGraph::new(&tree).unwrap();

    let next = graph.next_from(find(&tree, "a()"), Exit).unwrap();
    let texts: Vec<(_, String)> = next
        .iter()
        .map(|p| (p.phase, tree.print(p.cursor).unwrap()))
        .collect();
    assert!(texts.contains(&(Entry, "v0".to_string())), "{texts:?}");
}

#[test]
fn test_deep_source_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let tree = parse_fragment(&else_if_chain(1_000));
            let graph = DataFlowGraph::new(&tree).unwrap();
            previous(&graph, "h()", Entry).len()
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), 1_001);
}
