//! Graph visualization utilities.
//!
//! Exports a compiled graph's topology as Graphviz DOT or as plain text. Conditional edges
//! are drawn dashed and labelled with the route label that selects them.

use std::fmt::Debug;

use super::state_graph::END;
use super::{CompiledStateGraph, NextEntry};

/// Synthetic start node, only used in rendered output.
const START: &str = "__START__";

/// Generate Graphviz DOT format representation of the graph.
///
/// Returns a string in DOT format that can be rendered using Graphviz tools.
pub fn generate_dot<S>(graph: &CompiledStateGraph<S>) -> String
where
    S: Clone + Send + Sync + Debug + 'static,
{
    let mut dot = String::from("digraph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box];\n\n");

    dot.push_str(&format!(
        "  \"{}\" [label=\"START\", style=bold, fillcolor=lightgreen];\n",
        START
    ));
    dot.push_str(&format!(
        "  \"{}\" [label=\"END\", style=bold, fillcolor=lightcoral];\n",
        END
    ));
    for node in graph.node_names() {
        match graph.step_name(node) {
            Some(step) if step != node => dot.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\"];\n",
                escape(node),
                escape(node),
                escape(step)
            )),
            _ => dot.push_str(&format!("  \"{}\";\n", escape(node))),
        }
    }
    dot.push('\n');

    dot.push_str(&format!(
        "  \"{}\" -> \"{}\";\n",
        START,
        escape(graph.entry_point())
    ));
    for node in graph.node_names() {
        match graph.next_entry(node) {
            Some(NextEntry::Unconditional(to)) => {
                dot.push_str(&format!("  \"{}\" -> \"{}\";\n", escape(node), escape(to)));
            }
            Some(NextEntry::Conditional(edges)) => {
                for (label, to) in edges.conditions() {
                    dot.push_str(&format!(
                        "  \"{}\" -> \"{}\" [label=\"{}\", style=dashed];\n",
                        escape(node),
                        escape(to),
                        escape(label)
                    ));
                }
            }
            None => {}
        }
    }

    dot.push_str("}\n");
    dot
}

/// Escapes `"` and `\` for a DOT quoted string.
fn escape(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Generate a simple text representation of the graph structure.
pub fn generate_text<S>(graph: &CompiledStateGraph<S>) -> String
where
    S: Clone + Send + Sync + Debug + 'static,
{
    let mut text = String::from("Graph Structure:\n");
    text.push_str(&format!("Nodes: {}\n", graph.node_names().len()));
    text.push_str(&format!("Entry: {}\n", graph.entry_point()));

    text.push_str("\nRouting:\n");
    for node in graph.node_names() {
        match graph.next_entry(node) {
            Some(NextEntry::Unconditional(to)) => {
                text.push_str(&format!("  {} -> {}\n", node, to));
            }
            Some(NextEntry::Conditional(edges)) => {
                text.push_str(&format!("  {} ? {}\n", node, edges.router_name()));
                for (label, to) in edges.conditions() {
                    text.push_str(&format!("    [{}] -> {}\n", label, to));
                }
            }
            None => text.push_str(&format!("  {} (terminal)\n", node)),
        }
    }

    text
}
