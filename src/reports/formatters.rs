use crate::types::{TreeNode, TreeReport};
use anyhow::Result;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

/// Trait for tree report formatters
pub trait ReportFormatter {
    fn format(&self, report: &TreeReport) -> Result<String>;
}

/// JSON formatter
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &TreeReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Indented plain text formatter
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &TreeReport) -> Result<String> {
        let mut out = format!(
            "Family tree around {} (depth {}, {} persons)\n",
            report.root_id, report.depth, report.person_count
        );
        render_node(&report.tree, "", 0, &mut out);
        Ok(out)
    }
}

fn render_node(node: &TreeNode, role: &str, indent: usize, out: &mut String) {
    let lifespan = node.person.lifespan();
    out.push_str(&"  ".repeat(indent));
    out.push_str(role);
    out.push_str(&node.person.name);
    if !lifespan.is_empty() {
        out.push_str(&format!(" ({})", lifespan));
    }
    out.push('\n');

    for parent in &node.parents {
        render_node(parent, "parent: ", indent + 1, out);
    }
    for child in &node.children {
        render_node(child, "child: ", indent + 1, out);
    }
}

/// Graphviz DOT formatter, edges in parent -> child direction
pub struct DotFormatter;

impl ReportFormatter for DotFormatter {
    fn format(&self, report: &TreeReport) -> Result<String> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        add_node(&mut graph, &report.tree);
        Ok(format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel])))
    }
}

fn add_node(graph: &mut DiGraph<String, ()>, node: &TreeNode) -> NodeIndex {
    let idx = graph.add_node(node.person.name.clone());

    for parent in &node.parents {
        let parent_idx = add_node(graph, parent);
        graph.add_edge(parent_idx, idx, ());
    }
    for child in &node.children {
        let child_idx = add_node(graph, child);
        graph.add_edge(idx, child_idx, ());
    }

    idx
}
