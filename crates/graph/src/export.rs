use crate::config::Palette;
use crate::error::Result;
use crate::graph::{DisplayTag, MemberGraph};
use crate::types::SymbolKind;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SymbolKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub tag: DisplayTag,
    pub color: String,
    #[serde(default)]
    pub stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub from: String,
    pub to: String,
}

/// Layout-agnostic view of a graph for external renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
}

/// Snapshot with nodes and edges sorted by key
#[must_use]
pub fn snapshot(graph: &MemberGraph, palette: &Palette) -> GraphSnapshot {
    let mut nodes: Vec<SnapshotNode> = graph
        .nodes()
        .map(|(_, node)| SnapshotNode {
            key: node.key.clone(),
            label: node.label.clone(),
            kind: node.symbol.as_ref().map(|s| s.kind),
            container: node.symbol.as_ref().map(|s| s.container.clone()),
            tag: node.tag,
            color: palette.color(node.tag).to_string(),
            stopped: node.stopped,
        })
        .collect();
    nodes.sort_by(|a, b| a.key.cmp(&b.key));

    let edges = graph
        .edge_keys()
        .into_iter()
        .map(|(from, to)| SnapshotEdge { from, to })
        .collect();

    GraphSnapshot {
        version: SNAPSHOT_VERSION,
        nodes,
        edges,
    }
}

pub fn to_json(graph: &MemberGraph, palette: &Palette) -> Result<String> {
    Ok(serde_json::to_string_pretty(&snapshot(graph, palette))?)
}

/// Graphviz rendering; stopped nodes are drawn dashed
#[must_use]
pub fn render_dot(graph: &MemberGraph, palette: &Palette) -> String {
    let snap = snapshot(graph, palette);
    let mut out = String::new();

    out.push_str("digraph members {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box];\n");

    for node in &snap.nodes {
        let style = if node.stopped { "filled,dashed" } else { "filled" };
        let _ = writeln!(
            out,
            "  \"{}\" [label=\"{}\", style=\"{}\", fillcolor=\"{}\"];",
            escape(&node.key),
            escape(&node.label),
            style,
            escape(&node.color)
        );
    }

    for edge in &snap.edges {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\";",
            escape(&edge.from),
            escape(&edge.to)
        );
    }

    out.push_str("}\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> MemberGraph {
        let mut graph = MemberGraph::new();
        let bump = graph.ensure_node("A.Bump()", "Bump");
        let x = graph.ensure_node("A.X", "X");
        graph.add_edge(bump, x);
        if let Some(node) = graph.node_mut(x) {
            node.tag = DisplayTag::Public;
            node.stopped = true;
        }
        graph
    }

    #[test]
    fn dot_output_is_stable() {
        let dot = render_dot(&sample(), &Palette::default());
        let expected = concat!(
            "digraph members {\n",
            "  rankdir=LR;\n",
            "  node [shape=box];\n",
            "  \"A.Bump()\" [label=\"Bump\", style=\"filled\", fillcolor=\"white\"];\n",
            "  \"A.X\" [label=\"X\", style=\"filled,dashed\", fillcolor=\"gold\"];\n",
            "  \"A.Bump()\" -> \"A.X\";\n",
            "}\n",
        );
        assert_eq!(dot, expected);
    }

    #[test]
    fn json_snapshot_parses_back() {
        let json = to_json(&sample(), &Palette::default()).unwrap();
        let parsed: GraphSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot(&sample(), &Palette::default()));
        assert_eq!(parsed.edges.len(), 1);
        assert_eq!(parsed.nodes[1].key, "A.X");
        assert!(parsed.nodes[1].stopped);
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(escape("a\"b\\c"), "a\\\"b\\\\c");
    }
}
