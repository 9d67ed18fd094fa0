use crate::graph::{DisplayTag, MemberGraph};
use crate::types::{Symbol, SymbolRef};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// How symbols map onto graph nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKeying {
    /// One node per symbol identity (`A.Bump(int)`)
    #[default]
    Identity,
    /// One node per member name; same-named members share a node
    Name,
}

impl NodeKeying {
    #[must_use]
    pub fn key(&self, symbol: &Symbol) -> String {
        match self {
            Self::Identity => symbol.id.to_string(),
            Self::Name => symbol.name.clone(),
        }
    }
}

/// Turns deduplicated references into a [`MemberGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphAssembler {
    keying: NodeKeying,
}

impl GraphAssembler {
    #[must_use]
    pub const fn new(keying: NodeKeying) -> Self {
        Self { keying }
    }

    #[must_use]
    pub fn assemble(&self, refs: &[SymbolRef]) -> MemberGraph {
        let mut graph = MemberGraph::new();

        for reference in refs {
            let from = self.attach(&mut graph, &reference.referencing);
            let to = self.attach(&mut graph, &reference.original);
            graph.add_edge(from, to);
        }

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for idx in indices {
            if let Some(node) = graph.node_mut(idx) {
                if let Some(symbol) = &node.symbol {
                    node.tag = DisplayTag::for_symbol(symbol);
                }
            }
        }

        log::info!(
            "Assembled member graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    /// Node for `symbol`; the most recently attached symbol wins on collisions
    fn attach(&self, graph: &mut MemberGraph, symbol: &Symbol) -> NodeIndex {
        let key = self.keying.key(symbol);
        let idx = graph.ensure_node(&key, &symbol.name);
        if let Some(node) = graph.node_mut(idx) {
            node.symbol = Some(symbol.clone());
        }
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Accessibility, DocumentId, Location, Span, SymbolKind};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn loc() -> Location {
        Location::new(DocumentId::new("a.cs"), Span::new(0, 1))
    }

    fn overloads() -> Vec<SymbolRef> {
        let run_a = Symbol::new("A", "Run", SymbolKind::Method).with_id("A.Run()");
        let run_b = Symbol::new("B", "Run", SymbolKind::Method)
            .with_id("B.Run()")
            .with_accessibility(Accessibility::Public);
        let step = Symbol::new("A", "Step", SymbolKind::Method).with_id("A.Step()");
        vec![
            SymbolRef::new(run_a, step.clone(), loc()),
            SymbolRef::new(run_b, step, loc()),
        ]
    }

    #[test]
    fn identity_keying_keeps_same_named_members_apart() {
        let graph = GraphAssembler::new(NodeKeying::Identity).assemble(&overloads());

        assert_eq!(graph.node_count(), 3);
        let expected: BTreeSet<(String, String)> = [
            ("A.Run()".to_string(), "A.Step()".to_string()),
            ("B.Run()".to_string(), "A.Step()".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(graph.edge_keys(), expected);
    }

    #[test]
    fn name_keying_merges_and_last_symbol_decides_tag() {
        let graph = GraphAssembler::new(NodeKeying::Name).assemble(&overloads());

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let run = graph.find_node("Run").unwrap();
        let node = graph.node(run).unwrap();
        assert_eq!(node.symbol.as_ref().unwrap().container, "B");
        assert_eq!(node.tag, DisplayTag::Public);
    }

    #[test]
    fn tags_follow_symbol_metadata() {
        let field = Symbol::new("A", "_x", SymbolKind::Field);
        let prop = Symbol::new("A", "X", SymbolKind::Property).with_setter(true);
        let method = Symbol::new("A", "Peek", SymbolKind::Method);
        let refs = vec![
            SymbolRef::new(method.clone(), prop.clone(), loc()),
            SymbolRef::new(prop, field, loc()),
        ];

        let graph = GraphAssembler::default().assemble(&refs);
        let tag = |key: &str| graph.node(graph.find_node(key).unwrap()).unwrap().tag;

        assert_eq!(tag("A._x"), DisplayTag::Field);
        assert_eq!(tag("A.X"), DisplayTag::Mutable);
        assert_eq!(tag("A.Peek"), DisplayTag::Method);
    }
}
