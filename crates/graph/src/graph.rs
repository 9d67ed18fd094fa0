use crate::types::{Accessibility, Symbol, SymbolKind};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Display category of a node, picked by [`DisplayTag::for_symbol`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTag {
    Field,
    Property,
    Method,
    Mutable,
    Public,
}

impl DisplayTag {
    /// Public accessibility wins over a setter, a setter wins over the kind
    #[must_use]
    pub fn for_symbol(symbol: &Symbol) -> Self {
        if symbol.accessibility == Accessibility::Public {
            return Self::Public;
        }
        if symbol.is_property() && symbol.has_setter {
            return Self::Mutable;
        }
        match symbol.kind {
            SymbolKind::Field => Self::Field,
            SymbolKind::Property => Self::Property,
            SymbolKind::Method => Self::Method,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Property => "property",
            Self::Method => "method",
            Self::Mutable => "mutable",
            Self::Public => "public",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberNode {
    /// Node identity within the graph
    pub key: String,
    /// Short display name
    pub label: String,
    /// Last symbol mapped onto this node
    pub symbol: Option<Symbol>,
    pub tag: DisplayTag,
    /// Expansion stopped here during trimming
    pub stopped: bool,
}

impl MemberNode {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            symbol: None,
            tag: DisplayTag::Method,
            stopped: false,
        }
    }
}

/// Directed member dependency graph: `referencing -> referenced`.
///
/// `Clone` is a deep copy, so trimming a clone never touches the original.
/// Edges form a set; adding an existing edge is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MemberGraph {
    graph: StableDiGraph<MemberNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl MemberGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing node for `key`, or a new one labelled `label`
    pub fn ensure_node(&mut self, key: &str, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(MemberNode::new(key, label));
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Returns `false` when the edge already existed
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    #[must_use]
    pub fn find_node(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    /// Nodes matching `selector`: the node keyed by it, otherwise every node
    /// labelled with it
    #[must_use]
    pub fn select_nodes(&self, selector: &str) -> Vec<NodeIndex> {
        if let Some(idx) = self.find_node(selector) {
            return vec![idx];
        }
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].label == selector)
            .collect()
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&MemberNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut MemberNode> {
        self.graph.node_weight_mut(idx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &MemberNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Targets of the outgoing edges of `idx`
    #[must_use]
    pub fn out_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect()
    }

    /// All edges as `(source, target)` index pairs
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }

    /// All edges as sorted `(source key, target key)` pairs
    #[must_use]
    pub fn edge_keys(&self) -> BTreeSet<(String, String)> {
        self.edges()
            .map(|(from, to)| (self.graph[from].key.clone(), self.graph[to].key.clone()))
            .collect()
    }

    /// All node keys, sorted
    #[must_use]
    pub fn node_keys(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.find_node(from), self.find_node(to)) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Remove a node and its incident edges; removing an absent node is a no-op
    pub fn remove_node(&mut self, key: &str) -> Option<MemberNode> {
        let idx = self.index.remove(key)?;
        self.graph.remove_node(idx)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of nodes and edges
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        (self.node_count(), self.edge_count())
    }
}
