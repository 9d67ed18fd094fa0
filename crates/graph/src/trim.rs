use crate::error::{GraphError, Result};
use crate::graph::MemberGraph;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Seed nodes to start from and stop nodes not to expand past.
///
/// Entries are selectors: a node key, or a label shared by one or more nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub seeds: BTreeSet<String>,
    #[serde(default)]
    pub stops: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            stops: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops.extend(stops.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimStats {
    pub kept: usize,
    pub removed: usize,
    pub stopped: usize,
    pub rounds: usize,
}

/// Trim a fresh copy of `full`; `full` itself is never modified
pub fn trim(full: &MemberGraph, selection: &Selection) -> Result<MemberGraph> {
    let mut copy = full.clone();
    trim_in_place(&mut copy, selection)?;
    Ok(copy)
}

/// Fails with every seed and stop selector that matches no node
pub fn check_selection(graph: &MemberGraph, selection: &Selection) -> Result<()> {
    select(graph, selection).map(|_| ())
}

/// Reduce `graph` to the nodes forward-reachable from the seeds.
///
/// Expansion proceeds in rounds; a stop node is kept and flagged but its
/// outgoing edges are not followed. Every selector must match at least one
/// node, otherwise the graph is left untouched and all unmatched selectors
/// are reported.
pub fn trim_in_place(graph: &mut MemberGraph, selection: &Selection) -> Result<TrimStats> {
    let (seeds, stops) = select(graph, selection)?;

    let all: Vec<NodeIndex> = graph.node_indices().collect();
    for &idx in &all {
        if let Some(node) = graph.node_mut(idx) {
            node.stopped = false;
        }
    }

    let mut kept: HashSet<NodeIndex> = seeds.iter().copied().collect();
    let mut pending: Vec<NodeIndex> = kept.iter().copied().collect();
    let mut stats = TrimStats::default();

    while !pending.is_empty() {
        stats.rounds += 1;
        let mut next = Vec::new();

        for idx in pending {
            if stops.contains(&idx) {
                if let Some(node) = graph.node_mut(idx) {
                    node.stopped = true;
                }
                stats.stopped += 1;
                continue;
            }

            for target in graph.out_neighbors(idx) {
                if kept.insert(target) {
                    next.push(target);
                }
            }
        }

        pending = next;
    }

    let doomed: Vec<String> = all
        .iter()
        .filter(|idx| !kept.contains(*idx))
        .filter_map(|&idx| graph.node(idx).map(|node| node.key.clone()))
        .collect();
    for key in &doomed {
        graph.remove_node(key);
    }

    stats.kept = kept.len();
    stats.removed = doomed.len();

    log::debug!(
        "Trimmed graph: kept {}, removed {}, stopped {}, {} rounds",
        stats.kept,
        stats.removed,
        stats.stopped,
        stats.rounds
    );

    Ok(stats)
}

fn select(
    graph: &MemberGraph,
    selection: &Selection,
) -> Result<(Vec<NodeIndex>, HashSet<NodeIndex>)> {
    let mut unknown = Vec::new();
    let seeds = select_all(graph, &selection.seeds, &mut unknown);
    let stops = select_all(graph, &selection.stops, &mut unknown)
        .into_iter()
        .collect();
    if !unknown.is_empty() {
        return Err(GraphError::UnknownNodes { names: unknown });
    }
    Ok((seeds, stops))
}

fn select_all(
    graph: &MemberGraph,
    selectors: &BTreeSet<String>,
    unknown: &mut Vec<String>,
) -> Vec<NodeIndex> {
    let mut selected = Vec::new();
    for selector in selectors {
        let matches = graph.select_nodes(selector);
        if matches.is_empty() {
            unknown.push(selector.clone());
        }
        selected.extend(matches);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// a -> b -> c -> d, b -> e, d -> a
    fn chain() -> MemberGraph {
        let mut graph = MemberGraph::new();
        let a = graph.ensure_node("a", "a");
        let b = graph.ensure_node("b", "b");
        let c = graph.ensure_node("c", "c");
        let d = graph.ensure_node("d", "d");
        let e = graph.ensure_node("e", "e");
        graph.ensure_node("lonely", "lonely");
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.add_edge(c, d);
        graph.add_edge(b, e);
        graph.add_edge(d, a);
        graph
    }

    fn keys(graph: &MemberGraph) -> Vec<String> {
        graph.node_keys().into_iter().collect()
    }

    #[test]
    fn keeps_forward_closure_of_seeds() {
        let trimmed = trim(&chain(), &Selection::new(["c"])).unwrap();
        assert_eq!(keys(&trimmed), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(trimmed.edge_count(), 5);
    }

    #[test]
    fn stop_nodes_are_kept_but_not_expanded() {
        let trimmed = trim(&chain(), &Selection::new(["a"]).with_stops(["b"])).unwrap();
        assert_eq!(keys(&trimmed), vec!["a", "b"]);

        let b = trimmed.node(trimmed.find_node("b").unwrap()).unwrap();
        assert!(b.stopped);
        let a = trimmed.node(trimmed.find_node("a").unwrap()).unwrap();
        assert!(!a.stopped);
    }

    #[test]
    fn seed_in_stop_set_is_not_expanded() {
        let trimmed = trim(&chain(), &Selection::new(["a"]).with_stops(["a"])).unwrap();
        assert_eq!(keys(&trimmed), vec!["a"]);
    }

    #[test]
    fn unknown_selectors_are_all_reported() {
        let full = chain();
        let err = trim(&full, &Selection::new(["a", "zz"]).with_stops(["yy"])).unwrap_err();

        match err {
            GraphError::UnknownNodes { names } => assert_eq!(names, vec!["zz", "yy"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejected_selection_leaves_graph_untouched() {
        let mut graph = chain();
        let result = trim_in_place(&mut graph, &Selection::new(["missing"]));

        assert!(result.is_err());
        assert_eq!(graph.node_count(), 6);
    }

    #[test]
    fn original_graph_is_not_modified() {
        let full = chain();
        let before = full.edge_keys();

        let first = trim(&full, &Selection::new(["b"]).with_stops(["c"])).unwrap();
        let second = trim(&full, &Selection::new(["b"]).with_stops(["c"])).unwrap();

        assert_eq!(full.edge_keys(), before);
        assert_eq!(full.node_count(), 6);
        assert_eq!(first.edge_keys(), second.edge_keys());
        assert_eq!(first.node_keys(), second.node_keys());
    }

    #[test]
    fn stats_count_rounds_and_removals() {
        let mut graph = chain();
        let stats = trim_in_place(&mut graph, &Selection::new(["a"])).unwrap();

        assert_eq!(stats.kept, 5);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.stopped, 0);
        // {a} -> {b} -> {c, e} -> {d} -> {} (d -> a already kept)
        assert_eq!(stats.rounds, 4);
    }

    #[test]
    fn unknown_stops_fail_without_seeds() {
        let selection = Selection::default().with_stops(["b", "nope"]);
        let err = check_selection(&chain(), &selection).unwrap_err();
        match err {
            GraphError::UnknownNodes { names } => assert_eq!(names, vec!["nope"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(check_selection(&chain(), &Selection::default().with_stops(["b"])).is_ok());
    }
}
