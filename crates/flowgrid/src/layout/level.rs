//! Hierarchical level assignment.
//!
//! Levels are assigned by a breadth-first traversal that starts from the
//! roots and only enters a node once all of its distinct predecessors have
//! been visited. Each node's level is one more than the highest level among
//! its predecessors, so for an acyclic flow every edge points strictly
//! downward and roots sit at level 0.
//!
//! # Cycles
//!
//! Cyclic flows are laid out on a best-effort basis. When the traversal
//! stalls, the lexicographically smallest unvisited node that has at least
//! one visited predecessor is entered early, using whatever predecessor
//! levels are known at that point. Nodes inside a cycle may therefore share a
//! level with, or sit above, one of their predecessors. Nodes that are never
//! reached, such as a cycle with no entry from a root, are placed together on
//! one extra level below everything else.
//!
//! All tie-breaks use identifier order, so the result does not depend on the
//! order of records in the source.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use log::{debug, trace};
use petgraph::graph::NodeIndex;

use flowgrid_core::{flow::Flow, identifier::NodeId};

use crate::structure::FlowGraph;

/// Level of every node, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    levels: BTreeMap<NodeId, usize>,
}

impl LevelMap {
    /// Returns the level of the node with the given identifier.
    pub fn get(&self, id: &str) -> Option<usize> {
        self.levels.get(id).copied()
    }

    /// Returns `(id, level)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, usize)> {
        self.levels.iter().map(|(id, level)| (id, *level))
    }

    /// Returns the highest assigned level.
    pub fn max_level(&self) -> Option<usize> {
        self.levels.values().copied().max()
    }

    /// Returns the number of nodes with a level.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no node has a level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn insert(&mut self, id: NodeId, level: usize) {
        self.levels.insert(id, level);
    }
}

impl FromIterator<(NodeId, usize)> for LevelMap {
    fn from_iter<T: IntoIterator<Item = (NodeId, usize)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// Assigns a level to every node of `flow`.
///
/// # Examples
///
/// ```
/// # use flowgrid::layout::assign_levels;
/// # use flowgrid_core::flow::Flow;
/// let mut flow = Flow::default();
/// flow.add_edge("A", "B", None);
/// flow.add_edge("B", "C", None);
/// flow.add_edge("A", "C", None);
///
/// let levels = assign_levels(&flow);
/// assert_eq!(levels.get("A"), Some(0));
/// assert_eq!(levels.get("B"), Some(1));
/// assert_eq!(levels.get("C"), Some(2));
/// ```
pub fn assign_levels(flow: &Flow) -> LevelMap {
    let graph = FlowGraph::from_flow(flow);
    LevelAssigner::new(&graph).run()
}

struct LevelAssigner<'g, 'a> {
    graph: &'g FlowGraph<'a>,
    levels: HashMap<NodeIndex, usize>,
    scheduled: HashSet<NodeIndex>,
    queue: VecDeque<NodeIndex>,
}

impl<'g, 'a> LevelAssigner<'g, 'a> {
    fn new(graph: &'g FlowGraph<'a>) -> Self {
        Self {
            graph,
            levels: HashMap::with_capacity(graph.node_count()),
            scheduled: HashSet::with_capacity(graph.node_count()),
            queue: VecDeque::new(),
        }
    }

    fn run(mut self) -> LevelMap {
        for root in self.graph.roots() {
            self.schedule(root);
        }

        loop {
            while let Some(idx) = self.queue.pop_front() {
                self.visit(idx);
            }

            match self.stalled_candidate() {
                Some(idx) => {
                    debug!(node = self.graph.id(idx).as_str(); "Entering cycle early");
                    self.schedule(idx);
                }
                None => break,
            }
        }

        self.finish()
    }

    fn schedule(&mut self, idx: NodeIndex) {
        if self.scheduled.insert(idx) {
            self.queue.push_back(idx);
        }
    }

    fn visit(&mut self, idx: NodeIndex) {
        let level = self
            .graph
            .predecessors(idx)
            .iter()
            .filter_map(|pred| self.levels.get(pred))
            .max()
            .map_or(0, |max| max + 1);
        self.levels.insert(idx, level);
        trace!(node = self.graph.id(idx).as_str(), level; "Level assigned");

        for succ in self.graph.successors(idx) {
            if self.scheduled.contains(&succ) {
                continue;
            }
            let ready = self
                .graph
                .predecessors(succ)
                .iter()
                .all(|pred| self.levels.contains_key(pred));
            if ready {
                self.schedule(succ);
            }
        }
    }

    /// Smallest unvisited node with at least one visited predecessor.
    fn stalled_candidate(&self) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|idx| !self.scheduled.contains(idx))
            .filter(|&idx| {
                self.graph
                    .predecessors(idx)
                    .iter()
                    .any(|pred| self.levels.contains_key(pred))
            })
            .min_by(|a, b| self.graph.id(*a).cmp(self.graph.id(*b)))
    }

    fn finish(self) -> LevelMap {
        let mut map = LevelMap::default();
        let fallback = self.levels.values().copied().max().map_or(0, |max| max + 1);
        let mut unreached = 0usize;

        for idx in self.graph.node_indices() {
            let id = self.graph.id(idx).clone();
            match self.levels.get(&idx) {
                Some(&level) => map.insert(id, level),
                None => {
                    unreached += 1;
                    map.insert(id, fallback);
                }
            }
        }

        if unreached > 0 {
            debug!(unreached, level = fallback; "Unreached nodes placed on fallback level");
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn flow_from(edges: &[(&str, &str)]) -> Flow {
        let mut flow = Flow::default();
        for (source, target) in edges {
            flow.add_edge(*source, *target, None);
        }
        flow
    }

    #[test]
    fn test_chain() {
        let levels = assign_levels(&flow_from(&[("A", "B")]));

        assert_eq!(levels.get("A"), Some(0));
        assert_eq!(levels.get("B"), Some(1));
    }

    #[test]
    fn test_parents_at_different_levels() {
        // C is reached directly from A and through B.
        let levels = assign_levels(&flow_from(&[("A", "C"), ("A", "B"), ("B", "C")]));

        assert_eq!(levels.get("A"), Some(0));
        assert_eq!(levels.get("B"), Some(1));
        assert_eq!(levels.get("C"), Some(2));
    }

    #[test]
    fn test_isolated_node_is_a_root() {
        let mut flow = flow_from(&[("A", "B")]);
        flow.define_node("Z", "Alone");

        let levels = assign_levels(&flow);
        assert_eq!(levels.get("Z"), Some(0));
        assert_eq!(levels.len(), 3);
    }

    #[test]
    fn test_empty_flow() {
        let levels = assign_levels(&Flow::default());

        assert!(levels.is_empty());
        assert_eq!(levels.max_level(), None);
    }

    #[test]
    fn test_cycle_with_entry_is_entered() {
        let levels = assign_levels(&flow_from(&[("A", "B"), ("B", "C"), ("C", "B")]));

        assert_eq!(levels.get("A"), Some(0));
        assert_eq!(levels.get("B"), Some(1));
        assert_eq!(levels.get("C"), Some(2));
    }

    #[test]
    fn test_self_loop() {
        let levels = assign_levels(&flow_from(&[("A", "B"), ("B", "B")]));

        assert_eq!(levels.get("B"), Some(1));
    }

    #[test]
    fn test_unreachable_cycle_uses_fallback_level() {
        let levels = assign_levels(&flow_from(&[("A", "B"), ("X", "Y"), ("Y", "X")]));

        assert_eq!(levels.get("B"), Some(1));
        assert_eq!(levels.get("X"), Some(2));
        assert_eq!(levels.get("Y"), Some(2));
    }

    #[test]
    fn test_only_cycle_uses_level_zero() {
        let levels = assign_levels(&flow_from(&[("X", "Y"), ("Y", "X")]));

        assert_eq!(levels.get("X"), Some(0));
        assert_eq!(levels.get("Y"), Some(0));
    }

    #[test]
    fn test_duplicate_edges_do_not_change_levels() {
        let single = assign_levels(&flow_from(&[("A", "B"), ("B", "C")]));
        let doubled = assign_levels(&flow_from(&[("A", "B"), ("A", "B"), ("B", "C")]));

        assert_eq!(single, doubled);
    }

    fn dag_edges() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..12, 0usize..12), 0..30).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect()
        })
    }

    fn dag_flow(edges: &[(usize, usize)]) -> Flow {
        let mut flow = Flow::default();
        for (source, target) in edges {
            let source = NodeId::new(format!("N{source:02}"));
            let target = NodeId::new(format!("N{target:02}"));
            flow.add_edge(source, target, None);
        }
        flow
    }

    proptest! {
        #[test]
        fn prop_acyclic_edges_point_downward(edges in dag_edges()) {
            let flow = dag_flow(&edges);
            let levels = assign_levels(&flow);

            prop_assert_eq!(levels.len(), flow.node_count());
            for edge in flow.edges() {
                let source = levels.get(edge.source().as_str()).unwrap();
                let target = levels.get(edge.target().as_str()).unwrap();
                prop_assert!(target > source);
            }
            for node in flow.nodes() {
                let is_root = flow.edges().iter().all(|edge| edge.target() != node.id());
                if is_root {
                    prop_assert_eq!(levels.get(node.id().as_str()), Some(0));
                }
            }
        }

        #[test]
        fn prop_levels_ignore_edge_order(edges in dag_edges()) {
            let forward = assign_levels(&dag_flow(&edges));
            let reversed: Vec<_> = edges.iter().rev().copied().collect();
            let backward = assign_levels(&dag_flow(&reversed));

            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_cyclic_input_is_deterministic(
            pairs in prop::collection::vec((0usize..8, 0usize..8), 0..20)
        ) {
            let first = assign_levels(&dag_flow(&pairs));
            let second = assign_levels(&dag_flow(&pairs));

            prop_assert_eq!(first.len(), dag_flow(&pairs).node_count());
            prop_assert_eq!(first, second);
        }
    }
}
