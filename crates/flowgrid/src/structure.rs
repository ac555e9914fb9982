//! Directed graph view of a parsed flow.
//!
//! [`FlowGraph`] indexes a [`Flow`] into a petgraph [`DiGraph`] so the layout
//! stages can walk predecessors and successors without scanning the edge
//! list. Node weights borrow the flow's identifiers; edge weights are the
//! branch labels.

use std::collections::{BTreeSet, HashMap};

use log::trace;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use flowgrid_core::{flow::Flow, identifier::NodeId};

/// Graph of node ids connected by labeled edges.
///
/// Every node of the flow is present, including nodes that are only
/// referenced as edge targets. Parallel edges and self-loops are kept.
#[derive(Debug)]
pub struct FlowGraph<'a> {
    graph: DiGraph<&'a NodeId, Option<&'a str>>,
    indices: HashMap<&'a NodeId, NodeIndex>,
}

impl<'a> FlowGraph<'a> {
    /// Builds the graph for `flow`.
    pub fn from_flow(flow: &'a Flow) -> Self {
        let mut graph = DiGraph::with_capacity(flow.node_count(), flow.edge_count());
        let mut indices = HashMap::with_capacity(flow.node_count());

        for id in flow.node_ids() {
            indices.insert(id, graph.add_node(id));
        }

        for edge in flow.edges() {
            // Flow::add_edge registers both endpoints, so lookups always succeed.
            if let (Some(&source), Some(&target)) =
                (indices.get(edge.source()), indices.get(edge.target()))
            {
                graph.add_edge(source, target, edge.label());
            }
        }

        trace!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Flow graph built"
        );

        Self { graph, indices }
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns all node indices in flow order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Returns the identifier stored at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    pub fn id(&self, idx: NodeIndex) -> &'a NodeId {
        self.graph[idx]
    }

    /// Returns the index of the node with the given identifier.
    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.indices.get(id).copied()
    }

    /// Returns the distinct direct predecessors of `idx`.
    pub fn predecessors(&self, idx: NodeIndex) -> BTreeSet<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect()
    }

    /// Returns the distinct direct successors of `idx`, ordered by identifier.
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut successors: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        successors.sort_by(|a, b| self.graph[*a].cmp(self.graph[*b]));
        successors
    }

    /// Returns the nodes without incoming edges, ordered by identifier.
    pub fn roots(&self) -> Vec<NodeIndex> {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        roots.sort_by(|a, b| self.graph[*a].cmp(self.graph[*b]));
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(graph: &FlowGraph<'_>, indices: &[NodeIndex]) -> Vec<String> {
        indices
            .iter()
            .map(|&idx| graph.id(idx).to_string())
            .collect()
    }

    #[test]
    fn test_roots_are_sorted() {
        let mut flow = Flow::default();
        flow.add_edge("Z", "M", None);
        flow.add_edge("B", "M", None);
        flow.define_node("A", "Alone");

        let graph = FlowGraph::from_flow(&flow);
        assert_eq!(ids(&graph, &graph.roots()), vec!["A", "B", "Z"]);
    }

    #[test]
    fn test_parallel_edges_collapse_in_neighbor_sets() {
        let mut flow = Flow::default();
        flow.add_edge("A", "C", None);
        flow.add_edge("A", "C", Some("again".to_string()));
        flow.add_edge("A", "B", None);

        let graph = FlowGraph::from_flow(&flow);
        let a = graph.index_of(&NodeId::new("A")).unwrap();
        let c = graph.index_of(&NodeId::new("C")).unwrap();

        assert_eq!(ids(&graph, &graph.successors(a)), vec!["B", "C"]);
        assert_eq!(graph.predecessors(c).len(), 1);
    }

    #[test]
    fn test_self_loop_is_not_a_root() {
        let mut flow = Flow::default();
        flow.add_edge("A", "A", None);

        let graph = FlowGraph::from_flow(&flow);
        assert!(graph.roots().is_empty());
    }
}
