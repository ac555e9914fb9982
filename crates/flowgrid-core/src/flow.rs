//! The flowchart model produced by the parser.
//!
//! A [`Flow`] holds an ordered set of [`Node`]s and the list of directed
//! [`Edge`]s between them. Node order is first-appearance order; edge order is
//! input order. Duplicate edges are kept.

use indexmap::IndexMap;

use crate::identifier::NodeId;

/// Default prefix that marks a node as a decision.
pub const DEFAULT_DECISION_PREFIX: &str = "D";

/// The visual kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    /// A regular step, drawn as a rounded box.
    #[default]
    Process,
    /// A branching point, drawn as a diamond.
    Decision,
}

impl NodeKind {
    /// Classifies a node by its identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowgrid_core::{flow::NodeKind, identifier::NodeId};
    ///
    /// assert_eq!(NodeKind::classify(&NodeId::new("D1"), "D"), NodeKind::Decision);
    /// assert_eq!(NodeKind::classify(&NodeId::new("A"), "D"), NodeKind::Process);
    /// ```
    pub fn classify(id: &NodeId, decision_prefix: &str) -> Self {
        if id.has_prefix(decision_prefix) {
            NodeKind::Decision
        } else {
            NodeKind::Process
        }
    }

    /// Returns `true` for decision nodes.
    pub fn is_decision(self) -> bool {
        matches!(self, NodeKind::Decision)
    }
}

/// A node of the flowchart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    description: Option<String>,
    kind: NodeKind,
}

impl Node {
    /// Returns the node identifier.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Returns the description, or `None` for nodes only referenced as edge targets.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the text shown inside the node box.
    ///
    /// Falls back to the identifier when the node has no description.
    pub fn display_label(&self) -> &str {
        self.description.as_deref().unwrap_or(self.id.as_str())
    }

    /// Returns `true` if this node was never defined by its own record.
    pub fn is_implicit(&self) -> bool {
        self.description.is_none()
    }
}

/// A directed edge with an optional branch label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    label: Option<String>,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(source: NodeId, target: NodeId, label: Option<String>) -> Self {
        Self {
            source,
            target,
            label,
        }
    }

    /// Returns the source node identifier.
    pub fn source(&self) -> &NodeId {
        &self.source
    }

    /// Returns the target node identifier.
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// Returns the branch label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A parsed flowchart.
///
/// # Examples
///
/// ```
/// use flowgrid_core::flow::Flow;
///
/// let mut flow = Flow::default();
/// flow.define_node("A", "Start");
/// flow.add_edge("A", "B", None);
///
/// assert_eq!(flow.node_count(), 2);
/// assert!(flow.node("B").unwrap().is_implicit());
/// ```
#[derive(Debug, Clone)]
pub struct Flow {
    decision_prefix: String,
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl Default for Flow {
    fn default() -> Self {
        Self::new(DEFAULT_DECISION_PREFIX)
    }
}

impl Flow {
    /// Creates an empty flow that classifies nodes with `decision_prefix`.
    pub fn new(decision_prefix: impl Into<String>) -> Self {
        Self {
            decision_prefix: decision_prefix.into(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    /// Defines a node with a description.
    ///
    /// A node that already exists keeps its position in the node order and
    /// takes the new description. Returns the replaced description, if any.
    pub fn define_node(
        &mut self,
        id: impl Into<NodeId>,
        description: impl Into<String>,
    ) -> Option<String> {
        let node = self.ensure_node(id.into());
        node.description.replace(description.into())
    }

    /// Appends an edge, creating description-less endpoints as needed.
    pub fn add_edge(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        label: Option<String>,
    ) {
        let source = source.into();
        let target = target.into();
        self.ensure_node(source.clone());
        self.ensure_node(target.clone());
        self.edges.push(Edge::new(source, target, label));
    }

    /// Returns the node with the given identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns all nodes in first-appearance order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns all node identifiers in first-appearance order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Returns all edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn ensure_node(&mut self, id: NodeId) -> &mut Node {
        let kind = NodeKind::classify(&id, &self.decision_prefix);
        self.nodes.entry(id.clone()).or_insert_with(|| Node {
            id,
            description: None,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_node_keeps_first_position() {
        let mut flow = Flow::default();
        flow.define_node("A", "first");
        flow.define_node("B", "other");
        let replaced = flow.define_node("A", "second");

        assert_eq!(replaced.as_deref(), Some("first"));
        let ids: Vec<_> = flow.node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(flow.node("A").unwrap().description(), Some("second"));
    }

    #[test]
    fn test_edge_targets_become_implicit_nodes() {
        let mut flow = Flow::default();
        flow.define_node("A", "Start");
        flow.add_edge("A", "B", Some("yes".to_string()));

        let target = flow.node("B").unwrap();
        assert!(target.is_implicit());
        assert_eq!(target.display_label(), "B");
        assert_eq!(flow.edges()[0].label(), Some("yes"));
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let mut flow = Flow::default();
        flow.add_edge("A", "B", None);
        flow.add_edge("A", "B", None);

        assert_eq!(flow.edge_count(), 2);
        assert_eq!(flow.node_count(), 2);
    }

    #[test]
    fn test_decision_classification_uses_prefix() {
        let mut flow = Flow::new("Q");
        flow.define_node("Q1", "Ask");
        flow.define_node("D1", "Not a decision here");

        assert_eq!(flow.node("Q1").unwrap().kind(), NodeKind::Decision);
        assert_eq!(flow.node("D1").unwrap().kind(), NodeKind::Process);
    }
}
