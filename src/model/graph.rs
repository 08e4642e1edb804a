//! The persisted workflow graph and its mutation operations.

use serde::{Deserialize, Serialize};

use crate::{
    FlowplanError, Result,
    model::{
        edge::{Edge, EdgeId, SourceHandle},
        node::{Node, NodeId, NodeKind},
    },
};

/// The authored workflow graph: the unit of storage and the input to the
/// plan compiler.
///
/// Node and edge order is preserved verbatim across a serialization round
/// trip; edge order is significant for deterministic successor resolution.
///
/// The graph is a plain owned value with no interior locking. An authoring
/// session is single-writer; concurrent edits from two sessions are a
/// persistence-layer concern, not a graph concern.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkflowGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The creation state of an authoring session: a single start node and
    /// nothing else.
    pub fn with_start() -> Self {
        Self {
            nodes: vec![Node::new(nanoid::nanoid!(), NodeKind::Start, "Start")],
            edges: Vec::new(),
        }
    }

    /// Parses a graph from its persisted JSON form.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| FlowplanError::Graph(format!("{}", e)))
    }

    /// Serializes the graph to its persisted JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// get node by id
    pub fn get_node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// get edge by id
    pub fn get_edge(
        &self,
        id: &str,
    ) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// The first start-kind node in node-list order, if any.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Start)
    }

    /// All outgoing edges of a node, in edge-list order.
    pub fn outgoing_edges<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// add node to graph
    pub fn add_node(
        &mut self,
        node: Node,
    ) -> Result<()> {
        if self.get_node(&node.id).is_some() {
            return Err(FlowplanError::Node(format!("node {} already exists", node.id)));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Replaces a node in place, matched by id.
    pub fn update_node(
        &mut self,
        node: Node,
    ) -> Result<()> {
        let slot = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node.id)
            .ok_or(FlowplanError::Node(format!("node {} not found", node.id)))?;
        *slot = node;
        Ok(())
    }

    /// Removes a node and every edge incident to it, as the editor does
    /// when a node is deleted from the canvas.
    pub fn remove_node(
        &mut self,
        id: &str,
    ) -> Result<Node> {
        let pos = self.nodes.iter().position(|n| n.id == id).ok_or(FlowplanError::Node(format!("node {} not found", id)))?;
        let node = self.nodes.remove(pos);
        self.edges.retain(|e| e.source != id && e.target != id);
        Ok(node)
    }

    /// add edge between two nodes
    pub fn add_edge(
        &mut self,
        edge: Edge,
    ) -> Result<()> {
        if self.get_edge(&edge.id).is_some() {
            return Err(FlowplanError::Edge(format!("edge {} already exists", edge.id)));
        }
        if self.get_node(&edge.source).is_none() {
            return Err(FlowplanError::Edge(format!("source node {} not found", edge.source)));
        }
        if self.get_node(&edge.target).is_none() {
            return Err(FlowplanError::Edge(format!("target node {} not found", edge.target)));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Connects two nodes with a generated edge id, returning the id.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        source_handle: Option<SourceHandle>,
    ) -> Result<EdgeId> {
        let id = nanoid::nanoid!();
        self.add_edge(Edge {
            id: id.clone(),
            source: source.into(),
            target: target.into(),
            source_handle,
        })?;
        Ok(id)
    }

    /// remove edge by id
    pub fn remove_edge(
        &mut self,
        id: &str,
    ) -> Result<Edge> {
        let pos = self.edges.iter().position(|e| e.id == id).ok_or(FlowplanError::Edge(format!("edge {} not found", id)))?;
        Ok(self.edges.remove(pos))
    }
}
