//! Workflow edge definitions for connecting nodes.
//!
//! Edges define the execution flow between nodes, supporting conditional
//! branching through source handles (`if`/`else` for branch nodes).

use serde::{Deserialize, Serialize};

use crate::model::node::NodeId;

/// Unique identifier for an edge within a workflow graph.
pub type EdgeId = String;

/// Branch handles of conditional nodes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BranchHandle {
    /// Followed when the condition evaluates to true.
    If,
    /// Followed when the condition evaluates to false.
    Else,
}

/// Source handle identifying which output port of a node an edge leaves from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SourceHandle {
    /// Branch handles of conditional nodes: `"if"`, `"else"`.
    Branch(BranchHandle),
    /// Any other handle label the editor may attach.
    Custom(String),
}

impl SourceHandle {
    /// Whether this handle is the given branch handle.
    pub fn is_branch(
        &self,
        handle: BranchHandle,
    ) -> bool {
        matches!(self, SourceHandle::Branch(h) if *h == handle)
    }
}

/// A directed connection between two nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    /// ID of the target node.
    pub target: NodeId,
    /// Which output handle this edge leaves from; absent for
    /// single-successor node kinds.
    #[serde(rename = "sourceHandle", default)]
    pub source_handle: Option<SourceHandle>,
}

impl Edge {
    /// Creates an unhandled edge between two nodes.
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    /// Creates an edge leaving a conditional node's branch handle.
    pub fn with_handle(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        handle: BranchHandle,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Some(SourceHandle::Branch(handle)),
        }
    }
}
