//! Compiled workflow plans.
//!
//! A plan is a derived, disposable artifact: recomputed from the graph on
//! demand (before preview or execution) and never edited or persisted as
//! the source of truth.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    model::{NodeId, NodeKind, NodeSettings},
};

/// Resolved successor of a node in a compiled plan.
///
/// Consumers match exhaustively on this instead of duck-typing a
/// shape-shifting `next` field. The JSON form is the wire shape the
/// execution layer reads: `null`, a node id, an ordered id list, or an
/// if/else branch record.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(untagged)]
pub enum Successor {
    /// No outgoing edge to follow.
    #[default]
    None,
    /// Exactly one outgoing edge.
    Single(NodeId),
    /// Several outgoing edges, in edge-list order.
    FanOut(Vec<NodeId>),
    /// Branch targets of a conditional node; either side may be
    /// unconnected.
    Branch {
        #[serde(rename = "if")]
        if_target: Option<NodeId>,
        #[serde(rename = "else")]
        else_target: Option<NodeId>,
    },
}

/// One node of a compiled plan, paired with its resolved successor.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub settings: NodeSettings,
    pub next: Successor,
}

/// A compiled workflow plan: the entry node id plus one resolved item per
/// node, in node-list order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Id of the start node where execution begins; `None` when the graph
    /// has no start node.
    pub entry: Option<NodeId>,
    pub items: Vec<PlanItem>,
}

impl Plan {
    /// get plan item by node id
    pub fn get(
        &self,
        id: &str,
    ) -> Option<&PlanItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The item execution begins at, if the graph had a start node.
    pub fn entry_item(&self) -> Option<&PlanItem> {
        self.entry.as_deref().and_then(|id| self.get(id))
    }

    /// Serializes the plan to the JSON shape consumed by the execution
    /// layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
