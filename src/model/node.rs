use serde::{Deserialize, Serialize};

use crate::{FlowplanError, Result, model::settings::NodeSettings};

/// node id
pub type NodeId = String;

/// Kind of a workflow node.
///
/// This is a closed set: the editor blob's `kind` tag must name one of
/// these variants, and unknown kinds are rejected at deserialization.
/// Wire names match the visual editor's node type registry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
pub enum NodeKind {
    /// Sole entry point of a workflow.
    #[serde(rename = "StartNode")]
    #[strum(serialize = "StartNode")]
    Start,
    /// A language-model call.
    #[serde(rename = "AgentNode")]
    #[strum(serialize = "AgentNode")]
    Agent,
    /// Terminal node; never followed, even when outgoing edges exist.
    #[serde(rename = "EndNode")]
    #[strum(serialize = "EndNode")]
    End,
    /// Conditional branch with `if` and `else` handled edges.
    #[serde(rename = "IfElseNode")]
    #[strum(serialize = "IfElseNode")]
    IfElse,
    /// Condition-guarded loop.
    #[serde(rename = "WhileNode")]
    #[strum(serialize = "WhileNode")]
    While,
    /// Manual checkpoint pausing for human input.
    #[serde(rename = "UserApprovalNode")]
    #[strum(serialize = "UserApprovalNode")]
    UserApproval,
    /// An outbound HTTP request.
    #[serde(rename = "ApiNode")]
    #[strum(serialize = "ApiNode")]
    ApiCall,
}

#[derive(Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(alias = "type")]
    kind: NodeKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    settings: serde_json::Value,
}

/// A vertex of the workflow graph.
///
/// The `settings` payload is typed per kind; deserialization dispatches the
/// raw settings value on the node's `kind` tag.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// Opaque caller-assigned id, stable across edits.
    pub id: NodeId,
    /// node kind
    pub kind: NodeKind,
    /// Display name; not load-bearing for execution.
    pub label: String,
    /// Kind-specific configuration.
    pub settings: NodeSettings,
}

impl Node {
    /// Creates a node of the given kind with its default settings payload.
    pub fn new(
        id: impl Into<NodeId>,
        kind: NodeKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            settings: NodeSettings::default_for(kind),
        }
    }

    /// Creates a node from a raw JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| FlowplanError::Node(format!("invalid node input: {}", e)))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = NodeRecord::deserialize(deserializer)?;
        let settings = NodeSettings::from_value(record.kind, record.settings).map_err(serde::de::Error::custom)?;

        Ok(Self {
            id: record.id,
            kind: record.kind,
            label: record.label,
            settings,
        })
    }
}
