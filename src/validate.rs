//! Structural validation of workflow graphs.
//!
//! The compiler is a pure transformation and never rejects a malformed
//! graph; it degrades to a partially resolved plan instead. Callers run
//! these checks before compiling so that violations surface as concrete
//! findings rather than as a partially useless plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{BranchHandle, Node, NodeId, NodeKind, NodeSettings, OutputFormat, WorkflowGraph};

/// A structural violation found in a workflow graph.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No start node; the graph has no entry point.
    #[error("graph has no start node")]
    MissingStart,

    /// More than one start node.
    #[error("graph has {count} start nodes, expected exactly one")]
    MultipleStart {
        count: usize,
    },

    /// Two nodes share an id.
    #[error("duplicate node id: {id}")]
    DuplicateNodeId {
        id: NodeId,
    },

    /// Two edges share an id.
    #[error("duplicate edge id: {id}")]
    DuplicateEdgeId {
        id: String,
    },

    /// An edge endpoint references a node not present in the graph.
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge {
        edge: String,
        node: NodeId,
    },

    /// An if/else node has more than one outgoing edge on the same branch
    /// handle; the compiler would silently take the first.
    #[error("node {node} has more than one outgoing '{handle}' edge")]
    AmbiguousBranch {
        node: NodeId,
        handle: String,
    },

    /// A node carries an output schema that is not valid JSON or does not
    /// compile as a JSON Schema.
    #[error("node {node} has an invalid output schema: {reason}")]
    InvalidSchema {
        node: NodeId,
        reason: String,
    },
}

/// Collects every structural violation in the graph.
///
/// Findings come out in a fixed order: start-node checks, id uniqueness in
/// list order, edge endpoints, branch ambiguity, then schema checks.
pub fn violations(graph: &WorkflowGraph) -> Vec<ValidationError> {
    let mut found = Vec::new();

    let start_count = graph.nodes.iter().filter(|n| n.kind == NodeKind::Start).count();
    match start_count {
        0 => found.push(ValidationError::MissingStart),
        1 => {}
        count => found.push(ValidationError::MultipleStart { count }),
    }

    let mut node_ids = HashSet::new();
    for node in &graph.nodes {
        if !node_ids.insert(node.id.as_str()) {
            found.push(ValidationError::DuplicateNodeId { id: node.id.clone() });
        }
    }

    let mut edge_ids = HashSet::new();
    for edge in &graph.edges {
        if !edge_ids.insert(edge.id.as_str()) {
            found.push(ValidationError::DuplicateEdgeId { id: edge.id.clone() });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                found.push(ValidationError::DanglingEdge {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
    }

    for node in graph.nodes.iter().filter(|n| n.kind == NodeKind::IfElse) {
        for handle in [BranchHandle::If, BranchHandle::Else] {
            let count = graph
                .outgoing_edges(&node.id)
                .filter(|e| e.source_handle.as_ref().is_some_and(|h| h.is_branch(handle)))
                .count();
            if count > 1 {
                found.push(ValidationError::AmbiguousBranch {
                    node: node.id.clone(),
                    handle: handle.as_ref().to_string(),
                });
            }
        }
    }

    for node in &graph.nodes {
        if let Some(err) = schema_violation(node) {
            found.push(err);
        }
    }

    debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), violations = found.len(), "validated workflow graph");

    found
}

/// Checks the graph, returning the first violation found.
pub fn validate(graph: &WorkflowGraph) -> std::result::Result<(), ValidationError> {
    match violations(graph).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Agent nodes with json output and end nodes carry user-entered schema
/// strings; an empty string means none was entered yet.
fn schema_violation(node: &Node) -> Option<ValidationError> {
    let schema = match &node.settings {
        NodeSettings::Agent(settings) if settings.output == OutputFormat::Json => settings.schema.as_deref(),
        NodeSettings::End(settings) => settings.schema.as_deref(),
        _ => None,
    }?;
    if schema.is_empty() {
        return None;
    }

    let value = match serde_json::from_str::<serde_json::Value>(schema) {
        Ok(value) => value,
        Err(e) => {
            return Some(ValidationError::InvalidSchema {
                node: node.id.clone(),
                reason: e.to_string(),
            });
        }
    };
    match jsonschema::validator_for(&value) {
        Ok(_) => None,
        Err(e) => Some(ValidationError::InvalidSchema {
            node: node.id.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgentSettings, Edge, EndSettings, Node, NodeKind, WorkflowGraph};

    fn node(
        id: &str,
        kind: NodeKind,
    ) -> Node {
        Node::new(id, kind, id)
    }

    fn valid_graph() -> WorkflowGraph {
        WorkflowGraph {
            nodes: vec![node("s", NodeKind::Start), node("a", NodeKind::Agent), node("e", NodeKind::End)],
            edges: vec![Edge::new("e1", "s", "a"), Edge::new("e2", "a", "e")],
        }
    }

    #[test]
    fn test_valid_graph_passes() {
        assert_eq!(validate(&valid_graph()), Ok(()));
        assert!(violations(&valid_graph()).is_empty());
    }

    #[test]
    fn test_missing_start() {
        let graph = WorkflowGraph {
            nodes: vec![node("a", NodeKind::Agent)],
            edges: vec![],
        };
        assert_eq!(validate(&graph), Err(ValidationError::MissingStart));
    }

    #[test]
    fn test_multiple_starts() {
        let mut graph = valid_graph();
        graph.nodes.push(node("s2", NodeKind::Start));
        assert_eq!(validate(&graph), Err(ValidationError::MultipleStart { count: 2 }));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut graph = valid_graph();
        graph.nodes.push(node("a", NodeKind::Agent));
        graph.edges.push(Edge::new("e1", "s", "e"));

        let found = violations(&graph);
        assert!(found.contains(&ValidationError::DuplicateNodeId { id: "a".to_string() }));
        assert!(found.contains(&ValidationError::DuplicateEdgeId { id: "e1".to_string() }));
    }

    #[test]
    fn test_dangling_edge() {
        let mut graph = valid_graph();
        graph.edges.push(Edge::new("e3", "a", "ghost"));
        assert_eq!(
            validate(&graph),
            Err(ValidationError::DanglingEdge {
                edge: "e3".to_string(),
                node: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_ambiguous_branch() {
        let mut graph = valid_graph();
        graph.nodes.push(node("c", NodeKind::IfElse));
        graph.edges.push(Edge::with_handle("e3", "c", "a", BranchHandle::Else));
        graph.edges.push(Edge::with_handle("e4", "c", "e", BranchHandle::Else));

        assert_eq!(
            validate(&graph),
            Err(ValidationError::AmbiguousBranch {
                node: "c".to_string(),
                handle: "else".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_schema_reported() {
        let mut graph = valid_graph();
        let mut end = node("out", NodeKind::End);
        end.settings = NodeSettings::End(EndSettings {
            schema: Some("not json".to_string()),
        });
        graph.nodes.push(end);

        match validate(&graph) {
            Err(ValidationError::InvalidSchema { node, .. }) => assert_eq!(node, "out"),
            other => panic!("expected invalid schema, got {:?}", other),
        }
    }

    #[test]
    fn test_well_formed_schema_passes() {
        let mut graph = valid_graph();
        let mut agent = node("a2", NodeKind::Agent);
        agent.settings = NodeSettings::Agent(AgentSettings {
            output: OutputFormat::Json,
            schema: Some(r#"{"type": "object", "properties": {"answer": {"type": "string"}}}"#.to_string()),
            ..AgentSettings::default()
        });
        graph.nodes.push(agent);
        graph.edges.push(Edge::new("e3", "a", "a2"));

        assert_eq!(validate(&graph), Ok(()));
    }

    #[test]
    fn test_empty_schema_string_ignored() {
        let mut graph = valid_graph();
        let mut end = node("out", NodeKind::End);
        end.settings = NodeSettings::End(EndSettings {
            schema: Some(String::new()),
        });
        graph.nodes.push(end);

        assert_eq!(validate(&graph), Ok(()));
    }

    #[test]
    fn test_violations_collects_everything() {
        let graph = WorkflowGraph {
            nodes: vec![node("a", NodeKind::Agent), node("a", NodeKind::Agent)],
            edges: vec![Edge::new("e1", "a", "ghost")],
        };

        let found = violations(&graph);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], ValidationError::MissingStart);
    }
}
