//! The workflow compiler: graph in, execution plan out.
//!
//! Compilation is a pure, total transformation. It never mutates the input
//! graph, performs no I/O, and raises no errors for structurally valid
//! input; a malformed graph degrades to a partially resolved plan. The
//! caller-facing structural checks live in the `validate` module and run
//! before compilation, not inside it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    model::{BranchHandle, Edge, Node, NodeId, NodeKind, WorkflowGraph},
    plan::{Plan, PlanItem, Successor},
};

/// Compiles a workflow graph into an execution plan.
///
/// Successors resolve by node kind:
/// - `IfElse`: the first outgoing edge with the `if` handle and the first
///   with the `else` handle become the branch targets; a side with no edge
///   stays unconnected.
/// - `End`: terminal, regardless of outgoing edges present in the input.
/// - Every other kind: no edge resolves to nothing, one edge to a single
///   successor, several edges to an ordered fan-out list.
///
/// The plan's entry is the first start node in node-list order, or `None`
/// when the graph has no start node. Compiling the same graph twice yields
/// structurally equal plans.
pub fn compile(graph: &WorkflowGraph) -> Plan {
    let outgoing = adjacency(&graph.edges);

    let items = graph
        .nodes
        .iter()
        .map(|node| {
            let edges = outgoing.get(node.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            PlanItem {
                id: node.id.clone(),
                kind: node.kind,
                label: node.label.clone(),
                settings: node.settings.clone(),
                next: resolve(node, edges),
            }
        })
        .collect();

    let entry = graph.start_node().map(|n| n.id.clone());
    debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), entry = ?entry, "compiled workflow plan");

    Plan { entry, items }
}

/// Groups edges by source node id, preserving edge-list order within each
/// group. Order matters: it fixes fan-out ordering and first-wins branch
/// selection.
fn adjacency(edges: &[Edge]) -> HashMap<&str, Vec<&Edge>> {
    let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
    for edge in edges {
        outgoing.entry(edge.source.as_str()).or_default().push(edge);
    }
    outgoing
}

fn resolve(
    node: &Node,
    edges: &[&Edge],
) -> Successor {
    match node.kind {
        NodeKind::IfElse => Successor::Branch {
            if_target: branch_target(node, edges, BranchHandle::If),
            else_target: branch_target(node, edges, BranchHandle::Else),
        },
        NodeKind::End => Successor::None,
        NodeKind::Start | NodeKind::Agent | NodeKind::While | NodeKind::UserApproval | NodeKind::ApiCall => match edges {
            [] => Successor::None,
            [edge] => Successor::Single(edge.target.clone()),
            _ => Successor::FanOut(edges.iter().map(|e| e.target.clone()).collect()),
        },
    }
}

/// The first edge carrying the handle wins; later duplicates are ignored
/// here and reported by validation as an ambiguous branch.
fn branch_target(
    node: &Node,
    edges: &[&Edge],
    handle: BranchHandle,
) -> Option<NodeId> {
    let mut matched = edges.iter().filter(|e| e.source_handle.as_ref().is_some_and(|h| h.is_branch(handle)));
    let target = matched.next().map(|e| e.target.clone());
    if matched.next().is_some() {
        warn!(node = %node.id, handle = handle.as_ref(), "multiple edges share a branch handle, taking the first");
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(
        id: &str,
        kind: NodeKind,
    ) -> Node {
        Node::new(id, kind, id)
    }

    fn graph(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> WorkflowGraph {
        WorkflowGraph { nodes, edges }
    }

    #[test]
    fn test_linear_workflow() {
        let plan = compile(&graph(
            vec![node("s", NodeKind::Start), node("a", NodeKind::Agent), node("e", NodeKind::End)],
            vec![Edge::new("e1", "s", "a"), Edge::new("e2", "a", "e")],
        ));

        assert_eq!(plan.entry.as_deref(), Some("s"));
        assert_eq!(plan.get("s").unwrap().next, Successor::Single("a".to_string()));
        assert_eq!(plan.get("a").unwrap().next, Successor::Single("e".to_string()));
        assert_eq!(plan.get("e").unwrap().next, Successor::None);
        assert_eq!(plan.entry_item().unwrap().id, "s");
    }

    #[test]
    fn test_branch_resolution() {
        let plan = compile(&graph(
            vec![node("c", NodeKind::IfElse), node("b", NodeKind::Agent), node("x", NodeKind::Agent)],
            vec![
                Edge::with_handle("e1", "c", "b", BranchHandle::If),
                Edge::with_handle("e2", "c", "x", BranchHandle::Else),
            ],
        ));

        assert_eq!(
            plan.get("c").unwrap().next,
            Successor::Branch {
                if_target: Some("b".to_string()),
                else_target: Some("x".to_string()),
            }
        );
    }

    #[test]
    fn test_branch_with_only_if_edge() {
        let plan = compile(&graph(
            vec![node("c", NodeKind::IfElse), node("b", NodeKind::Agent)],
            vec![Edge::with_handle("e1", "c", "b", BranchHandle::If)],
        ));

        assert_eq!(
            plan.get("c").unwrap().next,
            Successor::Branch {
                if_target: Some("b".to_string()),
                else_target: None,
            }
        );
    }

    #[test]
    fn test_duplicate_branch_handle_first_wins() {
        let plan = compile(&graph(
            vec![node("c", NodeKind::IfElse), node("b1", NodeKind::Agent), node("b2", NodeKind::Agent)],
            vec![
                Edge::with_handle("e1", "c", "b1", BranchHandle::If),
                Edge::with_handle("e2", "c", "b2", BranchHandle::If),
            ],
        ));

        assert_eq!(
            plan.get("c").unwrap().next,
            Successor::Branch {
                if_target: Some("b1".to_string()),
                else_target: None,
            }
        );
    }

    #[test]
    fn test_fan_out_preserves_edge_order() {
        let plan = compile(&graph(
            vec![node("a", NodeKind::Agent), node("x", NodeKind::Agent), node("y", NodeKind::Agent)],
            vec![Edge::new("e1", "a", "x"), Edge::new("e2", "a", "y")],
        ));

        assert_eq!(plan.get("a").unwrap().next, Successor::FanOut(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_end_ignores_outgoing_edges() {
        let plan = compile(&graph(
            vec![node("e", NodeKind::End), node("a", NodeKind::Agent)],
            vec![Edge::new("e1", "e", "a")],
        ));

        assert_eq!(plan.get("e").unwrap().next, Successor::None);
    }

    #[test]
    fn test_node_without_edges_has_no_successor() {
        let plan = compile(&graph(vec![node("a", NodeKind::UserApproval)], vec![]));
        assert_eq!(plan.get("a").unwrap().next, Successor::None);
    }

    #[test]
    fn test_while_resolves_like_any_single_successor_node() {
        let plan = compile(&graph(
            vec![node("w", NodeKind::While), node("body", NodeKind::Agent)],
            vec![Edge::new("e1", "w", "body"), Edge::new("back", "body", "w")],
        ));

        assert_eq!(plan.get("w").unwrap().next, Successor::Single("body".to_string()));
        assert_eq!(plan.get("body").unwrap().next, Successor::Single("w".to_string()));
    }

    #[test]
    fn test_entry_is_none_without_start() {
        let plan = compile(&graph(vec![node("a", NodeKind::Agent)], vec![]));
        assert_eq!(plan.entry, None);
        assert_eq!(plan.entry_item(), None);
    }

    #[test]
    fn test_entry_is_first_of_multiple_starts() {
        let plan = compile(&graph(vec![node("s2", NodeKind::Start), node("s1", NodeKind::Start)], vec![]));
        assert_eq!(plan.entry.as_deref(), Some("s2"));
    }

    #[test]
    fn test_empty_graph_compiles_to_empty_plan() {
        let plan = compile(&WorkflowGraph::new());
        assert_eq!(plan.entry, None);
        assert!(plan.items.is_empty());
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let graph = graph(
            vec![
                node("s", NodeKind::Start),
                node("c", NodeKind::IfElse),
                node("a", NodeKind::Agent),
                node("e", NodeKind::End),
            ],
            vec![
                Edge::new("e1", "s", "c"),
                Edge::with_handle("e2", "c", "a", BranchHandle::If),
                Edge::with_handle("e3", "c", "e", BranchHandle::Else),
                Edge::new("e4", "a", "e"),
            ],
        );

        assert_eq!(compile(&graph), compile(&graph));
    }

    #[test]
    fn test_plan_wire_shape() {
        let plan = compile(&graph(
            vec![node("s", NodeKind::Start), node("e", NodeKind::End)],
            vec![Edge::new("e1", "s", "e")],
        ));

        let value: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(value["entry"], serde_json::json!("s"));
        assert_eq!(value["items"][0]["kind"], serde_json::json!("StartNode"));
        assert_eq!(value["items"][0]["next"], serde_json::json!("e"));
        assert_eq!(value["items"][1]["next"], serde_json::json!(null));
    }
}
