mod edge;
mod graph;
mod node;
mod settings;

pub use edge::{BranchHandle, Edge, EdgeId, SourceHandle};
pub use graph::WorkflowGraph;
pub use node::{Node, NodeId, NodeKind};
pub use settings::{
    AgentSettings, ApiCallSettings, EndSettings, HttpMethod, IfElseSettings, NodeSettings, OutputFormat, StartSettings, UserApprovalSettings,
    WhileSettings,
};
