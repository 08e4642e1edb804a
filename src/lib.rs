//! # Flowplan
//!
//! Flowplan is a small, pure library for turning visually assembled AI agent
//! workflows into execution plans.
//!
//! A workflow is a directed graph of typed nodes (start, agent, if/else,
//! while, user approval, API call, end) connected by optionally labeled
//! edges. The compiler resolves, for every node, what executes next: a
//! single successor, an ordered fan-out list, an if/else branch pair, or
//! nothing at all.
//!
//! ## Core Features
//!
//! - **Typed Graph Model**: closed node-kind union with a distinct settings
//!   payload per kind, deserialized from the editor's persisted JSON blob
//! - **Structural Validation**: caller-facing checks (missing start node,
//!   duplicate ids, dangling edges, ambiguous branches) kept separate from
//!   compilation
//! - **Pure Compilation**: no I/O, no locking, no mutation of the input;
//!   identical graphs always compile to identical plans
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowplan::{WorkflowGraph, compile, validate};
//!
//! let graph = WorkflowGraph::from_json(json_str)?;
//! validate(&graph)?;
//! let plan = compile(&graph);
//! println!("entry: {:?}", plan.entry);
//! ```

mod compile;
mod error;
mod model;
mod plan;
mod validate;

pub use compile::compile;
pub use error::FlowplanError;
pub use model::*;
pub use plan::{Plan, PlanItem, Successor};
pub use validate::{ValidationError, validate, violations};

/// Result type alias for Flowplan operations.
pub type Result<T> = std::result::Result<T, FlowplanError>;
