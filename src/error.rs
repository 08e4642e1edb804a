//! Error types for Flowplan.
//!
//! All errors are represented by the `FlowplanError` enum. Structural
//! validation findings carry their own structured type, `ValidationError`,
//! which the top-level enum wraps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::ValidationError;

/// Unified error type for all Flowplan operations.
///
/// Each variant represents a specific category of error that can occur
/// while parsing, mutating, or validating a workflow graph.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowplanError {
    /// Data conversion errors (JSON serialization and parsing).
    #[error("{0}")]
    Convert(String),

    /// Graph-level errors (malformed graph input, failed mutations).
    #[error("{0}")]
    Graph(String),

    /// Node definition errors (unknown id, bad settings payload).
    #[error("{0}")]
    Node(String),

    /// Edge definition errors (unknown id, missing endpoints).
    #[error("{0}")]
    Edge(String),

    /// Structural validation findings.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<FlowplanError> for String {
    fn from(val: FlowplanError) -> Self {
        val.to_string()
    }
}

impl From<serde_json::Error> for FlowplanError {
    fn from(error: serde_json::Error) -> Self {
        FlowplanError::Convert(error.to_string())
    }
}
