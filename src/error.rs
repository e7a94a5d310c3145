//! Error and warning types.
//!
//! Only [`MalformedGraphError`] aborts a layout. Everything the engine can work
//! around is reported as a [`DegenerateTopologyWarning`] next to the output.

use serde::Serialize;
use thiserror::Error;

/// Top-level error returned by the layout entry points and graph helpers.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("malformed graph: {0}")]
    Malformed(#[from] MalformedGraphError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The graph violates referential integrity and cannot be laid out.
///
/// The caller is expected to reject the operation and keep the graph it had
/// before the layout call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedGraphError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("edge '{edge}' {endpoint} references missing node '{node}'")]
    DanglingEdge {
        edge: String,
        endpoint: Endpoint,
        node: String,
    },

    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),

    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(String),

    #[error("document must contain 'nodes' and 'edges' arrays")]
    MissingCollections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

/// Structurally valid input that the engine had to guess about.
///
/// Layout still completes; callers may surface a non-blocking notice that the
/// drawing may look wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateTopologyWarning {
    /// Every node has an incoming edge; the first node was used as the root.
    NoRoot { fallback: String },
    /// Nodes on a cycle no root reaches; the first node of each such group was
    /// seeded at level 0.
    UnreachableNodes { nodes: Vec<String> },
    /// A decision had no Yes/No labels; its first outgoing edges were used.
    AmbiguousDecision { decision: String },
    /// A decision has fewer than two distinguishable branches.
    DecisionMissingBranch { decision: String },
    /// Both branches of a decision point at the same node.
    SharedBranchTarget { decision: String, target: String },
}

impl std::fmt::Display for DegenerateTopologyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRoot { fallback } => {
                write!(f, "no root node found, using '{fallback}' as the root")
            }
            Self::UnreachableNodes { nodes } => write!(
                f,
                "nodes not reachable from any root: {}",
                nodes.join(", ")
            ),
            Self::AmbiguousDecision { decision } => write!(
                f,
                "decision '{decision}' has unlabeled branches, treating the first as Yes"
            ),
            Self::DecisionMissingBranch { decision } => {
                write!(f, "decision '{decision}' lacks a Yes or No branch")
            }
            Self::SharedBranchTarget { decision, target } => write!(
                f,
                "decision '{decision}' routes both branches to '{target}'"
            ),
        }
    }
}
