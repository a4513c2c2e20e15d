//! Error type shared by graph validation, order construction and config I/O.
//!
//! Collapse runs themselves never fail: an order returning an unknown id
//! simply ends the run.

use thiserror::Error;

use crate::graph_wave::NodeId;

/// Errors that can occur while setting up a graph wave collapse.
#[derive(Debug, Error)]
pub enum GwcError {
    /// Two nodes share an id.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    /// A node lists a neighbour id that no node carries.
    #[error("node '{node}' lists unknown neighbour '{neighbour}'")]
    UnknownNeighbour { node: NodeId, neighbour: NodeId },

    /// `from` lists `to` as a neighbour but not the other way around.
    #[error("node '{from}' lists '{to}' as a neighbour, but '{to}' does not list '{from}'")]
    AsymmetricEdge { from: NodeId, to: NodeId },

    /// A fixed collapse order is not a permutation of the node ids.
    #[error("invalid fixed collapse order: {0}")]
    InvalidFixedOrder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for graph wave collapse setup.
pub type GwcResult<T> = Result<T, GwcError>;
