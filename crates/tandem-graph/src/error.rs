//! Graph error types

use thiserror::Error;

/// Boxed error returned by node implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by nodes
pub type NodeResult<T> = Result<T, BoxError>;

/// Result type for graph construction and execution
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building or running a graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// No entry point was set
    #[error("Graph has no entry point")]
    MissingEntryPoint,

    /// An edge, route or entry point refers to a node that does not exist
    #[error("Unknown node '{node}'")]
    UnknownNode { node: String },

    /// Two nodes were added under the same name
    #[error("Node '{node}' is already defined")]
    DuplicateNode { node: String },

    /// A node used a reserved name
    #[error("'{node}' is a reserved node name")]
    ReservedName { node: String },

    /// A node has more than one outgoing route
    #[error("Node '{node}' has more than one outgoing route")]
    ConflictingRoutes { node: String },

    /// A node has no outgoing route
    #[error("Node '{node}' has no outgoing edge")]
    MissingRoute { node: String },

    /// Execution took too many steps without reaching END
    #[error("Recursion limit of {limit} reached without hitting END")]
    RecursionLimit { limit: usize },

    /// A node returned an error
    #[error("Node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: BoxError,
    },
}
