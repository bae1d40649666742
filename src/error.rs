use thiserror::Error;

/// Errors that can occur while constructing a flow graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Duplicate node id '{0}' in flow definition")]
    DuplicateNodeId(String),
}

/// Errors that can occur during a navigation step.
///
/// Every variant is an ordinary return value. The one condition that signals
/// a broken flow configuration rather than a dead end is `SkipLoopDetected`:
/// the forward walk elided more nodes than the flow contains, which can only
/// happen when skip rules and links form a cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Node '{0}' not found in the flow")]
    NodeNotFound(String),

    #[error("Node '{0}' has no matching branch and no default next link")]
    NoNextNode(String),

    #[error("Node '{0}' has no previous node in history or by default link")]
    NoPreviousNode(String),

    #[error("Flow is not initialized: {0}")]
    FlowNotInitialized(String),

    #[error(
        "Skip loop detected: forward navigation from node '{start_node_id}' elided {limit} nodes without landing"
    )]
    SkipLoopDetected { start_node_id: String, limit: usize },
}
