//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::{CollectionId, NodeId};

/// Contract violations on hierarchy operations.
///
/// All of these are programmer errors: they are checked before a mutation
/// touches anything, so a failed call leaves the hierarchy unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("cycle detected in hierarchy: {node} cannot be placed below itself in {collection}")]
    CycleDetected {
        node: NodeId,
        collection: CollectionId,
    },
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
