//! Mutation notifications.
//!
//! Every structural step on a collection produces exactly one structural event,
//! followed by one `PositionChanged` per member whose position was rewritten.
//! UI bindings subscribe a [`HierarchyListener`] and translate these into
//! their own change signals.

use crate::domain::node::{CollectionId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyEvent {
    Inserted {
        collection: CollectionId,
        index: usize,
        node: NodeId,
    },
    Removed {
        collection: CollectionId,
        index: usize,
        node: NodeId,
    },
    Replaced {
        collection: CollectionId,
        index: usize,
        old: NodeId,
        new: NodeId,
    },
    Cleared {
        collection: CollectionId,
        removed: Vec<NodeId>,
    },
    PositionChanged {
        node: NodeId,
        old: Option<String>,
        new: String,
    },
}

impl HierarchyEvent {
    /// Collection affected by a structural event, None for position changes.
    pub fn collection(&self) -> Option<CollectionId> {
        match self {
            HierarchyEvent::Inserted { collection, .. }
            | HierarchyEvent::Removed { collection, .. }
            | HierarchyEvent::Replaced { collection, .. }
            | HierarchyEvent::Cleared { collection, .. } => Some(*collection),
            HierarchyEvent::PositionChanged { .. } => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, HierarchyEvent::PositionChanged { .. })
    }
}

/// Receives hierarchy mutation events.
pub trait HierarchyListener {
    fn notify(&mut self, event: &HierarchyEvent);
}

impl<F> HierarchyListener for F
where
    F: FnMut(&HierarchyEvent),
{
    fn notify(&mut self, event: &HierarchyEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) generational_arena::Index);
