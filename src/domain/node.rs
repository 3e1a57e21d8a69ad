use generational_arena::Index;
use std::fmt;

use crate::domain::capability::{Capabilities, Capability};

/// Payload stored in a hierarchy.
///
/// Implementors declare their capabilities once through `CAPABILITIES` and
/// override the accessors that belong to those capabilities. Accessors of
/// undeclared capabilities are never consulted.
pub trait Entity {
    const CAPABILITIES: Capabilities;

    /// Current dotted position (`Orderable`).
    fn position(&self) -> Option<&str> {
        None
    }

    /// Overwrite the dotted position (`Orderable`).
    fn set_position(&mut self, _position: String) {}

    /// Soft-delete flag (`SoftDeletable`).
    fn is_deleted(&self) -> bool {
        false
    }
}

/// Handle of a node inside a [`Hierarchy`](crate::domain::Hierarchy).
///
/// Handles are generational: a handle to a destroyed node never resolves to a
/// node created later in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node#{}v{}", slot, generation)
    }
}

/// Handle of a free-standing root list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootListId(pub(crate) Index);

impl fmt::Display for RootListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "roots#{}v{}", slot, generation)
    }
}

/// Identifies one ordered collection: a root list, or the children of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionId {
    Root(RootListId),
    Children(NodeId),
}

impl CollectionId {
    /// Node hosting this collection, None for root lists.
    pub fn host(self) -> Option<NodeId> {
        match self {
            CollectionId::Root(_) => None,
            CollectionId::Children(host) => Some(host),
        }
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionId::Root(id) => write!(f, "{}", id),
            CollectionId::Children(host) => write!(f, "children of {}", host),
        }
    }
}

/// Arena slot: an entity together with its hierarchy links.
#[derive(Debug)]
pub struct HierarchyNode<T> {
    pub(crate) data: T,
    /// Host of the collection that adopted this node; only kept for container-aware types
    pub(crate) container: Option<NodeId>,
    /// Collection currently tracking this node, cleared on discard
    pub(crate) owner: Option<CollectionId>,
    /// This node's own children collection
    pub(crate) children: Vec<NodeId>,
}

impl<T: Entity> HierarchyNode<T> {
    pub(crate) fn new(data: T) -> Self {
        Self {
            data,
            container: None,
            owner: None,
            children: Vec::new(),
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn owner(&self) -> Option<CollectionId> {
        self.owner
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn position(&self) -> Option<&str> {
        if T::CAPABILITIES.contains(Capability::Orderable) {
            self.data.position()
        } else {
            None
        }
    }

    pub fn is_deleted(&self) -> bool {
        T::CAPABILITIES.contains(Capability::SoftDeletable) && self.data.is_deleted()
    }
}
