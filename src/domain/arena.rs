use generational_arena::Arena;
use std::fmt;
use tracing::{debug, instrument, trace};

use crate::domain::capability::{supports, Capability};
use crate::domain::error::{HierarchyError, HierarchyResult};
use crate::domain::events::{HierarchyEvent, HierarchyListener, ListenerId};
use crate::domain::node::{CollectionId, Entity, HierarchyNode, NodeId, RootListId};
use crate::domain::position::PositionFormat;

/// Arena holding every node of one hierarchy together with its root lists.
///
/// Nodes own their children collection; parent links (`container`, `owner`)
/// are plain handles into the arena and never keep anything alive.
/// Each node is tracked by at most one collection at a time: inserting it
/// somewhere else first removes it from where it was.
///
/// When `T` is orderable, every structural mutation rewrites the positions of
/// the live members of the touched collection and cascades into the subtree of
/// every member whose position changed.
///
/// There is no internal locking. The hierarchy is `Send` whenever `T` is, so
/// callers sharing one across threads wrap it in a `Mutex`.
pub struct Hierarchy<T> {
    nodes: Arena<HierarchyNode<T>>,
    root_lists: Arena<Vec<NodeId>>,
    format: PositionFormat,
    listeners: Arena<Box<dyn HierarchyListener + Send>>,
}

impl<T: fmt::Debug> fmt::Debug for Hierarchy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("nodes", &self.nodes)
            .field("root_lists", &self.root_lists)
            .field("format", &self.format)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: Entity> Default for Hierarchy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Hierarchy<T> {
    pub fn new() -> Self {
        Self::with_format(PositionFormat::default())
    }

    pub fn with_format(format: PositionFormat) -> Self {
        Self {
            nodes: Arena::new(),
            root_lists: Arena::new(),
            format,
            listeners: Arena::new(),
        }
    }

    pub fn format(&self) -> &PositionFormat {
        &self.format
    }

    // ------------------------------------------------------------------
    // listeners

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: HierarchyListener + Send + 'static,
    {
        ListenerId(self.listeners.insert(Box::new(listener)))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id.0).is_some()
    }

    fn emit(&mut self, event: HierarchyEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.notify(&event);
        }
    }

    // ------------------------------------------------------------------
    // nodes and collections

    /// Creates a detached node: no owner, no container, no children.
    #[instrument(level = "trace", skip(self, data))]
    pub fn add_node(&mut self, data: T) -> NodeId {
        NodeId(self.nodes.insert(HierarchyNode::new(data)))
    }

    /// Removes `node` from the arena and returns its payload.
    ///
    /// The node is first removed from its owning collection. Its children are
    /// orphaned (left detached in the arena), not destroyed.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, node: NodeId) -> HierarchyResult<T> {
        self.ensure_node(node)?;
        self.take_from_owner(node)?;
        let orphans = self.clear(CollectionId::Children(node))?;
        debug!(%node, orphans = orphans.len(), "destroying node");
        self.nodes
            .remove(node.0)
            .map(|entry| entry.data)
            .ok_or(HierarchyError::NodeNotFound(node))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn create_root_list(&mut self) -> CollectionId {
        CollectionId::Root(RootListId(self.root_lists.insert(Vec::new())))
    }

    /// Creates a root list seeded with the ordered live members of `source`.
    #[instrument(level = "debug", skip(self))]
    pub fn create_root_list_seeded(&mut self, source: CollectionId) -> HierarchyResult<CollectionId> {
        self.members_ref(source)?;
        let list = self.create_root_list();
        self.seed(list, source)?;
        Ok(list)
    }

    /// Clears a root list and forgets it; returns the members it held.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_root_list(&mut self, list: CollectionId) -> HierarchyResult<Vec<NodeId>> {
        let CollectionId::Root(id) = list else {
            return Err(HierarchyError::CollectionNotFound(list));
        };
        let removed = self.clear(list)?;
        self.root_lists.remove(id.0);
        Ok(removed)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(node.0)
    }

    pub fn node(&self, node: NodeId) -> Option<&HierarchyNode<T>> {
        self.nodes.get(node.0)
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.node(node).map(|entry| &entry.data)
    }

    /// Mutable access to the payload.
    ///
    /// Changing the position or the deleted flag through this handle does not
    /// recalculate anything; use [`Hierarchy::update`] for that.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node.0).map(|entry| &mut entry.data)
    }

    /// Applies `f` to the payload, then recalculates the owning collection.
    #[instrument(level = "debug", skip(self, f))]
    pub fn update<F>(&mut self, node: NodeId, f: F) -> HierarchyResult<()>
    where
        F: FnOnce(&mut T),
    {
        let entry = self
            .nodes
            .get_mut(node.0)
            .ok_or(HierarchyError::NodeNotFound(node))?;
        f(&mut entry.data);
        let owner = entry.owner;
        match owner {
            Some(owner) => self.recalculate(owner),
            None => Ok(()),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_lists(&self) -> impl Iterator<Item = CollectionId> + '_ {
        self.root_lists
            .iter()
            .map(|(idx, _)| CollectionId::Root(RootListId(idx)))
    }

    /// Physical members in sequence order, soft-deleted ones included.
    pub fn members(&self, collection: CollectionId) -> HierarchyResult<&[NodeId]> {
        self.members_ref(collection).map(Vec::as_slice)
    }

    /// Default view of a collection: live members in position order.
    pub fn live_members(&self, collection: CollectionId) -> HierarchyResult<Vec<NodeId>> {
        let members = self.members_ref(collection)?;
        Ok(self.order(members.iter().copied()))
    }

    pub fn len(&self, collection: CollectionId) -> HierarchyResult<usize> {
        self.members_ref(collection).map(Vec::len)
    }

    pub fn is_empty(&self, collection: CollectionId) -> HierarchyResult<bool> {
        self.members_ref(collection).map(Vec::is_empty)
    }

    pub fn position(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(HierarchyNode::position)
    }

    pub fn container(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|entry| entry.container)
    }

    pub fn owner(&self, node: NodeId) -> Option<CollectionId> {
        self.node(node).and_then(|entry| entry.owner)
    }

    // ------------------------------------------------------------------
    // structural mutation

    /// Inserts `node` at `index`, moving it out of its current collection first.
    ///
    /// `index` may equal the length (append). When `node` already belongs to
    /// `collection`, the bound is the length without it.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, collection: CollectionId, index: usize, node: NodeId) -> HierarchyResult<()> {
        let current_owner = self.ensure_node(node)?.owner;
        let mut len = self.members_ref(collection)?.len();
        if current_owner == Some(collection) {
            len -= 1;
        }
        if index > len {
            return Err(HierarchyError::IndexOutOfRange { index, len });
        }
        self.check_cycle(node, collection)?;

        self.take_from_owner(node)?;
        self.adopt(collection, node);
        self.members_mut(collection)?.insert(index, node);
        debug!(%collection, index, %node, "inserted");
        self.emit(HierarchyEvent::Inserted {
            collection,
            index,
            node,
        });
        self.recalculate(collection)
    }

    /// Appends `node` to the end of `collection`.
    pub fn push(&mut self, collection: CollectionId, node: NodeId) -> HierarchyResult<()> {
        let mut len = self.len(collection)?;
        if self.owner(node) == Some(collection) {
            len -= 1;
        }
        self.insert(collection, len, node)
    }

    /// Removes and discards the member at `index`; the node stays in the arena, detached.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_at(&mut self, collection: CollectionId, index: usize) -> HierarchyResult<NodeId> {
        let len = self.members_ref(collection)?.len();
        if index >= len {
            return Err(HierarchyError::IndexOutOfRange { index, len });
        }
        let node = self.members_mut(collection)?.remove(index);
        self.discard(node);
        debug!(%collection, index, %node, "removed");
        self.emit(HierarchyEvent::Removed {
            collection,
            index,
            node,
        });
        self.recalculate(collection)?;
        Ok(node)
    }

    /// Detaches `node` from whichever collection tracks it.
    ///
    /// Returns false when the node was not a member of any collection.
    pub fn remove(&mut self, node: NodeId) -> HierarchyResult<bool> {
        self.ensure_node(node)?;
        Ok(self.take_from_owner(node)?.is_some())
    }

    /// Replaces the member at `index` with `node`; returns the outgoing member.
    ///
    /// The outgoing member is always the one at `index` when the call is made,
    /// even if `node` is taken from an earlier slot of the same collection.
    #[instrument(level = "debug", skip(self))]
    pub fn set(&mut self, collection: CollectionId, index: usize, node: NodeId) -> HierarchyResult<NodeId> {
        self.ensure_node(node)?;
        let members = self.members_ref(collection)?;
        if index >= members.len() {
            return Err(HierarchyError::IndexOutOfRange {
                index,
                len: members.len(),
            });
        }
        let outgoing = members[index];
        if outgoing != node {
            self.check_cycle(node, collection)?;
        }

        let mut index = index;
        if outgoing != node {
            if let Some((from, at)) = self.take_from_owner(node)? {
                if from == collection && at < index {
                    index -= 1;
                }
            }
            self.members_mut(collection)?[index] = node;
            self.discard(outgoing);
            self.adopt(collection, node);
        }
        debug!(%collection, index, old = %outgoing, new = %node, "replaced");
        self.emit(HierarchyEvent::Replaced {
            collection,
            index,
            old: outgoing,
            new: node,
        });
        self.recalculate(collection)?;
        Ok(outgoing)
    }

    /// Discards every member and empties the collection; returns the former members.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self, collection: CollectionId) -> HierarchyResult<Vec<NodeId>> {
        let removed = std::mem::take(self.members_mut(collection)?);
        for node in &removed {
            self.discard(*node);
        }
        debug!(%collection, count = removed.len(), "cleared");
        self.emit(HierarchyEvent::Cleared {
            collection,
            removed: removed.clone(),
        });
        self.recalculate(collection)?;
        Ok(removed)
    }

    /// Moves the ordered live members of `source` to the end of `target`.
    ///
    /// Returns the number of nodes moved. Every node is checked before the
    /// first one is moved.
    #[instrument(level = "debug", skip(self))]
    pub fn seed(&mut self, target: CollectionId, source: CollectionId) -> HierarchyResult<usize> {
        self.members_ref(target)?;
        let ordered = self.live_members(source)?;
        if target == source {
            return Ok(0);
        }
        for node in &ordered {
            self.check_cycle(*node, target)?;
        }
        for node in &ordered {
            self.push(target, *node)?;
        }
        Ok(ordered.len())
    }

    // ------------------------------------------------------------------
    // positions

    /// Rewrites the positions of the live members of `collection`.
    ///
    /// Members whose position changed and that host children of their own get
    /// their children recalculated too; the cascade runs on an explicit
    /// worklist. Soft-deleted members keep their last position and do not take
    /// up an index. A no-op for non-orderable types.
    #[instrument(level = "trace", skip(self))]
    pub fn recalculate(&mut self, collection: CollectionId) -> HierarchyResult<()> {
        self.members_ref(collection)?;
        if !supports::<T>(Capability::Orderable) {
            trace!(%collection, "entity type is not orderable, skipping");
            return Ok(());
        }
        let container_aware = supports::<T>(Capability::ContainerAware);

        let mut changes = Vec::new();
        let mut worklist = vec![collection];
        while let Some(current) = worklist.pop() {
            let prefix = match current.host() {
                Some(host) if container_aware => self.position(host).map(str::to_owned),
                _ => None,
            };
            let Ok(members) = self.members_ref(current) else {
                continue;
            };
            let live: Vec<NodeId> = members
                .iter()
                .copied()
                .filter(|id| self.node(*id).is_some_and(|entry| !entry.is_deleted()))
                .collect();

            for (i, id) in live.into_iter().enumerate() {
                let new = self.format.position_at(prefix.as_deref(), i);
                let Some(entry) = self.nodes.get_mut(id.0) else {
                    continue;
                };
                let old = entry.data.position().map(str::to_owned);
                if old.as_deref() == Some(new.as_str()) {
                    continue;
                }
                entry.data.set_position(new.clone());
                trace!(node = %id, ?old, %new, "position changed");
                if container_aware && !entry.children.is_empty() {
                    worklist.push(CollectionId::Children(id));
                }
                changes.push(HierarchyEvent::PositionChanged { node: id, old, new });
            }
        }

        for event in changes {
            self.emit(event);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // internals

    fn ensure_node(&self, node: NodeId) -> HierarchyResult<&HierarchyNode<T>> {
        self.node(node).ok_or(HierarchyError::NodeNotFound(node))
    }

    fn members_ref(&self, collection: CollectionId) -> HierarchyResult<&Vec<NodeId>> {
        match collection {
            CollectionId::Root(id) => self.root_lists.get(id.0),
            CollectionId::Children(host) => self.nodes.get(host.0).map(|entry| &entry.children),
        }
        .ok_or(HierarchyError::CollectionNotFound(collection))
    }

    fn members_mut(&mut self, collection: CollectionId) -> HierarchyResult<&mut Vec<NodeId>> {
        match collection {
            CollectionId::Root(id) => self.root_lists.get_mut(id.0),
            CollectionId::Children(host) => self
                .nodes
                .get_mut(host.0)
                .map(|entry| &mut entry.children),
        }
        .ok_or(HierarchyError::CollectionNotFound(collection))
    }

    /// Rejects placing `node` into its own children or into any of its descendants' children.
    fn check_cycle(&self, node: NodeId, collection: CollectionId) -> HierarchyResult<()> {
        let mut current = collection.host();
        while let Some(id) = current {
            if id == node {
                return Err(HierarchyError::CycleDetected { node, collection });
            }
            current = self.owner(id).and_then(CollectionId::host);
        }
        Ok(())
    }

    fn adopt(&mut self, collection: CollectionId, node: NodeId) {
        let container_aware = supports::<T>(Capability::ContainerAware);
        if let Some(entry) = self.nodes.get_mut(node.0) {
            entry.owner = Some(collection);
            entry.container = if container_aware {
                collection.host()
            } else {
                None
            };
        }
    }

    fn discard(&mut self, node: NodeId) {
        if let Some(entry) = self.nodes.get_mut(node.0) {
            entry.owner = None;
            entry.container = None;
        }
    }

    /// Removes `node` from its owning collection, if any; returns where it was.
    fn take_from_owner(&mut self, node: NodeId) -> HierarchyResult<Option<(CollectionId, usize)>> {
        let Some(owner) = self.ensure_node(node)?.owner else {
            return Ok(None);
        };
        let members = self.members_mut(owner)?;
        let Some(index) = members.iter().position(|id| *id == node) else {
            self.discard(node);
            return Ok(None);
        };
        members.remove(index);
        self.discard(node);
        debug!(collection = %owner, index, %node, "removed");
        self.emit(HierarchyEvent::Removed {
            collection: owner,
            index,
            node,
        });
        self.recalculate(owner)?;
        Ok(Some((owner, index)))
    }
}
