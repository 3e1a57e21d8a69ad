//! Read-only queries over a hierarchy.
//!
//! Sequences are lazy and borrow the hierarchy, so they can be restarted at
//! any time but never outlive a mutation. Absent nodes yield empty sequences.
//! Parent links are read from the collection tracking a node, so ancestor and
//! descendant queries agree for every entity type, container-aware or not.

use itertools::Itertools;
use std::iter::{self, Skip};
use tracing::instrument;

use crate::domain::arena::Hierarchy;
use crate::domain::capability::{supports, Capability};
use crate::domain::node::{CollectionId, Entity, NodeId};

/// Pre-order depth-first walk: a node, then the walk of each child in sequence order.
pub struct WithDeep<'a, T> {
    hierarchy: &'a Hierarchy<T>,
    stack: Vec<NodeId>,
}

impl<T> Clone for WithDeep<'_, T> {
    fn clone(&self) -> Self {
        Self {
            hierarchy: self.hierarchy,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T: Entity> WithDeep<'a, T> {
    fn new(hierarchy: &'a Hierarchy<T>, starts: impl IntoIterator<Item = NodeId>) -> Self {
        let mut stack: Vec<NodeId> = starts
            .into_iter()
            .filter(|id| hierarchy.contains(*id))
            .collect();
        stack.reverse();
        Self { hierarchy, stack }
    }
}

impl<T: Entity> Iterator for WithDeep<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.hierarchy.node(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some(current);
            }
        }
        None
    }
}

/// Ancestor chain, nearest first.
pub struct Parents<'a, T> {
    hierarchy: &'a Hierarchy<T>,
    next: Option<NodeId>,
}

impl<T> Clone for Parents<'_, T> {
    fn clone(&self) -> Self {
        Self {
            hierarchy: self.hierarchy,
            next: self.next,
        }
    }
}

impl<T: Entity> Iterator for Parents<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.hierarchy.parent(current);
        Some(current)
    }
}

impl<T: Entity> Hierarchy<T> {
    /// Drops soft-deleted nodes and sorts the rest by position.
    ///
    /// Either step is skipped when the entity type lacks the capability; the
    /// sort is stable and compares positions as strings. Unknown ids are dropped.
    #[instrument(level = "trace", skip(self, items))]
    pub fn order<I>(&self, items: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut ordered: Vec<NodeId> = items
            .into_iter()
            .filter(|id| {
                self.node(*id).is_some_and(|entry| !entry.is_deleted())
            })
            .collect();
        if supports::<T>(Capability::Orderable) {
            ordered.sort_by(|a, b| self.position(*a).cmp(&self.position(*b)));
        }
        ordered
    }

    pub fn with_deep(&self, node: NodeId) -> WithDeep<'_, T> {
        WithDeep::new(self, iter::once(node))
    }

    /// Strict descendants of `node`, pre-order.
    pub fn deep(&self, node: NodeId) -> Skip<WithDeep<'_, T>> {
        self.with_deep(node).skip(1)
    }

    /// Pre-order walk over every member of `collection` and their subtrees.
    pub fn walk(&self, collection: CollectionId) -> WithDeep<'_, T> {
        let members = self.members(collection).unwrap_or(&[]);
        WithDeep::new(self, members.iter().copied())
    }

    /// Host of the children collection tracking `node`; None for root-list members.
    ///
    /// Same as `container` for container-aware types, which are the only ones
    /// that record it.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.owner(node).and_then(CollectionId::host)
    }

    /// Members of the children collection tracking `node`, `node` included.
    pub fn with_siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + Clone + '_ {
        self.parent(node)
            .and_then(|host| self.node(host))
            .map(|host| host.children())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    pub fn siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + Clone + '_ {
        self.with_siblings(node).filter(move |id| *id != node)
    }

    pub fn parents(&self, node: NodeId) -> Parents<'_, T> {
        Parents {
            hierarchy: self,
            next: self.parent(node),
        }
    }

    /// Ancestor chain followed by `node` itself.
    pub fn with_parents(&self, node: NodeId) -> impl Iterator<Item = NodeId> + Clone + '_ {
        let this = self.contains(node).then_some(node);
        self.parents(node).chain(this)
    }

    /// Is `parent` a strict ancestor of `node`?
    pub fn is_parent_of(&self, parent: NodeId, node: NodeId) -> bool {
        self.contains(parent) && self.parents(node).any(|id| id == parent)
    }

    /// Is `node` a strict descendant of `parent`?
    pub fn is_child_of(&self, node: NodeId, parent: NodeId) -> bool {
        self.contains(node) && self.deep(parent).any(|id| id == node)
    }

    /// Leaves only: drops every item that has children.
    pub fn flat<'a, I>(&'a self, items: I) -> impl Iterator<Item = NodeId> + 'a
    where
        I: IntoIterator<Item = NodeId>,
        I::IntoIter: 'a,
    {
        items
            .into_iter()
            .filter(move |id| self.node(*id).is_some_and(|entry| !entry.has_children()))
    }

    /// Inner nodes only: keeps items that have children, drops leaves.
    ///
    /// Despite the name this does not return tree roots.
    pub fn roots<'a, I>(&'a self, items: I) -> impl Iterator<Item = NodeId> + 'a
    where
        I: IntoIterator<Item = NodeId>,
        I::IntoIter: 'a,
    {
        items
            .into_iter()
            .filter(move |id| self.node(*id).is_some_and(|entry| entry.has_children()))
    }

    /// `node`, its descendants and its ancestors, without duplicates.
    pub fn in_line(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.with_deep(node).chain(self.parents(node)).unique()
    }

    /// Leaves of the in-line set widened by every ancestor's direct children.
    pub fn in_line_flat(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let uncles = self.parents(node).flat_map(move |parent| {
            self.node(parent)
                .map(|p| p.children())
                .unwrap_or(&[])
                .iter()
                .copied()
        });
        self.flat(self.in_line(node).chain(uncles).unique())
    }

    /// Number of ancestors above `node`.
    pub fn level(&self, node: NodeId) -> usize {
        self.parents(node).count()
    }

    /// Height of the subtree rooted at `node`: 1 for a leaf, 0 when absent.
    pub fn height(&self, node: NodeId) -> usize {
        let mut max_height = 0;
        let mut stack = Vec::new();
        if self.contains(node) {
            stack.push((node, 1));
        }
        while let Some((current, height)) = stack.pop() {
            max_height = max_height.max(height);
            if let Some(entry) = self.node(current) {
                for &child in entry.children() {
                    stack.push((child, height + 1));
                }
            }
        }
        max_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capability::Capabilities;

    #[derive(Debug)]
    struct Plain(&'static str);

    impl Entity for Plain {
        const CAPABILITIES: Capabilities = Capabilities::NONE.with(Capability::ContainerAware);
    }

    #[test]
    fn test_with_deep_is_preorder() {
        let mut h = Hierarchy::new();
        let roots = h.create_root_list();
        let a = h.add_node(Plain("a"));
        let b = h.add_node(Plain("b"));
        let c = h.add_node(Plain("c"));
        let d = h.add_node(Plain("d"));
        h.push(roots, a).unwrap();
        h.push(CollectionId::Children(a), b).unwrap();
        h.push(CollectionId::Children(a), c).unwrap();
        h.push(CollectionId::Children(b), d).unwrap();

        let walk: Vec<_> = h.with_deep(a).collect();
        assert_eq!(walk, vec![a, b, d, c]);
        assert_eq!(h.height(a), 3);
        assert_eq!(h.level(d), 2);
    }
}
