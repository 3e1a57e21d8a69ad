use std::fmt::Display;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::Hierarchy;
use crate::domain::error::{HierarchyError, HierarchyResult};
use crate::domain::node::{CollectionId, Entity, NodeId};

/// Renders a collection and everything below it as a text tree.
pub trait TreeDisplay {
    fn to_tree(&self, collection: CollectionId) -> HierarchyResult<Tree<String>>;
}

impl<T: Entity + Display> TreeDisplay for Hierarchy<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree(&self, collection: CollectionId) -> HierarchyResult<Tree<String>> {
        let root = match collection.host() {
            Some(host) => self.label(host),
            None => collection.to_string(),
        };

        // (subtree being built, members still to visit, next member)
        let mut stack: Vec<(Tree<String>, &[NodeId], usize)> =
            vec![(Tree::new(root), self.members(collection)?, 0)];
        while let Some((_, members, next)) = stack.last_mut() {
            if let Some(&member) = members.get(*next) {
                *next += 1;
                if let Some(node) = self.node(member) {
                    stack.push((Tree::new(self.label(member)), node.children(), 0));
                }
                continue;
            }
            let Some((finished, _, _)) = stack.pop() else {
                break;
            };
            match stack.last_mut() {
                Some((parent, _, _)) => {
                    parent.push(finished);
                }
                None => return Ok(finished),
            }
        }
        Err(HierarchyError::CollectionNotFound(collection))
    }
}

impl<T: Entity + Display> Hierarchy<T> {
    /// One-line description of a node: position, payload and a deleted marker.
    pub fn label(&self, node: NodeId) -> String {
        let Some(entry) = self.node(node) else {
            return format!("<missing {}>", node);
        };
        let mut label = match entry.position() {
            Some(position) => format!("{} {}", position, entry.data()),
            None => entry.data().to_string(),
        };
        if entry.is_deleted() {
            label.push_str(" (deleted)");
        }
        label
    }
}
