#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use recursive_hierarchy::domain::{
    Capabilities, Capability, CollectionId, Entity, Hierarchy, HierarchyEvent, NodeId,
};

/// Entity with every capability: positioned, soft-deletable, container-aware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub position: Option<String>,
    pub deleted: bool,
}

impl Item {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Entity for Item {
    const CAPABILITIES: Capabilities = Capabilities::ALL;

    fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    fn set_position(&mut self, position: String) {
        self.position = Some(position);
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Orderable, but without container links.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub position: Option<String>,
}

impl Entity for Row {
    const CAPABILITIES: Capabilities = Capabilities::NONE.with(Capability::Orderable);

    fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    fn set_position(&mut self, position: String) {
        self.position = Some(position);
    }
}

/// No capabilities at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub &'static str);

impl Entity for Tag {
    const CAPABILITIES: Capabilities = Capabilities::NONE;
}

pub type EventLog = Arc<Mutex<Vec<HierarchyEvent>>>;

pub fn record<T: Entity>(hierarchy: &mut Hierarchy<T>) -> EventLog {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    hierarchy.subscribe(move |event: &HierarchyEvent| sink.lock().unwrap().push(event.clone()));
    log
}

pub fn position_of(hierarchy: &Hierarchy<Item>, node: NodeId) -> Option<String> {
    hierarchy.position(node).map(str::to_owned)
}

/// Sample tree used across tests:
///
/// ```text
/// roots
/// └── A
///     ├── B
///     │   └── D
///     └── C
/// ```
pub struct Sample {
    pub tree: Hierarchy<Item>,
    pub roots: CollectionId,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub d: NodeId,
}

pub fn sample() -> Sample {
    let mut tree = Hierarchy::new();
    let roots = tree.create_root_list();
    let a = tree.add_node(Item::new("A"));
    let b = tree.add_node(Item::new("B"));
    let c = tree.add_node(Item::new("C"));
    let d = tree.add_node(Item::new("D"));
    tree.push(roots, a).unwrap();
    tree.push(CollectionId::Children(a), b).unwrap();
    tree.push(CollectionId::Children(a), c).unwrap();
    tree.push(CollectionId::Children(b), d).unwrap();
    Sample {
        tree,
        roots,
        a,
        b,
        c,
        d,
    }
}
