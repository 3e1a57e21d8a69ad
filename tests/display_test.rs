//! Tests for text rendering of hierarchies

mod common;

use common::{sample, Item};
use recursive_hierarchy::domain::{CollectionId, Hierarchy, TreeDisplay};

#[test]
fn given_sample_when_rendering_then_every_node_is_labelled_with_its_position() {
    let s = sample();

    let rendered = s.tree.to_tree(s.roots).unwrap().to_string();

    assert!(rendered.contains("00 A"));
    assert!(rendered.contains("00.00 B"));
    assert!(rendered.contains("00.00.00 D"));
    assert!(rendered.contains("00.01 C"));
    let a_line = rendered.lines().position(|l| l.ends_with("00 A")).unwrap();
    let d_line = rendered.lines().position(|l| l.ends_with("00.00.00 D")).unwrap();
    let c_line = rendered.lines().position(|l| l.ends_with("00.01 C")).unwrap();
    assert!(a_line < d_line && d_line < c_line, "pre-order layout:\n{}", rendered);
}

#[test]
fn given_deleted_node_when_rendering_then_it_is_marked() {
    let mut s = sample();
    s.tree.update(s.c, |item| item.deleted = true).unwrap();

    let rendered = s.tree.to_tree(CollectionId::Children(s.a)).unwrap().to_string();

    assert!(rendered.starts_with("00 A"));
    assert!(rendered.contains("00.01 C (deleted)"));
    assert_eq!(s.tree.label(s.b), "00.00 B");
}

#[test]
fn given_long_chain_when_rendering_then_every_level_is_present() {
    let mut h: Hierarchy<Item> = Hierarchy::new();
    let roots = h.create_root_list();
    let mut host = h.add_node(Item::new("level-0"));
    h.push(roots, host).unwrap();
    for level in 1..1_000 {
        let node = h.add_node(Item::new(&format!("level-{}", level)));
        h.push(CollectionId::Children(host), node).unwrap();
        host = node;
    }

    let tree = h.to_tree(roots).unwrap();

    let mut depth = 0;
    let mut current = &tree;
    while let Some(child) = current.leaves.first() {
        depth += 1;
        current = child;
    }
    assert_eq!(depth, 1_000);
    assert!(current.root.ends_with("level-999"));
}
