//! Self-maintaining ordered hierarchies.
//!
//! A [`Hierarchy`](domain::Hierarchy) keeps entities in ordered collections:
//! free-standing root lists, and one children collection per node. Membership
//! is exclusive, and for orderable entity types every mutation rewrites the
//! dotted `position` of the affected members (`"00"`, `"00.01"`, ...),
//! cascading through subtrees whose path changed. Soft-deleted members stay
//! physically present but are skipped when ordering.
//!
//! ```
//! use recursive_hierarchy::domain::{Capabilities, Capability, CollectionId, Entity, Hierarchy};
//!
//! #[derive(Debug, Default)]
//! struct Category {
//!     name: String,
//!     position: Option<String>,
//! }
//!
//! impl Entity for Category {
//!     const CAPABILITIES: Capabilities = Capabilities::NONE
//!         .with(Capability::Orderable)
//!         .with(Capability::ContainerAware);
//!
//!     fn position(&self) -> Option<&str> {
//!         self.position.as_deref()
//!     }
//!
//!     fn set_position(&mut self, position: String) {
//!         self.position = Some(position);
//!     }
//! }
//!
//! let mut tree = Hierarchy::new();
//! let roots = tree.create_root_list();
//! let books = tree.add_node(Category { name: "books".into(), ..Default::default() });
//! let poetry = tree.add_node(Category { name: "poetry".into(), ..Default::default() });
//! tree.push(roots, books).unwrap();
//! tree.push(CollectionId::Children(books), poetry).unwrap();
//!
//! assert_eq!(tree.position(poetry), Some("00.00"));
//! assert_eq!(tree.parents(poetry).collect::<Vec<_>>(), vec![books]);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod util;

pub use errors::{Error, Result};
