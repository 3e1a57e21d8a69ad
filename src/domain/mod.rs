//! Domain layer: hierarchy arena, capabilities, positions and traversal
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod capability;
pub mod display;
pub mod error;
pub mod events;
pub mod node;
pub mod position;
pub mod traversal;

pub use arena::Hierarchy;
pub use capability::{supports, Capabilities, Capability};
pub use display::TreeDisplay;
pub use error::{HierarchyError, HierarchyResult};
pub use events::{HierarchyEvent, HierarchyListener, ListenerId};
pub use node::{CollectionId, Entity, HierarchyNode, NodeId, RootListId};
pub use position::{compose, encode_segment, PositionFormat};
pub use traversal::{Parents, WithDeep};
