//! Capability detection for entity types.
//!
//! A capability is declared once per entity type through [`Entity::CAPABILITIES`].
//! The set is a compile-time constant, so checking it on every mutation costs a
//! bit test and never inspects the entity value itself.

use std::fmt;

use crate::domain::node::Entity;

/// Optional behaviour an entity type can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Carries a mutable dotted `position` string.
    Orderable,
    /// Carries a `deleted` flag; deleted members are skipped when ordering.
    SoftDeletable,
    /// Keeps a back-reference to the node hosting its collection, and hosts children of its own.
    ContainerAware,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::Orderable => 0b001,
            Capability::SoftDeletable => 0b010,
            Capability::ContainerAware => 0b100,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Orderable => "orderable",
            Capability::SoftDeletable => "soft-deletable",
            Capability::ContainerAware => "container-aware",
        };
        f.write_str(name)
    }
}

/// Set of capabilities supported by an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const ALL: Capabilities = Capabilities(0b111);

    pub const fn with(self, capability: Capability) -> Self {
        Capabilities(self.0 | capability.bit())
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        [
            Capability::Orderable,
            Capability::SoftDeletable,
            Capability::ContainerAware,
        ]
        .into_iter()
        .filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

/// Does entity type `T` support `capability`?
pub const fn supports<T: Entity>(capability: Capability) -> bool {
    T::CAPABILITIES.contains(capability)
}
