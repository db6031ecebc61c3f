//! Kind hierarchy (spec.md §3, §4).
//!
//! Kinds form a tree via the `kind_of` relation. `is_a(o, k)` walks
//! `kind_of` from `kind(o)` upward. A handful of kinds are predeclared
//! so the world model and standard verb library have somewhere to
//! attach their defaults: `kind` (root), `room`, `thing`, and under
//! `thing`: `door`, `container`, `supporter`, `person`, `backdrop`;
//! plus `region`.

use std::collections::HashMap;

use super::error::WorldError;
use super::id::{EntityId, Kind};

/// The kind tree: each non-root kind has exactly one parent.
#[derive(Debug, Clone, Default)]
pub struct KindTree {
    parents: HashMap<Kind, Kind>,
    /// Which entity was assigned which kind (`kind(o)`).
    entity_kind: HashMap<EntityId, Kind>,
}

impl KindTree {
    pub fn new() -> Self {
        let mut tree = Self::default();
        tree.declare_root();
        tree
    }

    fn declare_root(&mut self) {
        // The root has no parent; it is simply present in no map entry.
        // We still register the predeclared tree beneath it.
        self.parents
            .entry(Kind::new("kind"))
            .or_insert_with(|| Kind::new("kind"));
        for (child, parent) in [
            ("room", "kind"),
            ("thing", "kind"),
            ("region", "kind"),
            ("door", "thing"),
            ("container", "thing"),
            ("supporter", "thing"),
            ("person", "thing"),
            ("backdrop", "thing"),
        ] {
            self.parents.insert(Kind::new(child), Kind::new(parent));
        }
    }

    /// Declares a new kind beneath an existing parent. Authors call this
    /// to add game-specific kinds (e.g. `"lamp"` under `"thing"`).
    pub fn declare(&mut self, kind: impl Into<Kind>, parent: impl Into<Kind>) -> Result<(), WorldError> {
        let kind = kind.into();
        let parent = parent.into();
        if kind.as_str() != "kind" && !self.exists(&parent) {
            return Err(WorldError::UnknownKind(parent));
        }
        if self.parents.contains_key(&kind) && kind.as_str() != "kind" {
            return Err(WorldError::KindAlreadyDeclared(kind));
        }
        self.parents.insert(kind, parent);
        Ok(())
    }

    pub fn exists(&self, kind: &Kind) -> bool {
        kind.as_str() == "kind" || self.parents.contains_key(kind)
    }

    pub fn parent_of(&self, kind: &Kind) -> Option<&Kind> {
        if kind.as_str() == "kind" {
            return None;
        }
        self.parents.get(kind)
    }

    /// Assigns a kind to an entity. An entity may only be assigned a
    /// kind once (spec.md §3 invariant: "every non-kind entity has
    /// exactly one kind edge").
    pub fn assign(&mut self, entity: EntityId, kind: impl Into<Kind>) -> Result<(), WorldError> {
        let kind = kind.into();
        if !self.exists(&kind) {
            return Err(WorldError::UnknownKind(kind));
        }
        if self.entity_kind.contains_key(&entity) {
            return Err(WorldError::KindAlreadyAssigned(entity));
        }
        self.entity_kind.insert(entity, kind);
        Ok(())
    }

    pub fn kind_of(&self, entity: &EntityId) -> Option<&Kind> {
        self.entity_kind.get(entity)
    }

    /// `is_a(o, k)`: walks `kind_of` from `kind(o)` upward looking for `k`.
    pub fn is_a(&self, entity: &EntityId, kind: &Kind) -> bool {
        let Some(start) = self.kind_of(entity) else {
            return false;
        };
        self.kind_is_a(start, kind)
    }

    /// Same walk, but starting directly from a kind rather than an entity
    /// — used by grammar kind-match and by `is_a` itself.
    pub fn kind_is_a(&self, start: &Kind, kind: &Kind) -> bool {
        let mut current = start.clone();
        loop {
            if &current == kind {
                return true;
            }
            match self.parent_of(&current) {
                Some(parent) if parent != &current => current = parent.clone(),
                _ => return current.as_str() == "kind" && kind.as_str() == "kind",
            }
        }
    }

    pub fn entities_of_kind<'a>(&'a self, kind: &'a Kind) -> impl Iterator<Item = &'a EntityId> + 'a {
        self.entity_kind
            .iter()
            .filter(move |(_, k)| self.kind_is_a(k, kind))
            .map(|(e, _)| e)
    }

    pub fn all_entities(&self) -> impl Iterator<Item = &EntityId> {
        self.entity_kind.keys()
    }
}
