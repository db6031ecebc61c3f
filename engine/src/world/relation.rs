//! Relations (spec.md §3): tagged many-to-one (`location`) and tagged
//! many-to-many (`exits`).
//!
//! Both variants maintain a reverse index so queries like "what's in
//! this room" don't need a linear scan, and both are required to keep
//! forward/reverse indexes consistent under every mutation (spec.md §5:
//! "no externally visible state in which one side is stale").

use std::collections::{HashMap, HashSet};

use super::error::WorldError;
use super::id::EntityId;

/// A many-to-one relation where each source has at most one outgoing
/// edge, optionally tagged (e.g. `location(o) -> (o', tag?)`).
#[derive(Debug, Clone, Default)]
pub struct ManyToOne<Tag: Clone + Eq + std::hash::Hash> {
    forward: HashMap<EntityId, (EntityId, Option<Tag>)>,
    reverse: HashMap<EntityId, HashSet<EntityId>>,
}

impl<Tag: Clone + Eq + std::hash::Hash> ManyToOne<Tag> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relates `from` to `to` with an optional tag, replacing any prior
    /// edge from `from` and keeping the reverse index consistent.
    pub fn relate(&mut self, from: EntityId, to: EntityId, tag: Option<Tag>) {
        self.clear_for(&from);
        self.reverse.entry(to.clone()).or_default().insert(from.clone());
        self.forward.insert(from, (to, tag));
    }

    /// Removes `from`'s outgoing edge, if any, updating the reverse index.
    pub fn clear_for(&mut self, from: &EntityId) {
        if let Some((old_to, _)) = self.forward.remove(from) {
            if let Some(set) = self.reverse.get_mut(&old_to) {
                set.remove(from);
                if set.is_empty() {
                    self.reverse.remove(&old_to);
                }
            }
        }
    }

    pub fn get(&self, from: &EntityId) -> Option<&(EntityId, Option<Tag>)> {
        self.forward.get(from)
    }

    pub fn related_to(&self, to: &EntityId) -> impl Iterator<Item = &EntityId> {
        self.reverse.get(to).into_iter().flatten()
    }

    pub fn invariant_holds(&self) -> bool {
        self.forward
            .iter()
            .all(|(from, (to, _))| self.reverse.get(to).is_some_and(|set| set.contains(from)))
    }
}

/// A tagged many-to-many relation where at most one edge exists per
/// `(source, tag)` pair (e.g. `exits(room) -> list of {obj, tag}`).
#[derive(Debug, Clone, Default)]
pub struct TaggedManyToMany<Tag: Clone + Eq + std::hash::Hash> {
    edges: HashMap<EntityId, Vec<(Tag, EntityId)>>,
    allowed_tags: Option<HashSet<Tag>>,
}

impl<Tag: Clone + Eq + std::hash::Hash + std::fmt::Debug> TaggedManyToMany<Tag> {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            allowed_tags: None,
        }
    }

    pub fn with_allowed_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            edges: HashMap::new(),
            allowed_tags: Some(tags.into_iter().collect()),
        }
    }

    /// Sets (replacing any existing) the edge for `(source, tag)`.
    pub fn relate(&mut self, source: EntityId, tag: Tag, target: EntityId) -> Result<(), WorldError> {
        if let Some(allowed) = &self.allowed_tags {
            if !allowed.contains(&tag) {
                return Err(WorldError::TagNotAllowed {
                    relation: "tagged_many_to_many".to_string(),
                    tag: format!("{tag:?}"),
                });
            }
        }
        let list = self.edges.entry(source).or_default();
        list.retain(|(t, _)| t != &tag);
        list.push((tag, target));
        Ok(())
    }

    pub fn get(&self, source: &EntityId, tag: &Tag) -> Option<&EntityId> {
        self.edges
            .get(source)?
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, target)| target)
    }

    pub fn edges_from(&self, source: &EntityId) -> &[(Tag, EntityId)] {
        self.edges.get(source).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn remove(&mut self, source: &EntityId, tag: &Tag) {
        if let Some(list) = self.edges.get_mut(source) {
            list.retain(|(t, _)| t != tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relate_then_clear_leaves_indexes_as_if_neither_call_happened() {
        let mut rel: ManyToOne<&'static str> = ManyToOne::new();
        let a = EntityId::new("a");
        let b = EntityId::new("b");

        rel.relate(a.clone(), b.clone(), Some("contained_by"));
        rel.clear_for(&a);

        assert!(rel.get(&a).is_none());
        assert_eq!(rel.related_to(&b).count(), 0);
        assert!(rel.invariant_holds());
    }

    #[test]
    fn relate_replaces_prior_edge_and_keeps_reverse_index_consistent() {
        let mut rel: ManyToOne<&'static str> = ManyToOne::new();
        let o = EntityId::new("ball");
        let room_a = EntityId::new("lobby");
        let room_b = EntityId::new("hall");

        rel.relate(o.clone(), room_a.clone(), Some("contained_by"));
        rel.relate(o.clone(), room_b.clone(), Some("contained_by"));

        assert_eq!(rel.related_to(&room_a).count(), 0);
        assert_eq!(rel.related_to(&room_b).collect::<Vec<_>>(), vec![&o]);
        assert!(rel.invariant_holds());
    }

    #[test]
    fn tagged_many_to_many_has_at_most_one_edge_per_source_tag() {
        let mut exits = TaggedManyToMany::with_allowed_tags(["north", "south"]);
        let lobby = EntityId::new("lobby");
        let hall = EntityId::new("hall");
        let den = EntityId::new("den");

        exits.relate(lobby.clone(), "north", hall.clone()).unwrap();
        exits.relate(lobby.clone(), "north", den.clone()).unwrap();

        assert_eq!(exits.get(&lobby, &"north"), Some(&den));
        assert_eq!(exits.edges_from(&lobby).len(), 1);
    }

    #[test]
    fn tagged_many_to_many_rejects_tags_outside_its_alphabet() {
        let mut exits = TaggedManyToMany::with_allowed_tags(["north"]);
        let err = exits
            .relate(EntityId::new("lobby"), "west", EntityId::new("hall"))
            .unwrap_err();
        assert!(matches!(err, WorldError::TagNotAllowed { .. }));
    }
}
