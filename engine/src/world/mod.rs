//! The world model (spec.md §3): entities, kinds, tagged relations,
//! and derived properties (containment, visibility, accessibility,
//! light).

pub mod builder;
mod defaults;
pub mod error;
pub mod id;
pub mod kind;
pub mod property;
pub mod query;
pub mod relation;
pub mod value;

use std::collections::HashMap;

pub use builder::WorldBuilder;
pub use error::WorldError;
pub use id::{Direction, EntityId, Kind, LocationTag};
pub use property::{Activity, Property};
pub use relation::{ManyToOne, TaggedManyToMany};
pub use value::Value;

use kind::KindTree;

/// The authoritative, persistent world model: the only mutable resource
/// in a turn (spec.md §5). `verify`, `before`, and `report` must treat
/// it as read-only; only `carry_out` mutates it.
pub struct World {
    kinds: KindTree,
    location: ManyToOne<LocationTag>,
    exits: TaggedManyToMany<Direction>,
    properties: HashMap<String, Property>,
    activities: HashMap<String, Activity>,
    /// The entity whose turn is being processed.
    pub actor: EntityId,
    /// The narrative viewpoint entity. Almost always equal to `actor`.
    pub player: EntityId,
}

impl World {
    pub fn new() -> Self {
        let mut world = Self {
            kinds: KindTree::new(),
            location: ManyToOne::new(),
            exits: TaggedManyToMany::with_allowed_tags([
                Direction::North,
                Direction::South,
                Direction::East,
                Direction::West,
                Direction::Northeast,
                Direction::Northwest,
                Direction::Southeast,
                Direction::Southwest,
                Direction::Up,
                Direction::Down,
                Direction::In,
                Direction::Out,
            ]),
            properties: HashMap::new(),
            activities: HashMap::new(),
            actor: EntityId::new("player"),
            player: EntityId::new("player"),
        };
        defaults::install(&mut world);
        tracing::debug!(
            properties = world.properties.len(),
            activities = world.activities.len(),
            "world initialized with default properties and activities"
        );
        world
    }

    // -- kinds -----------------------------------------------------------

    pub fn declare_kind(&mut self, kind: impl Into<Kind>, parent: impl Into<Kind>) -> Result<(), WorldError> {
        self.kinds.declare(kind, parent)
    }

    pub fn kind_exists(&self, kind: &Kind) -> bool {
        self.kinds.exists(kind)
    }

    pub fn kind_of(&self, entity: &EntityId) -> Option<&Kind> {
        self.kinds.kind_of(entity)
    }

    pub fn is_a(&self, entity: &EntityId, kind: impl Into<Kind>) -> bool {
        self.kinds.is_a(entity, &kind.into())
    }

    pub fn entities_of_kind(&self, kind: impl Into<Kind>) -> Vec<EntityId> {
        let kind = kind.into();
        self.kinds.entities_of_kind(&kind).cloned().collect()
    }

    pub fn all_entities(&self) -> impl Iterator<Item = &EntityId> {
        self.kinds.all_entities()
    }

    /// Creates an entity: assigns it a kind (spec.md §3: "every non-kind
    /// entity has exactly one kind edge").
    pub fn create_entity(&mut self, id: impl Into<EntityId>, kind: impl Into<Kind>) -> Result<EntityId, WorldError> {
        let id = id.into();
        self.kinds.assign(id.clone(), kind)?;
        tracing::trace!(entity = %id, "entity created");
        Ok(id)
    }

    // -- location relation -------------------------------------------------

    /// Relates `obj` to `at` under `tag`. Rejects relating a room
    /// (spec.md §3: "a room is never the source of a location edge").
    pub fn relate_location(&mut self, obj: EntityId, at: EntityId, tag: LocationTag) -> Result<(), WorldError> {
        if self.is_a(&obj, "room") {
            return Err(WorldError::RoomCannotBeLocated(obj));
        }
        self.location.relate(obj, at, Some(tag));
        Ok(())
    }

    /// Clears `obj`'s location edge, removing it from play. The id
    /// persists so it can be re-placed later (spec.md §3 lifecycle).
    pub fn remove_obj(&mut self, obj: &EntityId) {
        self.location.clear_for(obj);
    }

    pub fn location_of(&self, obj: &EntityId) -> Option<(&EntityId, LocationTag)> {
        self.location.get(obj).map(|(to, tag)| (to, tag.clone().expect("location edges are always tagged")))
    }

    pub fn related_to(&self, at: &EntityId) -> impl Iterator<Item = &EntityId> {
        self.location.related_to(at)
    }

    /// Everything directly located at `at` (ignoring tag).
    pub fn contents_of(&self, at: &EntityId) -> Vec<EntityId> {
        self.related_to(at).cloned().collect()
    }

    /// `contains(outer, inner)`: the reflexive-free transitive closure of
    /// `location`, ignoring tag (spec.md §9 Open Question #1: the newer
    /// argument order is adopted — outer contains inner).
    pub fn contains(&self, outer: &EntityId, inner: &EntityId) -> bool {
        if outer == inner {
            return false;
        }
        let mut current = inner.clone();
        let mut steps = 0usize;
        while let Some((next, _)) = self.location.get(&current) {
            if next == outer {
                return true;
            }
            current = next.clone();
            steps += 1;
            // location never cycles (spec.md §9 design notes); this bound
            // only guards against an authoring bug creating a cycle.
            if steps > 10_000 {
                tracing::warn!(%outer, %inner, "contains: exceeded walk bound, possible location cycle");
                return false;
            }
        }
        false
    }

    // -- exits relation ----------------------------------------------------

    /// Connects two rooms in both directions through an optional door.
    /// When `door` is `None`, `exits(room_a, dir)` points directly at
    /// `room_b`. When `one_way` is true, only the `room_a -> room_b`
    /// edge (and the door's matching side) is created.
    pub fn connect_rooms(
        &mut self,
        room_a: EntityId,
        dir: Direction,
        room_b: EntityId,
        door: Option<EntityId>,
        one_way: bool,
    ) -> Result<(), WorldError> {
        let a_target = door.clone().unwrap_or_else(|| room_b.clone());
        self.exits.relate(room_a.clone(), dir, a_target)?;
        if let Some(door) = &door {
            self.exits.relate(door.clone(), dir.inverse(), room_a.clone())?;
        }
        if !one_way {
            let b_target = door.clone().unwrap_or_else(|| room_a.clone());
            self.exits.relate(room_b.clone(), dir.inverse(), b_target)?;
            if let Some(door) = &door {
                self.exits.relate(door.clone(), dir, room_b)?;
            }
        }
        Ok(())
    }

    pub fn exit(&self, from: &EntityId, dir: Direction) -> Option<&EntityId> {
        self.exits.get(from, &dir)
    }

    pub fn exits_from(&self, from: &EntityId) -> &[(Direction, EntityId)] {
        self.exits.edges_from(from)
    }

    /// The involution pinned by spec.md §8: given a door and one of the
    /// two rooms it connects, returns the other room.
    pub fn door_other_side_from(&self, door: &EntityId, room: &EntityId) -> Option<&EntityId> {
        self.exits
            .edges_from(door)
            .iter()
            .map(|(_, target)| target)
            .find(|target| *target != room)
    }

    // -- properties & activities --------------------------------------------

    pub fn declare_property(&mut self, property: Property) {
        self.properties.insert(property.name().to_string(), property);
    }

    pub fn declare_activity(&mut self, activity: Activity) {
        self.activities.insert(activity.name().to_string(), activity);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.get_mut(name)
    }

    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.get(name)
    }

    pub fn activity_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.activities.get_mut(name)
    }

    /// Reads a property, falling through map -> rules -> static default.
    pub fn get(&self, property: &str, key: &[EntityId]) -> Result<Option<Value>, WorldError> {
        let prop = self
            .properties
            .get(property)
            .ok_or_else(|| WorldError::UnknownProperty(property.to_string()))?;
        prop.get(self, key)
    }

    /// Writes directly into a property's map.
    pub fn set(&mut self, property: &str, key: &[EntityId], value: impl Into<Value>) -> Result<(), WorldError> {
        let prop = self
            .properties
            .get_mut(property)
            .ok_or_else(|| WorldError::UnknownProperty(property.to_string()))?;
        prop.set(key, value)
    }

    pub fn get_bool(&self, property: &str, key: &[EntityId]) -> bool {
        self.get(property, key)
            .ok()
            .flatten()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn get_text(&self, property: &str, key: &[EntityId]) -> Option<String> {
        self.get(property, key).ok().flatten().map(|v| v.resolve_text(self, &key[0]))
    }

    pub fn get_id(&self, property: &str, key: &[EntityId]) -> Option<EntityId> {
        self.get(property, key).ok().flatten().and_then(|v| v.as_id().cloned())
    }

    /// Calls a (mapless) activity.
    pub fn perform(&self, activity: &str, key: &[EntityId]) -> Result<Value, WorldError> {
        let act = self
            .activities
            .get(activity)
            .ok_or_else(|| WorldError::UnknownActivity(activity.to_string()))?;
        act.call(self, key)
    }

    // -- actor / player ------------------------------------------------------

    /// Swaps `actor` for the duration of a closure, restored on all
    /// exits including panics (spec.md §3: "restored on all exits").
    pub fn with_actor<R>(&mut self, actor: EntityId, f: impl FnOnce(&mut World) -> R) -> R {
        struct Restore<'a> {
            world: &'a mut World,
            prev: EntityId,
        }
        impl<'a> Drop for Restore<'a> {
            fn drop(&mut self) {
                std::mem::swap(&mut self.world.actor, &mut self.prev);
            }
        }
        let prev = std::mem::replace(&mut self.actor, actor);
        let mut guard = Restore { world: self, prev };
        f(&mut *guard.world)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_room_is_never_the_source_of_a_location_edge() {
        let mut world = World::new();
        let room = world.create_entity("lobby", "room").unwrap();
        let hall = world.create_entity("hall", "room").unwrap();
        let err = world.relate_location(room, hall, LocationTag::ContainedBy).unwrap_err();
        assert!(matches!(err, WorldError::RoomCannotBeLocated(_)));
    }

    #[test]
    fn contains_is_the_reflexive_free_transitive_closure_of_location() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let box_ = world.create_entity("box", "container").unwrap();
        let ball = world.create_entity("ball", "thing").unwrap();
        world.relate_location(box_.clone(), lobby.clone(), LocationTag::ContainedBy).unwrap();
        world.relate_location(ball.clone(), box_.clone(), LocationTag::ContainedBy).unwrap();

        assert!(world.contains(&lobby, &ball));
        assert!(world.contains(&box_, &ball));
        assert!(!world.contains(&ball, &ball));
        assert!(!world.contains(&ball, &lobby));
    }

    #[test]
    fn connect_rooms_creates_the_inverse_direction_edge() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let hall = world.create_entity("hall", "room").unwrap();
        world
            .connect_rooms(lobby.clone(), Direction::North, hall.clone(), None, false)
            .unwrap();

        assert_eq!(world.exit(&lobby, Direction::North), Some(&hall));
        assert_eq!(world.exit(&hall, Direction::South), Some(&lobby));
    }

    #[test]
    fn door_other_side_from_is_an_involution() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let hall = world.create_entity("hall", "room").unwrap();
        let door = world.create_entity("plain_door", "door").unwrap();
        world
            .connect_rooms(lobby.clone(), Direction::North, hall.clone(), Some(door.clone()), false)
            .unwrap();

        assert_eq!(world.door_other_side_from(&door, &lobby), Some(&hall));
        assert_eq!(world.door_other_side_from(&door, &hall), Some(&lobby));
        assert_eq!(world.exits_from(&door).len(), 2);
    }

    #[test]
    fn with_actor_restores_the_previous_actor_on_exit() {
        let mut world = World::new();
        world.player = EntityId::new("player");
        world.actor = EntityId::new("player");
        let npc = EntityId::new("npc");

        world.with_actor(npc.clone(), |w| {
            assert_eq!(w.actor, npc);
        });

        assert_eq!(world.actor, EntityId::new("player"));
    }

    #[test]
    fn set_then_get_round_trips_exactly() {
        let mut world = World::new();
        let ball = world.create_entity("ball", "thing").unwrap();
        world.set("name", &[ball.clone()], "red ball").unwrap();
        assert_eq!(world.get_text("name", &[ball]), Some("red ball".to_string()));
    }
}
