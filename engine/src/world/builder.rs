//! `WorldBuilder`: the authoring façade over [`World`] (spec.md §3).
//!
//! Mirrors the fluent template builders the teacher uses for actor and
//! scenario authoring: a chain of `with_*` calls collects a description
//! of the world, and `build()` replays it against a fresh [`World`],
//! surfacing the first error rather than panicking mid-construction.

use super::error::WorldError;
use super::id::{Direction, EntityId, Kind, LocationTag};
use super::property::{Activity, Property};
use super::World;

enum Step {
    DeclareKind(Kind, Kind),
    CreateEntity(EntityId, Kind),
    RelateLocation(EntityId, EntityId, LocationTag),
    ConnectRooms(EntityId, Direction, EntityId, Option<EntityId>, bool),
    DeclareProperty(Property),
    DeclareActivity(Activity),
    SetProperty(String, Vec<EntityId>, super::value::Value),
    SetPlayer(EntityId),
}

/// Collects world-authoring steps and replays them in order against a
/// fresh [`World`], so a scenario can be described declaratively and
/// built in one shot.
#[derive(Default)]
pub struct WorldBuilder {
    steps: Vec<Step>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_kind(mut self, kind: impl Into<Kind>, parent: impl Into<Kind>) -> Self {
        self.steps.push(Step::DeclareKind(kind.into(), parent.into()));
        self
    }

    pub fn entity(mut self, id: impl Into<EntityId>, kind: impl Into<Kind>) -> Self {
        self.steps.push(Step::CreateEntity(id.into(), kind.into()));
        self
    }

    pub fn room(mut self, id: impl Into<EntityId>) -> Self {
        self.steps.push(Step::CreateEntity(id.into(), Kind::new("room")));
        self
    }

    pub fn locate(mut self, obj: impl Into<EntityId>, at: impl Into<EntityId>, tag: LocationTag) -> Self {
        self.steps.push(Step::RelateLocation(obj.into(), at.into(), tag));
        self
    }

    pub fn connect(
        mut self,
        room_a: impl Into<EntityId>,
        dir: Direction,
        room_b: impl Into<EntityId>,
    ) -> Self {
        self.steps
            .push(Step::ConnectRooms(room_a.into(), dir, room_b.into(), None, false));
        self
    }

    pub fn connect_via_door(
        mut self,
        room_a: impl Into<EntityId>,
        dir: Direction,
        room_b: impl Into<EntityId>,
        door: impl Into<EntityId>,
    ) -> Self {
        self.steps.push(Step::ConnectRooms(
            room_a.into(),
            dir,
            room_b.into(),
            Some(door.into()),
            false,
        ));
        self
    }

    pub fn connect_one_way(
        mut self,
        room_a: impl Into<EntityId>,
        dir: Direction,
        room_b: impl Into<EntityId>,
    ) -> Self {
        self.steps
            .push(Step::ConnectRooms(room_a.into(), dir, room_b.into(), None, true));
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.steps.push(Step::DeclareProperty(property));
        self
    }

    pub fn activity(mut self, activity: Activity) -> Self {
        self.steps.push(Step::DeclareActivity(activity));
        self
    }

    pub fn set(
        mut self,
        property: impl Into<String>,
        key: impl IntoIterator<Item = EntityId>,
        value: impl Into<super::value::Value>,
    ) -> Self {
        self.steps
            .push(Step::SetProperty(property.into(), key.into_iter().collect(), value.into()));
        self
    }

    pub fn player(mut self, id: impl Into<EntityId>) -> Self {
        self.steps.push(Step::SetPlayer(id.into()));
        self
    }

    pub fn build(self) -> Result<World, WorldError> {
        let mut world = World::new();
        for step in self.steps {
            match step {
                Step::DeclareKind(kind, parent) => world.declare_kind(kind, parent)?,
                Step::CreateEntity(id, kind) => {
                    world.create_entity(id, kind)?;
                }
                Step::RelateLocation(obj, at, tag) => world.relate_location(obj, at, tag)?,
                Step::ConnectRooms(a, dir, b, door, one_way) => {
                    world.connect_rooms(a, dir, b, door, one_way)?
                }
                Step::DeclareProperty(property) => world.declare_property(property),
                Step::DeclareActivity(activity) => world.declare_activity(activity),
                Step::SetProperty(name, key, value) => world.set(&name, &key, value)?,
                Step::SetPlayer(id) => {
                    world.player = id.clone();
                    world.actor = id;
                }
            }
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_replays_steps_in_order_against_a_fresh_world() {
        let world = WorldBuilder::new()
            .room("lobby")
            .room("hall")
            .connect("lobby", Direction::North, "hall")
            .entity("ball", "thing")
            .locate("ball", "lobby", LocationTag::ContainedBy)
            .entity("player", "person")
            .locate("player", "lobby", LocationTag::ContainedBy)
            .player("player")
            .set("name", [EntityId::new("ball")], "red ball")
            .build()
            .unwrap();

        assert_eq!(world.exit(&EntityId::new("lobby"), Direction::North), Some(&EntityId::new("hall")));
        assert!(world.contains(&EntityId::new("lobby"), &EntityId::new("ball")));
        assert_eq!(world.player, EntityId::new("player"));
        assert_eq!(world.get_text("name", &[EntityId::new("ball")]), Some("red ball".to_string()));
    }

    #[test]
    fn builder_surfaces_the_first_error_instead_of_panicking() {
        let result = WorldBuilder::new()
            .entity("ball", "thing")
            .entity("ball", "thing")
            .build();
        assert!(result.is_err());
    }
}
