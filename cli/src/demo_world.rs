//! The tiny smoke-test world used to exercise the engine end to end
//! (spec.md §8): a lobby and a hall joined by a door, a red ball, and a
//! cardboard box, enough to walk through every scenario in the spec by
//! hand.

use textadv_engine::world::{Direction, EntityId, LocationTag, World, WorldBuilder, WorldError};

pub fn build() -> Result<World, WorldError> {
    let world = WorldBuilder::new()
        .room("lobby")
        .room("hall")
        .entity("plain_door", "door")
        .connect_via_door("lobby", Direction::North, "hall", "plain_door")
        .set("name", [EntityId::new("plain_door")], "plain door")
        .set("openable", [EntityId::new("plain_door")], true)
        .entity("lamp", "thing")
        .set("name", [EntityId::new("lamp")], "ceiling lamp")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("ball", "thing")
        .set("name", [EntityId::new("ball")], "red ball")
        .locate("ball", "lobby", LocationTag::ContainedBy)
        .entity("box", "container")
        .set("name", [EntityId::new("box")], "cardboard box")
        .set("openable", [EntityId::new("box")], true)
        .locate("box", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .set("name", [EntityId::new("player")], "yourself")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()?;

    Ok(world)
}
