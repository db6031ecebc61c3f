//! A thin TOML loader for `--world <path>` (spec.md's ambient Config
//! supplement: "constructible from a TOML file via a thin loader in
//! `cli`"). Describes rooms, things, and doors declaratively and
//! replays them through [`WorldBuilder`], plus an optional `[engine]`
//! table for [`EngineConfig`] — matching the teacher's
//! `CliConfig::from_env`-plus-flags pattern of one file covering both
//! content and process tunables.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use textadv_engine::world::{Direction, EntityId, LocationTag, World, WorldBuilder};
use textadv_engine::EngineConfig;

#[derive(Debug, Deserialize)]
struct WorldFile {
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    room: Vec<RoomDef>,
    #[serde(default)]
    thing: Vec<ThingDef>,
    #[serde(default)]
    door: Vec<DoorDef>,
    player: PlayerDef,
}

#[derive(Debug, Deserialize)]
struct RoomDef {
    id: String,
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThingDef {
    id: String,
    #[serde(default = "default_kind")]
    kind: String,
    name: Option<String>,
    description: Option<String>,
    location: String,
    #[serde(default = "default_tag")]
    relation: String,
    #[serde(default)]
    makes_light: bool,
    #[serde(default)]
    openable: bool,
    #[serde(default)]
    open: bool,
}

fn default_kind() -> String {
    "thing".to_string()
}

fn default_tag() -> String {
    "contained_by".to_string()
}

#[derive(Debug, Deserialize)]
struct DoorDef {
    id: String,
    name: Option<String>,
    from: String,
    to: String,
    direction: String,
    #[serde(default)]
    locked: bool,
}

#[derive(Debug, Deserialize)]
struct PlayerDef {
    id: String,
    location: String,
}

fn tag_from_str(s: &str) -> LocationTag {
    match s {
        "supported_by" => LocationTag::SupportedBy,
        "owned_by" => LocationTag::OwnedBy,
        "part_of" => LocationTag::PartOf,
        "worn_by" => LocationTag::WornBy,
        _ => LocationTag::ContainedBy,
    }
}

/// Loads a world from `path` if given, falling back to the built-in
/// smoke-test world ([`crate::demo_world`]) otherwise, plus whatever
/// `[engine]` table the file carried (or `EngineConfig::default()`).
pub fn load(path: Option<&Path>) -> Result<(World, EngineConfig)> {
    let Some(path) = path else {
        return Ok((crate::demo_world::build()?, EngineConfig::default()));
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("reading world file {}", path.display()))?;
    let file: WorldFile =
        toml::from_str(&text).with_context(|| format!("parsing world file {}", path.display()))?;

    let mut builder = WorldBuilder::new();
    let mut names: HashMap<String, String> = HashMap::new();

    for room in &file.room {
        builder = builder.room(room.id.as_str());
        if let Some(name) = &room.name {
            names.insert(room.id.clone(), name.clone());
        }
    }
    for door in &file.door {
        builder = builder.entity(door.id.as_str(), "door");
        let dir = Direction::parse(&door.direction)
            .with_context(|| format!("unknown direction '{}' for door '{}'", door.direction, door.id))?;
        builder = builder.connect_via_door(door.from.as_str(), dir, door.to.as_str(), door.id.as_str());
        builder = builder
            .set("openable", [EntityId::new(door.id.as_str())], true)
            .set("lockable", [EntityId::new(door.id.as_str())], true)
            .set("locked", [EntityId::new(door.id.as_str())], door.locked);
        if let Some(name) = &door.name {
            names.insert(door.id.clone(), name.clone());
        }
    }
    for thing in &file.thing {
        builder = builder
            .entity(thing.id.as_str(), thing.kind.as_str())
            .locate(thing.id.as_str(), thing.location.as_str(), tag_from_str(&thing.relation));
        if thing.makes_light {
            builder = builder.set("makes_light", [EntityId::new(thing.id.as_str())], true);
        }
        if thing.openable {
            builder = builder
                .set("openable", [EntityId::new(thing.id.as_str())], true)
                .set("open", [EntityId::new(thing.id.as_str())], thing.open);
        }
        if let Some(name) = &thing.name {
            names.insert(thing.id.clone(), name.clone());
        }
    }

    builder = builder
        .entity(file.player.id.as_str(), "person")
        .locate(file.player.id.as_str(), file.player.location.as_str(), LocationTag::ContainedBy)
        .player(file.player.id.as_str());

    for (id, name) in &names {
        builder = builder.set("name", [EntityId::new(id.as_str())], name.as_str());
    }
    for room in &file.room {
        if let Some(description) = &room.description {
            builder = builder.set("description", [EntityId::new(room.id.as_str())], description.as_str());
        }
    }
    for thing in &file.thing {
        if let Some(description) = &thing.description {
            builder = builder.set("description", [EntityId::new(thing.id.as_str())], description.as_str());
        }
    }

    let world = builder.build().context("building world from world file")?;
    Ok((world, file.engine))
}
