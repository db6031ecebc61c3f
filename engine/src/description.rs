//! Room and object descriptions (spec.md §4.7): a heading, the stored
//! description paragraph, and a listing of what's notably visible
//! underneath, accounting for darkness and for nested open/transparent
//! containers. Used directly by `looking`/`examining` ([`crate::verbs`])
//! and by [`crate::turn`]'s re-render-on-change hook.

use crate::text::helpers;
use crate::world::{query, EntityId, World};

/// The room's heading, its stored `description`, and a listing of its
/// visible contents — or, if the room has no light, a canned darkness
/// message instead.
pub fn describe_room(world: &World, actor: &EntityId) -> String {
    let Some(room) = query::nearest_room(world, actor) else {
        return "You are nowhere in particular.".to_string();
    };

    if !query::contains_light(world, &room) {
        return "Darkness\n\nIt is pitch dark, and you can't see a thing.".to_string();
    }

    let mut out = vec![helpers::the_cap(world, &room)];
    if let Some(desc) = world.get_text("description", std::slice::from_ref(&room)) {
        out.push(desc);
    }
    if let Some(listing) = notable_contents_listing(world, actor, &room, "here") {
        out.push(listing);
    }
    out.join("\n\n")
}

/// An entity's own `description`, its open/closed or worn state if
/// relevant, and (if it's an open or transparent container, or a
/// supporter) a listing of what it's notably holding.
pub fn describe_entity(world: &World, actor: &EntityId, entity: &EntityId) -> String {
    if !query::visible_to(world, actor, entity) {
        return "You can't see any such thing.".to_string();
    }

    let mut out = vec![describe_entity_body(world, entity)];
    let relation = if world.is_a(entity, "supporter") { "on" } else { "in" };
    if let Some(listing) = notable_contents_listing(world, actor, entity, relation) {
        out.push(listing);
    }
    out.join("\n\n")
}

fn describe_entity_body(world: &World, entity: &EntityId) -> String {
    let mut body = world
        .get_text("description", std::slice::from_ref(entity))
        .unwrap_or_else(|| format!("You see nothing special about {}.", helpers::the(world, entity)));

    if world.get_bool("openable", std::slice::from_ref(entity)) {
        let locked_note = if world.get_bool("lockable", std::slice::from_ref(entity)) && world.get_bool("locked", std::slice::from_ref(entity)) {
            " and locked"
        } else {
            ""
        };
        let state = if world.get_bool("open", std::slice::from_ref(entity)) { "open" } else { "closed" };
        body.push_str(&format!(" {} is {state}{locked_note}.", helpers::the_cap(world, entity)));
    }
    if world.get_bool("switchable", std::slice::from_ref(entity)) {
        let state = if world.get_bool("switched_on", std::slice::from_ref(entity)) { "on" } else { "off" };
        body.push_str(&format!(" It is switched {state}."));
    }
    if world.get_bool("wearable", std::slice::from_ref(entity)) && world.get_bool("worn", std::slice::from_ref(entity)) {
        body.push_str(" You are wearing it.");
    }
    body
}

/// `[The box] you can see a key here.`-style listing: every child of
/// `container` that's visible to `actor`, skipping `actor` itself. A
/// closed opaque container lists nothing (its contents aren't even
/// visible, per [`query::visible_to`]'s own closed-opaque check); an
/// open or transparent one does.
fn notable_contents_listing(world: &World, actor: &EntityId, container: &EntityId, relation: &str) -> Option<String> {
    let items: Vec<EntityId> = world
        .contents_of(container)
        .into_iter()
        .filter(|id| id != actor)
        .filter(|id| query::visible_to(world, actor, id))
        .collect();
    if items.is_empty() {
        return None;
    }

    let names = join_with_and(items.iter().map(|id| helpers::a(world, id)).collect());
    let verb = if items.len() == 1 { "is" } else { "are" };
    let mut lines = vec![format!("There {verb} {names} {relation} {}.", pronoun_or_place(world, container, relation))];

    for item in &items {
        if let Some(nested) = notable_contents_listing(world, actor, item, nested_relation(world, item)) {
            lines.push(nested);
        }
    }
    Some(lines.join("\n"))
}

/// "here" for a room, "the wooden box" for anything else, matching the
/// `relation` a caller asked for ("in"/"on").
fn pronoun_or_place(world: &World, container: &EntityId, relation: &str) -> String {
    if relation == "here" {
        "here".to_string()
    } else {
        helpers::the(world, container)
    }
}

fn nested_relation(world: &World, container: &EntityId) -> &'static str {
    if world.is_a(container, "supporter") {
        "on"
    } else {
        "in"
    }
}

fn join_with_and(mut items: Vec<String>) -> String {
    match items.len() {
        0 => String::new(),
        1 => items.remove(0),
        2 => format!("{} and {}", items[0], items[1]),
        _ => {
            let last = items.pop().unwrap();
            format!("{}, and {last}", items.join(", "))
        }
    }
}
