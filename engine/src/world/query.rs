//! Derived world queries (spec.md §4.2): containment, light, visibility,
//! and reachability, all computed on demand from `location`, `exits`,
//! and the standard property library rather than stored directly.

use super::id::{EntityId, LocationTag};
use super::World;

/// The nearest enclosing location whose contents are reachable from `o`:
/// a room, or the nearest closed-and-openable (or opaque) container
/// enclosing `o` (spec.md §4.2). A room is its own effective container.
pub fn effective_container(world: &World, o: &EntityId) -> Option<EntityId> {
    if world.is_a(o, "room") {
        return Some(o.clone());
    }
    let mut current = o.clone();
    let mut steps = 0usize;
    loop {
        match world.location_of(&current) {
            Some((next, _)) => {
                if blocks_reach(world, next) || world.is_a(next, "room") {
                    return Some(next.clone());
                }
                current = next.clone();
            }
            None => return if current == *o { None } else { Some(current) },
        }
        steps += 1;
        if steps > 10_000 {
            return None;
        }
    }
}

/// The nearest enclosing room above `o` in the `location` chain (or `o`
/// itself, if it is one).
pub fn nearest_room(world: &World, o: &EntityId) -> Option<EntityId> {
    if world.is_a(o, "room") {
        return Some(o.clone());
    }
    let mut current = o.clone();
    let mut steps = 0usize;
    while let Some((next, _)) = world.location_of(&current) {
        if world.is_a(next, "room") {
            return Some(next.clone());
        }
        current = next.clone();
        steps += 1;
        if steps > 10_000 {
            tracing::warn!(%o, "nearest_room: exceeded walk bound, possible location cycle");
            return None;
        }
    }
    None
}

fn blocks_sight(world: &World, container: &EntityId) -> bool {
    world.is_a(container, "container")
        && world.get_bool("opaque", std::slice::from_ref(container))
        && !world.get_bool("open", std::slice::from_ref(container))
}

fn blocks_reach(world: &World, container: &EntityId) -> bool {
    world.is_a(container, "container") && !world.get_bool("open", std::slice::from_ref(container))
}

/// Walks the `location` chain from `from` up to (and not including)
/// `stop_at`, failing if any intermediate container satisfies `blocks`.
fn walk_unblocked(
    world: &World,
    from: &EntityId,
    stop_at: &EntityId,
    blocks: impl Fn(&World, &EntityId) -> bool,
) -> bool {
    let mut current = from.clone();
    let mut steps = 0usize;
    while let Some((next, _)) = world.location_of(&current) {
        if next == stop_at {
            return true;
        }
        if blocks(world, next) {
            return false;
        }
        current = next.clone();
        steps += 1;
        if steps > 10_000 {
            return false;
        }
    }
    false
}

/// The farthest point upward from `o` that sight still reaches: a room,
/// or the nearest closed-and-opaque container enclosing `o`. A room is
/// its own visible container (spec.md §8).
pub fn visible_container(world: &World, o: &EntityId) -> Option<EntityId> {
    if world.is_a(o, "room") {
        return Some(o.clone());
    }
    let mut current = o.clone();
    let mut steps = 0usize;
    loop {
        match world.location_of(&current) {
            Some((next, _)) => {
                if blocks_sight(world, next) || world.is_a(next, "room") {
                    return Some(next.clone());
                }
                current = next.clone();
            }
            None => return if current == *o { None } else { Some(current) },
        }
        steps += 1;
        if steps > 10_000 {
            return None;
        }
    }
}

/// True if `o` itself produces light, accounting for switchability
/// (spec.md §4.2: a switchable light source only counts while on).
pub fn contributes_light(world: &World, o: &EntityId) -> bool {
    let key = std::slice::from_ref(o);
    world.get_bool("makes_light", key) && (!world.get_bool("switchable", key) || world.get_bool("switched_on", key))
}

/// True if `container` is lit: it, or anything reachable through open or
/// transparent nesting within it, contributes light.
pub fn contains_light(world: &World, container: &EntityId) -> bool {
    contains_light_inner(world, container, 0)
}

fn contains_light_inner(world: &World, container: &EntityId, depth: usize) -> bool {
    if depth > 64 {
        return false;
    }
    if contributes_light(world, container) {
        return true;
    }
    for item in world.contents_of(container) {
        if contributes_light(world, &item) {
            return true;
        }
        if !blocks_sight(world, &item) && contains_light_inner(world, &item, depth + 1) {
            return true;
        }
    }
    false
}

/// True if `target` is directly owned, worn, or carried by `holder`
/// (spec.md §4.2 visible_to/accessible_to clause (a)): a possession is
/// always reachable regardless of room light or container state.
fn held_by(world: &World, target: &EntityId, holder: &EntityId) -> bool {
    matches!(
        world.location_of(target),
        Some((at, LocationTag::ContainedBy | LocationTag::OwnedBy | LocationTag::WornBy)) if at == holder
    )
}

/// True if `door` is one of `room`'s exits (spec.md §4.2 visible_to/
/// accessible_to clause about doors listed in the actor's room).
fn room_has_door(world: &World, room: &EntityId, door: &EntityId) -> bool {
    world.is_a(door, "door") && world.exits_from(room).iter().any(|(_, target)| target == door)
}

/// True if `target` is something `viewer` can see: held by `viewer`,
/// `part_of` something visible, a door listed in `viewer`'s room, or
/// in the same lit room with no closed opaque container in between.
pub fn visible_to(world: &World, viewer: &EntityId, target: &EntityId) -> bool {
    if viewer == target {
        return true;
    }
    if held_by(world, target, viewer) {
        return true;
    }
    if let Some((whole, LocationTag::PartOf)) = world.location_of(target) {
        if visible_to(world, viewer, whole) {
            return true;
        }
    }
    let Some(room) = nearest_room(world, viewer) else {
        return false;
    };
    if target == &room {
        return true;
    }
    if !contains_light(world, &room) {
        return false;
    }
    if room_has_door(world, &room, target) {
        return true;
    }
    if !world.contains(&room, target) {
        return false;
    }
    walk_unblocked(world, target, &room, blocks_sight)
}

/// True if `actor` can physically reach `target`: held by `actor`,
/// `part_of` something accessible, a door listed in `actor`'s room, or
/// in the same lit room with no closed container (opaque or not) in
/// between — the weaker `blocks_reach` test (vs. [`visible_to`]'s
/// `blocks_sight`) is the only difference, which is what keeps
/// accessibility implying visibility (spec.md §4.2, §8).
pub fn accessible_to(world: &World, actor: &EntityId, target: &EntityId) -> bool {
    if actor == target {
        return true;
    }
    if held_by(world, target, actor) {
        return true;
    }
    if let Some((whole, LocationTag::PartOf)) = world.location_of(target) {
        if accessible_to(world, actor, whole) {
            return true;
        }
    }
    let Some(room) = nearest_room(world, actor) else {
        return false;
    };
    if target == &room {
        return true;
    }
    // Reach requires light too: spec.md §8 pins `accessible_to(x, a) ⇒
    // visible_to(x, a)`, and visible_to always requires the room to be lit.
    if !contains_light(world, &room) {
        return false;
    }
    if room_has_door(world, &room, target) {
        return true;
    }
    if !world.contains(&room, target) {
        return false;
    }
    walk_unblocked(world, target, &room, blocks_reach)
}

#[cfg(test)]
mod tests {
    use super::super::id::LocationTag;
    use super::*;

    fn place(world: &mut World, obj: &EntityId, at: &EntityId) {
        world
            .relate_location(obj.clone(), at.clone(), LocationTag::ContainedBy)
            .unwrap();
    }

    #[test]
    fn a_lamp_must_be_switched_on_to_contribute_light() {
        let mut world = World::new();
        let lamp = world.create_entity("lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        world.set("switchable", &[lamp.clone()], true).unwrap();
        assert!(!contributes_light(&world, &lamp));
        world.set("switched_on", &[lamp.clone()], true).unwrap();
        assert!(contributes_light(&world, &lamp));
    }

    #[test]
    fn a_dark_room_has_no_contained_light_source() {
        let mut world = World::new();
        let room = world.create_entity("cellar", "room").unwrap();
        let rock = world.create_entity("rock", "thing").unwrap();
        place(&mut world, &rock, &room);
        assert!(!contains_light(&world, &room));
    }

    #[test]
    fn light_passes_through_an_open_container_but_not_a_closed_opaque_one() {
        let mut world = World::new();
        let room = world.create_entity("cellar", "room").unwrap();
        let lantern = world.create_entity("lantern", "thing").unwrap();
        world.set("makes_light", &[lantern.clone()], true).unwrap();

        let glass_box = world.create_entity("glass_box", "container").unwrap();
        world.set("opaque", &[glass_box.clone()], false).unwrap();
        world.set("open", &[glass_box.clone()], false).unwrap();
        place(&mut world, &glass_box, &room);
        place(&mut world, &lantern, &glass_box);

        assert!(contains_light(&world, &room));

        let wooden_box = world.create_entity("wooden_box", "container").unwrap();
        world.set("open", &[wooden_box.clone()], false).unwrap();
        world.remove_obj(&lantern);
        place(&mut world, &wooden_box, &room);
        place(&mut world, &lantern, &wooden_box);

        assert!(!contains_light(&world, &room));
    }

    #[test]
    fn closed_opaque_container_blocks_sight_but_open_ones_do_not() {
        let mut world = World::new();
        let room = world.create_entity("lobby", "room").unwrap();
        let viewer = world.create_entity("player", "person").unwrap();
        place(&mut world, &viewer, &room);

        let lamp = world.create_entity("ceiling_lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        place(&mut world, &lamp, &room);

        let box_ = world.create_entity("box", "container").unwrap();
        let coin = world.create_entity("coin", "thing").unwrap();
        place(&mut world, &box_, &room);
        place(&mut world, &coin, &box_);

        world.set("open", &[box_.clone()], false).unwrap();
        assert!(!visible_to(&world, &viewer, &coin));

        world.set("open", &[box_.clone()], true).unwrap();
        assert!(visible_to(&world, &viewer, &coin));
    }

    #[test]
    fn a_closed_transparent_container_is_visible_through_but_not_reachable_into() {
        let mut world = World::new();
        let room = world.create_entity("lobby", "room").unwrap();
        let viewer = world.create_entity("player", "person").unwrap();
        place(&mut world, &viewer, &room);

        let lamp = world.create_entity("ceiling_lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        place(&mut world, &lamp, &room);

        let case = world.create_entity("display_case", "container").unwrap();
        world.set("opaque", &[case.clone()], false).unwrap();
        world.set("open", &[case.clone()], false).unwrap();
        let gem = world.create_entity("gem", "thing").unwrap();
        place(&mut world, &case, &room);
        place(&mut world, &gem, &case);

        assert!(visible_to(&world, &viewer, &gem));
        assert!(!accessible_to(&world, &viewer, &gem));
    }

    #[test]
    fn a_carried_item_is_visible_and_accessible_even_in_the_dark() {
        let mut world = World::new();
        let room = world.create_entity("cellar", "room").unwrap();
        let viewer = world.create_entity("player", "person").unwrap();
        place(&mut world, &viewer, &room);

        let torch = world.create_entity("unlit_torch", "thing").unwrap();
        world
            .relate_location(torch.clone(), viewer.clone(), LocationTag::ContainedBy)
            .unwrap();

        assert!(!contains_light(&world, &room));
        assert!(visible_to(&world, &viewer, &torch));
        assert!(accessible_to(&world, &viewer, &torch));
    }

    #[test]
    fn a_door_listed_in_a_lit_room_is_visible_and_accessible_but_not_to_an_unconnected_room() {
        use super::super::id::Direction;

        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let hall = world.create_entity("hall", "room").unwrap();
        let unrelated = world.create_entity("attic", "room").unwrap();
        let door = world.create_entity("plain_door", "door").unwrap();
        world
            .connect_rooms(lobby.clone(), Direction::North, hall.clone(), Some(door.clone()), false)
            .unwrap();

        let viewer = world.create_entity("player", "person").unwrap();
        place(&mut world, &viewer, &lobby);
        let lamp = world.create_entity("ceiling_lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        place(&mut world, &lamp, &lobby);

        assert!(visible_to(&world, &viewer, &door));
        assert!(accessible_to(&world, &viewer, &door));

        assert!(!room_has_door(&world, &unrelated, &door));
    }

    #[test]
    fn a_room_is_its_own_visible_and_effective_container() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        assert_eq!(visible_container(&world, &lobby), Some(lobby.clone()));
        assert_eq!(effective_container(&world, &lobby), Some(lobby.clone()));
    }

    #[test]
    fn effective_container_stops_at_a_closed_container_even_when_transparent() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let case = world.create_entity("display_case", "container").unwrap();
        world.set("opaque", &[case.clone()], false).unwrap();
        world.set("open", &[case.clone()], false).unwrap();
        place(&mut world, &case, &lobby);
        let gem = world.create_entity("gem", "thing").unwrap();
        place(&mut world, &gem, &case);

        assert_eq!(effective_container(&world, &gem), Some(case.clone()));
        assert_eq!(visible_container(&world, &gem), Some(lobby));
    }

    #[test]
    fn effective_container_passes_through_an_open_container_to_the_room() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let box_ = world.create_entity("open_box", "container").unwrap();
        world.set("open", &[box_.clone()], true).unwrap();
        place(&mut world, &box_, &lobby);
        let ball = world.create_entity("ball", "thing").unwrap();
        place(&mut world, &ball, &box_);

        assert_eq!(effective_container(&world, &ball), Some(lobby));
    }
}
