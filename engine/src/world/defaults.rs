//! The standard property library installed into every fresh [`World`]
//! (spec.md §4, §6): the small set of properties the description engine,
//! parser, and standard verb library all assume exist.

use super::property::Property;
use super::value::Value;
use super::World;

pub(super) fn install(world: &mut World) {
    let name = Property::new("name", 1).with_default(Value::from("something"));
    world.declare_property(name);

    let article = Property::new("article", 1).with_default(Value::from("a"));
    world.declare_property(article);

    let proper_named = Property::new("proper_named", 1).with_default(false);
    world.declare_property(proper_named);

    let mut description = Property::new("description", 1);
    description.rule("default_description", |world, key, _next| {
        let name = world
            .get_text("name", key)
            .unwrap_or_else(|| "something".to_string());
        Value::from(format!("You see nothing special about {name}."))
    });
    world.declare_property(description);

    let words = Property::new("words", 1).with_default(Value::List(Vec::new()));
    world.declare_property(words);

    let openable = Property::new("openable", 1).with_default(false);
    world.declare_property(openable);

    let open = Property::new("open", 1).with_default(false);
    world.declare_property(open);

    let lockable = Property::new("lockable", 1).with_default(false);
    world.declare_property(lockable);

    let locked = Property::new("locked", 1).with_default(false);
    world.declare_property(locked);

    // `matching_key(door_or_container) -> key id`: unset means the lock
    // takes no key and `lock`/`unlock [with]` never checks it.
    let matching_key = Property::new("matching_key", 1);
    world.declare_property(matching_key);

    let mut opaque = Property::new("opaque", 1).with_default(false);
    opaque.rule_when(
        "containers_are_opaque_unless_declared_otherwise",
        |world, key| world.is_a(&key[0], "container"),
        |_, _, _| Value::from(true),
    );
    world.declare_property(opaque);

    let fixed_in_place = Property::new("fixed_in_place", 1).with_default(false);
    world.declare_property(fixed_in_place);

    let wearable = Property::new("wearable", 1).with_default(false);
    world.declare_property(wearable);

    let worn = Property::new("worn", 1).with_default(false);
    world.declare_property(worn);

    let switchable = Property::new("switchable", 1).with_default(false);
    world.declare_property(switchable);

    let switched_on = Property::new("switched_on", 1).with_default(false);
    world.declare_property(switched_on);

    let makes_light = Property::new("makes_light", 1).with_default(false);
    world.declare_property(makes_light);

    // A backdrop with no explicit `backdrop_rooms` is present everywhere
    // (spec.md §5's `step_turn` hook leaves it where it is); one with an
    // explicit list only follows the actor among those rooms.
    let backdrop_rooms = Property::new("backdrop_rooms", 1);
    world.declare_property(backdrop_rooms);

    // `visited(room, actor)` and `known(object, actor)`: arity 2, keyed
    // on the viewer as well as the subject (spec.md §8 scenario notes).
    let visited = Property::new("visited", 2).with_default(false);
    world.declare_property(visited);

    let known = Property::new("known", 2).with_default(false);
    world.declare_property(known);
}

#[cfg(test)]
mod tests {
    use super::super::id::EntityId;
    use super::*;

    #[test]
    fn a_fresh_world_carries_the_standard_property_library() {
        let world = World::new();
        let ball = EntityId::new("ball");
        assert_eq!(world.get_text("name", &[ball.clone()]), Some("something".to_string()));
        assert!(!world.get_bool("open", &[ball.clone()]));
        assert!(!world.get_bool("fixed_in_place", &[ball]));
    }

    #[test]
    fn containers_default_to_opaque_and_other_things_do_not() {
        let mut world = World::new();
        let box_ = world.create_entity("box", "container").unwrap();
        let ball = world.create_entity("ball", "thing").unwrap();
        assert!(world.get_bool("opaque", &[box_]));
        assert!(!world.get_bool("opaque", &[ball]));
    }
}
