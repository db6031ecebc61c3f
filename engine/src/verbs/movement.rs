//! Movement verbs: `go <direction>` (and its twelve directional
//! shorthands), `enter`, `exit`/`get out of` (spec.md §6).

use std::collections::HashMap;

use crate::action::adornments;
use crate::action::{scores, ActionContext, ActionPipeline, PhaseControl, Verify};
use crate::parser::{GrammarRule, Parser};
use crate::text::template;
use crate::world::{query, Direction, LocationTag, World};

pub fn install(pipeline: &mut ActionPipeline, parser: &mut Parser) {
    for (word, dir) in [
        ("north", Direction::North),
        ("n", Direction::North),
        ("south", Direction::South),
        ("s", Direction::South),
        ("east", Direction::East),
        ("e", Direction::East),
        ("west", Direction::West),
        ("w", Direction::West),
        ("northeast", Direction::Northeast),
        ("ne", Direction::Northeast),
        ("northwest", Direction::Northwest),
        ("nw", Direction::Northwest),
        ("southeast", Direction::Southeast),
        ("se", Direction::Southeast),
        ("southwest", Direction::Southwest),
        ("sw", Direction::Southwest),
        ("up", Direction::Up),
        ("u", Direction::Up),
        ("down", Direction::Down),
        ("d", Direction::Down),
    ] {
        let dir = dir;
        parser.understand(
            GrammarRule::simple(format!("go_{word}"), word, "going")
                .with_build(move |_slots| crate::parser::Command {
                    verb: "going".to_string(),
                    slots: HashMap::from([("noun".to_string(), crate::parser::Slot::Direction(dir))]),
                    grammar_score: 0,
                }),
        );
    }
    parser.understand(GrammarRule::simple("going", "go|walk|run [direction]", "going"));
    parser.understand(GrammarRule::simple("going_to", "go to|walk to [somewhere]", "going_to"));
    parser.understand(GrammarRule::simple("looking_direction", "look [direction]", "looking_direction"));
    parser.understand(GrammarRule::simple("entering", "enter|in [something]", "entering"));
    parser.understand(GrammarRule::simple("exiting", "exit|out|leave", "exiting"));
    parser.understand(GrammarRule::simple("exiting_obj", "exit|get out of|get off [something]", "exiting"));

    pipeline.verify.append_guarded(
        "going_requires_an_exit",
        |_, ctx: &ActionContext| ctx.verb == "going",
        |world, ctx, _| {
            let Some(dir) = ctx.direction("noun") else {
                return Verify::deny("Which way do you want to go?");
            };
            let Some((room, _)) = world.location_of(&ctx.actor) else {
                return Verify::deny("You aren't anywhere.");
            };
            match world.exit(room, dir) {
                Some(_) => Verify::allow(scores::POSSIBLE),
                None => Verify::deny(format!("You can't go {dir} from here.")),
            }
        },
    );

    pipeline.before.append_guarded(
        "a_locked_door_blocks_going",
        |_, ctx: &ActionContext| ctx.verb == "going",
        |world, ctx, _| {
            let (room, dir) = (
                world.location_of(&ctx.actor).map(|(r, _)| r.clone()).unwrap(),
                ctx.direction("noun").unwrap(),
            );
            if let Some(target) = world.exit(&room, dir) {
                if world.is_a(target, "door")
                    && world.get_bool("openable", std::slice::from_ref(target))
                    && world.get_bool("locked", std::slice::from_ref(target))
                {
                    return PhaseControl::Abort(format!(
                        "{} is locked.",
                        crate::text::helpers::the_cap(world, target)
                    ));
                }
            }
            PhaseControl::Continue
        },
    );

    pipeline.try_before.append_guarded(
        "a_closed_unlocked_door_is_opened_automatically_before_going",
        |_, ctx: &ActionContext| ctx.verb == "going",
        |world, ctx, _| {
            let (room, dir) = (
                world.location_of(&ctx.actor).map(|(r, _)| r.clone()).unwrap(),
                ctx.direction("noun").unwrap(),
            );
            if let Some(target) = world.exit(&room, dir) {
                if world.is_a(target, "door")
                    && world.get_bool("openable", std::slice::from_ref(target))
                    && !world.get_bool("locked", std::slice::from_ref(target))
                    && !world.get_bool("open", std::slice::from_ref(target))
                {
                    return PhaseControl::DoFirst(
                        ActionContext::new(ctx.actor.clone(), "opening").with_entity("noun", target.clone()),
                    );
                }
            }
            PhaseControl::Continue
        },
    );

    pipeline.carry_out.append_guarded(
        "move_the_actor_through_the_exit",
        |_, ctx: &ActionContext| ctx.verb == "going",
        |world, ctx, _| {
            let mut world = world.borrow_mut();
            let room = world.location_of(&ctx.actor).map(|(r, _)| r.clone()).unwrap();
            let dir = ctx.direction("noun").unwrap();
            if let Some(target) = world.exit(&room, dir).cloned() {
                let destination = if world.is_a(&target, "door") {
                    world.door_other_side_from(&target, &room).cloned().unwrap_or(target)
                } else {
                    target
                };
                world
                    .relate_location(ctx.actor.clone(), destination, LocationTag::ContainedBy)
                    .expect("the actor's own entity is never a room");
            }
        },
    );

    // No report text of its own: crossing into a new room is exactly
    // the kind of container/light change `TurnLoop::step_turn` already
    // re-renders the room for (spec.md §4.6 "step_turn hook"), so
    // `going`'s own narration would otherwise duplicate it.
    pipeline.report.append_guarded(
        "report_going",
        |_, ctx: &ActionContext| ctx.verb == "going",
        |_, _, _| String::new(),
    );

    pipeline.verify.append_guarded(
        "going_to_requires_a_reachable_known_room",
        |_, ctx: &ActionContext| ctx.verb == "going_to",
        |world, ctx, _| {
            let Some(target) = ctx.entity("noun") else {
                return Verify::deny("Go where?");
            };
            let Some((room, _)) = world.location_of(&ctx.actor) else {
                return Verify::deny("You aren't anywhere.");
            };
            if room == target {
                return Verify::deny("You're already there.");
            }
            if first_step_toward(world, room, target).is_none() {
                return Verify::deny("You don't know how to get there from here.");
            }
            Verify::allow(scores::POSSIBLE)
        },
    );
    // The only fixup is itself: each call steps one room closer and
    // leaves the action pending (`Continue`) for `try_before` to be
    // re-checked, which is how the pipeline's do-first loop (spec.md
    // §4.6, §7 "path-find 'go to'") walks the whole route one room at
    // a time without `going_to` ever mutating the world directly.
    pipeline.try_before.append_guarded(
        "going_to_steps_one_room_closer",
        |_, ctx: &ActionContext| ctx.verb == "going_to",
        |world, ctx, _| {
            let target = ctx.entity("noun").unwrap();
            let Some((room, _)) = world.location_of(&ctx.actor) else {
                return PhaseControl::Abort("You aren't anywhere.".to_string());
            };
            if room == target {
                return PhaseControl::Continue;
            }
            match first_step_toward(world, room, target) {
                Some(dir) => PhaseControl::DoFirst(
                    ActionContext::new(ctx.actor.clone(), "going").with_direction("noun", dir),
                ),
                None => PhaseControl::Abort("You can't find a way there from here.".to_string()),
            }
        },
    );
    pipeline.carry_out.append_guarded(
        "going_to_has_no_direct_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "going_to",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_going_to",
        |_, ctx: &ActionContext| ctx.verb == "going_to",
        |_, _, _| String::new(),
    );

    pipeline.verify.append_guarded(
        "looking_direction_is_always_possible",
        |_, ctx: &ActionContext| ctx.verb == "looking_direction",
        |_, _, _| Verify::allow(scores::POSSIBLE),
    );
    pipeline.carry_out.append_guarded(
        "looking_direction_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "looking_direction",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_looking_direction",
        |_, ctx: &ActionContext| ctx.verb == "looking_direction",
        |world, ctx, _| {
            let Some(dir) = ctx.direction("noun") else {
                return "You see nothing special that way.".to_string();
            };
            let Some((room, _)) = world.location_of(&ctx.actor) else {
                return "You see nothing special that way.".to_string();
            };
            match world.exit(room, dir).and_then(|target| {
                let dest = if world.is_a(target, "door") {
                    world.door_other_side_from(target, room).unwrap_or(target)
                } else {
                    target
                };
                world.get_text("name", std::slice::from_ref(dest))
            }) {
                Some(name) => format!("You see {name} to the {dir}."),
                None => "You see nothing special that way.".to_string(),
            }
        },
    );

    pipeline.verify.append_guarded(
        "entering_requires_something_enterable_and_nearby",
        |_, ctx: &ActionContext| ctx.verb == "entering",
        |world, ctx, _| {
            let Some(obj) = ctx.entity("noun") else {
                return Verify::deny("Enter what?");
            };
            if let Some(denied) = adornments::require_accessible(world, &ctx.actor, obj) {
                return denied;
            }
            if world.is_a(obj, "supporter") || world.is_a(obj, "container") || world.is_a(obj, "door") {
                Verify::allow(scores::POSSIBLE)
            } else {
                Verify::deny("That's not something you can enter.")
            }
        },
    );
    pipeline.carry_out.append_guarded(
        "enter_the_object",
        |_, ctx: &ActionContext| ctx.verb == "entering",
        |world, ctx, _| {
            let mut world = world.borrow_mut();
            let obj = ctx.entity("noun").unwrap().clone();
            let tag = if world.is_a(&obj, "supporter") {
                LocationTag::SupportedBy
            } else {
                LocationTag::ContainedBy
            };
            world.relate_location(ctx.actor.clone(), obj, tag).expect("not a room");
        },
    );
    pipeline.report.append_guarded(
        "report_entering",
        |_, ctx: &ActionContext| ctx.verb == "entering",
        |world, ctx, _| {
            let mut bindings = HashMap::new();
            bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
            template::expand(world, &world.player, &ctx.actor, &bindings, "[We] {get|s} into [the noun].")
        },
    );

    pipeline.verify.append_guarded(
        "exiting_requires_being_inside_something",
        |_, ctx: &ActionContext| ctx.verb == "exiting",
        |world, ctx, _| match world.location_of(&ctx.actor) {
            Some((container, _)) if !world.is_a(container, "room") => Verify::allow(scores::POSSIBLE),
            _ => Verify::deny("You're not inside anything."),
        },
    );
    pipeline.carry_out.append_guarded(
        "exit_to_the_enclosing_room",
        |_, ctx: &ActionContext| ctx.verb == "exiting",
        |world, ctx, _| {
            let mut world = world.borrow_mut();
            if let Some(room) = query::visible_container(&world, &ctx.actor) {
                world
                    .relate_location(ctx.actor.clone(), room, LocationTag::ContainedBy)
                    .expect("visible_container never returns the actor's own room in a way that fails");
            }
        },
    );
    pipeline.report.append_guarded(
        "report_exiting",
        |_, ctx: &ActionContext| ctx.verb == "exiting",
        |world, ctx, _| {
            let bindings = HashMap::new();
            template::expand(world, &world.player, &ctx.actor, &bindings, "[We] {get|s} out.")
        },
    );
}

const ALL_DIRECTIONS: [Direction; 12] = [
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
];

/// The room `dir` leads to from `room`, resolving a door to the room on
/// its other side.
fn room_through(world: &World, room: &EntityId, dir: Direction) -> Option<EntityId> {
    let target = world.exit(room, dir)?;
    if world.is_a(target, "door") {
        world.door_other_side_from(target, room).cloned()
    } else {
        Some(target.clone())
    }
}

/// The first direction to take from `from` on a shortest route to `to`
/// over the room graph (spec.md §7: "path-find 'go to'"), or `None` if
/// no route exists. Breadth-first so the route is never longer than
/// necessary; ties are broken by `ALL_DIRECTIONS` order.
fn first_step_toward(world: &World, from: &EntityId, to: &EntityId) -> Option<Direction> {
    use std::collections::{HashSet, VecDeque};

    if from == to {
        return None;
    }
    let mut visited: HashSet<EntityId> = HashSet::new();
    visited.insert(from.clone());
    let mut queue: VecDeque<(EntityId, Direction)> = VecDeque::new();

    for dir in ALL_DIRECTIONS {
        if let Some(next) = room_through(world, from, dir) {
            if &next == to {
                return Some(dir);
            }
            if visited.insert(next.clone()) {
                queue.push_back((next, dir));
            }
        }
    }
    let mut steps = 0usize;
    while let Some((room, first_dir)) = queue.pop_front() {
        for dir in ALL_DIRECTIONS {
            if let Some(next) = room_through(world, &room, dir) {
                if &next == to {
                    return Some(first_dir);
                }
                if visited.insert(next.clone()) {
                    queue.push_back((next, first_dir));
                }
            }
        }
        steps += 1;
        if steps > 10_000 {
            return None;
        }
    }
    None
}
