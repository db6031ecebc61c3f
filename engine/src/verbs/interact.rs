//! Interaction verbs: `open`/`close`, `lock`/`unlock`, `switch on`/
//! `switch off`, `examine`, `look`, and `wait` (spec.md §6).

use std::collections::HashMap;

use crate::action::{scores, ActionContext, ActionPipeline, Verify};
use crate::description;
use crate::parser::{GrammarRule, Parser};
use crate::text::{helpers, template};
use crate::world::{EntityId, World};

/// `lock`/`unlock [with]` (spec.md §6): `obj`'s `matching_key` property
/// is unset for a lock that takes no key at all, in which case any
/// `with` clause (or its absence) is accepted. Declared, it must equal
/// whatever's bound to `second`.
fn require_matching_key(world: &World, ctx: &ActionContext, obj: &EntityId) -> Option<Verify> {
    let Some(required) = world.get_id("matching_key", std::slice::from_ref(obj)) else {
        return None;
    };
    match ctx.entity("second") {
        Some(key) if *key == required => None,
        Some(key) => Some(Verify::deny(format!("{} doesn't fit the lock.", helpers::the_cap(world, key)))),
        None => Some(Verify::deny(format!("{} needs a key.", helpers::the_cap(world, obj)))),
    }
}

pub fn install(pipeline: &mut ActionPipeline, parser: &mut Parser) {
    parser.understand(GrammarRule::simple("opening", "open [something]", "opening"));
    parser.understand(GrammarRule::simple("closing", "close|shut [something]", "closing"));
    parser.understand(GrammarRule::simple("locking", "lock [something]", "locking"));
    parser.understand(GrammarRule::simple("locking_with", "lock [something] with [something]", "locking"));
    parser.understand(GrammarRule::simple("unlocking", "unlock [something]", "unlocking"));
    parser.understand(GrammarRule::simple(
        "unlocking_with",
        "unlock [something] with [something]",
        "unlocking",
    ));
    parser.understand(GrammarRule::simple(
        "switching_on",
        "switch on|turn on [something]",
        "switching_on",
    ));
    parser.understand(GrammarRule::simple(
        "switching_off",
        "switch off|turn off [something]",
        "switching_off",
    ));
    parser.understand(GrammarRule::simple("examining", "examine|x|look at [something]", "examining"));
    parser.understand(GrammarRule::simple("looking", "look|l", "looking"));
    parser.understand(GrammarRule::simple("waiting", "wait|z", "waiting"));

    for (verb, toggled_on) in [("opening", true), ("closing", false)] {
        pipeline.verify.append_guarded(
            "opening_or_closing_requires_an_openable_thing_in_the_right_state",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let Some(obj) = ctx.entity("noun") else {
                    return Verify::deny("Do that to what?");
                };
                if !world.get_bool("openable", std::slice::from_ref(obj)) {
                    return Verify::deny(format!("{} isn't something you can open or close.", helpers::the_cap(world, obj)));
                }
                if toggled_on && world.get_bool("locked", std::slice::from_ref(obj)) {
                    return Verify::deny(format!("{} is locked.", helpers::the_cap(world, obj)));
                }
                let already_there = world.get_bool("open", std::slice::from_ref(obj)) == toggled_on;
                if already_there {
                    let state = if toggled_on { "open" } else { "closed" };
                    return Verify::deny(format!("{} is already {}.", helpers::the_cap(world, obj), state));
                }
                Verify::allow(scores::POSSIBLE)
            },
        );
        pipeline.carry_out.append_guarded(
            "set_the_open_state",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let obj = ctx.entity("noun").unwrap().clone();
                world
                    .borrow_mut()
                    .set("open", std::slice::from_ref(&obj), toggled_on)
                    .expect("open is declared for every world");
            },
        );
        pipeline.report.append_guarded(
            "report_opening_or_closing",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let mut bindings = HashMap::new();
                bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
                let verb_text = if toggled_on { "open" } else { "close" };
                template::expand(world, &world.player, &ctx.actor, &bindings, &format!("[We] {{{verb_text}|s}} [the noun]."))
            },
        );
    }

    pipeline.verify.append_guarded(
        "locking_requires_a_lockable_closed_door_or_container",
        |_, ctx: &ActionContext| ctx.verb == "locking",
        |world, ctx, _| {
            let Some(obj) = ctx.entity("noun") else {
                return Verify::deny("Lock what?");
            };
            if !world.get_bool("lockable", std::slice::from_ref(obj)) {
                return Verify::deny(format!("{} can't be locked.", helpers::the_cap(world, obj)));
            }
            if world.get_bool("open", std::slice::from_ref(obj)) {
                return Verify::deny(format!("{} is open.", helpers::the_cap(world, obj)));
            }
            if world.get_bool("locked", std::slice::from_ref(obj)) {
                return Verify::deny(format!("{} is already locked.", helpers::the_cap(world, obj)));
            }
            if let Some(denied) = require_matching_key(world, ctx, obj) {
                return denied;
            }
            Verify::allow(scores::POSSIBLE)
        },
    );
    pipeline.carry_out.append_guarded(
        "set_locked_true",
        |_, ctx: &ActionContext| ctx.verb == "locking",
        |world, ctx, _| {
            let obj = ctx.entity("noun").unwrap().clone();
            world
                .borrow_mut()
                .set("locked", std::slice::from_ref(&obj), true)
                .expect("locked is declared for every world");
        },
    );
    pipeline.report.append_guarded(
        "report_locking",
        |_, ctx: &ActionContext| ctx.verb == "locking",
        |world, ctx, _| {
            let mut bindings = HashMap::new();
            bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
            template::expand(world, &world.player, &ctx.actor, &bindings, "[We] lock [the noun].")
        },
    );

    pipeline.verify.append_guarded(
        "unlocking_requires_a_lockable_locked_thing",
        |_, ctx: &ActionContext| ctx.verb == "unlocking",
        |world, ctx, _| {
            let Some(obj) = ctx.entity("noun") else {
                return Verify::deny("Unlock what?");
            };
            if !world.get_bool("lockable", std::slice::from_ref(obj)) {
                return Verify::deny(format!("{} can't be unlocked.", helpers::the_cap(world, obj)));
            }
            if !world.get_bool("locked", std::slice::from_ref(obj)) {
                return Verify::deny(format!("{} isn't locked.", helpers::the_cap(world, obj)));
            }
            if let Some(denied) = require_matching_key(world, ctx, obj) {
                return denied;
            }
            Verify::allow(scores::POSSIBLE)
        },
    );
    pipeline.carry_out.append_guarded(
        "set_locked_false",
        |_, ctx: &ActionContext| ctx.verb == "unlocking",
        |world, ctx, _| {
            let obj = ctx.entity("noun").unwrap().clone();
            world
                .borrow_mut()
                .set("locked", std::slice::from_ref(&obj), false)
                .expect("locked is declared for every world");
        },
    );
    pipeline.report.append_guarded(
        "report_unlocking",
        |_, ctx: &ActionContext| ctx.verb == "unlocking",
        |world, ctx, _| {
            let mut bindings = HashMap::new();
            bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
            template::expand(world, &world.player, &ctx.actor, &bindings, "[We] unlock [the noun].")
        },
    );

    for (verb, switched_on) in [("switching_on", true), ("switching_off", false)] {
        pipeline.verify.append_guarded(
            "switching_requires_a_switchable_thing_in_the_right_state",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let Some(obj) = ctx.entity("noun") else {
                    return Verify::deny("Switch what?");
                };
                if !world.get_bool("switchable", std::slice::from_ref(obj)) {
                    return Verify::deny(format!("{} isn't something you can switch on or off.", helpers::the_cap(world, obj)));
                }
                if world.get_bool("switched_on", std::slice::from_ref(obj)) == switched_on {
                    let state = if switched_on { "already on" } else { "already off" };
                    return Verify::deny(format!("{} is {}.", helpers::the_cap(world, obj), state));
                }
                Verify::allow(scores::POSSIBLE)
            },
        );
        pipeline.carry_out.append_guarded(
            "set_switched_on_state",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let obj = ctx.entity("noun").unwrap().clone();
                world
                    .borrow_mut()
                    .set("switched_on", std::slice::from_ref(&obj), switched_on)
                    .expect("switched_on is declared for every world");
            },
        );
        pipeline.report.append_guarded(
            "report_switching",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let mut bindings = HashMap::new();
                bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
                let phrase = if switched_on { "switch on" } else { "switch off" };
                template::expand(world, &world.player, &ctx.actor, &bindings, &format!("[We] {phrase} [the noun]."))
            },
        );
    }

    pipeline.verify.append_guarded(
        "examining_is_always_possible",
        |_, ctx: &ActionContext| ctx.verb == "examining" && ctx.entity("noun").is_some(),
        |_, _, _| Verify::allow(scores::POSSIBLE),
    );
    pipeline.carry_out.append_guarded(
        "examining_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "examining",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_examining",
        |_, ctx: &ActionContext| ctx.verb == "examining",
        |world, ctx, _| description::describe_entity(world, &ctx.actor, ctx.entity("noun").unwrap()),
    );

    pipeline.verify.append_guarded(
        "looking_is_always_possible",
        |_, ctx: &ActionContext| ctx.verb == "looking",
        |_, _, _| Verify::allow(scores::POSSIBLE),
    );
    pipeline.carry_out.append_guarded(
        "looking_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "looking",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_looking",
        |_, ctx: &ActionContext| ctx.verb == "looking",
        |world, ctx, _| description::describe_room(world, &ctx.actor),
    );

    pipeline.verify.append_guarded(
        "waiting_is_always_possible",
        |_, ctx: &ActionContext| ctx.verb == "waiting",
        |_, _, _| Verify::allow(scores::POSSIBLE),
    );
    pipeline.carry_out.append_guarded(
        "waiting_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "waiting",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_waiting",
        |_, ctx: &ActionContext| ctx.verb == "waiting",
        |world, ctx, _| template::expand(world, &world.player, &ctx.actor, &HashMap::new(), "Time passes."),
    );
}
