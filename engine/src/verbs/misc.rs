//! Minor verbs (spec.md §6 CLI surface): `use`, `eat`, `attack`,
//! `climb`, `jump`, `sing`, `laugh`, `greet`, `ask ... about ...`.
//!
//! None of these carry interesting world state of their own — a game
//! author who wants eating or attacking to matter overrides these
//! rules (`insert_before`/`remove`, spec.md §4.1) the same way they'd
//! extend any other verb. The library only owes them a grammar line
//! and a generic, never-wrong response so an unextended world doesn't
//! dead-end on `no-applicable-method`.

use std::collections::HashMap;

use crate::action::adornments;
use crate::action::{scores, ActionContext, ActionPipeline, Verify};
use crate::parser::{GrammarRule, Parser};
use crate::text::{helpers, template};

pub fn install(pipeline: &mut ActionPipeline, parser: &mut Parser) {
    parser.understand(GrammarRule::simple("using", "use [something]", "using"));
    parser.understand(GrammarRule::simple("eating", "eat [something]", "eating"));
    parser.understand(GrammarRule::simple("attacking", "attack|hit|kill [something]", "attacking"));
    parser.understand(GrammarRule::simple("climbing", "climb [something]", "climbing"));
    parser.understand(GrammarRule::simple("jumping", "jump", "jumping"));
    parser.understand(GrammarRule::simple("singing", "sing", "singing"));
    parser.understand(GrammarRule::simple("laughing", "laugh", "laughing"));
    parser.understand(GrammarRule::simple("greeting", "greet|hello [something]", "greeting"));
    parser.understand(GrammarRule::simple(
        "asking_about",
        "ask [something] about [text]",
        "asking_about",
    ));
    parser.understand(GrammarRule::simple("helping", "help|hint", "helping"));

    for (verb, denial) in [
        ("using", "You don't see what using that would achieve."),
        ("eating", "That doesn't seem to be something you can eat."),
        ("attacking", "Violence isn't the answer to this one."),
        ("climbing", "You can't climb that."),
        ("greeting", "They don't seem to want to talk."),
    ] {
        pipeline.verify.append_guarded(
            "requires_an_accessible_object",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |world, ctx, _| {
                let Some(obj) = ctx.entity("noun") else {
                    return Verify::deny("Do that to what?");
                };
                if let Some(denied) = adornments::require_accessible(world, &ctx.actor, obj) {
                    return denied;
                }
                Verify::allow(scores::ILLOGICAL)
            },
        );
        pipeline.carry_out.append_guarded(
            "has_no_world_effect",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |_, _, _| (),
        );
        pipeline.report.append_guarded(
            "report_generic_denial",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |_, _, _| denial.to_string(),
        );
    }

    pipeline.verify.append_guarded(
        "asking_about_requires_an_accessible_person",
        |_, ctx: &ActionContext| ctx.verb == "asking_about",
        |world, ctx, _| {
            let Some(person) = ctx.entity("noun") else {
                return Verify::deny("Ask whom?");
            };
            if ctx.text("second").is_none() {
                return Verify::deny("Ask about what?");
            }
            if let Some(denied) = adornments::require_accessible(world, &ctx.actor, person) {
                return denied;
            }
            if !world.is_a(person, "person") || person == &ctx.actor {
                return Verify::deny(format!("{} has nothing to say about that.", helpers::the_cap(world, person)));
            }
            Verify::allow(scores::ILLOGICAL)
        },
    );
    pipeline.carry_out.append_guarded(
        "asking_about_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "asking_about",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_asking_about",
        |_, ctx: &ActionContext| ctx.verb == "asking_about",
        |world, ctx, _| {
            let mut bindings = HashMap::new();
            bindings.insert("noun".to_string(), ctx.entity("noun").cloned().unwrap());
            template::expand(
                world,
                &world.player,
                &ctx.actor,
                &bindings,
                "[The noun] {have|s} nothing to say about that.",
            )
        },
    );

    for verb in ["jumping", "singing", "laughing"] {
        pipeline.verify.append_guarded(
            "always_possible",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |_, _, _| Verify::allow(scores::POSSIBLE),
        );
        pipeline.carry_out.append_guarded(
            "has_no_world_effect",
            move |_, ctx: &ActionContext| ctx.verb == verb,
            move |_, _, _| (),
        );
    }
    pipeline.report.append_guarded(
        "report_jumping",
        |_, ctx: &ActionContext| ctx.verb == "jumping",
        |world, ctx, _| template::expand(world, &world.player, &ctx.actor, &HashMap::new(), "[We] {jump|s} on the spot, feeling foolish."),
    );
    pipeline.report.append_guarded(
        "report_singing",
        |_, ctx: &ActionContext| ctx.verb == "singing",
        |world, ctx, _| template::expand(world, &world.player, &ctx.actor, &HashMap::new(), "[We] {sing|s} tunelessly."),
    );
    pipeline.report.append_guarded(
        "report_laughing",
        |_, ctx: &ActionContext| ctx.verb == "laughing",
        |world, ctx, _| template::expand(world, &world.player, &ctx.actor, &HashMap::new(), "[We] {laugh|s}."),
    );

    pipeline.verify.append_guarded(
        "helping_is_always_possible",
        |_, ctx: &ActionContext| ctx.verb == "helping",
        |_, _, _| Verify::allow(scores::POSSIBLE),
    );
    pipeline.carry_out.append_guarded(
        "helping_has_no_world_effect",
        |_, ctx: &ActionContext| ctx.verb == "helping",
        |_, _, _| (),
    );
    pipeline.report.append_guarded(
        "report_helping",
        |_, ctx: &ActionContext| ctx.verb == "helping",
        |_, _, _| {
            "Try: look, examine <thing>, take/drop <thing>, put <thing> in/on <thing>, \
             open/close, lock/unlock, go <direction>, enter/exit, wear/remove, \
             switch on/off, inventory, wait."
                .to_string()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{LocationTag, World};

    #[test]
    fn jumping_has_a_fixed_report_and_no_world_effect() {
        let mut world = World::new();
        let player = world.create_entity("player", "person").unwrap();
        world.player = player.clone();

        let mut pipeline = ActionPipeline::new();
        let mut parser = Parser::new();
        crate::verbs::install_all(&mut pipeline, &mut parser);

        let ctx = ActionContext::new(player, "jumping");
        let narration = pipeline.run(&mut world, ctx).unwrap();
        assert!(narration.contains("feeling foolish"));
    }

    #[test]
    fn using_an_inaccessible_object_fails_verify_before_reaching_the_generic_denial() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.player = player.clone();
        world.relate_location(player.clone(), lobby.clone(), LocationTag::ContainedBy).unwrap();

        let box_ = world.create_entity("box", "container").unwrap();
        world.set("open", &[box_.clone()], false).unwrap();
        world.relate_location(box_.clone(), lobby, LocationTag::ContainedBy).unwrap();
        let gadget = world.create_entity("gadget", "thing").unwrap();
        world.relate_location(gadget.clone(), box_, LocationTag::ContainedBy).unwrap();

        let mut pipeline = ActionPipeline::new();
        let mut parser = Parser::new();
        crate::verbs::install_all(&mut pipeline, &mut parser);

        let ctx = ActionContext::new(player, "using").with_entity("noun", gadget);
        let narration = pipeline.run(&mut world, ctx).unwrap();
        assert!(narration.contains("reach"), "expected a reach failure, got: {narration}");
    }
}
