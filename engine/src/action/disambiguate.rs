//! Disambiguation (spec.md §4.5): when the parser hands back several
//! candidate commands (an ambiguous noun phrase, or two grammar rules
//! tied on score), `verify` is run against each and the result is
//! ranked: a single candidate clearing the "reasonable" cutoff resolves
//! outright; several tied at or above the cutoff are handed back as a
//! menu (capped at six); and when nothing reaches the cutoff, the
//! lowest-scoring candidate's refusal is shown, since asking the player
//! to choose among uniformly-illogical readings would not help them.

use crate::parser::Command;
use crate::world::{EntityId, World};

use super::action::ActionContext;
use super::pipeline::ActionPipeline;
use super::verify::{is_reasonable, Verify};

/// Candidate menus are capped at this many alternatives (spec.md §4.5).
pub const MAX_ALTERNATIVES: usize = 6;

#[derive(Debug, Clone)]
pub enum Disambiguation {
    /// Exactly one candidate cleared the reasonable cutoff, or nothing
    /// did and this is the least-illogical reading's refusal.
    Resolved(ActionContext),
    /// More than one candidate tied at or above the reasonable cutoff;
    /// the caller should ask the player to pick among these (at most
    /// [`MAX_ALTERNATIVES`]).
    StillAmbiguous(Vec<ActionContext>),
    /// Every candidate's `verify` denied the action outright.
    NoneApplicable(String),
}

/// Runs `verify` against every candidate and ranks the survivors.
pub fn disambiguate(world: &World, pipeline: &ActionPipeline, actor: &EntityId, candidates: Vec<Command>) -> Disambiguation {
    let mut allowed: Vec<(i32, ActionContext)> = Vec::new();
    let mut denial: Option<String> = None;

    for command in candidates {
        let ctx = ActionContext::from_command(actor.clone(), command);
        match pipeline.verify.call(world, &ctx) {
            Ok(Verify::Allow(score)) => allowed.push((score, ctx)),
            Ok(Verify::Deny(message)) => {
                denial.get_or_insert(message);
            }
            Err(_) => {}
        }
    }

    if allowed.is_empty() {
        return Disambiguation::NoneApplicable(denial.unwrap_or_else(|| "You can't do that.".to_string()));
    }

    // An author-registered mistake (spec.md §4.5 step 2) dominates over
    // every other reading: if the player's words also happen to parse as
    // an ordinary action, the mistake still wins, since it was written
    // to catch exactly this phrasing.
    if let Some(mistake_index) = allowed.iter().position(|(_, ctx)| ctx.verb == "making_mistake") {
        return Disambiguation::Resolved(allowed.remove(mistake_index).1);
    }

    let best = allowed.iter().map(|(score, _)| *score).max().unwrap();

    if !is_reasonable(best) {
        // Nothing here is what the player clearly meant; resolve to the
        // least promising candidate rather than ask, so its refusal
        // message (the most specific one available) is what's shown.
        let worst_index = allowed
            .iter()
            .enumerate()
            .min_by_key(|(_, (score, _))| *score)
            .map(|(idx, _)| idx)
            .unwrap();
        return Disambiguation::Resolved(allowed.remove(worst_index).1);
    }

    let winners: Vec<ActionContext> = allowed
        .into_iter()
        .filter(|(score, _)| *score == best)
        .map(|(_, ctx)| ctx)
        .collect();

    // Among candidates tied on verify score, prefer the one the parser
    // matched more specifically (spec.md §4.5 step 4): a more precise
    // noun phrase should win before the player is asked to disambiguate.
    let best_grammar = winners.iter().map(|ctx| ctx.grammar_score).max().unwrap();
    let mut winners: Vec<ActionContext> = winners
        .into_iter()
        .filter(|ctx| ctx.grammar_score == best_grammar)
        .collect();

    if winners.len() == 1 {
        Disambiguation::Resolved(winners.remove(0))
    } else {
        winners.truncate(MAX_ALTERNATIVES);
        Disambiguation::StillAmbiguous(winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::verify::scores;
    use crate::parser::{Command, Slot};
    use crate::world::LocationTag;

    fn two_balls() -> (World, EntityId, EntityId, EntityId) {
        let mut world = World::new();
        let room = world.create_entity("lobby", "room").unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.relate_location(player.clone(), room.clone(), LocationTag::ContainedBy).unwrap();
        let near = world.create_entity("near_ball", "thing").unwrap();
        let far = world.create_entity("far_ball", "thing").unwrap();
        world.relate_location(near.clone(), room.clone(), LocationTag::ContainedBy).unwrap();
        world.relate_location(far.clone(), room.clone(), LocationTag::ContainedBy).unwrap();
        (world, player, near, far)
    }

    fn command_for(verb: &str, entity: &EntityId) -> Command {
        let mut command = Command::new(verb);
        command.slots.insert("noun".to_string(), Slot::Entity(entity.clone()));
        command
    }

    #[test]
    fn a_higher_scored_candidate_resolves_without_asking() {
        let (world, player, near, far) = two_balls();
        let mut pipeline = ActionPipeline::new();
        let near_for_guard = near.clone();
        pipeline.verify.append_guarded(
            "prefer_nearer_ball",
            move |_, ctx: &ActionContext| ctx.entity("noun") == Some(&near_for_guard),
            |_, _, _| Verify::allow(scores::LIKELY),
        );
        pipeline.verify.append("default_allow", |_, _, _| Verify::allow(scores::POSSIBLE));

        let candidates = vec![command_for("taking", &near), command_for("taking", &far)];
        match disambiguate(&world, &pipeline, &player, candidates) {
            Disambiguation::Resolved(ctx) => assert_eq!(ctx.entity("noun"), Some(&near)),
            other => panic!("expected a resolved candidate, got {other:?}"),
        }
    }

    #[test]
    fn a_true_tie_is_reported_as_still_ambiguous() {
        let (world, player, near, far) = two_balls();
        let mut pipeline = ActionPipeline::new();
        pipeline.verify.append("default_allow", |_, _, _| Verify::allow(scores::POSSIBLE));

        let candidates = vec![command_for("taking", &near), command_for("taking", &far)];
        match disambiguate(&world, &pipeline, &player, candidates) {
            Disambiguation::StillAmbiguous(ctxs) => assert_eq!(ctxs.len(), 2),
            other => panic!("expected still-ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn a_more_specific_grammar_score_breaks_a_verify_tie() {
        let (world, player, near, far) = two_balls();
        let mut pipeline = ActionPipeline::new();
        pipeline.verify.append("default_allow", |_, _, _| Verify::allow(scores::POSSIBLE));

        let mut vague = command_for("taking", &near);
        vague.grammar_score = 2;
        let mut specific = command_for("taking", &far);
        specific.grammar_score = 4;

        let candidates = vec![vague, specific];
        match disambiguate(&world, &pipeline, &player, candidates) {
            Disambiguation::Resolved(ctx) => assert_eq!(ctx.entity("noun"), Some(&far)),
            other => panic!("expected the more specific phrasing to resolve, got {other:?}"),
        }
    }

    #[test]
    fn a_registered_mistake_dominates_an_equally_plausible_reading() {
        let (world, player, near, far) = two_balls();
        let mut pipeline = ActionPipeline::new();
        pipeline.verify.append("default_allow", |_, _, _| Verify::allow(scores::LIKELY));

        let candidates = vec![command_for("taking", &near), command_for("making_mistake", &far)];
        match disambiguate(&world, &pipeline, &player, candidates) {
            Disambiguation::Resolved(ctx) => assert_eq!(ctx.verb, "making_mistake"),
            other => panic!("expected the mistake to dominate, got {other:?}"),
        }
    }
}
