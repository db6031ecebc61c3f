//! The action pipeline driver (spec.md §4): five phases —
//! `verify -> try_before -> before -> carry_out -> report` — each a
//! [`Generic`] dispatch shared across every verb, distinguished by
//! guards on [`ActionContext::verb`]. `carry_out` is the only phase
//! permitted to mutate the world (spec.md §5).

use std::cell::RefCell;

use crate::dispatch::Generic;
use crate::error::EngineError;
use crate::text::helpers;
use crate::world::World;

use super::action::{ActionContext, PhaseControl};
use super::verify::Verify;

/// "opening the cardboard box", for `do_first`/`do_instead` narration
/// (spec.md §8): the verb's gerund plus its direct object, if any.
fn narrate_attempt(world: &World, ctx: &ActionContext) -> String {
    let verb_phrase = ctx.verb.replace('_', " ");
    match ctx.entity("noun") {
        Some(obj) => format!("{verb_phrase} {}", helpers::the(world, obj)),
        None => verb_phrase,
    }
}

/// The five-phase, author-extensible action pipeline.
///
/// `verify`, `try_before`, `before`, and `report` dispatch over a plain
/// `&World`: they only ever read it. `carry_out` is the one phase that
/// mutates (spec.md §5), so its methods dispatch over a `RefCell<World>`
/// instead — a method reads through `.borrow()` and mutates through
/// `.borrow_mut()`, rather than the pipeline threading a `&mut World`
/// through `Generic`'s otherwise-immutable method chain.
pub struct ActionPipeline {
    pub verify: Generic<World, ActionContext, Verify>,
    pub try_before: Generic<World, ActionContext, PhaseControl>,
    pub before: Generic<World, ActionContext, PhaseControl>,
    pub carry_out: Generic<RefCell<World>, ActionContext, ()>,
    pub report: Generic<World, ActionContext, String>,
}

impl ActionPipeline {
    pub fn new() -> Self {
        Self {
            verify: Generic::new("verify"),
            try_before: Generic::new("try_before"),
            before: Generic::new("before"),
            carry_out: Generic::new("carry_out"),
            report: Generic::new("report"),
        }
    }

    /// Runs one action to completion, returning the narration to show.
    pub fn run(&self, world: &mut World, ctx: ActionContext) -> Result<String, EngineError> {
        self.run_depth(world, ctx, 0)
    }

    fn run_depth(&self, world: &mut World, ctx: ActionContext, depth: usize) -> Result<String, EngineError> {
        if depth > 16 {
            return Err(EngineError::InternalFault {
                operation: ctx.verb.clone(),
                detail: "do_first/do_instead recursion exceeded its depth bound".to_string(),
            });
        }

        if let Verify::Deny(message) = self.verify.call(world, &ctx)? {
            return Ok(message);
        }

        let mut preamble: Vec<String> = Vec::new();
        for phase in [&self.try_before, &self.before] {
            // Looped rather than called once: a `DoFirst` can fix one
            // unmet precondition (taking an object) while another
            // remains (its destination still closed), so the phase is
            // re-checked after each fixup until nothing more applies.
            for _ in 0..8 {
                match phase.call(world, &ctx) {
                    Ok(PhaseControl::Abort(message)) => return Ok(message),
                    Ok(PhaseControl::DoInstead(other)) => {
                        let announcement = format!("(doing {} instead)", narrate_attempt(world, &other));
                        let result = self.run_depth(world, other, depth + 1)?;
                        preamble.push(announcement);
                        preamble.push(result);
                        return Ok(preamble.join("\n\n"));
                    }
                    Ok(PhaseControl::DoFirst(first)) => {
                        let announcement = format!("(first {})", narrate_attempt(world, &first));
                        let result = self.run_depth(world, first, depth + 1)?;
                        preamble.push(announcement);
                        preamble.push(result);
                    }
                    Ok(PhaseControl::Continue) => break,
                    // try_before/before are optional: most verbs have no
                    // rule at all for a given action, which is not a fault.
                    Err(_) => break,
                }
            }
        }

        let cell = RefCell::new(std::mem::take(world));
        let outcome = self.carry_out.call(&cell, &ctx);
        *world = cell.into_inner();
        outcome?;

        let report = self
            .report
            .call(world, &ctx)
            .unwrap_or_else(|_| "Done.".to_string());
        if !report.is_empty() {
            preamble.push(report);
        }
        Ok(preamble.join("\n\n"))
    }
}

impl Default for ActionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::EntityId;

    fn actor() -> EntityId {
        EntityId::new("player")
    }

    #[test]
    fn a_denied_verify_short_circuits_before_carry_out_runs() {
        let mut pipeline = ActionPipeline::new();
        pipeline
            .verify
            .append("deny_everything", |_, _, _| Verify::deny("You can't do that."));
        pipeline.carry_out.append("boom", |_, _, _| panic!("carry_out must not run"));

        let mut world = World::new();
        let ctx = ActionContext::new(actor(), "jump");
        assert_eq!(pipeline.run(&mut world, ctx).unwrap(), "You can't do that.");
    }

    #[test]
    fn do_instead_redirects_to_a_different_action() {
        let mut pipeline = ActionPipeline::new();
        pipeline.verify.append("allow_all", |_, _, _| Verify::allow(0));
        pipeline.before.append_guarded(
            "redirect_jump_to_wait",
            |_, ctx: &ActionContext| ctx.verb == "jump",
            |_, ctx, _| PhaseControl::DoInstead(ActionContext::new(ctx.actor.clone(), "wait")),
        );
        pipeline.carry_out.append("noop", |_, _, _| ());
        pipeline.report.append_guarded(
            "report_wait",
            |_, ctx: &ActionContext| ctx.verb == "wait",
            |_, _, _| "Time passes.".to_string(),
        );

        let mut world = World::new();
        let ctx = ActionContext::new(actor(), "jump");
        assert_eq!(
            pipeline.run(&mut world, ctx).unwrap(),
            "(doing wait instead)\n\nTime passes."
        );
    }

    #[test]
    fn abort_action_stops_the_pipeline_with_its_own_narration() {
        let mut pipeline = ActionPipeline::new();
        pipeline.verify.append("allow_all", |_, _, _| Verify::allow(0));
        pipeline
            .try_before
            .append("darkness_aborts_everything", |_, _, _| PhaseControl::Abort("It's too dark to see.".to_string()));
        pipeline.carry_out.append("boom", |_, _, _| panic!("carry_out must not run"));

        let mut world = World::new();
        let ctx = ActionContext::new(actor(), "take");
        assert_eq!(pipeline.run(&mut world, ctx).unwrap(), "It's too dark to see.");
    }
}
