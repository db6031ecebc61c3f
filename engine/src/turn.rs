//! The turn loop (spec.md §5): the synchronous `step` entry point a
//! frontend drives, one input line at a time. Owns the [`World`], the
//! [`ActionPipeline`], and the [`Parser`]; resolves parser/disambiguation
//! outcomes into a single action; runs the `step_turn` hook afterward
//! (backdrop relocation, re-render on a changed room); and converts an
//! author-rule panic into narration rather than letting it unwind the
//! session (spec.md §7).

use std::panic::{self, AssertUnwindSafe};

use crate::action::{disambiguate, ActionContext, ActionPipeline, Disambiguation};
use crate::config::EngineConfig;
use crate::description;
use crate::error::EngineError;
use crate::parser::{ParseOutcome, Parser};
use crate::world::{query, EntityId, World};

/// What happened after feeding the turn loop one line of input.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The action ran to completion (or was refused); here's the text
    /// to show.
    Narrated(String),
    /// Several candidates survived `verify` at the same score; the
    /// frontend should show `prompt` and feed the player's choice back
    /// through [`TurnLoop::resolve`].
    Disambiguate { prompt: String, choices: Vec<String> },
    /// `max_turns` was reached; the session accepts no further input.
    SessionOver,
}

/// The last rendered room state, so `step_turn` only re-describes the
/// room when something the player would notice actually changed.
struct RenderState {
    room: Option<EntityId>,
    lit: bool,
}

/// Drives one interactive session: parses a line, resolves it to a
/// single action (asking the player to disambiguate if needed), runs
/// it, and re-renders the room if the turn changed what's visible.
pub struct TurnLoop {
    world: World,
    pipeline: ActionPipeline,
    parser: Parser,
    config: EngineConfig,
    player: EntityId,
    turns_taken: u32,
    pending: Option<Vec<ActionContext>>,
    last_render: RenderState,
}

impl TurnLoop {
    pub fn new(world: World, pipeline: ActionPipeline, parser: Parser, config: EngineConfig, player: EntityId) -> Self {
        let last_render = RenderState {
            room: query::nearest_room(&world, &player),
            lit: false,
        };
        Self {
            world,
            pipeline,
            parser,
            config,
            player,
            turns_taken: 0,
            pending: None,
            last_render,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &EntityId {
        &self.player
    }

    /// True after a [`StepOutcome::Disambiguate`] until the frontend
    /// answers it via [`TurnLoop::resolve`].
    pub fn is_awaiting_choice(&self) -> bool {
        self.pending.is_some()
    }

    /// Feeds one line of player input through parsing, disambiguation,
    /// and the action pipeline.
    pub fn step(&mut self, line: &str) -> StepOutcome {
        if let Some(max_turns) = self.config.max_turns {
            if self.turns_taken >= max_turns {
                return StepOutcome::SessionOver;
            }
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.parser.parse(&self.world, &self.player, line)));
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(_) => {
                return StepOutcome::Narrated(self.internal_fault("parsing", "the parser panicked"));
            }
        };

        match outcome {
            ParseOutcome::Failed(err) => StepOutcome::Narrated(err.to_string()),
            ParseOutcome::Matched(command) => {
                let ctx = ActionContext::from_command(self.player.clone(), command);
                self.run_context(ctx)
            }
            ParseOutcome::Ambiguous(candidates) => self.settle(candidates),
        }
    }

    /// Answers a pending [`StepOutcome::Disambiguate`] prompt by index
    /// (0-based) into the `choices` it offered.
    pub fn resolve(&mut self, choice: usize) -> StepOutcome {
        let Some(mut pending) = self.pending.take() else {
            return StepOutcome::Narrated("There's nothing to choose between right now.".to_string());
        };
        if choice >= pending.len() {
            self.pending = Some(pending);
            return StepOutcome::Narrated("That's not one of the choices.".to_string());
        }
        self.run_context(pending.swap_remove(choice))
    }

    fn settle(&mut self, candidates: Vec<crate::parser::Command>) -> StepOutcome {
        match disambiguate(&self.world, &self.pipeline, &self.player, candidates) {
            Disambiguation::Resolved(ctx) => self.run_context(ctx),
            Disambiguation::NoneApplicable(message) => StepOutcome::Narrated(message),
            Disambiguation::StillAmbiguous(mut choices) => {
                if !self.config.interactive_disambiguation {
                    // A scripted harness has no player to ask: take the
                    // first (equally highest-scoring) tied candidate.
                    return self.run_context(choices.remove(0));
                }
                let labels: Vec<String> = choices
                    .iter()
                    .map(|ctx| match ctx.entity("noun") {
                        Some(id) => crate::text::helpers::the(&self.world, id),
                        None => ctx.verb.replace('_', " "),
                    })
                    .collect();
                let prompt = format!("Which do you mean, {}?", labels.join(" or "));
                self.pending = Some(choices);
                StepOutcome::Disambiguate { prompt, choices: labels }
            }
        }
    }

    fn run_context(&mut self, ctx: ActionContext) -> StepOutcome {
        if self.config.trace_actions {
            tracing::info!(actor = %ctx.actor, verb = %ctx.verb, "running action");
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.pipeline.run(&mut self.world, ctx.clone())));
        let narration = match result {
            Ok(Ok(text)) => text,
            Ok(Err(EngineError::InternalFault { operation, detail })) => self.internal_fault(&operation, &detail),
            Ok(Err(err)) => self.internal_fault(&ctx.verb, &err.to_string()),
            Err(_) => self.internal_fault(&ctx.verb, "a pipeline rule panicked"),
        };

        self.turns_taken += 1;
        let extra = self.step_turn();
        let out = match (narration.is_empty(), extra) {
            (true, Some(extra)) => extra,
            (false, Some(extra)) => format!("{narration}\n\n{extra}"),
            (_, None) => narration,
        };
        StepOutcome::Narrated(out)
    }

    /// Spec.md §7: an author rule panicking is a fault, not a crash.
    /// Narrated as `[Internal error: ...]` and the session continues.
    fn internal_fault(&self, operation: &str, detail: &str) -> String {
        tracing::error!(operation, detail, "internal fault caught at turn boundary");
        format!("[Internal error in '{operation}': {detail}]")
    }

    /// Runs after every action: relocates backdrops into the player's
    /// current room, then re-describes the room if it, its light, or
    /// what it contains changed since the last time it was shown.
    fn step_turn(&mut self) -> Option<String> {
        self.relocate_backdrops();

        let room = query::nearest_room(&self.world, &self.player);
        let lit = room.as_ref().is_some_and(|room| query::contains_light(&self.world, room));

        // A lit room is marked visited the moment it's shown; a dark
        // one never is (spec.md §4.7: "in darkness `visited` is NOT
        // set"), even if the player has been here before.
        if lit {
            if let Some(room) = &room {
                let key = [room.clone(), self.player.clone()];
                let _ = self.world.set("visited", &key, true);
            }
        }

        let changed = room != self.last_render.room || lit != self.last_render.lit;
        self.last_render = RenderState { room: room.clone(), lit };

        if !changed {
            return None;
        }
        Some(description::describe_room(&self.world, &self.player))
    }

    /// A `backdrop` with no `backdrop_rooms` set is present everywhere
    /// and is left alone; one with an explicit list of rooms follows
    /// the player among them, moving into whichever of its listed rooms
    /// the player currently occupies (spec.md §4, backdrop kind).
    fn relocate_backdrops(&mut self) {
        let Some(player_room) = query::nearest_room(&self.world, &self.player) else {
            return;
        };
        for backdrop in self.world.entities_of_kind("backdrop") {
            let Ok(Some(rooms)) = self.world.get("backdrop_rooms", std::slice::from_ref(&backdrop)) else {
                continue;
            };
            let in_player_room = rooms
                .as_list()
                .map(|rooms| rooms.iter().any(|room| room.as_id() == Some(&player_room)))
                .unwrap_or(false);
            if !in_player_room {
                continue;
            }
            if self.world.location_of(&backdrop).map(|(at, _)| at) == Some(&player_room) {
                continue;
            }
            let _ = self
                .world
                .relate_location(backdrop, player_room.clone(), crate::world::LocationTag::ContainedBy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LocationTag;

    fn sample() -> TurnLoop {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        world.set("name", &[lobby.clone()], "Lobby").unwrap();
        let lamp = world.create_entity("lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        world.relate_location(lamp, lobby.clone(), LocationTag::ContainedBy).unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.relate_location(player.clone(), lobby, LocationTag::ContainedBy).unwrap();

        let mut pipeline = ActionPipeline::new();
        let mut parser = Parser::new();
        crate::verbs::install_all(&mut pipeline, &mut parser);
        TurnLoop::new(world, pipeline, parser, EngineConfig::default(), player)
    }

    #[test]
    fn an_unknown_word_is_reported_without_panicking() {
        let mut turn_loop = sample();
        match turn_loop.step("xyzzy") {
            StepOutcome::Narrated(text) => assert!(!text.is_empty()),
            other => panic!("expected narration, got {other:?}"),
        }
    }

    #[test]
    fn non_interactive_disambiguation_auto_picks_instead_of_asking() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let lamp = world.create_entity("lamp", "thing").unwrap();
        world.set("makes_light", &[lamp.clone()], true).unwrap();
        world.relate_location(lamp, lobby.clone(), LocationTag::ContainedBy).unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.relate_location(player.clone(), lobby.clone(), LocationTag::ContainedBy).unwrap();

        let near = world.create_entity("near_ball", "thing").unwrap();
        world.set("name", &[near.clone()], "red ball").unwrap();
        world.relate_location(near, lobby.clone(), LocationTag::ContainedBy).unwrap();
        let far = world.create_entity("far_ball", "thing").unwrap();
        world.set("name", &[far.clone()], "red ball").unwrap();
        world.relate_location(far, lobby, LocationTag::ContainedBy).unwrap();

        let mut pipeline = ActionPipeline::new();
        let mut parser = Parser::new();
        crate::verbs::install_all(&mut pipeline, &mut parser);
        let mut config = EngineConfig::default();
        config.interactive_disambiguation = false;
        let mut turn_loop = TurnLoop::new(world, pipeline, parser, config, player);

        match turn_loop.step("take red ball") {
            StepOutcome::Narrated(text) => assert!(text.contains("take"), "expected a taking report, got: {text}"),
            other => panic!("expected the tie to auto-resolve, got {other:?}"),
        }
        assert!(!turn_loop.is_awaiting_choice());
    }

    #[test]
    fn max_turns_ends_the_session() {
        let mut world = World::new();
        let lobby = world.create_entity("lobby", "room").unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.relate_location(player.clone(), lobby, LocationTag::ContainedBy).unwrap();
        let mut config = EngineConfig::default();
        config.max_turns = Some(0);
        let mut turn_loop = TurnLoop::new(world, ActionPipeline::new(), Parser::new(), config, player);
        assert!(matches!(turn_loop.step("wait"), StepOutcome::SessionOver));
    }
}
