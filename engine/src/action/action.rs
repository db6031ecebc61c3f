//! The value passed through every phase of the action pipeline
//! (spec.md §4): a parsed command bound to the actor performing it.

use std::collections::HashMap;

use crate::parser::{Command, Slot};
use crate::world::{Direction, EntityId};

/// One action in flight: a verb, its actor, and the slots the parser
/// (or a `do_instead`/`do_first` redirect) bound for it.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub actor: EntityId,
    pub verb: String,
    pub slots: HashMap<String, Slot>,
    /// The noun-phrase match score the parser accumulated for this
    /// command (spec.md §4.4's `Match.score`), carried through so
    /// disambiguation can narrow on it (spec.md §4.5 step 4).
    pub grammar_score: u32,
}

impl ActionContext {
    pub fn new(actor: EntityId, verb: impl Into<String>) -> Self {
        Self {
            actor,
            verb: verb.into(),
            slots: HashMap::new(),
            grammar_score: 0,
        }
    }

    pub fn from_command(actor: EntityId, command: Command) -> Self {
        Self {
            actor,
            verb: command.verb,
            slots: command.slots,
            grammar_score: command.grammar_score,
        }
    }

    pub fn with_entity(mut self, slot: impl Into<String>, entity: EntityId) -> Self {
        self.slots.insert(slot.into(), Slot::Entity(entity));
        self
    }

    pub fn with_direction(mut self, slot: impl Into<String>, direction: Direction) -> Self {
        self.slots.insert(slot.into(), Slot::Direction(direction));
        self
    }

    pub fn entity(&self, slot: &str) -> Option<&EntityId> {
        match self.slots.get(slot) {
            Some(Slot::Entity(id)) => Some(id),
            _ => None,
        }
    }

    pub fn direction(&self, slot: &str) -> Option<Direction> {
        match self.slots.get(slot) {
            Some(Slot::Direction(dir)) => Some(*dir),
            _ => None,
        }
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        match self.slots.get(slot) {
            Some(Slot::Text(s)) => Some(s),
            _ => None,
        }
    }
}

/// What a `try_before`/`before` rule decides for the action in flight
/// (spec.md §4: "`do_instead`/`do_first`/`abort_action` semantics").
#[derive(Debug, Clone)]
pub enum PhaseControl {
    /// Nothing special: proceed to the next phase.
    Continue,
    /// Run a different action entirely in place of this one.
    DoInstead(ActionContext),
    /// Run another action first, then resume this one regardless of
    /// its outcome.
    DoFirst(ActionContext),
    /// Stop the pipeline here; the string is the final narration.
    Abort(String),
}
