//! The standard verb library (spec.md §6): grammar rules and pipeline
//! rules for the baseline set of verbs every world starts with.

pub mod interact;
pub mod inventory;
pub mod misc;
pub mod movement;

use crate::action::ActionPipeline;
use crate::parser::Parser;

/// Installs every standard verb's grammar and pipeline rules.
pub fn install_all(pipeline: &mut ActionPipeline, parser: &mut Parser) {
    movement::install(pipeline, parser);
    inventory::install(pipeline, parser);
    interact::install(pipeline, parser);
    misc::install(pipeline, parser);
}
