//! Engine-wide configuration (ambient stack supplement: spec.md names
//! no configuration surface, but a turn loop that is meant to host
//! different frontends needs a place for the knobs they all share).

use serde::{Deserialize, Serialize};

/// Tunables that don't belong to any single module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Caps the number of turns a session will process before the turn
    /// loop refuses further input (`None` means unbounded). Mainly for
    /// scripted test harnesses that want a hard stop.
    pub max_turns: Option<u32>,

    /// Whether `verify` failures and successful actions are logged at
    /// `info` level in addition to being narrated.
    pub trace_actions: bool,

    /// Whether disambiguation questions are asked interactively or the
    /// first (highest-scoring) candidate is picked automatically. Test
    /// harnesses want the latter; an interactive CLI wants the former.
    pub interactive_disambiguation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_turns: None,
            trace_actions: false,
            interactive_disambiguation: true,
        }
    }
}
