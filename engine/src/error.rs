//! The crate's top-level error taxonomy (spec.md §7).
//!
//! Most of what goes wrong during a turn is *not* an [`EngineError`]: a
//! parser failure or a failed action `verify` is ordinary narration
//! ("You can't see any such thing."), reported through the text sink
//! like any other outcome. `EngineError` is reserved for faults: an
//! author-authored rule panicking, an invariant the world model
//! couldn't uphold, or a dispatch chain exhausted with no fallback.
//! [`crate::turn::TurnLoop`] catches these at the turn boundary and
//! continues rather than unwinding the whole session.

use thiserror::Error;

use crate::dispatch::NoApplicableMethod;
use crate::world::WorldError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Dispatch(#[from] NoApplicableMethod),

    /// An author-registered rule (a property rule, a verb phase) panicked.
    /// Caught at the turn boundary via `catch_unwind` and reported here
    /// instead of crashing the session.
    #[error("internal fault in '{operation}': {detail}")]
    InternalFault { operation: String, detail: String },
}
