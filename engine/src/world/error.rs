//! Errors raised by world-model operations.

use thiserror::Error;

use super::id::{EntityId, Kind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity '{0}' already has a kind assigned")]
    KindAlreadyAssigned(EntityId),

    #[error("entity '{0}' has no kind assigned")]
    NoKindAssigned(EntityId),

    #[error("unknown kind '{0}'")]
    UnknownKind(Kind),

    #[error("kind '{0}' already declared")]
    KindAlreadyDeclared(Kind),

    #[error("a room cannot be the source of a location edge ('{0}')")]
    RoomCannotBeLocated(EntityId),

    #[error("relation tag '{tag}' is not in relation '{relation}''s alphabet")]
    TagNotAllowed { relation: String, tag: String },

    #[error("property '{0}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        property: String,
        expected: usize,
        got: usize,
    },

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("unknown activity '{0}'")]
    UnknownActivity(String),

    #[error(transparent)]
    Dispatch(#[from] crate::dispatch::NoApplicableMethod),
}
