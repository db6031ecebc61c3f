//! The action algebra and pipeline (spec.md §4): the five-phase
//! `verify -> try_before -> before -> carry_out -> report` dispatch
//! that every verb registers into, plus disambiguation among candidate
//! commands.

pub mod action;
pub mod adornments;
pub mod disambiguate;
pub mod pipeline;
pub mod verify;

pub use action::{ActionContext, PhaseControl};
pub use disambiguate::{disambiguate, Disambiguation};
pub use pipeline::ActionPipeline;
pub use verify::{scores, Verify};
