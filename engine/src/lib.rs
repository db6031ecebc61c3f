//! A turn-based command interpreter for text adventures: generic
//! dispatch, a relation-based world model, a scored natural-language
//! parser, a five-phase action pipeline, and the narration plumbing
//! that ties them together.
//!
//! `textadv-engine` owns no I/O: a frontend (the `cli` crate, or a
//! test harness) drives one [`turn::TurnLoop`] per session, feeding it
//! lines of input and rendering the narration it returns through a
//! [`text::TextSink`].

pub mod action;
pub mod config;
pub mod description;
pub mod dispatch;
pub mod error;
pub mod parser;
pub mod text;
pub mod turn;
pub mod verbs;
pub mod world;

pub use action::{disambiguate, scores, ActionContext, ActionPipeline, Disambiguation, PhaseControl, Verify};
pub use config::EngineConfig;
pub use dispatch::{Generic, Method, Next, NoApplicableMethod};
pub use error::EngineError;
pub use parser::{Command, Frontend, GrammarRule, ParseOutcome, Parser, Slot};
pub use text::{conjugate, BufferSink, Person, PlainTextSink, TextSink};
pub use turn::{StepOutcome, TurnLoop};
pub use world::{Direction, EntityId, Kind, LocationTag, Value, World, WorldBuilder, WorldError};
