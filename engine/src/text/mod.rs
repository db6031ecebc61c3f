//! Narration: the [`TextSink`] abstraction, bracket/reword templating,
//! and naming helpers (spec.md §4.3).

pub mod helpers;
pub mod plain;
pub mod reword;
pub mod sink;
pub mod template;

pub use plain::PlainTextSink;
pub use reword::{conjugate, Person};
pub use sink::{BufferSink, TextSink};
