//! [`TerminalSink`]: the demo frontend's [`TextSink`] (spec.md §4.3,
//! §9 — "a terminal implementation renders the same bracket/reword
//! commands as styled text and ignores `on(click)`"). Bolds a room's
//! heading line, the first line of a paragraph, and leaves everything
//! else as plain text to stdout.

use std::io::{self, Write};

use crossterm::style::Stylize;
use textadv_engine::TextSink;

pub struct TerminalSink {
    color: bool,
}

impl TerminalSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl TextSink for TerminalSink {
    /// Each call is assumed to be one whole turn's narration (that's
    /// how [`crate::main`] drives it): if it opens with a heading line
    /// followed by a blank line (spec.md §4.7), the heading is bolded.
    fn print(&mut self, text: &str) {
        let mut out = io::stdout();
        if !self.color {
            let _ = write!(out, "{text}");
            return;
        }

        match text.split_once("\n\n") {
            Some((heading, rest)) if !heading.is_empty() && !heading.contains('\n') => {
                let _ = write!(out, "{}\n\n{rest}", heading.bold());
            }
            _ => {
                let _ = write!(out, "{text}");
            }
        }
    }

    fn paragraph_break(&mut self) {
        let _ = write!(io::stdout(), "\n\n");
    }
}
