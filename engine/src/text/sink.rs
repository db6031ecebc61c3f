//! The [`TextSink`] trait: every piece of narration — room descriptions,
//! action reports, parser error messages — is written through one of
//! these rather than directly to a terminal, so the same engine drives
//! a CLI, a test harness, or a future GUI unchanged (spec.md §4.3).

/// A destination for narrated text. Implementors decide how paragraph
/// breaks and raw text map onto their medium (a terminal, a buffer, a
/// websocket frame).
///
/// Beyond `print`/`paragraph_break`, this also carries the region/
/// decoration/action-link primitives spec.md §6 requires of the core's
/// sink interface, so a markup-aware collaborator (the out-of-scope
/// HTML/DOM builder) has somewhere to hook in. A plain-text sink — the
/// only kind the core itself implements — no-ops every one of them;
/// [`write_element`](TextSink::write_element) falls back to `print`
/// since unstyled markup still carries text.
pub trait TextSink {
    /// Writes `text` with no trailing newline implied.
    fn print(&mut self, text: &str);

    /// Starts a new paragraph. The default inserts a blank line, which
    /// is how the standard verb library separates turns.
    fn paragraph_break(&mut self) {
        self.print("\n\n");
    }

    /// Emits markup as a named element; a plain-text sink just prints
    /// its text content and drops the tag.
    fn write_element(&mut self, _tag: &str, text: &str) {
        self.print(text);
    }

    /// Enters an inline region (e.g. a `<span>`); closed by [`leave`](TextSink::leave).
    fn enter_inline(&mut self, _tag: &str) {}

    /// Enters a block region (e.g. a `<div>`); closed by [`leave`](TextSink::leave).
    fn enter_block(&mut self, _tag: &str) {}

    /// Leaves the most recently entered region.
    fn leave(&mut self) {}

    fn add_class(&mut self, _class: &str) {}
    fn attr(&mut self, _key: &str, _value: &str) {}
    fn css(&mut self, _key: &str, _value: &str) {}
    fn on(&mut self, _event: &str, _handler: &str) {}

    /// Runs `body` with the sink in a link region whose embedded command
    /// is `command` (spec.md §6: clicking the rendered text resubmits
    /// `command` as if typed). A plain-text sink just runs `body`
    /// unadorned — there is nothing to click in a terminal transcript.
    fn wrap_action_link(&mut self, _command: &str, body: &mut dyn FnMut(&mut dyn TextSink)) {
        body(self);
    }
}

/// A [`TextSink`] that appends everything into an in-memory buffer,
/// useful for tests and for any frontend that wants to post-process a
/// whole turn's narration before displaying it.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    buffer: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl TextSink for BufferSink {
    fn print(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_break_defaults_to_a_blank_line() {
        let mut sink = BufferSink::new();
        sink.print("You are in a room.");
        sink.paragraph_break();
        sink.print("A ball is here.");
        assert_eq!(sink.as_str(), "You are in a room.\n\nA ball is here.");
    }

    #[test]
    fn take_drains_the_buffer() {
        let mut sink = BufferSink::new();
        sink.print("hello");
        assert_eq!(sink.take(), "hello");
        assert_eq!(sink.as_str(), "");
    }
}
