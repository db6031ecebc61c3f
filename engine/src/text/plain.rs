//! A [`TextSink`] over any `std::io::Write`, used by the CLI frontend
//! and by anything that just wants narration on a stream.

use std::io::Write;

use super::sink::TextSink;

pub struct PlainTextSink<W: Write> {
    out: W,
}

impl<W: Write> PlainTextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TextSink for PlainTextSink<W> {
    fn print(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            tracing::warn!(%err, "text sink: write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_writes_raw_bytes_to_the_underlying_stream() {
        let mut sink = PlainTextSink::new(Vec::new());
        sink.print("hello");
        sink.paragraph_break();
        sink.print("world");
        assert_eq!(sink.into_inner(), b"hello\n\nworld");
    }
}
