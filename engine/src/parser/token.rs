//! Tokenization (spec.md §4: "tokenization with byte ranges"). Each
//! token records where it came from in the original input so parser
//! error messages can point back at the offending word.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased word text.
    pub text: String,
    /// Byte offset of the first character in the original input.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Splits `input` on whitespace into lowercased tokens, each carrying
/// its byte range in the original string.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut buf = String::new();
    let mut push = |buf: &mut String, start: &mut Option<usize>, end: usize, tokens: &mut Vec<Token>| {
        if let Some(s) = start.take() {
            tokens.push(Token {
                text: std::mem::take(buf),
                start: s,
                end,
            });
        }
    };

    for (idx, ch) in input.char_indices() {
        if ch.is_whitespace() || is_punctuation(ch) {
            push(&mut buf, &mut start, idx, &mut tokens);
            continue;
        }
        if start.is_none() {
            start = Some(idx);
        }
        buf.extend(ch.to_lowercase());
    }
    push(&mut buf, &mut start, input.len(), &mut tokens);
    tokens
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, '.' | ',' | '!' | '?' | ';' | ':')
}
