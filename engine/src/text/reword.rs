//! Second/third-person conjugation (spec.md §4.3): the same message
//! template narrates "You take the red ball." for the player and "Bob
//! takes the red ball." for an NPC, differing only in the verb's
//! person and the subject's rendering.

/// Grammatical person a message is narrated in, relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Person {
    /// The subject is the viewer: "you take...".
    Second,
    /// The subject is someone else: "Bob takes...".
    Third,
}

/// Conjugates a bare present-tense verb for `person`. Handles the
/// regular `-s`/`-es`/`-ies` suffixes plus the handful of irregulars
/// the standard verb library's report strings actually use.
pub fn conjugate(verb: &str, person: Person) -> String {
    if person == Person::Second {
        return verb.to_string();
    }
    match verb {
        "be" => return "is".to_string(),
        "have" => return "has".to_string(),
        "do" => return "does".to_string(),
        "go" => return "goes".to_string(),
        _ => {}
    }
    if verb.ends_with(['s', 'x', 'z']) || verb.ends_with("ch") || verb.ends_with("sh") {
        format!("{verb}es")
    } else if let Some(stem) = verb.strip_suffix('y') {
        if stem.ends_with(|c: char| !"aeiou".contains(c.to_ascii_lowercase())) {
            format!("{stem}ies")
        } else {
            format!("{verb}s")
        }
    } else {
        format!("{verb}s")
    }
}
