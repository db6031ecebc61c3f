//! Grammar registration (spec.md §4: `understand(pattern, build_action,
//! when?)`) and the pattern compiler.
//!
//! A pattern is a space-separated sequence of literal words (`|`
//! separates synonyms: `"take|get"`) and bracketed frontends:
//! `[something]`, `[anything]`, `[somewhere]`, `[anywhere]`,
//! `[obj <kind>]`, `[direction]`, `[text]`, `[action]`. Frontends are
//! bound, in pattern order, to the slot names `noun`, `second`,
//! `third`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::world::{Direction, EntityId, Kind, World};

/// What a bracketed frontend in a pattern matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frontend {
    /// A single noun phrase resolved against things visible to the actor.
    Something,
    /// A single noun phrase resolved against *all* known entities, seen
    /// or not (used by verbs like `think about [anything]`).
    Anything,
    /// A noun phrase naming a room or container, visible to the actor.
    Somewhere,
    /// Same, without the visibility restriction.
    Anywhere,
    /// A noun phrase restricted to a kind (e.g. `[obj door]`).
    ObjKind(Kind),
    /// A compass/vertical direction word.
    Direction,
    /// The remaining input, captured verbatim (e.g. for `save [text]`).
    Text,
    /// A nested command, recursively parsed (e.g. `ask [something] to
    /// [action]`).
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElem {
    Word(Vec<String>),
    Frontend(Frontend),
}

/// A resolved value bound to a pattern slot.
#[derive(Debug, Clone)]
pub enum Slot {
    Entity(EntityId),
    Direction(Direction),
    Text(String),
    Action(Box<Command>),
}

/// A fully parsed command: a verb plus its bound slots and the
/// noun-phrase match score accumulated while binding them (spec.md
/// §4.4's `Match { start, end, value, score }`, summed across every
/// dictionary-resolved slot in the command).
#[derive(Debug, Clone, Default)]
pub struct Command {
    pub verb: String,
    pub slots: HashMap<String, Slot>,
    pub grammar_score: u32,
}

impl Command {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            slots: HashMap::new(),
            grammar_score: 0,
        }
    }

    pub fn entity(&self, slot: &str) -> Option<&EntityId> {
        match self.slots.get(slot) {
            Some(Slot::Entity(id)) => Some(id),
            _ => None,
        }
    }

    pub fn direction(&self, slot: &str) -> Option<Direction> {
        match self.slots.get(slot) {
            Some(Slot::Direction(dir)) => Some(*dir),
            _ => None,
        }
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        match self.slots.get(slot) {
            Some(Slot::Text(s)) => Some(s),
            _ => None,
        }
    }
}

type Guard = Rc<dyn Fn(&World, &EntityId) -> bool>;
type Builder = Rc<dyn Fn(HashMap<String, Slot>) -> Command>;

/// A single registered grammar line.
pub struct GrammarRule {
    pub name: String,
    pub pattern: Vec<PatternElem>,
    pub when: Option<Guard>,
    pub build: Builder,
}

impl GrammarRule {
    /// A rule that just carries the matched slots into a `Command` for
    /// `verb`, with no guard and no slot remapping.
    pub fn simple(name: impl Into<String>, pattern: &str, verb: impl Into<String>) -> Self {
        let verb = verb.into();
        Self {
            name: name.into(),
            pattern: compile(pattern),
            when: None,
            build: Rc::new(move |slots| Command {
                verb: verb.clone(),
                slots,
                grammar_score: 0,
            }),
        }
    }

    pub fn with_guard(mut self, guard: impl Fn(&World, &EntityId) -> bool + 'static) -> Self {
        self.when = Some(Rc::new(guard));
        self
    }

    pub fn with_build(mut self, build: impl Fn(HashMap<String, Slot>) -> Command + 'static) -> Self {
        self.build = Rc::new(build);
        self
    }
}

/// Compiles a pattern string into a sequence of [`PatternElem`]s.
pub fn compile(pattern: &str) -> Vec<PatternElem> {
    pattern
        .split_whitespace()
        .map(|tok| {
            if let Some(inner) = tok.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                let mut parts = inner.split_whitespace();
                let head = parts.next().unwrap_or("");
                PatternElem::Frontend(match head {
                    "something" => Frontend::Something,
                    "anything" => Frontend::Anything,
                    "somewhere" => Frontend::Somewhere,
                    "anywhere" => Frontend::Anywhere,
                    "direction" => Frontend::Direction,
                    "text" => Frontend::Text,
                    "action" => Frontend::Action,
                    "obj" => Frontend::ObjKind(Kind::new(parts.next().unwrap_or("thing"))),
                    other => Frontend::ObjKind(Kind::new(other)),
                })
            } else {
                PatternElem::Word(tok.split('|').map(str::to_string).collect())
            }
        })
        .collect()
}

/// The slot name a frontend is bound to, by its position among the
/// pattern's frontends (first: `noun`, second: `second`, third: `third`).
pub fn slot_name(index: usize) -> &'static str {
    match index {
        0 => "noun",
        1 => "second",
        2 => "third",
        _ => "extra",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_splits_literal_synonyms_and_frontends() {
        let elems = compile("take|get [something]");
        assert_eq!(
            elems,
            vec![
                PatternElem::Word(vec!["take".to_string(), "get".to_string()]),
                PatternElem::Frontend(Frontend::Something),
            ]
        );
    }

    #[test]
    fn compile_reads_an_obj_kind_constraint() {
        let elems = compile("unlock [obj door] with [something]");
        assert_eq!(
            elems[1],
            PatternElem::Frontend(Frontend::ObjKind(Kind::new("door")))
        );
    }

    #[test]
    fn slot_names_follow_noun_second_third() {
        assert_eq!(slot_name(0), "noun");
        assert_eq!(slot_name(1), "second");
        assert_eq!(slot_name(2), "third");
    }
}
