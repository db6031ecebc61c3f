//! Noun-phrase resolution (spec.md §4.4): a span of tokens is resolved
//! to a set of candidate entities by intersecting, word by word, the
//! entities whose `name` or `words` dictionary contains that word, and
//! scored by how much of that span was adjective versus noun.
//!
//! This also backs the §7 parse-failure distinction: a token absent
//! from every candidate's dictionary is an *unknown word* ("I don't
//! know the word 'frobnicate'"), while a token that's known but whose
//! intersection is empty is merely *no match* ("You can't see any such
//! thing.").

use std::collections::{HashMap, HashSet};

use crate::world::{EntityId, World};

const STOPWORDS: &[&str] = &["a", "an", "the", "some", "my", "your", "his", "her", "its"];

/// A word-to-entities index built over a fixed candidate set. Each word
/// records, per entity, whether it names that entity (a noun, `+2`
/// toward the match score) or merely describes it (an adjective, `+1`).
pub struct Dictionary {
    index: HashMap<String, HashMap<EntityId, bool>>,
    names: HashMap<EntityId, String>,
}

impl Dictionary {
    /// Builds a dictionary over `candidates`, indexing each entity's
    /// tokenized `name` plus its `words` list (spec.md §3 standard
    /// properties). Within `words`, a leading `@` marks a noun; every
    /// other word — and every token of `name` but its last — counts as
    /// an adjective.
    pub fn build(world: &World, candidates: impl IntoIterator<Item = EntityId>) -> Self {
        let mut index: HashMap<String, HashMap<EntityId, bool>> = HashMap::new();
        let mut names = HashMap::new();
        for entity in candidates {
            for (word, is_noun) in Self::words_of(world, &entity) {
                index.entry(word).or_default().insert(entity.clone(), is_noun);
            }
            names.insert(entity.clone(), world.get_text("name", std::slice::from_ref(&entity)).unwrap_or_default().to_lowercase());
        }
        Self { index, names }
    }

    fn words_of(world: &World, entity: &EntityId) -> Vec<(String, bool)> {
        let mut words = Vec::new();
        if let Some(name) = world.get_text("name", std::slice::from_ref(entity)) {
            let tokens: Vec<String> = name.split_whitespace().map(|w| w.to_lowercase()).collect();
            let last = tokens.len().saturating_sub(1);
            for (i, word) in tokens.into_iter().enumerate() {
                words.push((word, i == last));
            }
        }
        if let Ok(Some(extra)) = world.get("words", std::slice::from_ref(entity)) {
            if let Some(list) = extra.as_list() {
                for item in list {
                    if let Some(text) = item.as_text() {
                        let lower = text.to_lowercase();
                        match lower.strip_prefix('@') {
                            Some(noun) => words.push((noun.to_string(), true)),
                            None => words.push((lower, false)),
                        }
                    }
                }
            }
        }
        words
    }

    /// The full vocabulary this dictionary was built over, for §7's
    /// unknown-word check.
    pub fn known_words(&self) -> HashSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Resolves a token span to the candidate entities matching every
    /// non-stopword token, each paired with its spec §4.4 match score:
    /// `+1` per adjective word in the span, `+2` per noun word, and `+1`
    /// more if the span (article stripped) equals the entity's display
    /// name verbatim. An empty result means "no such thing".
    pub fn resolve(&self, tokens: &[String]) -> Vec<(EntityId, u32)> {
        let meaningful: Vec<&str> = match tokens.split_first() {
            Some((first, rest)) if STOPWORDS.contains(&first.as_str()) => rest.iter().map(String::as_str).collect(),
            _ => tokens.iter().map(String::as_str).collect(),
        };
        if meaningful.is_empty() {
            return Vec::new();
        }

        let mut candidates: Option<HashSet<EntityId>> = None;
        for token in &meaningful {
            let matches: HashSet<EntityId> = self.index.get(*token).map(|m| m.keys().cloned().collect()).unwrap_or_default();
            candidates = Some(match candidates {
                None => matches,
                Some(prev) => prev.intersection(&matches).cloned().collect(),
            });
        }
        let Some(candidates) = candidates else {
            return Vec::new();
        };

        let span = meaningful.join(" ");
        candidates
            .into_iter()
            .map(|entity| {
                let mut score = 0u32;
                for token in &meaningful {
                    let is_noun = self.index.get(*token).and_then(|m| m.get(&entity)).copied().unwrap_or(false);
                    score += if is_noun { 2 } else { 1 };
                }
                if self.names.get(&entity).is_some_and(|name| name == &span) {
                    score += 1;
                }
                (entity, score)
            })
            .collect()
    }
}
