//! The parser (spec.md §4): scored, memoized top-down matching of
//! tokenized input against registered grammar rules, resolving noun
//! phrases through dictionary intersection as it goes.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use super::grammar::{slot_name, Command, Frontend, GrammarRule, PatternElem, Slot};
use super::nounphrase::Dictionary;
use super::token::{tokenize, Token};
use crate::world::{query, Direction, EntityId, World};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("i don't know the word '{word}'")]
    UnknownWord { word: String, start: usize, end: usize },

    #[error("that's not a verb i recognise")]
    NoMatch,

    #[error("i only understood you as far as wanting to {partial}")]
    Incomplete { partial: String },
}

#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Matched(Command),
    Ambiguous(Vec<Command>),
    Failed(ParseError),
}

/// `(end position, bound slots, accumulated grammar score)`: the score
/// is spec.md §4.4's `Match.score`, the sum of every dictionary-resolved
/// frontend's noun-phrase score along the way (literal words and
/// non-dictionary frontends contribute 0).
type MatchState = (usize, HashMap<String, Slot>, u32);

/// An author-extensible table of grammar rules. Later-registered rules
/// are preferred over earlier ones when both match (mirrors
/// [`crate::dispatch::Generic`]'s registration-order precedence).
#[derive(Default)]
pub struct Parser {
    rules: Vec<GrammarRule>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn understand(&mut self, rule: GrammarRule) {
        self.rules.push(rule);
    }

    pub fn parse(&self, world: &World, actor: &EntityId, input: &str) -> ParseOutcome {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return ParseOutcome::Failed(ParseError::NoMatch);
        }

        // Most-recently-registered rule wins outright on a score tie
        // (mirrors `Generic`'s registration-order precedence); only
        // multiple candidate *entities* within the winning rule count
        // as genuine ambiguity. The score compared across rules is each
        // rule's best noun-phrase match score (spec.md §4.4): literal
        // pattern words contribute nothing on their own.
        let mut best: Option<(u32, Vec<Command>)> = None;
        let mut best_partial: Option<(usize, String)> = None;

        for rule in self.rules.iter().rev() {
            if let Some(guard) = &rule.when {
                if !guard(world, actor) {
                    continue;
                }
            }
            let mut memo: HashMap<(usize, usize), Rc<Vec<MatchState>>> = HashMap::new();
            let states = match_from(&rule.pattern, 0, &tokens, 0, world, actor, &mut memo, self);
            let mut rule_reached = 0usize;
            let mut rule_matches = Vec::new();
            let mut rule_score = 0u32;
            for (end, bindings, score) in states.iter() {
                rule_reached = rule_reached.max(*end);
                if *end == tokens.len() {
                    let mut command = (rule.build)(bindings.clone());
                    command.grammar_score = *score;
                    rule_score = rule_score.max(*score);
                    rule_matches.push(command);
                }
            }
            if !rule_matches.is_empty() {
                if best.as_ref().is_none_or(|(best_score, _)| rule_score > *best_score) {
                    best = Some((rule_score, rule_matches));
                }
            } else if rule_reached > 0 && rule_reached < tokens.len() {
                let partial: String = tokens[..rule_reached]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                if best_partial.as_ref().is_none_or(|(best, _)| rule_reached > *best) {
                    best_partial = Some((rule_reached, partial));
                }
            }
        }

        let Some((_, mut winners)) = best else {
            if let Some(unknown) = self.first_unknown_word(world, actor, &tokens) {
                return ParseOutcome::Failed(ParseError::UnknownWord {
                    word: unknown.text,
                    start: unknown.start,
                    end: unknown.end,
                });
            }
            if let Some((_, partial)) = best_partial {
                return ParseOutcome::Failed(ParseError::Incomplete { partial });
            }
            return ParseOutcome::Failed(ParseError::NoMatch);
        };

        if winners.len() == 1 {
            ParseOutcome::Matched(winners.remove(0))
        } else {
            ParseOutcome::Ambiguous(winners)
        }
    }

    fn first_unknown_word<'a>(&self, world: &World, actor: &EntityId, tokens: &'a [Token]) -> Option<Token> {
        let dict = Dictionary::build(world, world.all_entities().cloned());
        let verbs: std::collections::HashSet<&str> = self
            .rules
            .iter()
            .flat_map(|r| r.pattern.iter())
            .filter_map(|e| match e {
                PatternElem::Word(words) => Some(words.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect();
        tokens
            .iter()
            .find(|t| !dict.contains_word(&t.text) && !verbs.contains(t.text.as_str()) && Direction::parse(&t.text).is_none())
            .cloned()
    }
}

#[allow(clippy::too_many_arguments)]
fn match_from(
    elems: &[PatternElem],
    idx: usize,
    tokens: &[Token],
    pos: usize,
    world: &World,
    actor: &EntityId,
    memo: &mut HashMap<(usize, usize), Rc<Vec<MatchState>>>,
    parser: &Parser,
) -> Rc<Vec<MatchState>> {
    if idx == elems.len() {
        return Rc::new(vec![(pos, HashMap::new(), 0)]);
    }
    if let Some(cached) = memo.get(&(idx, pos)) {
        return cached.clone();
    }

    let mut out: Vec<MatchState> = Vec::new();
    match &elems[idx] {
        PatternElem::Word(alts) => {
            if pos < tokens.len() && alts.iter().any(|w| w == &tokens[pos].text) {
                let rest = match_from(elems, idx + 1, tokens, pos + 1, world, actor, memo, parser);
                out.extend(rest.iter().cloned());
            }
        }
        PatternElem::Frontend(Frontend::Direction) => {
            if pos < tokens.len() {
                if let Some(dir) = Direction::parse(&tokens[pos].text) {
                    let slot = slot_name(frontend_index(elems, idx)).to_string();
                    let rest = match_from(elems, idx + 1, tokens, pos + 1, world, actor, memo, parser);
                    for (end, bindings, score) in rest.iter() {
                        let mut bindings = bindings.clone();
                        bindings.insert(slot.clone(), Slot::Direction(dir));
                        out.push((*end, bindings, *score));
                    }
                }
            }
        }
        PatternElem::Frontend(Frontend::Text) => {
            let slot = slot_name(frontend_index(elems, idx)).to_string();
            for len in (1..=tokens.len() - pos).rev() {
                let span = tokens[pos..pos + len]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let rest = match_from(elems, idx + 1, tokens, pos + len, world, actor, memo, parser);
                for (end, bindings, score) in rest.iter() {
                    let mut bindings = bindings.clone();
                    bindings.insert(slot.clone(), Slot::Text(span.clone()));
                    out.push((*end, bindings, *score));
                }
            }
        }
        PatternElem::Frontend(Frontend::Action) => {
            let slot = slot_name(frontend_index(elems, idx)).to_string();
            let remainder: String = tokens[pos..].iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
            if let ParseOutcome::Matched(inner) = parser.parse(world, actor, &remainder) {
                let mut bindings = HashMap::new();
                let score = inner.grammar_score;
                bindings.insert(slot, Slot::Action(Box::new(inner)));
                out.push((tokens.len(), bindings, score));
            }
        }
        PatternElem::Frontend(front) => {
            let slot = slot_name(frontend_index(elems, idx)).to_string();
            let candidates = candidates_for(world, actor, front);
            let dict = Dictionary::build(world, candidates);
            for len in (1..=tokens.len() - pos).rev() {
                let span: Vec<String> = tokens[pos..pos + len].iter().map(|t| t.text.clone()).collect();
                let matches = dict.resolve(&span);
                if matches.is_empty() {
                    continue;
                }
                let rest = match_from(elems, idx + 1, tokens, pos + len, world, actor, memo, parser);
                if rest.is_empty() {
                    continue;
                }
                for (entity, entity_score) in matches {
                    for (end, bindings, rest_score) in rest.iter() {
                        let mut bindings = bindings.clone();
                        bindings.insert(slot.clone(), Slot::Entity(entity.clone()));
                        out.push((*end, bindings, entity_score + *rest_score));
                    }
                }
            }
        }
    }

    let out = Rc::new(out);
    memo.insert((idx, pos), out.clone());
    out
}

fn frontend_index(elems: &[PatternElem], idx: usize) -> usize {
    elems[..idx].iter().filter(|e| matches!(e, PatternElem::Frontend(_))).count()
}

fn candidates_for(world: &World, actor: &EntityId, front: &Frontend) -> Vec<EntityId> {
    match front {
        Frontend::Something => world
            .all_entities()
            .filter(|e| query::visible_to(world, actor, e))
            .cloned()
            .collect(),
        Frontend::Anything => world.all_entities().cloned().collect(),
        Frontend::Somewhere => world
            .all_entities()
            .filter(|e| world.is_a(e, "room") && query::visible_to(world, actor, e))
            .cloned()
            .collect(),
        Frontend::Anywhere => world.all_entities().filter(|e| world.is_a(e, "room")).cloned().collect(),
        Frontend::ObjKind(kind) => world
            .all_entities()
            .filter(|e| world.is_a(e, kind.clone()) && query::visible_to(world, actor, e))
            .cloned()
            .collect(),
        Frontend::Direction | Frontend::Text | Frontend::Action => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LocationTag;

    fn sample_world() -> (World, EntityId, EntityId) {
        let mut world = World::new();
        let room = world.create_entity("lobby", "room").unwrap();
        let player = world.create_entity("player", "person").unwrap();
        world.relate_location(player.clone(), room.clone(), LocationTag::ContainedBy).unwrap();
        let ball = world.create_entity("ball1", "thing").unwrap();
        world.set("name", &[ball.clone()], "red ball").unwrap();
        world.relate_location(ball.clone(), room.clone(), LocationTag::ContainedBy).unwrap();
        (world, player, room)
    }

    #[test]
    fn a_simple_verb_noun_pattern_resolves_to_a_command() {
        let (world, player, _room) = sample_world();
        let mut parser = Parser::new();
        parser.understand(GrammarRule::simple("taking", "take|get [something]", "taking"));

        match parser.parse(&world, &player, "take the red ball") {
            ParseOutcome::Matched(cmd) => {
                assert_eq!(cmd.verb, "taking");
                assert_eq!(cmd.entity("noun"), Some(&EntityId::new("ball1")));
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn going_parses_a_direction() {
        let (world, player, _room) = sample_world();
        let mut parser = Parser::new();
        parser.understand(GrammarRule::simple("going", "go [direction]", "going"));

        match parser.parse(&world, &player, "go north") {
            ParseOutcome::Matched(cmd) => assert_eq!(cmd.direction("noun"), Some(Direction::North)),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn an_unknown_word_is_reported_distinctly_from_no_match() {
        let (world, player, _room) = sample_world();
        let mut parser = Parser::new();
        parser.understand(GrammarRule::simple("taking", "take [something]", "taking"));

        match parser.parse(&world, &player, "frobnicate the ball") {
            ParseOutcome::Failed(ParseError::UnknownWord { word, .. }) => assert_eq!(word, "frobnicate"),
            other => panic!("expected an unknown word failure, got {other:?}"),
        }
    }

    #[test]
    fn later_registered_rules_win_when_both_match() {
        let (world, player, _room) = sample_world();
        let mut parser = Parser::new();
        parser.understand(GrammarRule::simple("examining", "x [something]", "examining"));
        parser.understand(GrammarRule::simple("examining_special", "x [something]", "examining_special"));

        match parser.parse(&world, &player, "x ball") {
            ParseOutcome::Matched(cmd) => assert_eq!(cmd.verb, "examining_special"),
            other => panic!("expected a match, got {other:?}"),
        }
    }
}
