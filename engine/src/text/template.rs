//! Bracket/reword templating (spec.md §4.3, §6): authored strings like
//! `"[We] {take|s} [the noun]."` expand to `"You take the red ball."`
//! or `"Bob takes the red ball."` depending on who the subject is.
//!
//! Two substitution forms are recognised:
//! - `[cmd arg]` — a bracket command, either a pronoun form (`we`,
//!   `We`, `us`, `our`, `Our`) or a naming form (`the`/`The`/`a`/`A`)
//!   applied to an entity bound under `arg` in the call's bindings. A
//!   bare `[binding]` is shorthand for `[the binding]`.
//! - `{word|flags}` — reword: `word` conjugated per `flags`. The only
//!   flag the standard verb library's report strings need is `s`,
//!   which conjugates for the subject's grammatical person.

use std::collections::HashMap;

use super::helpers;
use super::reword::{conjugate, Person};
use crate::world::{EntityId, World};

/// Expands `template` against a subject/viewer pair and a set of named
/// entity bindings (e.g. `"noun" -> the taken object`).
pub fn expand(
    world: &World,
    viewer: &EntityId,
    subject: &EntityId,
    bindings: &HashMap<String, EntityId>,
    template: &str,
) -> String {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => {
                let mut cmd = String::new();
                for c2 in chars.by_ref() {
                    if c2 == ']' {
                        break;
                    }
                    cmd.push(c2);
                }
                out.push_str(&expand_bracket(world, viewer, subject, bindings, &cmd));
            }
            '{' => {
                let mut body = String::new();
                for c2 in chars.by_ref() {
                    if c2 == '}' {
                        break;
                    }
                    body.push(c2);
                }
                out.push_str(&expand_brace(subject, viewer, &body));
            }
            other => out.push(other),
        }
    }
    out
}

fn expand_bracket(
    world: &World,
    viewer: &EntityId,
    subject: &EntityId,
    bindings: &HashMap<String, EntityId>,
    cmd: &str,
) -> String {
    let mut parts = cmd.splitn(2, ' ');
    let head = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim);

    match head {
        "we" => helpers::pronoun_subject(world, viewer, subject),
        "We" => helpers::capitalize(&helpers::pronoun_subject(world, viewer, subject)),
        "us" => helpers::pronoun_subject(world, viewer, subject),
        "our" | "Our" => {
            let base = if subject == viewer {
                helpers::linked(subject, "your".to_string())
            } else {
                helpers::linked(subject, format!("{}'s", helpers::the(world, subject)))
            };
            if head == "Our" {
                helpers::capitalize(&base)
            } else {
                base
            }
        }
        "the" => lookup(world, bindings, arg, helpers::the),
        "The" => lookup(world, bindings, arg, helpers::the_cap),
        "a" => lookup(world, bindings, arg, helpers::a),
        "A" => lookup(world, bindings, arg, helpers::a_cap),
        other => match bindings.get(other) {
            Some(entity) => helpers::the(world, entity),
            None => format!("[{other}]"),
        },
    }
}

fn lookup(
    world: &World,
    bindings: &HashMap<String, EntityId>,
    arg: Option<&str>,
    render: impl Fn(&World, &EntityId) -> String,
) -> String {
    arg.and_then(|key| bindings.get(key))
        .map(|entity| render(world, entity))
        .unwrap_or_default()
}

fn expand_brace(subject: &EntityId, viewer: &EntityId, body: &str) -> String {
    let mut parts = body.splitn(2, '|');
    let word = parts.next().unwrap_or("");
    let flags = parts.next().unwrap_or("");
    if flags.contains('s') {
        let person = if subject == viewer { Person::Second } else { Person::Third };
        conjugate(word, person)
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn a_report_template_conjugates_for_the_player_and_for_an_npc() {
        let mut world = World::new();
        let player = world.create_entity("player", "person").unwrap();
        let npc = world.create_entity("guard", "person").unwrap();
        world.set("name", &[npc.clone()], "guard").unwrap();
        let ball = world.create_entity("ball", "thing").unwrap();
        world.set("name", &[ball.clone()], "red ball").unwrap();

        let mut bindings = HashMap::new();
        bindings.insert("noun".to_string(), ball);
        let template = "[We] {take|s} [the noun].";

        assert_eq!(expand(&world, &player, &player, &bindings, template), "You take the red ball.");
        assert_eq!(expand(&world, &player, &npc, &bindings, template), "The guard takes the red ball.");
    }

    #[test]
    fn an_unbound_command_is_left_literally_in_the_output() {
        let world = World::new();
        let player = EntityId::new("player");
        let bindings = HashMap::new();
        assert_eq!(expand(&world, &player, &player, &bindings, "[mystery]"), "[mystery]");
    }
}
