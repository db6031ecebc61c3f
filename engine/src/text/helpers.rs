//! Naming helpers: articles and capitalization used both directly by
//! action reports and by the bracket template engine (spec.md §4.3).

use super::sink::{BufferSink, TextSink};
use crate::world::{EntityId, World};

/// Runs `text` through a [`TextSink`] action-link region whose embedded
/// command is `examine <id>` (spec.md §4.3), then drains the sink back
/// to a plain string. A plain [`BufferSink`] just captures `text`
/// unadorned, same as before; the point is that every object-reference
/// helper below goes through this hook, so a markup-aware sink wired in
/// its place (the out-of-scope GUI collaborator) can render a real
/// clickable link instead.
pub fn linked(entity: &EntityId, text: String) -> String {
    let command = format!("examine {}", entity.as_str());
    let mut sink = BufferSink::new();
    sink.wrap_action_link(&command, &mut |s| s.print(&text));
    sink.into_string()
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn starts_with_vowel_sound(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| "aeiouAEIOU".contains(c))
}

/// The name an entity should be printed under ("the red ball", or a
/// proper name verbatim when `proper_named` is set).
pub fn bare_name(world: &World, entity: &EntityId) -> String {
    world
        .get_text("name", std::slice::from_ref(entity))
        .unwrap_or_else(|| "something".to_string())
}

fn is_proper_named(world: &World, entity: &EntityId) -> bool {
    world.get_bool("proper_named", std::slice::from_ref(entity))
}

/// "the red ball", or just "Bob" for a proper-named entity.
pub fn the(world: &World, entity: &EntityId) -> String {
    let text = if is_proper_named(world, entity) {
        bare_name(world, entity)
    } else {
        format!("the {}", bare_name(world, entity))
    };
    linked(entity, text)
}

/// Capitalized form of [`the`].
pub fn the_cap(world: &World, entity: &EntityId) -> String {
    capitalize(&the(world, entity))
}

/// "a red ball" (using the entity's stored article, usually "a"/"an"),
/// or the proper name verbatim.
pub fn a(world: &World, entity: &EntityId) -> String {
    if is_proper_named(world, entity) {
        return linked(entity, bare_name(world, entity));
    }
    let name = bare_name(world, entity);
    let article = world
        .get_text("article", std::slice::from_ref(entity))
        .unwrap_or_else(|| if starts_with_vowel_sound(&name) { "an".to_string() } else { "a".to_string() });
    linked(entity, format!("{article} {name}"))
}

/// Capitalized form of [`a`].
pub fn a_cap(world: &World, entity: &EntityId) -> String {
    capitalize(&a(world, entity))
}

/// "you", unless `subject` is a third party, in which case the same
/// naming rule as [`the`] applies.
pub fn pronoun_subject(world: &World, viewer: &EntityId, subject: &EntityId) -> String {
    if subject == viewer {
        linked(subject, "you".to_string())
    } else {
        the(world, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn the_uses_the_stored_name() {
        let mut world = World::new();
        let ball = world.create_entity("ball", "thing").unwrap();
        world.set("name", &[ball.clone()], "red ball").unwrap();
        assert_eq!(the(&world, &ball), "the red ball");
        assert_eq!(the_cap(&world, &ball), "The red ball");
    }

    #[test]
    fn proper_named_entities_skip_the_article() {
        let mut world = World::new();
        let bob = world.create_entity("bob", "person").unwrap();
        world.set("name", &[bob.clone()], "Bob").unwrap();
        world.set("proper_named", &[bob.clone()], true).unwrap();
        assert_eq!(the(&world, &bob), "Bob");
        assert_eq!(a(&world, &bob), "Bob");
    }

    #[test]
    fn pronoun_subject_is_you_for_the_viewer() {
        let mut world = World::new();
        let player = world.create_entity("player", "person").unwrap();
        let npc = world.create_entity("guard", "person").unwrap();
        world.set("name", &[npc.clone()], "guard").unwrap();
        assert_eq!(pronoun_subject(&world, &player, &player), "you");
        assert_eq!(pronoun_subject(&world, &player, &npc), "the guard");
    }
}
