//! End-to-end scenarios from spec.md §8: real input lines fed through
//! a full [`TurnLoop`] (parser, disambiguator, pipeline, description
//! engine) against small hand-built worlds, checked against the
//! literal observable effects the scenarios name.

use textadv_engine::world::{Direction, EntityId, LocationTag, World, WorldBuilder};
use textadv_engine::{ActionPipeline, EngineConfig, Parser, StepOutcome, TurnLoop};

fn turn_loop(world: World, player: EntityId) -> TurnLoop {
    let mut pipeline = ActionPipeline::new();
    let mut parser = Parser::new();
    textadv_engine::verbs::install_all(&mut pipeline, &mut parser);
    let mut config = EngineConfig::default();
    config.interactive_disambiguation = false;
    TurnLoop::new(world, pipeline, parser, config, player)
}

fn narration(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::Narrated(text) => text,
        other => panic!("expected narration, got {other:?}"),
    }
}

/// Scenario 1: Lobby contains the player and a red ball; `take ball`.
#[test]
fn scenario_1_taking_a_ball_moves_it_to_the_player() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("ball", "thing")
        .set("name", [EntityId::new("ball")], "red ball")
        .locate("ball", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    let text = narration(session.step("take ball"));
    assert!(text.to_lowercase().contains("take"), "expected a taking report, got: {text}");

    let world = session.world();
    assert_eq!(
        world.location_of(&EntityId::new("ball")),
        Some((&EntityId::new("player"), LocationTag::ContainedBy))
    );
}

/// Scenario 2 (continuing from 1): `drop ball`.
#[test]
fn scenario_2_dropping_a_held_ball_returns_it_to_the_room() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("ball", "thing")
        .set("name", [EntityId::new("ball")], "red ball")
        .locate("ball", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    narration(session.step("take ball"));
    let text = narration(session.step("drop ball"));
    assert!(text.to_lowercase().contains("drop"), "expected a dropping report, got: {text}");

    assert_eq!(
        session.world().location_of(&EntityId::new("ball")),
        Some((&EntityId::new("lobby"), LocationTag::ContainedBy))
    );
}

/// Scenario 3: a closed cardboard box in the room, a ball on the
/// floor. `put ball in box` implicitly opens the box, then takes the
/// ball, before placing it.
#[test]
fn scenario_3_putting_an_unheld_ball_in_a_closed_box_runs_both_fixups_in_order() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("box", "container")
        .set("name", [EntityId::new("box")], "cardboard box")
        .set("openable", [EntityId::new("box")], true)
        .set("open", [EntityId::new("box")], false)
        .locate("box", "lobby", LocationTag::ContainedBy)
        .entity("ball", "thing")
        .set("name", [EntityId::new("ball")], "ball")
        .locate("ball", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    let text = narration(session.step("put ball in box"));

    let opening_at = text.find("(first opening").expect("expected an opening fixup");
    let taking_at = text.find("(first taking").expect("expected a taking fixup");
    assert!(opening_at < taking_at, "opening should be announced before taking, got: {text}");
    assert!(
        text.contains("put the ball into the cardboard box"),
        "expected the final placement report, got: {text}"
    );

    let world = session.world();
    assert!(world.get_bool("open", &[EntityId::new("box")]));
    assert_eq!(
        world.location_of(&EntityId::new("ball")),
        Some((&EntityId::new("box"), LocationTag::ContainedBy))
    );
}

/// Scenario 4: two balls sharing the adjective "red." `take red ball`
/// surfaces exactly two disambiguation candidates when asked
/// interactively.
#[test]
fn scenario_4_two_matching_balls_produce_a_two_entry_disambiguation_menu() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("small_ball", "thing")
        .set("name", [EntityId::new("small_ball")], "small red ball")
        .locate("small_ball", "lobby", LocationTag::ContainedBy)
        .entity("big_ball", "thing")
        .set("name", [EntityId::new("big_ball")], "big red ball")
        .locate("big_ball", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut pipeline = ActionPipeline::new();
    let mut parser = Parser::new();
    textadv_engine::verbs::install_all(&mut pipeline, &mut parser);
    // Interactive here: scenario 4 is specifically about the menu, not
    // the non-interactive auto-pick used by the other scenarios.
    let config = EngineConfig::default();
    let mut session = TurnLoop::new(world, pipeline, parser, config, EntityId::new("player"));

    match session.step("take red ball") {
        StepOutcome::Disambiguate { choices, .. } => assert_eq!(choices.len(), 2),
        other => panic!("expected a disambiguation menu, got {other:?}"),
    }
    assert!(session.is_awaiting_choice());
}

/// Scenario 5: Lobby → Hall via a closed door named "plain door".
/// Going north opens the door first, then shows Hall, marking it
/// visited.
#[test]
fn scenario_5_going_through_a_closed_door_opens_it_first_and_visits_the_destination() {
    let world = WorldBuilder::new()
        .room("lobby")
        .room("hall")
        .set("name", [EntityId::new("hall")], "Hall")
        .entity("plain_door", "door")
        .set("name", [EntityId::new("plain_door")], "plain door")
        .set("openable", [EntityId::new("plain_door")], true)
        .connect_via_door("lobby", Direction::North, "hall", "plain_door")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("lamp2", "thing")
        .set("makes_light", [EntityId::new("lamp2")], true)
        .locate("lamp2", "hall", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    let text = narration(session.step("n"));

    assert!(text.contains("(first opening"), "expected an auto-open fixup, got: {text}");
    assert!(text.contains("Hall"), "expected Hall's description, got: {text}");

    let world = session.world();
    assert!(world.get_bool("open", &[EntityId::new("plain_door")]));
    assert_eq!(
        world.location_of(&EntityId::new("player")),
        Some((&EntityId::new("hall"), LocationTag::ContainedBy))
    );
    assert!(world.get_bool("visited", &[EntityId::new("hall"), EntityId::new("player")]));
}

/// Scenario 6: a Hall with no light source. Looking shows the Darkness
/// heading and canned message, and never marks the room visited.
#[test]
fn scenario_6_looking_in_a_dark_room_shows_darkness_and_never_marks_it_visited() {
    let world = WorldBuilder::new()
        .room("hall")
        .set("name", [EntityId::new("hall")], "Hall")
        .entity("player", "person")
        .locate("player", "hall", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    let text = narration(session.step("l"));

    assert!(text.starts_with("Darkness"), "expected the Darkness heading, got: {text}");
    assert!(text.contains("pitch dark"));
    assert!(!session
        .world()
        .get_bool("visited", &[EntityId::new("hall"), EntityId::new("player")]));
}

/// Boundary case (spec.md §8): taking something already held aborts
/// with an "already have" refusal rather than re-taking it.
#[test]
fn boundary_taking_an_already_held_object_is_refused() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("ball", "thing")
        .set("name", [EntityId::new("ball")], "ball")
        .locate("ball", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    narration(session.step("take ball"));
    let text = narration(session.step("take ball"));
    assert!(text.contains("already have"), "expected an already-have refusal, got: {text}");
}

/// Boundary case (spec.md §8): opening a locked container aborts with
/// a lock-specific message, and the container stays closed.
#[test]
fn boundary_opening_a_locked_container_is_refused() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("safe", "container")
        .set("name", [EntityId::new("safe")], "safe")
        .set("openable", [EntityId::new("safe")], true)
        .set("open", [EntityId::new("safe")], false)
        .set("locked", [EntityId::new("safe")], true)
        .locate("safe", "lobby", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));
    let text = narration(session.step("open safe"));
    assert!(text.contains("locked"), "expected a lock refusal, got: {text}");
    assert!(!session.world().get_bool("open", &[EntityId::new("safe")]));
}

/// Boundary case (spec.md §8): a closed opaque container's contents
/// never show up in a room listing, nor in the container's own
/// examine text, and the chest itself parses and examines fine since
/// its own visibility doesn't depend on being open.
#[test]
fn boundary_a_closed_opaque_container_hides_its_contents() {
    let world = WorldBuilder::new()
        .room("lobby")
        .entity("lamp", "thing")
        .set("makes_light", [EntityId::new("lamp")], true)
        .locate("lamp", "lobby", LocationTag::ContainedBy)
        .entity("chest", "container")
        .set("name", [EntityId::new("chest")], "chest")
        .set("openable", [EntityId::new("chest")], true)
        .set("open", [EntityId::new("chest")], false)
        .locate("chest", "lobby", LocationTag::ContainedBy)
        .entity("coin", "thing")
        .set("name", [EntityId::new("coin")], "gold coin")
        .locate("coin", "chest", LocationTag::ContainedBy)
        .entity("player", "person")
        .locate("player", "lobby", LocationTag::ContainedBy)
        .player("player")
        .build()
        .unwrap();

    let mut session = turn_loop(world, EntityId::new("player"));

    let look = narration(session.step("l"));
    assert!(!look.contains("coin"), "a closed chest must not list its contents, got: {look}");

    let examine = narration(session.step("x chest"));
    assert!(examine.contains("is closed"), "expected the chest's closed state, got: {examine}");
    assert!(!examine.contains("coin"), "a closed chest's examine text must not leak its contents, got: {examine}");
}
