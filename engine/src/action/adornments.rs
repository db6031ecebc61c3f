//! Reusable `verify` preconditions every verb composes from (spec.md
//! §4.6): `require_dobj_accessible`, `require_dobj_visible`,
//! `require_dobj_held`, `hint_dobj_not_held`, and their `iobj` mirrors.
//!
//! Each returns `None` when the precondition is satisfied (the verb's
//! own verify rule should continue checking whatever else it needs) or
//! `Some(Verify)` with the exact failure mode to show ("closed
//! container," "can't see," "can't get to") when it isn't. A verb's
//! verify closure calls these first and early-returns on `Some`.

use crate::world::{query, EntityId, World};

use super::verify::{scores, Verify};

/// Tuning for [`require_dobj_held`]/[`require_iobj_held`]: `only_hint`
/// softens a failed check from an outright denial into a low-scoring
/// `Allow` (so `try_before` still gets a turn to fix it up, e.g. an
/// automatic take before dropping), `transitive` accepts the object
/// being held anywhere in the actor's inventory tree (inside a bag the
/// actor carries) rather than only directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldOptions {
    pub only_hint: bool,
    pub transitive: bool,
}

fn held_by(world: &World, actor: &EntityId, obj: &EntityId, transitive: bool) -> bool {
    if transitive {
        world.contains(actor, obj)
    } else {
        world.location_of(obj).map(|(holder, _)| holder == actor).unwrap_or(false)
    }
}

/// The object must be within `accessible_to` reach of the actor
/// (spec.md §4.2): the strongest of the three checks, implying both
/// visibility and (per the invariant in §8) correctness for anything
/// the `carry_out` phase is about to touch.
pub fn require_accessible(world: &World, actor: &EntityId, obj: &EntityId) -> Option<Verify> {
    if query::accessible_to(world, actor, obj) {
        None
    } else {
        Some(Verify::deny(format!(
            "You can't reach {}.",
            crate::text::helpers::the(world, obj)
        )))
    }
}

/// The object only needs to be seen, not physically reached (spec.md
/// §4.2): for verbs like `examine` that never touch the world.
pub fn require_visible(world: &World, actor: &EntityId, obj: &EntityId) -> Option<Verify> {
    if query::visible_to(world, actor, obj) {
        None
    } else {
        Some(Verify::deny("You can't see that.".to_string()))
    }
}

/// The object must already be held (spec.md §4.6); `only_hint` turns a
/// failed check into a low-scoring allow instead of an outright denial
/// so a `try_before` rule (auto-take) gets a chance to fix it up first.
pub fn require_held(world: &World, actor: &EntityId, obj: &EntityId, opts: HeldOptions) -> Option<Verify> {
    if held_by(world, actor, obj, opts.transitive) {
        return None;
    }
    if opts.only_hint {
        Some(Verify::allow(scores::ILLOGICAL_INACCESSIBLE))
    } else {
        Some(Verify::deny(format!(
            "You aren't holding {}.",
            crate::text::helpers::the(world, obj)
        )))
    }
}

/// The mirror of [`require_held`]: a hint (not a denial) that the
/// reading is weaker when the object is *already* held, for verbs
/// where holding it is a sign of the wrong parse (e.g. "take" when a
/// `something` candidate is already in hand — dropping its score lets
/// a sibling candidate that isn't already held win disambiguation
/// instead of failing outright).
pub fn hint_not_held(world: &World, actor: &EntityId, obj: &EntityId) -> Option<Verify> {
    if held_by(world, actor, obj, false) {
        Some(Verify::allow(scores::ILLOGICAL_ALREADY))
    } else {
        None
    }
}

/// `require_accessible` against the `"second"` slot (spec.md §4.6
/// "iobj mirrors").
pub fn require_iobj_accessible(world: &World, actor: &EntityId, iobj: &EntityId) -> Option<Verify> {
    require_accessible(world, actor, iobj)
}

/// `require_visible` against the `"second"` slot.
pub fn require_iobj_visible(world: &World, actor: &EntityId, iobj: &EntityId) -> Option<Verify> {
    require_visible(world, actor, iobj)
}

/// `require_held` against the `"second"` slot.
pub fn require_iobj_held(world: &World, actor: &EntityId, iobj: &EntityId, opts: HeldOptions) -> Option<Verify> {
    require_held(world, actor, iobj, opts)
}
