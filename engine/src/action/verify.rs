//! `verify`: the first action pipeline phase (spec.md §4). Every
//! registered verify rule either allows the action with a numeric
//! score (higher means "more clearly what the player meant") or denies
//! it outright with the narration to show. Scores exist so
//! disambiguation (spec.md §4, [`super::disambiguate`]) can rank
//! several equally-parsed candidates instead of just asking every time.

/// Named score bands a verify rule can return, loosely ordered from
/// "almost certainly not what was meant" to "obviously what was meant".
/// Rules aren't limited to these values — they're starting points a
/// rule can nudge up or down by calling `next()` and adjusting.
pub mod scores {
    /// Clearly and unambiguously what the player meant.
    pub const VERY_LOGICAL: i32 = 150;
    /// Ordinarily what a rule should return when the action is sound.
    pub const LOGICAL: i32 = 100;
    /// Logical, but second choice against a `VERY_LOGICAL` sibling.
    pub const NON_OBVIOUS: i32 = 99;
    /// The cutoff a rule can fall back to and still be picked
    /// automatically when nothing scores higher (see `is_reasonable`).
    pub const BARELY_LOGICAL: i32 = 90;
    /// Logical, except the action is already in the state it asks for.
    pub const ILLOGICAL_ALREADY: i32 = 60;
    /// Logical, except the object isn't within reach.
    pub const ILLOGICAL_INACCESSIBLE: i32 = 20;
    pub const ILLOGICAL: i32 = 10;
    /// The object isn't even visible to the actor.
    pub const ILLOGICAL_NOT_VISIBLE: i32 = 0;

    /// Candidates scoring at or above this are "reasonable" and can be
    /// chosen without asking the player (spec.md §4.5).
    pub const REASONABLE_CUTOFF: i32 = BARELY_LOGICAL;

    // Aliases kept for call sites written against the old, unnamed
    // bands; new rules should reach for the named constants above.
    pub const POSSIBLE: i32 = LOGICAL;
    pub const LIKELY: i32 = VERY_LOGICAL;
    pub const VERY_LIKELY: i32 = VERY_LOGICAL;
    pub const UNLIKELY: i32 = ILLOGICAL;
    pub const VERY_UNLIKELY: i32 = ILLOGICAL_NOT_VISIBLE;
    pub const IMPLAUSIBLE: i32 = ILLOGICAL_NOT_VISIBLE;
}

/// Whether `score` clears the bar to be picked automatically without
/// asking the player to disambiguate (spec.md §4.5).
pub fn is_reasonable(score: i32) -> bool {
    score >= scores::REASONABLE_CUTOFF
}

/// The outcome of a `verify` rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Verify {
    /// The action may proceed; higher scores win disambiguation.
    Allow(i32),
    /// The action is refused; the string is shown to the player as-is.
    Deny(String),
}

impl Verify {
    pub fn allow(score: i32) -> Self {
        Verify::Allow(score)
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Verify::Deny(message.into())
    }

    pub fn score(&self) -> Option<i32> {
        match self {
            Verify::Allow(score) => Some(*score),
            Verify::Deny(_) => None,
        }
    }

    /// Combines two verify outcomes for the same action (spec.md §4.5):
    /// a denial from either side wins outright. Between two allows, if
    /// both clear the reasonable cutoff the higher score wins (both
    /// readings are sound, so prefer whichever is more specific);
    /// otherwise the lower score wins, since an unreasonable reading
    /// dragging the other one down is the more informative answer.
    pub fn combine(self, other: Verify) -> Verify {
        match (self, other) {
            (Verify::Deny(message), _) | (_, Verify::Deny(message)) => Verify::Deny(message),
            (Verify::Allow(a), Verify::Allow(b)) => {
                if is_reasonable(a) && is_reasonable(b) {
                    Verify::Allow(a.max(b))
                } else {
                    Verify::Allow(a.min(b))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_prefers_a_denial_over_either_allow() {
        let combined = Verify::allow(scores::LIKELY).combine(Verify::deny("No."));
        assert_eq!(combined, Verify::deny("No."));
    }

    #[test]
    fn combine_of_two_reasonable_allows_keeps_the_higher_score() {
        let combined = Verify::allow(scores::BARELY_LOGICAL).combine(Verify::allow(scores::VERY_LOGICAL));
        assert_eq!(combined, Verify::allow(scores::VERY_LOGICAL));
    }

    #[test]
    fn combine_of_an_unreasonable_allow_keeps_the_lower_score() {
        let combined = Verify::allow(scores::ILLOGICAL).combine(Verify::allow(scores::VERY_LOGICAL));
        assert_eq!(combined, Verify::allow(scores::ILLOGICAL));
    }
}
