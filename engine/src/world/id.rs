//! Entity and kind identity.
//!
//! Entities are identified by a stable string id rather than an owning
//! pointer or generational index: all state about an entity lives in
//! external property tables keyed by id, which is what lets the whole
//! world be serialised as one blob (spec.md §3).

use std::borrow::Borrow;
use std::fmt;

/// Identifier for an entity (a room, thing, door, person, region, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct EntityId(pub(crate) String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier for a kind (class-like tag forming a single-inheritance tree).
///
/// Kept distinct from [`EntityId`] even though both wrap a string: kinds
/// and entities are never interchangeable, and the distinct type stops
/// a `Kind` being passed where an `EntityId` was meant, or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Kind(pub(crate) String);

impl Kind {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub const fn root() -> &'static str {
        "kind"
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Kind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Direction tag drawn from the fixed compass/vertical alphabet used by
/// `exits` (spec.md §3) and the `go <direction>` verb family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
    In,
    Out,
}

impl Direction {
    pub fn inverse(self) -> Direction {
        use Direction::*;
        match self {
            North => South,
            South => North,
            East => West,
            West => East,
            Northeast => Southwest,
            Southwest => Northeast,
            Northwest => Southeast,
            Southeast => Northwest,
            Up => Down,
            Down => Up,
            In => Out,
            Out => In,
        }
    }

    /// Parses a direction from a word or its standard alias
    /// (spec.md §6: n/s/e/w/ne/nw/se/sw/u/d/in/out).
    pub fn parse(word: &str) -> Option<Direction> {
        use Direction::*;
        Some(match word {
            "n" | "north" => North,
            "s" | "south" => South,
            "e" | "east" => East,
            "w" | "west" => West,
            "ne" | "northeast" => Northeast,
            "nw" | "northwest" => Northwest,
            "se" | "southeast" => Southeast,
            "sw" | "southwest" => Southwest,
            "u" | "up" => Up,
            "d" | "down" => Down,
            "in" => In,
            "out" => Out,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        use Direction::*;
        match self {
            North => "north",
            South => "south",
            East => "east",
            West => "west",
            Northeast => "northeast",
            Northwest => "northwest",
            Southeast => "southeast",
            Southwest => "southwest",
            Up => "up",
            Down => "down",
            In => "in",
            Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag on a `location` edge, distinguishing what it means for one entity
/// to be "at" another (spec.md §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum LocationTag {
    ContainedBy,
    SupportedBy,
    OwnedBy,
    PartOf,
    WornBy,
}

impl LocationTag {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationTag::ContainedBy => "contained_by",
            LocationTag::SupportedBy => "supported_by",
            LocationTag::OwnedBy => "owned_by",
            LocationTag::PartOf => "part_of",
            LocationTag::WornBy => "worn_by",
        }
    }
}

impl fmt::Display for LocationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
