use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales regions.
///
/// Declaration order is the canonical order: aggregates are emitted in it and
/// ties in insight lookups resolve to the earliest region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    /// Display name, also used on the wire and in CSV sources
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
        }
    }

    /// All regions in canonical order
    pub fn all() -> Vec<Region> {
        vec![Region::North, Region::South, Region::East, Region::West]
    }

    /// Parse from a display name (case-insensitive, surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Region::all()
            .into_iter()
            .find(|r| r.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
