//! Playing sides and the observer role.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::WireError;

/// The role a client plays in a game.
///
/// `Out` is the permissionless observer role: it follows the game but
/// never originates actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pole {
    /// The side that starts on rows 0 and 1.
    North,
    /// The side that starts on rows 6 and 7.
    South,
    /// Observer.
    Out,
}

impl Pole {
    /// The playing side, if this pole is not an observer.
    pub fn side(self) -> Option<Side> {
        match self {
            Self::North => Some(Side::North),
            Self::South => Some(Side::South),
            Self::Out => None,
        }
    }

    /// Check if this pole only observes.
    pub fn is_observer(self) -> bool {
        matches!(self, Self::Out)
    }

    /// Lower-case name as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::Out => "out",
        }
    }
}

impl Default for Pole {
    fn default() -> Self {
        Self::Out
    }
}

impl fmt::Display for Pole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pole {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "out" => Ok(Self::Out),
            other => Err(WireError::InvalidPole(other.to_string())),
        }
    }
}

/// One of the two playing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// North.
    North,
    /// South.
    South,
}

impl Side {
    /// Both sides, north first.
    pub const BOTH: [Side; 2] = [Side::North, Side::South];

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }

    /// Lower-case name as used on the wire.
    pub fn as_str(self) -> &'static str {
        Pole::from(self).as_str()
    }
}

impl From<Side> for Pole {
    fn from(side: Side) -> Self {
        match side {
            Side::North => Pole::North,
            Side::South => Pole::South,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per side, serialized as `{"north": .., "south": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// North's value.
    pub north: T,
    /// South's value.
    pub south: T,
}

impl<T> PerSide<T> {
    /// Build from one value per side.
    pub fn new(north: T, south: T) -> Self {
        Self { north, south }
    }

    /// Build by evaluating `f` for each side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            north: f(Side::North),
            south: f(Side::South),
        }
    }
}

impl<T: Clone> PerSide<T> {
    /// The same value for both sides.
    pub fn splat(value: T) -> Self {
        Self {
            north: value.clone(),
            south: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::North => &self.north,
            Side::South => &self.south,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::North => &mut self.north,
            Side::South => &mut self.south,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Pole::North).unwrap(), "\"north\"");
        assert_eq!(serde_json::to_string(&Pole::Out).unwrap(), "\"out\"");
    }

    #[test]
    fn pole_parses_wire_names() {
        assert_eq!("south".parse::<Pole>().unwrap(), Pole::South);
        assert!(matches!(
            "west".parse::<Pole>(),
            Err(WireError::InvalidPole(_))
        ));
    }

    #[test]
    fn observer_has_no_side() {
        assert_eq!(Pole::Out.side(), None);
        assert!(Pole::Out.is_observer());
        assert_eq!(Pole::North.side(), Some(Side::North));
    }

    #[test]
    fn opponent_is_involution() {
        for side in Side::BOTH {
            assert_ne!(side.opponent(), side);
            assert_eq!(side.opponent().opponent(), side);
        }
    }

    #[test]
    fn per_side_indexing() {
        let mut counts = PerSide::splat(0u8);
        counts[Side::South] += 2;
        assert_eq!(counts.north, 0);
        assert_eq!(counts[Side::South], 2);
    }

    #[test]
    fn per_side_json_shape() {
        let counts = PerSide::new(1u8, 3u8);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json, serde_json::json!({"north": 1, "south": 3}));
    }
}
