use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the eight fixed anchoring directions around an atom symbol.
///
/// The discriminants are single bits so that a set of directions fits in a
/// [`CompassMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Compass {
    NorthEast = 1,
    NorthWest = 2,
    North = 4,
    SouthEast = 8,
    SouthWest = 16,
    South = 32,
    East = 64,
    West = 128,
}

static COMPASS_CODES: Map<&'static str, Compass> = phf_map! {
    "n" => Compass::North,
    "ne" => Compass::NorthEast,
    "e" => Compass::East,
    "se" => Compass::SouthEast,
    "s" => Compass::South,
    "sw" => Compass::SouthWest,
    "w" => Compass::West,
    "nw" => Compass::NorthWest,
};

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Order in which free slots are handed out for generic symbols.
    pub const SLOT_PRIORITY: [Compass; 8] = [
        Compass::North,
        Compass::South,
        Compass::East,
        Compass::West,
        Compass::NorthEast,
        Compass::NorthWest,
        Compass::SouthEast,
        Compass::SouthWest,
    ];

    /// Order in which an automatic charge sign looks for a free slot.
    pub const CHARGE_PRIORITY: [Compass; 8] = [
        Compass::NorthEast,
        Compass::NorthWest,
        Compass::North,
        Compass::SouthEast,
        Compass::SouthWest,
        Compass::South,
        Compass::East,
        Compass::West,
    ];

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Direction in degrees, counter-clockwise on screen with East at 0.
    pub fn angle(self) -> f64 {
        match self {
            Compass::East => 0.0,
            Compass::NorthEast => 45.0,
            Compass::North => 90.0,
            Compass::NorthWest => 135.0,
            Compass::West => 180.0,
            Compass::SouthWest => 225.0,
            Compass::South => 270.0,
            Compass::SouthEast => 315.0,
        }
    }

    /// Unit offsets `(dx, dy)` in screen coordinates (y grows downward).
    pub fn offsets(self) -> (f64, f64) {
        match self {
            Compass::East => (1.0, 0.0),
            Compass::NorthEast => (1.0, -1.0),
            Compass::North => (0.0, -1.0),
            Compass::NorthWest => (-1.0, -1.0),
            Compass::West => (-1.0, 0.0),
            Compass::SouthWest => (-1.0, 1.0),
            Compass::South => (0.0, 1.0),
            Compass::SouthEast => (1.0, 1.0),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Compass::North => "n",
            Compass::NorthEast => "ne",
            Compass::East => "e",
            Compass::SouthEast => "se",
            Compass::South => "s",
            Compass::SouthWest => "sw",
            Compass::West => "w",
            Compass::NorthWest => "nw",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid compass code '{0}'")]
pub struct ParseCompassError(pub String);

impl FromStr for Compass {
    type Err = ParseCompassError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMPASS_CODES
            .get(s.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParseCompassError(s.to_string()))
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A set of compass directions packed in one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompassMask(pub u8);

impl CompassMask {
    pub const EMPTY: CompassMask = CompassMask(0);
    pub const FULL: CompassMask = CompassMask(0xff);

    pub fn contains(self, c: Compass) -> bool {
        self.0 & c.bit() != 0
    }

    pub fn insert(&mut self, c: Compass) {
        self.0 |= c.bit();
    }

    pub fn remove(&mut self, c: Compass) {
        self.0 &= !c.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn without(self, other: CompassMask) -> CompassMask {
        CompassMask(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Compass> {
        Compass::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

/// Where a charge sign is anchored relative to its atom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChargePosition {
    #[default]
    Auto,
    Compass(Compass),
    /// Free direction in degrees; a zero `dist` means "on the symbol boundary".
    Angle { angle: f64, dist: f64 },
}

/// Where an explicit electron marker sits relative to its atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElectronPosition {
    Compass(Compass),
    Angle { angle: f64, dist: f64 },
}

/// Side on which implicit hydrogens are written next to the atom symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HydrogenSide {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl HydrogenSide {
    /// The compass slot consumed by hydrogens written on this side.
    pub fn slot(self) -> Compass {
        match self {
            HydrogenSide::Left => Compass::West,
            HydrogenSide::Right => Compass::East,
            HydrogenSide::Top => Compass::North,
            HydrogenSide::Bottom => Compass::South,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            HydrogenSide::Left => "left",
            HydrogenSide::Right => "right",
            HydrogenSide::Top => "top",
            HydrogenSide::Bottom => "bottom",
        }
    }
}

impl FromStr for HydrogenSide {
    type Err = ParseCompassError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(HydrogenSide::Left),
            "right" => Ok(HydrogenSide::Right),
            "top" => Ok(HydrogenSide::Top),
            "bottom" => Ok(HydrogenSide::Bottom),
            _ => Err(ParseCompassError(s.to_string())),
        }
    }
}

/// User preference for the hydrogen side; `Auto` follows the bond geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HydrogenPosition {
    #[default]
    Auto,
    Fixed(HydrogenSide),
}
