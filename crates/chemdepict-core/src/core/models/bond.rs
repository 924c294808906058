use super::ids::{AtomId, BondId, RingId};
use nalgebra::Point2;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a bond is drawn, independently of its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondType {
    #[default]
    Normal,
    /// Solid wedge pointing toward the viewer from the begin atom.
    Wedge,
    /// Hashed wedge pointing away from the viewer from the begin atom.
    Hash,
    /// Bold ("fore") bond lying in front of the drawing plane.
    Bold,
    Undetermined,
}

impl BondType {
    /// Persisted code; `None` for normal bonds, which carry no `type` attribute.
    pub fn code(self) -> Option<&'static str> {
        match self {
            BondType::Normal => None,
            BondType::Wedge => Some("up"),
            BondType::Hash => Some("down"),
            BondType::Bold => Some("fore"),
            BondType::Undetermined => Some("undetermined"),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            BondType::Wedge => BondType::Hash,
            BondType::Hash => BondType::Wedge,
            other => other,
        }
    }

    pub fn is_stereo(self) -> bool {
        matches!(self, BondType::Wedge | BondType::Hash)
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond type string")]
pub struct ParseBondTypeError;

impl FromStr for BondType {
    type Err = ParseBondTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "normal" => Ok(Self::Normal),
            "up" | "wedge" => Ok(Self::Wedge),
            "down" | "hash" => Ok(Self::Hash),
            "fore" | "bold" => Ok(Self::Bold),
            "undetermined" => Ok(Self::Undetermined),
            _ => Err(ParseBondTypeError),
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Normal => "Normal",
                Self::Wedge => "Wedge",
                Self::Hash => "Hash",
                Self::Bold => "Bold",
                Self::Undetermined => "Undetermined",
            }
        )
    }
}

/// One drawn line of a bond, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }
}

/// Where another bond crosses this one, and which of the two is drawn on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Fraction along this bond (begin = 0, end = 1) of the intersection.
    pub fraction: f64,
    pub is_before: bool,
}

/// A bond between two atoms. The molecule owns it; atoms only index it.
#[derive(Debug, Clone)]
pub struct Bond {
    pub(crate) begin: AtomId,
    pub(crate) end: AtomId,
    pub(crate) order: u8,
    pub(crate) bond_type: BondType,
    pub(crate) level: i32,
    pub(crate) rings: Vec<RingId>,
    /// Cached parallel lines; `None` means the geometry must be recomputed.
    pub(crate) lines: Option<Vec<Segment>>,
    pub(crate) crossings: HashMap<BondId, Crossing>,
}

impl Bond {
    pub fn new(begin: AtomId, end: AtomId, order: u8) -> Self {
        Self {
            begin,
            end,
            order: order.clamp(1, 4),
            bond_type: BondType::Normal,
            level: 0,
            rings: Vec::new(),
            lines: None,
            crossings: HashMap::new(),
        }
    }

    pub fn begin(&self) -> AtomId {
        self.begin
    }

    pub fn end(&self) -> AtomId {
        self.end
    }

    pub fn order(&self) -> u8 {
        self.order
    }

    pub fn bond_type(&self) -> BondType {
        self.bond_type
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn rings(&self) -> &[RingId] {
        &self.rings
    }

    pub fn is_in_ring(&self) -> bool {
        !self.rings.is_empty()
    }

    pub fn cached_lines(&self) -> Option<&[Segment]> {
        self.lines.as_deref()
    }

    pub fn crossings(&self) -> &HashMap<BondId, Crossing> {
        &self.crossings
    }

    pub fn crossing_with(&self, other: BondId) -> Option<&Crossing> {
        self.crossings.get(&other)
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.begin == atom_id || self.end == atom_id
    }

    /// The endpoint opposite to `atom_id`, if `atom_id` is an endpoint.
    pub fn other(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.begin == atom_id {
            Some(self.end)
        } else if self.end == atom_id {
            Some(self.begin)
        } else {
            None
        }
    }

    pub fn shares_atom_with(&self, other: &Bond) -> bool {
        self.contains(other.begin) || self.contains(other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_type_from_str_parses_persisted_and_friendly_names() {
        assert_eq!("up".parse::<BondType>().unwrap(), BondType::Wedge);
        assert_eq!("down".parse::<BondType>().unwrap(), BondType::Hash);
        assert_eq!("fore".parse::<BondType>().unwrap(), BondType::Bold);
        assert_eq!(
            "undetermined".parse::<BondType>().unwrap(),
            BondType::Undetermined
        );
        assert_eq!("Wedge".parse::<BondType>().unwrap(), BondType::Wedge);
        assert_eq!("".parse::<BondType>().unwrap(), BondType::Normal);
    }

    #[test]
    fn bond_type_from_str_rejects_invalid_strings() {
        assert!("sideways".parse::<BondType>().is_err());
        assert!("2".parse::<BondType>().is_err());
    }

    #[test]
    fn bond_type_code_parses_back() {
        for t in [
            BondType::Wedge,
            BondType::Hash,
            BondType::Bold,
            BondType::Undetermined,
        ] {
            assert_eq!(t.code().unwrap().parse::<BondType>().unwrap(), t);
        }
        assert_eq!(BondType::Normal.code(), None);
    }

    #[test]
    fn opposite_swaps_only_stereo_types() {
        assert_eq!(BondType::Wedge.opposite(), BondType::Hash);
        assert_eq!(BondType::Hash.opposite(), BondType::Wedge);
        assert_eq!(BondType::Bold.opposite(), BondType::Bold);
    }

    #[test]
    fn bond_new_clamps_order_and_starts_dirty() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let bond = Bond::new(a1, a2, 7);
        assert_eq!(bond.order(), 4);
        assert_eq!(Bond::new(a1, a2, 0).order(), 1);
        assert!(bond.cached_lines().is_none());
        assert_eq!(bond.level(), 0);
        assert_eq!(bond.bond_type(), BondType::Normal);
    }

    #[test]
    fn bond_other_returns_opposite_endpoint() {
        let a1 = dummy_atom_id(10);
        let a2 = dummy_atom_id(20);
        let unrelated = dummy_atom_id(30);
        let bond = Bond::new(a1, a2, 1);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
        assert!(!bond.contains(unrelated));
        assert_eq!(bond.other(a1), Some(a2));
        assert_eq!(bond.other(a2), Some(a1));
        assert_eq!(bond.other(unrelated), None);
    }

    #[test]
    fn shares_atom_detects_common_endpoint() {
        let (a, b, c, d) = (
            dummy_atom_id(1),
            dummy_atom_id(2),
            dummy_atom_id(3),
            dummy_atom_id(4),
        );
        assert!(Bond::new(a, b, 1).shares_atom_with(&Bond::new(b, c, 1)));
        assert!(!Bond::new(a, b, 1).shares_atom_with(&Bond::new(c, d, 1)));
    }
}
