//! Parallel line geometry of single to quadruple bonds.
//!
//! Coordinates follow the document convention (y grows downward). For a bond
//! with unit direction `u`, the offset normal is `n = (u.y, -u.x)`; a positive
//! side means the counter-clockwise side as seen on screen.

use crate::core::models::bond::Segment;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use crate::core::models::ring::Ring;
use crate::core::utils::geometry::{LENGTH_EPSILON, half_angle_tan, screen_normal};
use nalgebra::{Point2, Vector2};
use std::cmp::Ordering;
use tracing::trace;

/// Share of the bond length that offset lines may lose to neighbor trimming.
const MAX_SHORTENING: f64 = 0.5;

/// Placement of the second line of a double bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoubleSide {
    /// Both lines at half spacing around the bond axis.
    Centered,
    /// One line on the axis, the other shifted to side `+1.0` or `-1.0`.
    Side(f64),
}

/// Another bond leaving one endpoint, seen from the bond being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Neighbor {
    /// Sign of the neighbor direction along the offset normal; 0 when collinear.
    side: f64,
    /// `tan(φ/2)` where `φ` is the angle between the two bonds.
    half_tan: f64,
}

/// Endpoint data gathered before the lines are laid out.
#[derive(Debug, Clone)]
struct End {
    point: Point2<f64>,
    drawn: bool,
    neighbors: Vec<Neighbor>,
}

impl End {
    fn has_side(&self, side: f64) -> bool {
        self.neighbors.iter().any(|n| n.side == side)
    }

    /// Trim of a line offset by `offset` so it stops on the bisector toward the
    /// tightest neighbor on that side. Symbol endpoints are never trimmed.
    fn shortening(&self, offset: f64) -> f64 {
        if self.drawn || offset == 0.0 {
            return 0.0;
        }
        let side = offset.signum();
        self.neighbors
            .iter()
            .filter(|n| n.side == side && n.half_tan > LENGTH_EPSILON)
            .map(|n| offset.abs() / n.half_tan)
            .fold(0.0, f64::max)
    }

    fn min_half_tan(&self, side: f64) -> Option<f64> {
        self.neighbors
            .iter()
            .filter(|n| n.side == side)
            .map(|n| n.half_tan)
            .min_by(f64::total_cmp)
    }
}

/// Computes the drawn lines of a bond.
///
/// Both ends are first pulled back out of any drawn symbol box (grown by the
/// padding). Returns `None` when the endpoints coincide.
pub fn compute_lines(mol: &Molecule, id: BondId) -> Option<Vec<Segment>> {
    let bond = mol.bond(id)?;
    let a = mol.atom(bond.begin())?;
    let b = mol.atom(bond.end())?;
    let settings = mol.settings();
    let (p1, p2) = (a.xy(), b.xy());
    let axis = p2 - p1;
    let length = axis.norm();
    if length < LENGTH_EPSILON {
        return None;
    }
    let u = axis / length;
    let n = screen_normal(&u);

    let trim = |drawn: bool, hw: f64, hh: f64| -> f64 {
        if !drawn {
            return 0.0;
        }
        let hw = hw + settings.padding;
        let hh = hh + settings.padding;
        (hw / u.x.abs()).min(hh / u.y.abs())
    };
    let (hw1, hh1) = a.half_extent(settings);
    let (hw2, hh2) = b.half_extent(settings);
    let mut t1 = trim(a.has_drawn_symbol(), hw1, hh1);
    let mut t2 = trim(b.has_drawn_symbol(), hw2, hh2);
    if t1 + t2 >= length {
        t1 = 0.0;
        t2 = 0.0;
    }

    let begin = End {
        point: p1 + u * t1,
        drawn: a.has_drawn_symbol(),
        neighbors: neighbors_at(mol, bond.begin(), bond.end(), &u, &n),
    };
    let end = End {
        point: p2 - u * t2,
        drawn: b.has_drawn_symbol(),
        neighbors: neighbors_at(mol, bond.end(), bond.begin(), &-u, &n),
    };

    let d = settings.bond_dist;
    let offsets: Vec<f64> = match bond.order() {
        1 => vec![0.0],
        2 => match double_side(mol, id, &begin, &end, &n) {
            DoubleSide::Centered => vec![d / 2.0, -d / 2.0],
            DoubleSide::Side(s) => vec![0.0, s * d],
        },
        3 => vec![0.0, d, -d],
        _ => vec![-1.5 * d, -0.5 * d, 0.5 * d, 1.5 * d],
    };

    let inner_length = (end.point - begin.point).norm();
    let lines = offsets
        .into_iter()
        .map(|o| {
            let mut s1 = begin.shortening(o);
            let mut s2 = end.shortening(o);
            let limit = inner_length * MAX_SHORTENING;
            if s1 + s2 > limit {
                let scale = limit / (s1 + s2);
                s1 *= scale;
                s2 *= scale;
            }
            let shift = n * o;
            Segment::new(begin.point + shift + u * s1, end.point + shift - u * s2)
        })
        .collect();
    trace!(?id, order = bond.order(), "Bond lines computed");
    Some(lines)
}

/// Other bonds at `at`, described relative to the direction `toward` that
/// points from `at` along the bond being drawn.
fn neighbors_at(
    mol: &Molecule,
    at: AtomId,
    skip: AtomId,
    toward: &Vector2<f64>,
    normal: &Vector2<f64>,
) -> Vec<Neighbor> {
    let Some(atom) = mol.atom(at) else {
        return Vec::new();
    };
    let origin = atom.xy();
    mol.neighbors(at)
        .filter(|other| *other != skip)
        .filter_map(|other| mol.atom(other))
        .filter_map(|other| {
            let w = other.xy() - origin;
            let len = w.norm();
            if len < LENGTH_EPSILON {
                return None;
            }
            let w = w / len;
            let dot = normal.dot(&w);
            let side = if dot.abs() < LENGTH_EPSILON { 0.0 } else { dot.signum() };
            Some(Neighbor {
                side,
                half_tan: half_angle_tan(toward, &w),
            })
        })
        .collect()
}

/// Chooses where the second line of a double bond goes.
fn double_side(mol: &Molecule, id: BondId, begin: &End, end: &End, n: &Vector2<f64>) -> DoubleSide {
    if let Some(side) = ring_side(mol, id, n) {
        return DoubleSide::Side(side);
    }
    general_side(begin, end)
}

fn general_side(begin: &End, end: &End) -> DoubleSide {
    let plus = begin.has_side(1.0) || end.has_side(1.0);
    let minus = begin.has_side(-1.0) || end.has_side(-1.0);
    match (plus, minus) {
        (false, false) => return DoubleSide::Centered,
        (true, false) => return DoubleSide::Side(1.0),
        (false, true) => return DoubleSide::Side(-1.0),
        (true, true) => {}
    }

    let flanked = |e: &End| e.has_side(1.0) && e.has_side(-1.0);
    if (begin.neighbors.is_empty() && flanked(end)) || (end.neighbors.is_empty() && flanked(begin)) {
        return DoubleSide::Centered;
    }

    let single = |e: &End| e.neighbors.len() == 1;
    match (single(begin), single(end)) {
        (true, false) if begin.neighbors[0].side != 0.0 => {
            return DoubleSide::Side(begin.neighbors[0].side);
        }
        (false, true) if end.neighbors[0].side != 0.0 => {
            return DoubleSide::Side(end.neighbors[0].side);
        }
        _ => {}
    }

    // Room on a side is limited by its tightest neighbor.
    let room = |side: f64| -> f64 {
        [begin.min_half_tan(side), end.min_half_tan(side)]
            .into_iter()
            .flatten()
            .fold(f64::INFINITY, f64::min)
    };
    let (plus_room, minus_room) = (room(1.0), room(-1.0));
    match plus_room.partial_cmp(&minus_room) {
        Some(Ordering::Greater) => DoubleSide::Side(1.0),
        Some(Ordering::Less) => DoubleSide::Side(-1.0),
        _ if single(begin) && single(end) => DoubleSide::Side(1.0),
        _ => DoubleSide::Centered,
    }
}

/// Side of the ring interior when both ring bonds at the ends leave on the
/// same side of the bond, using the bond's preferred ring: the one with the
/// most multiple bonds, then the one closest to six members.
fn ring_side(mol: &Molecule, id: BondId, n: &Vector2<f64>) -> Option<f64> {
    let bond = mol.bond(id)?;
    let multiple = |r: &Ring| {
        r.bonds()
            .iter()
            .filter_map(|b| mol.bond(*b))
            .filter(|b| b.order() >= 2)
            .count()
    };
    let ring = bond
        .rings()
        .iter()
        .filter_map(|r| mol.ring(*r))
        .filter(|r| r.contains_bond(id))
        .min_by(|a, b| {
            multiple(*b)
                .cmp(&multiple(*a))
                .then_with(|| a.size().abs_diff(6).cmp(&b.size().abs_diff(6)))
                .then_with(|| a.size().cmp(&b.size()))
        })?;

    let sine_at = |at: AtomId, across: AtomId| -> Option<f64> {
        let (before, after) = ring.ring_neighbors(at)?;
        let next = if before == across { after } else { before };
        let origin = mol.atom(at)?.xy();
        let w = mol.atom(next)?.xy() - origin;
        let len = w.norm();
        (len > LENGTH_EPSILON).then(|| n.dot(&(w / len)))
    };
    let s1 = sine_at(bond.begin(), bond.end())?;
    let s2 = sine_at(bond.end(), bond.begin())?;
    (s1 * s2 > 0.0).then(|| s1.signum())
}
