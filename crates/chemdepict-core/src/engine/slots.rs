use crate::core::models::atom::InterBond;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::position::{ChargePosition, Compass, CompassMask};
use crate::core::utils::geometry::{
    angular_distance, box_exit_distance, direction_angle, normalize_degrees, unit_from_angle,
};
use nalgebra::{Point2, Vector2};
use serde::Serialize;
use tracing::trace;

/// Decrement applied to equal gap widths so every gap key stays unique.
const GAP_TIE_STEP: f64 = 1e-8;

/// A place around an atom where a symbol can be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailablePosition {
    /// The compass slot, or `None` for a free direction between bonds.
    pub slot: Option<Compass>,
    /// Direction from the atom center, in degrees.
    pub angle: f64,
    pub point: Point2<f64>,
}

/// Which point of a drawn charge sign sits at the computed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// The requested position is not free; the sign is centered on the atom.
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl From<Compass> for Anchor {
    fn from(c: Compass) -> Self {
        match c {
            Compass::North => Anchor::North,
            Compass::NorthEast => Anchor::NorthEast,
            Compass::East => Anchor::East,
            Compass::SouthEast => Anchor::SouthEast,
            Compass::South => Anchor::South,
            Compass::SouthWest => Anchor::SouthWest,
            Compass::West => Anchor::West,
            Compass::NorthWest => Anchor::NorthWest,
        }
    }
}

/// Resolved placement of an atom's charge sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargePlacement {
    pub anchor: Anchor,
    pub slot: Option<Compass>,
    pub angle: f64,
    pub point: Point2<f64>,
}

/// Rebuilds the sorted bond angles, the gaps between them and the mask of
/// free compass slots of one atom.
///
/// A slot is taken when implicit hydrogens are written on its side, when it
/// was reserved explicitly, or when a bond points within 45° (plus the
/// configured tolerance) of its direction. Cardinal and diagonal slots share
/// this window, so a bond along a diagonal also takes both cardinal slots
/// beside it.
pub fn update_available_positions(mol: &mut Molecule, id: AtomId) {
    let tolerance = mol.settings.angle_tolerance;
    let Some(atom) = mol.atoms.get(id) else {
        return;
    };
    let center = atom.xy();
    let mut angles: Vec<f64> = atom
        .bonds()
        .filter_map(|(n, _)| mol.atoms.get(n))
        .filter_map(|n| direction_angle(&center, &n.xy()))
        .collect();
    angles.sort_by(f64::total_cmp);

    let mut available = CompassMask::FULL;
    if atom.implicit_hydrogens() > 0 && atom.has_drawn_symbol() {
        available.remove(atom.hydrogen_side().slot());
    }
    available = available.without(atom.slots.occupied);
    for angle in &angles {
        for c in Compass::ALL {
            if angular_distance(*angle, c.angle()) < 45.0 + tolerance {
                available.remove(c);
            }
        }
    }

    let inter_bonds = inter_bond_gaps(&angles);
    trace!(?id, available = available.0, gaps = inter_bonds.len(), "Slots updated");

    if let Some(atom) = mol.atoms.get_mut(id) {
        atom.slots.available = available;
        atom.slots.angles = angles;
        atom.slots.inter_bonds = inter_bonds;
        atom.slots.valid = true;
    }
}

/// Gaps between consecutive bond directions, including the wrap-around gap,
/// sorted by width.
fn inter_bond_gaps(angles: &[f64]) -> Vec<InterBond> {
    let mut gaps: Vec<InterBond> = Vec::with_capacity(angles.len());
    let n = angles.len();
    for i in 0..n {
        let start = angles[i];
        let mut gap = if i + 1 < n {
            angles[i + 1] - start
        } else {
            angles[0] + 360.0 - start
        };
        let bisector = normalize_degrees(start + gap / 2.0);
        while gaps.iter().any(|g| g.gap == gap) {
            gap -= GAP_TIE_STEP;
        }
        gaps.push(InterBond { gap, bisector });
    }
    gaps.sort_by(|a, b| a.gap.total_cmp(&b.gap));
    gaps
}

fn ensure_valid(mol: &mut Molecule, id: AtomId) {
    if mol.atoms.get(id).is_some_and(|a| !a.slots.valid) {
        update_available_positions(mol, id);
    }
}

/// Offset point of a compass slot: on the corner or edge midpoint of the
/// atom's symbol box.
fn compass_point(center: Point2<f64>, slot: Compass, hw: f64, hh: f64) -> Point2<f64> {
    let (dx, dy) = slot.offsets();
    center + Vector2::new(dx * hw, dy * hh)
}

/// Finds a place for a new symbol next to the atom.
///
/// Free compass slots are tried in the order N, S, E, W, NE, NW, SE, SW.
/// Without one, the bisector of the widest gap between bonds is used at a
/// distance just beyond the symbol's half diagonal. The result never names
/// a slot that is already taken, and nothing is reserved by the call.
pub fn available_position(mol: &mut Molecule, id: AtomId) -> Option<AvailablePosition> {
    ensure_valid(mol, id);
    let atom = mol.atoms.get(id)?;
    let (hw, hh) = atom.half_extent(&mol.settings);
    let center = atom.xy();

    if let Some(slot) = Compass::SLOT_PRIORITY
        .into_iter()
        .find(|c| atom.slots.available.contains(*c))
    {
        return Some(AvailablePosition {
            slot: Some(slot),
            angle: slot.angle(),
            point: compass_point(center, slot, hw, hh),
        });
    }

    let angle = atom
        .slots
        .inter_bonds
        .last()
        .map(|g| g.bisector)
        .unwrap_or(90.0);
    let dist = hw.hypot(hh) + mol.settings.slot_margin;
    Some(AvailablePosition {
        slot: None,
        angle,
        point: center + unit_from_angle(angle) * dist,
    })
}

/// Point in direction `angle` from the atom: at `dist` when it is positive,
/// otherwise on the border of the symbol box.
pub fn position_at_angle(mol: &Molecule, id: AtomId, angle: f64, dist: f64) -> Option<Point2<f64>> {
    let atom = mol.atoms.get(id)?;
    let dir = unit_from_angle(angle);
    let d = if dist > 0.0 {
        dist
    } else {
        let (hw, hh) = atom.half_extent(&mol.settings);
        box_exit_distance(&dir, hw, hh)
    };
    Some(atom.xy() + dir * d)
}

/// Resolves where the atom's charge sign goes.
///
/// An automatic position takes the first free slot in the order NE, NW, N,
/// SE, SW, S, E, W, then the widest gap between bonds. A requested compass
/// slot that is taken yields [`Anchor::Center`]. A free angle is anchored on
/// the symbol edge it points through.
pub fn charge_position(mol: &mut Molecule, id: AtomId) -> Option<ChargePlacement> {
    ensure_valid(mol, id);
    let atom = mol.atoms.get(id)?;
    let (hw, hh) = atom.half_extent(&mol.settings);
    let center = atom.xy();
    let available = atom.slots.available;

    let placement = match atom.charge_position {
        ChargePosition::Auto => match Compass::CHARGE_PRIORITY
            .into_iter()
            .find(|c| available.contains(*c))
        {
            Some(slot) => compass_placement(center, slot, hw, hh),
            None => {
                let angle = atom
                    .slots
                    .inter_bonds
                    .last()
                    .map(|g| g.bisector)
                    .unwrap_or(90.0);
                angle_placement(center, angle, 0.0, hw, hh)
            }
        },
        ChargePosition::Compass(slot) if available.contains(slot) => {
            compass_placement(center, slot, hw, hh)
        }
        ChargePosition::Compass(slot) => ChargePlacement {
            anchor: Anchor::Center,
            slot: Some(slot),
            angle: slot.angle(),
            point: center,
        },
        ChargePosition::Angle { angle, dist } => angle_placement(center, angle, dist, hw, hh),
    };
    Some(placement)
}

fn compass_placement(center: Point2<f64>, slot: Compass, hw: f64, hh: f64) -> ChargePlacement {
    ChargePlacement {
        anchor: slot.into(),
        slot: Some(slot),
        angle: slot.angle(),
        point: compass_point(center, slot, hw, hh),
    }
}

/// Off-compass charge: the quadrant is picked against the box diagonal
/// `atan2(hh, hw)`, then the tangent of the angle slides the point along the
/// matching edge.
fn angle_placement(center: Point2<f64>, angle: f64, dist: f64, hw: f64, hh: f64) -> ChargePlacement {
    let angle = normalize_degrees(angle);
    let limit = hh.atan2(hw).to_degrees();
    let t = angle.to_radians().tan();
    let (anchor, edge) = if angle < limit || angle > 360.0 - limit {
        (Anchor::East, Point2::new(center.x + hw, center.y - hw * t))
    } else if angle <= 180.0 - limit {
        (Anchor::North, Point2::new(center.x + hh / t, center.y - hh))
    } else if angle < 180.0 + limit {
        (Anchor::West, Point2::new(center.x - hw, center.y + hw * t))
    } else {
        (Anchor::South, Point2::new(center.x - hh / t, center.y + hh))
    };
    let point = if dist > 0.0 {
        center + unit_from_angle(angle) * dist
    } else {
        edge
    };
    ChargePlacement {
        anchor,
        slot: None,
        angle,
        point,
    }
}
