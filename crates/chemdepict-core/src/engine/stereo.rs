use super::error::StereoError;
use crate::core::graph::chain::chain_info;
use crate::core::models::bond::BondType;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::{angular_distance, direction_angle, signed_area};
use nalgebra::Point2;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Stereo bonds set at one stereocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoAssignment {
    pub center: AtomId,
    pub bond: BondId,
    pub bond_type: BondType,
    /// A second, nearly parallel bond given the opposite depiction.
    pub secondary: Option<(BondId, BondType)>,
}

/// Sort key of a neighbor; the smallest key carries the wedge or hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Depictable {
        length: usize,
        ring_position: usize,
        ring_size: Reverse<usize>,
        carbon: bool,
        z: Reverse<u8>,
    },
    /// Stereocenters, ring bonds and the implicit neighbor never carry the mark.
    Blocked,
}

impl Rank {
    fn length(self) -> Option<usize> {
        match self {
            Rank::Depictable { length, .. } => Some(length),
            Rank::Blocked => None,
        }
    }
}

/// Wedge or hash for the bond to neighbor `depicted`, from the 2D positions
/// of the four neighbors in declared order.
///
/// The determinant is taken over neighbors 0..3 with the depicted one
/// replaced by the fourth, which flips the sign. Pass the center position as
/// the fourth point when that neighbor is implicit. Returns `None` when the
/// three points are collinear.
pub fn parity(points: &[Point2<f64>; 4], depicted: usize) -> Option<BondType> {
    let mut tri = [points[0], points[1], points[2]];
    let mut sign = 1.0;
    if depicted < 3 {
        tri[depicted] = points[3];
        sign = -1.0;
    }
    let det = signed_area(&tri) * sign;
    if det > 0.0 {
        Some(BondType::Wedge)
    } else if det < 0.0 {
        Some(BondType::Hash)
    } else {
        None
    }
}

/// Chooses and sets the wedge or hash bond of one stereocenter.
///
/// Existing wedges and hashes starting at the center are cleared first. The
/// chosen bond is reversed if needed so it starts at the center.
///
/// # Errors
///
/// Returns [`StereoError::Incomplete`] while any of the first three neighbors
/// (or a declared fourth) is missing or not bonded to the center.
pub fn assign(mol: &mut Molecule, center: AtomId) -> Result<StereoAssignment, StereoError> {
    let atom = mol.atom(center).ok_or(StereoError::MissingAtom(center))?;
    let declared = *atom
        .stereo_neighbors()
        .ok_or(StereoError::NotStereocenter(center))?;
    let center_xy = atom.xy();

    let mut bonds: [Option<BondId>; 4] = [None; 4];
    let mut points = [center_xy; 4];
    for (i, slot) in declared.iter().enumerate() {
        match slot {
            Some(n) => {
                let bond = mol
                    .bond_between(center, *n)
                    .ok_or(StereoError::Incomplete { center, missing: i })?;
                let neighbor = mol.atom(*n).ok_or(StereoError::MissingAtom(*n))?;
                bonds[i] = Some(bond);
                points[i] = neighbor.xy();
            }
            None if i < 3 => return Err(StereoError::Incomplete { center, missing: i }),
            None => {}
        }
    }

    let ranks: Vec<Rank> = (0..4).map(|i| rank(mol, center, declared[i], bonds[i])).collect();
    let mut order: Vec<usize> = (0..4).collect();
    order.sort_by_key(|i| ranks[*i]);
    let (n1, n2) = (order[0], order[1]);
    let Some(length1) = ranks[n1].length() else {
        return Err(StereoError::Undepictable(center));
    };
    let bond1 = bonds[n1].ok_or(StereoError::Undepictable(center))?;
    let bond_type = parity(&points, n1).ok_or(StereoError::Degenerate(center))?;

    let stale: Vec<BondId> = mol
        .atom(center)
        .map(|a| a.bonds().map(|(_, b)| b).collect())
        .unwrap_or_default();
    for b in stale {
        if mol
            .bond(b)
            .is_some_and(|bond| bond.begin() == center && bond.bond_type().is_stereo())
        {
            mol.set_bond_type(b, BondType::Normal);
        }
    }

    set_from_center(mol, center, bond1, bond_type);

    let mut secondary = None;
    if ranks[n2].length() == Some(length1) {
        if let Some(bond2) = bonds[n2] {
            let spread = direction_angle(&center_xy, &points[n1])
                .zip(direction_angle(&center_xy, &points[n2]))
                .map(|(a, b)| angular_distance(a, b));
            if spread.is_some_and(|s| s < mol.settings().stereo_parallel_limit) {
                let opposite = bond_type.opposite();
                set_from_center(mol, center, bond2, opposite);
                secondary = Some((bond2, opposite));
            }
        }
    }

    if let Some(a) = mol.atoms.get_mut(center) {
        a.stereo_dirty = false;
    }
    debug!(?center, ?bond1, ?bond_type, "Stereo bond assigned");
    Ok(StereoAssignment {
        center,
        bond: bond1,
        bond_type,
        secondary,
    })
}

/// Runs [`assign`] on every stereocenter, collecting per-center outcomes.
pub fn assign_all(mol: &mut Molecule) -> Vec<(AtomId, Result<StereoAssignment, StereoError>)> {
    let centers: Vec<AtomId> = mol
        .atoms_iter()
        .filter(|(_, a)| a.is_stereocenter())
        .map(|(id, _)| id)
        .collect();
    centers
        .into_iter()
        .map(|c| {
            let result = assign(mol, c);
            if let Err(e) = &result {
                warn!(center = ?c, error = %e, "Stereo bond not assigned");
            }
            (c, result)
        })
        .collect()
}

fn rank(mol: &Molecule, center: AtomId, neighbor: Option<AtomId>, bond: Option<BondId>) -> Rank {
    let (Some(n), Some(b)) = (neighbor, bond) else {
        return Rank::Blocked;
    };
    let Some(atom) = mol.atom(n) else {
        return Rank::Blocked;
    };
    if atom.is_stereocenter() || mol.bond(b).is_some_and(|b| b.is_in_ring()) {
        return Rank::Blocked;
    }
    let Some(chain) = chain_info(mol, center, n) else {
        return Rank::Blocked;
    };
    Rank::Depictable {
        length: chain.length,
        ring_position: chain.ring_position,
        ring_size: Reverse(chain.ring_size),
        carbon: atom.z() == 6,
        z: Reverse(atom.z()),
    }
}

fn set_from_center(mol: &mut Molecule, center: AtomId, bond: BondId, bond_type: BondType) {
    if mol.bond(bond).is_some_and(|b| b.begin() != center) {
        mol.reverse_bond(bond);
    }
    mol.set_bond_type(bond, bond_type);
}
