use crate::core::models::bond::{Bond, BondType, Crossing};
use crate::core::models::ids::{BondId, Entity};
use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::{LENGTH_EPSILON, segment_intersection};
use itertools::Itertools;
use tracing::{debug, trace};

/// Tests whether two bonds cross and records the result on both of them.
///
/// Bonds sharing an atom never cross. For a crossing, the bond whose
/// interpolated depth is larger is drawn in front; equal depths fall back to
/// the level, and equal levels to a bold bond beating a plain one. In that
/// last case the loser's level is lowered so the order stays stable.
/// Non-crossing pairs have any previous record removed on both sides.
pub fn is_crossing(mol: &mut Molecule, a: BondId, b: BondId) -> bool {
    let Some(hit) = intersection(mol, a, b) else {
        forget(mol, a, b);
        return false;
    };
    let (t, s) = hit;

    let (za, zb, level_a, level_b, bold_a, bold_b) = {
        let (Some(ba), Some(bb)) = (mol.bonds.get(a), mol.bonds.get(b)) else {
            return false;
        };
        let depth = |bond: &Bond, f: f64| -> Option<f64> {
            let z1 = mol.atoms.get(bond.begin)?.position.z;
            let z2 = mol.atoms.get(bond.end)?.position.z;
            Some(z1 + f * (z2 - z1))
        };
        let (Some(za), Some(zb)) = (depth(ba, t), depth(bb, s)) else {
            return false;
        };
        (
            za,
            zb,
            ba.level,
            bb.level,
            ba.bond_type == BondType::Bold,
            bb.bond_type == BondType::Bold,
        )
    };

    let a_in_front = if (za - zb).abs() > LENGTH_EPSILON {
        za > zb
    } else if level_a != level_b {
        level_a > level_b
    } else if bold_b && !bold_a {
        mol.bonds[a].level -= 1;
        false
    } else {
        mol.bonds[b].level -= 1;
        true
    };

    mol.bonds[a].crossings.insert(
        b,
        Crossing {
            fraction: t,
            is_before: a_in_front,
        },
    );
    mol.bonds[b].crossings.insert(
        a,
        Crossing {
            fraction: s,
            is_before: !a_in_front,
        },
    );
    trace!(?a, ?b, a_in_front, "Crossing recorded");
    mol.redraw.insert(Entity::Bond(a));
    mol.redraw.insert(Entity::Bond(b));
    true
}

/// Parameters of the proper intersection of two bonds, taken between atom centers.
fn intersection(mol: &Molecule, a: BondId, b: BondId) -> Option<(f64, f64)> {
    if a == b {
        return None;
    }
    let ba = mol.bond(a)?;
    let bb = mol.bond(b)?;
    if ba.shares_atom_with(bb) {
        return None;
    }
    let p1 = mol.atom(ba.begin())?.xy();
    let p2 = mol.atom(ba.end())?.xy();
    let p3 = mol.atom(bb.begin())?.xy();
    let p4 = mol.atom(bb.end())?.xy();
    segment_intersection(&p1, &p2, &p3, &p4)
}

fn forget(mol: &mut Molecule, a: BondId, b: BondId) {
    let removed_a = mol
        .bonds
        .get_mut(a)
        .is_some_and(|bond| bond.crossings.remove(&b).is_some());
    let removed_b = mol
        .bonds
        .get_mut(b)
        .is_some_and(|bond| bond.crossings.remove(&a).is_some());
    if removed_a || removed_b {
        mol.redraw.insert(Entity::Bond(a));
        mol.redraw.insert(Entity::Bond(b));
    }
}

/// Recomputes every crossing that involves `id`.
pub fn update_crossings(mol: &mut Molecule, id: BondId) {
    if !mol.bonds.contains_key(id) {
        return;
    }
    let others: Vec<BondId> = mol.bonds.keys().filter(|b| *b != id).collect();
    let count = others
        .into_iter()
        .filter(|other| is_crossing(mol, id, *other))
        .count();
    trace!(?id, count, "Crossings updated");
}

/// Recomputes the crossings of every pair of bonds.
pub fn update_all_crossings(mol: &mut Molecule) {
    let ids: Vec<BondId> = mol.bonds.keys().collect();
    let count = ids
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| is_crossing(mol, **a, **b))
        .count();
    debug!(bonds = ids.len(), crossings = count, "All crossings updated");
}

/// Puts the bond behind every crossing partner of the same depiction type.
pub fn move_to_back(mol: &mut Molecule, id: BondId) -> Option<()> {
    restack(mol, id, false)
}

/// Puts the bond in front of every crossing partner of the same depiction type.
pub fn bring_to_front(mol: &mut Molecule, id: BondId) -> Option<()> {
    restack(mol, id, true)
}

fn restack(mol: &mut Molecule, id: BondId, front: bool) -> Option<()> {
    let bond = mol.bonds.get(id)?;
    let bond_type = bond.bond_type;
    let partners: Vec<(BondId, i32)> = bond
        .crossings
        .keys()
        .filter_map(|p| mol.bonds.get(*p).map(|b| (*p, b)))
        .filter(|(_, b)| b.bond_type == bond_type)
        .map(|(p, b)| (p, b.level))
        .collect();
    let levels = partners.iter().map(|(_, l)| *l);
    let new_level = if front {
        levels.max()? + 1
    } else {
        levels.min()? - 1
    };

    mol.bonds[id].level = new_level;
    for (partner, _) in &partners {
        if let Some(c) = mol.bonds[id].crossings.get_mut(partner) {
            c.is_before = front;
        }
        if let Some(c) = mol.bonds[*partner].crossings.get_mut(&id) {
            c.is_before = !front;
        }
        mol.redraw.insert(Entity::Bond(*partner));
    }
    mol.redraw.insert(Entity::Bond(id));
    debug!(?id, level = new_level, front, "Bond restacked");
    Some(())
}
