use crate::core::models::atom::{AtomKind, ChemState};
use crate::core::models::bond::BondType;
use crate::core::models::ids::{AtomId, BondId, Entity};
use crate::core::models::molecule::Molecule;
use crate::core::models::position::{HydrogenPosition, HydrogenSide};
use crate::core::utils::geometry::{angular_distance, direction_angle};
use tracing::trace;

/// Sum of the orders of all bonds at `id`.
pub fn bond_order_sum(mol: &Molecule, id: AtomId) -> i32 {
    mol.atom(id)
        .map(|atom| {
            atom.bonds()
                .filter_map(|(_, b)| mol.bond(b))
                .map(|b| i32::from(b.order()))
                .sum()
        })
        .unwrap_or(0)
}

/// Recomputes lone pairs, unpaired electrons, implicit hydrogens and, unless
/// fixed by the user, the formal charge of one atom.
///
/// Every branch ends in a clamped state: no count is ever negative. The slot
/// cache of the atom is invalidated and incident double bonds are queued for
/// new geometry, since both depend on whether the symbol is drawn.
pub fn recompute(mol: &mut Molecule, id: AtomId) {
    let nbonds = bond_order_sum(mol, id);
    let side = best_side(mol, id);
    let draw_circle = needs_center_circle(mol, id);
    let Some(atom) = mol.atoms.get_mut(id) else {
        return;
    };

    if atom.charge_auto {
        atom.charge = 0;
        atom.charge_auto = false;
    }
    let (nexplp, nexplu) = atom.explicit_electron_counts();
    let c = atom.constants;
    let ve = i32::from(c.valence_electrons);

    let placeholder = matches!(atom.kind, AtomKind::Element { z: 0 } | AtomKind::Residue { .. });
    if placeholder {
        atom.state = ChemState {
            lone_pairs: 0,
            unpaired: nexplu,
            implicit_hydrogens: 0,
        };
    } else if c.valence > 0 && !c.metallic {
        let valence = i32::from(c.valence);
        let orbitals = i32::from(c.valence_orbitals);
        let max_bonds = i32::from(c.max_bonds);
        let mut charge = atom.charge;

        let mut nlp = (ve - nbonds.max(valence)) / 2;
        if charge > 0 && nlp > 0 {
            nlp -= (charge + 1) / 2;
        } else if charge < 0 {
            nlp -= charge;
        }
        if nlp < nexplp {
            nlp = nexplp;
        } else {
            // Hypervalent elements may spend more slots than they have orbitals.
            let slots = if max_bonds > orbitals { max_bonds } else { orbitals };
            let upper = slots - nbonds - nexplu;
            if nlp > upper {
                nlp = upper;
            }
        }
        nlp = nlp.max(0);

        let mut nb = ve - 2 * nlp - charge;
        if nb + nlp > 4 {
            nb -= 2;
        }
        let mut nh = nb - nbonds - nexplu;

        if charge == 0 && nh == -1 && nlp > 0 {
            charge = ve - nbonds - 2 * nlp - nexplu;
            atom.charge = charge;
            atom.charge_auto = true;
            nh = 0;
        } else if nh < 0 {
            nh = 0;
            if nlp > 0 || nexplu > 0 || nbonds > 0 {
                atom.charge = ve - 2 * nlp - nexplu - nbonds;
                atom.charge_auto = true;
            }
        }

        atom.state = ChemState {
            lone_pairs: nlp,
            unpaired: nexplu,
            implicit_hydrogens: nh,
        };
        if atom.hydrogen_position == HydrogenPosition::Auto {
            atom.hydrogen_side = side;
        }
    } else {
        atom.state = ChemState {
            lone_pairs: nexplp,
            unpaired: nexplu,
            implicit_hydrogens: 0,
        };
        if atom.charge_auto || atom.charge == 0 {
            atom.charge = (ve - 2 * nexplp - nexplu - nbonds).min(0);
            atom.charge_auto = true;
        }
    }

    atom.draw_circle = draw_circle;
    atom.slots.valid = false;
    trace!(?id, state = ?atom.state, charge = atom.charge, "Chemistry recomputed");

    let doubles: Vec<BondId> = atom
        .bonds()
        .map(|(_, b)| b)
        .filter(|b| mol.bonds.get(*b).is_some_and(|bond| bond.order == 2))
        .collect();
    mol.set_dirty(Entity::Atom(id));
    for bond in doubles {
        mol.set_dirty(Entity::Bond(bond));
    }
}

/// Whether `n` more bonds can be attached to the atom.
///
/// Elements with a valence (or a charge) are limited by their max-bonds
/// constant; others need both a free orbital and a spare electron.
pub fn accept_new_bonds(mol: &Molecule, id: AtomId, n: i32) -> bool {
    let Some(atom) = mol.atom(id) else {
        return false;
    };
    if atom.z() == 0 && !atom.kind().is_residue() {
        return true;
    }
    let nbonds = bond_order_sum(mol, id);
    let c = atom.constants();
    if c.valence > 0 || atom.charge() != 0 {
        return i32::from(c.max_bonds) >= nbonds + n;
    }
    let (nexplp, nexplu) = atom.explicit_electron_counts();
    let free_orbitals = i32::from(c.valence_orbitals) - nbonds - nexplp - nexplu;
    let free_electrons =
        i32::from(c.valence_electrons) - nbonds - 2 * nexplp - nexplu - atom.charge();
    free_orbitals > 0 && free_electrons > 0
}

/// Side for implicit hydrogens that stays clear of the bonds.
///
/// The bond directions are summed; the hydrogens go opposite to the dominant
/// component. An isolated atom uses its element's preference.
pub fn best_side(mol: &Molecule, id: AtomId) -> HydrogenSide {
    let Some(atom) = mol.atom(id) else {
        return HydrogenSide::default();
    };
    if atom.bond_count() == 0 {
        return atom.constants().best_side;
    }
    let center = atom.xy();
    let (mut sum_cos, mut sum_sin) = (0.0, 0.0);
    for neighbor in mol.neighbors(id) {
        let Some(other) = mol.atom(neighbor) else {
            continue;
        };
        if let Some(angle) = direction_angle(&center, &other.xy()) {
            let r = angle.to_radians();
            sum_cos += r.cos();
            sum_sin += r.sin();
        }
    }
    if sum_sin.abs() > sum_cos.abs() {
        if sum_sin > 0.0 {
            HydrogenSide::Bottom
        } else {
            HydrogenSide::Top
        }
    } else if sum_cos > 0.0 {
        HydrogenSide::Left
    } else {
        HydrogenSide::Right
    }
}

/// Carbon centers of allenes, and carbons starting several bold bonds, get a
/// filled dot.
fn needs_center_circle(mol: &Molecule, id: AtomId) -> bool {
    let Some(atom) = mol.atom(id) else {
        return false;
    };
    if atom.z() != 6 || atom.kind().is_residue() || atom.bond_count() == 0 {
        return false;
    }
    let bold_starts = atom
        .bonds()
        .filter_map(|(_, b)| mol.bond(b))
        .filter(|b| b.begin() == id && b.bond_type() == BondType::Bold)
        .count();
    if bold_starts > 1 {
        return true;
    }
    if atom.bond_count() != 2 {
        return false;
    }
    let center = atom.xy();
    let angles: Vec<f64> = mol
        .neighbors(id)
        .filter_map(|n| mol.atom(n))
        .filter_map(|n| direction_angle(&center, &n.xy()))
        .collect();
    match angles.as_slice() {
        [a, b] => (angular_distance(*a, *b) - 180.0).abs() < mol.settings().angle_tolerance,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::position::{Compass, ElectronPosition};

    fn balance_holds(mol: &Molecule, id: AtomId) -> bool {
        let atom = mol.atom(id).unwrap();
        let ve = i32::from(atom.constants().valence_electrons);
        let nbonds = bond_order_sum(mol, id);
        ve - atom.charge()
            == 2 * atom.lone_pairs()
                + atom.unpaired_electrons()
                + nbonds
                + atom.implicit_hydrogens()
    }

    /// Central atom `z` with `orders.len()` carbon neighbors spread around it.
    fn star(z: u8, orders: &[u8]) -> (Molecule, AtomId) {
        let mut mol = Molecule::new();
        let center = mol.add_element(z, 0.0, 0.0);
        let n = orders.len().max(1) as f64;
        for (i, order) in orders.iter().enumerate() {
            let a = std::f64::consts::TAU * i as f64 / n;
            let c = mol.add_element(6, 30.0 * a.cos(), 30.0 * a.sin());
            mol.add_bond(center, c, *order);
        }
        (mol, center)
    }

    #[test]
    fn isolated_carbon_is_methane() {
        let (mol, c) = star(6, &[]);
        let atom = mol.atom(c).unwrap();
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.implicit_hydrogens(), 4);
        assert_eq!(atom.charge(), 0);
    }

    #[test]
    fn oxygen_with_two_bonds_is_an_ether() {
        let (mol, o) = star(8, &[1, 1]);
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.lone_pairs(), 2);
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.charge(), 0);
    }

    #[test]
    fn oxygen_with_one_bond_is_a_hydroxyl() {
        let (mol, o) = star(8, &[1]);
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.lone_pairs(), 2);
        assert_eq!(atom.implicit_hydrogens(), 1);
    }

    #[test]
    fn carbonyl_oxygen_has_no_hydrogen() {
        let (mol, o) = star(8, &[2]);
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.lone_pairs(), 2);
        assert_eq!(atom.implicit_hydrogens(), 0);
    }

    #[test]
    fn ammonium_keeps_user_charge() {
        let (mut mol, n) = star(7, &[1, 1, 1, 1]);
        mol.set_charge(n, 1).unwrap();
        let atom = mol.atom(n).unwrap();
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.charge(), 1);
        assert!(!atom.is_charge_auto());
    }

    #[test]
    fn hydroxide_gains_a_lone_pair() {
        let (mut mol, o) = star(8, &[1]);
        mol.set_charge(o, -1).unwrap();
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.lone_pairs(), 3);
        assert_eq!(atom.implicit_hydrogens(), 0);
    }

    #[test]
    fn explicit_third_lone_pair_implies_an_anion() {
        let (mut mol, o) = star(8, &[1]);
        for c in [Compass::North, Compass::South, Compass::West] {
            mol.add_electron(o, true, Some(ElectronPosition::Compass(c)));
        }
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.lone_pairs(), 3);
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.charge(), -1);
        assert!(atom.is_charge_auto());
    }

    #[test]
    fn auto_charge_is_dropped_when_the_cause_goes_away() {
        let (mut mol, o) = star(8, &[1]);
        for c in [Compass::North, Compass::South, Compass::West] {
            mol.add_electron(o, true, Some(ElectronPosition::Compass(c)));
        }
        mol.remove_electron(o, 2).unwrap();
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.charge(), 0);
        assert_eq!(atom.implicit_hydrogens(), 1);
    }

    #[test]
    fn pentavalent_carbon_gets_a_derived_charge() {
        let (mol, c) = star(6, &[1, 1, 1, 1, 1]);
        let atom = mol.atom(c).unwrap();
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.charge(), -1);
        assert!(atom.is_charge_auto());
    }

    // Known-uncertain edge case: hypervalent centers use max-bonds rather than
    // the orbital count for the upper lone pair clamp.
    #[test]
    fn hypervalent_upper_clamp_uses_max_bonds() {
        let (mol, s) = star(16, &[1, 1, 1, 1, 1, 1]);
        let atom = mol.atom(s).unwrap();
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.charge(), 0);
    }

    #[test]
    fn metals_take_the_no_valence_branch() {
        let (mol, na) = star(11, &[]);
        let atom = mol.atom(na).unwrap();
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.charge(), 0);
    }

    #[test]
    fn placeholder_atoms_stay_empty() {
        let (mol, x) = star(0, &[1, 1]);
        let atom = mol.atom(x).unwrap();
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.charge(), 0);
        assert!(accept_new_bonds(&mol, x, 5));
    }

    #[test]
    fn balance_equation_holds_for_common_centers() {
        let cases: &[(u8, &[u8], i32)] = &[
            (6, &[], 0),
            (6, &[1, 1, 1], 1),
            (6, &[1, 1, 1], -1),
            (6, &[2, 2], 0),
            (7, &[], 0),
            (7, &[1, 1, 1, 1], 1),
            (7, &[3], 0),
            (8, &[1], -1),
            (8, &[2], 0),
            (9, &[1], 0),
            (15, &[1, 1, 1, 1, 1], 0),
            (16, &[2, 2], 0),
            (17, &[], -1),
        ];
        for (z, orders, charge) in cases {
            let (mut mol, id) = star(*z, orders);
            if *charge != 0 {
                mol.set_charge(id, *charge).unwrap();
            }
            assert!(balance_holds(&mol, id), "z={z} orders={orders:?} charge={charge}");
            let state = mol.atom(id).unwrap().chem_state();
            assert!(state.lone_pairs >= 0 && state.implicit_hydrogens >= 0);
        }
    }

    #[test]
    fn accept_new_bonds_respects_max_bonds() {
        let (mol, c) = star(6, &[1, 1, 1]);
        assert!(accept_new_bonds(&mol, c, 1));
        assert!(!accept_new_bonds(&mol, c, 2));
    }

    #[test]
    fn accept_new_bonds_without_valence_counts_free_orbitals() {
        let (mol, he) = star(2, &[]);
        // Helium has one orbital but no valence: its pair still allows a bond.
        assert!(accept_new_bonds(&mol, he, 1));
        let (mol, ne) = star(10, &[1, 1, 1, 1]);
        assert!(!accept_new_bonds(&mol, ne, 1));
    }

    #[test]
    fn best_side_points_away_from_bonds() {
        let mut mol = Molecule::new();
        let o = mol.add_element(8, 0.0, 0.0);
        let c = mol.add_element(6, 30.0, 0.0);
        mol.add_bond(o, c, 1);
        assert_eq!(best_side(&mol, o), HydrogenSide::Left);
        assert_eq!(mol.atom(o).unwrap().hydrogen_side(), HydrogenSide::Left);

        let n = mol.add_element(7, 0.0, 100.0);
        let up = mol.add_element(6, 0.0, 70.0);
        mol.add_bond(n, up, 1);
        assert_eq!(best_side(&mol, n), HydrogenSide::Bottom);

        let isolated = mol.add_element(16, 200.0, 0.0);
        assert_eq!(best_side(&mol, isolated), HydrogenSide::Left);
    }

    #[test]
    fn allene_center_draws_a_circle() {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, -30.0, 0.0);
        let b = mol.add_element(6, 0.0, 0.0);
        let c = mol.add_element(6, 30.0, 0.0);
        mol.add_bond(a, b, 2);
        mol.add_bond(b, c, 2);
        assert!(mol.atom(b).unwrap().draw_circle());
        assert!(!mol.atom(a).unwrap().draw_circle());
    }

    #[test]
    fn two_bold_bonds_from_a_carbon_draw_a_circle() {
        let (mut mol, c) = star(6, &[1, 1, 1]);
        let bonds: Vec<BondId> = mol.atom(c).unwrap().bonds().map(|(_, b)| b).collect();
        mol.set_bond_type(bonds[0], BondType::Bold).unwrap();
        assert!(!mol.atom(c).unwrap().draw_circle());
        mol.set_bond_type(bonds[1], BondType::Bold).unwrap();
        assert!(mol.atom(c).unwrap().draw_circle());
    }
}
