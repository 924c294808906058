use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::ring::Ring;
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Finds the smallest ring through each bond.
///
/// Each bond is removed in turn and the shortest path between its endpoints
/// is searched breadth-first; the path closed by the bond is a ring. Rings
/// found through several bonds are reported once, in a canonical rotation.
pub fn perceive(mol: &Molecule) -> Vec<Ring> {
    let mut cycles: Vec<Vec<AtomId>> = Vec::new();
    for (_, bond) in mol.bonds_iter() {
        let Some(path) = shortest_path_avoiding(mol, bond.begin(), bond.end()) else {
            continue;
        };
        if path.len() < 3 {
            continue;
        }
        let cycle = normalize_cycle(&path);
        if !cycles.contains(&cycle) {
            cycles.push(cycle);
        }
    }
    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let rings: Vec<Ring> = cycles
        .into_iter()
        .filter_map(|atoms| {
            let n = atoms.len();
            let bonds = (0..n)
                .map(|i| mol.bond_between(atoms[i], atoms[(i + 1) % n]))
                .collect::<Option<Vec<_>>>()?;
            Some(Ring::new(atoms, bonds))
        })
        .collect();
    trace!(count = rings.len(), "Rings perceived");
    rings
}

/// Shortest path `from → to` that does not use the direct bond between them.
fn shortest_path_avoiding(mol: &Molecule, from: AtomId, to: AtomId) -> Option<Vec<AtomId>> {
    let mut pred: HashMap<AtomId, AtomId> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    pred.insert(from, from);

    while let Some(current) = queue.pop_front() {
        for next in mol.neighbors(current) {
            if current == from && next == to {
                continue;
            }
            if pred.contains_key(&next) {
                continue;
            }
            pred.insert(next, current);
            if next == to {
                let mut path = vec![to];
                let mut cursor = to;
                while cursor != from {
                    cursor = pred[&cursor];
                    path.push(cursor);
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}

/// Rotates the cycle to start at its smallest handle and orients it so the
/// second member is the smaller of the two neighbors.
fn normalize_cycle(cycle: &[AtomId]) -> Vec<AtomId> {
    let len = cycle.len();
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, id)| id)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let mut normalized: Vec<AtomId> = (0..len).map(|i| cycle[(min_pos + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(mol: &mut Molecule, n: usize, offset: f64) -> Vec<AtomId> {
        let atoms: Vec<AtomId> = (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                mol.add_element(6, offset + 20.0 * a.cos(), 20.0 * a.sin())
            })
            .collect();
        for i in 0..n {
            mol.add_bond(atoms[i], atoms[(i + 1) % n], 1);
        }
        atoms
    }

    #[test]
    fn chain_has_no_rings() {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, 0.0, 0.0);
        let b = mol.add_element(6, 10.0, 0.0);
        let c = mol.add_element(6, 20.0, 0.0);
        mol.add_bond(a, b, 1);
        mol.add_bond(b, c, 1);
        assert!(perceive(&mol).is_empty());
    }

    #[test]
    fn benzene_is_one_six_membered_ring() {
        let mut mol = Molecule::new();
        let atoms = polygon(&mut mol, 6, 0.0);
        let rings = perceive(&mol);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].size(), 6);
        assert!(atoms.iter().all(|a| rings[0].contains_atom(*a)));
        assert_eq!(rings[0].bonds().len(), 6);
    }

    #[test]
    fn fused_rings_report_both_smallest_rings() {
        let mut mol = Molecule::new();
        let ring = polygon(&mut mol, 6, 0.0);
        let x = mol.add_element(6, 40.0, 10.0);
        let y = mol.add_element(6, 40.0, -10.0);
        mol.add_bond(ring[0], x, 1);
        mol.add_bond(x, y, 1);
        mol.add_bond(y, ring[1], 1);
        let sizes: Vec<usize> = perceive(&mol).iter().map(Ring::size).collect();
        assert_eq!(sizes, vec![4, 6]);
    }

    #[test]
    fn normalize_cycle_is_rotation_and_direction_independent() {
        let mut mol = Molecule::new();
        let atoms = polygon(&mut mol, 5, 0.0);
        let mut rotated = atoms.clone();
        rotated.rotate_left(2);
        let mut reversed = atoms.clone();
        reversed.reverse();
        assert_eq!(normalize_cycle(&atoms), normalize_cycle(&rotated));
        assert_eq!(normalize_cycle(&atoms), normalize_cycle(&reversed));
    }
}
