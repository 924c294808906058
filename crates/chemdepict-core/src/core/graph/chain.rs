use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use std::collections::HashSet;

/// Shape of the substituent hanging off a stereocenter through one neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainInfo {
    /// Atoms walked before stopping at a ring, a branch point or a chain end.
    pub length: usize,
    /// Size of the smallest ring that stopped the walk, 0 if none did.
    pub ring_size: usize,
    /// Chain length at which that ring was reached, 0 if none was.
    pub ring_position: usize,
}

/// Walks away from `center` through `first` while the path stays unbranched.
///
/// Returns `None` when either atom is missing or they are not bonded, which
/// happens transiently while a structure is being loaded.
pub fn chain_info(mol: &Molecule, center: AtomId, first: AtomId) -> Option<ChainInfo> {
    mol.bond_between(center, first)?;

    let mut visited: HashSet<AtomId> = HashSet::from([center]);
    let mut prev = center;
    let mut current = first;
    let mut length = 1;

    loop {
        visited.insert(current);
        if let Some((_, ring)) = mol.atom_rings(current).first() {
            return Some(ChainInfo {
                length,
                ring_size: ring.size(),
                ring_position: length,
            });
        }
        let onward: Vec<AtomId> = mol.neighbors(current).filter(|n| *n != prev).collect();
        match onward.as_slice() {
            [next] if !visited.contains(next) => {
                prev = current;
                current = *next;
                length += 1;
            }
            _ => {
                return Some(ChainInfo {
                    length,
                    ..ChainInfo::default()
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_chain_counts_every_atom() {
        let mut mol = Molecule::new();
        let c0 = mol.add_element(6, 0.0, 0.0);
        let c1 = mol.add_element(6, 10.0, 0.0);
        let c2 = mol.add_element(6, 20.0, 0.0);
        let c3 = mol.add_element(8, 30.0, 0.0);
        mol.add_bond(c0, c1, 1);
        mol.add_bond(c1, c2, 1);
        mol.add_bond(c2, c3, 1);
        assert_eq!(
            chain_info(&mol, c0, c1),
            Some(ChainInfo {
                length: 3,
                ring_size: 0,
                ring_position: 0
            })
        );
    }

    #[test]
    fn walk_stops_at_a_branch_point() {
        let mut mol = Molecule::new();
        let c0 = mol.add_element(6, 0.0, 0.0);
        let c1 = mol.add_element(6, 10.0, 0.0);
        let c2 = mol.add_element(6, 20.0, 5.0);
        let c3 = mol.add_element(6, 20.0, -5.0);
        mol.add_bond(c0, c1, 1);
        mol.add_bond(c1, c2, 1);
        mol.add_bond(c1, c3, 1);
        assert_eq!(chain_info(&mol, c0, c1).map(|c| c.length), Some(1));
    }

    #[test]
    fn walk_records_the_ring_it_reaches() {
        let mut mol = Molecule::new();
        let center = mol.add_element(6, -20.0, 0.0);
        let link = mol.add_element(6, -10.0, 0.0);
        let ring: Vec<AtomId> = (0..5)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 5.0;
                mol.add_element(6, 10.0 * a.cos(), 10.0 * a.sin())
            })
            .collect();
        for i in 0..5 {
            mol.add_bond(ring[i], ring[(i + 1) % 5], 1);
        }
        mol.add_bond(center, link, 1);
        mol.add_bond(link, ring[2], 1);
        assert_eq!(
            chain_info(&mol, center, link),
            Some(ChainInfo {
                length: 2,
                ring_size: 5,
                ring_position: 2
            })
        );
    }

    #[test]
    fn unbonded_neighbor_is_not_ready() {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, 0.0, 0.0);
        let b = mol.add_element(6, 10.0, 0.0);
        assert_eq!(chain_info(&mol, a, b), None);
    }
}
