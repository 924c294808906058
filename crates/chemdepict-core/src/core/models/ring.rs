use super::ids::{AtomId, BondId};

/// A perceived ring: atoms in cycle order and the bonds joining them.
///
/// `bonds[i]` joins `atoms[i]` and `atoms[(i + 1) % size]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub(crate) atoms: Vec<AtomId>,
    pub(crate) bonds: Vec<BondId>,
}

impl Ring {
    pub fn new(atoms: Vec<AtomId>, bonds: Vec<BondId>) -> Self {
        Self { atoms, bonds }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[BondId] {
        &self.bonds
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains_atom(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: BondId) -> bool {
        self.bonds.contains(&bond)
    }

    /// The two ring members adjacent to `atom`, or `None` if it is not in the ring.
    pub fn ring_neighbors(&self, atom: AtomId) -> Option<(AtomId, AtomId)> {
        let n = self.atoms.len();
        let i = self.atoms.iter().position(|a| *a == atom)?;
        Some((self.atoms[(i + n - 1) % n], self.atoms[(i + 1) % n]))
    }
}
