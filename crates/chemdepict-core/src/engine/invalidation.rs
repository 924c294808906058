//! Dependency table between molecule mutations and the derived state they stale.
//!
//! Every mutator on [`Molecule`] describes what it changed as one or more
//! [`Change`] values and hands them to [`propagate`]. Each change expands to a
//! list of [`Effect`]s, which are deduplicated and applied in phase order so
//! ring membership is settled before chemistry, and chemistry before geometry.

use super::{chemistry, crossing};
use crate::core::graph::rings;
use crate::core::models::ids::{AtomId, BondId, Entity};
use crate::core::models::molecule::Molecule;
use itertools::Itertools;
use tracing::trace;

/// What a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Z, kind, charge or explicit electrons of an atom.
    AtomChemistry(AtomId),
    /// Symbol visibility, extents or label placement of an atom.
    AtomDisplay(AtomId),
    AtomMoved(AtomId),
    BondAdded(BondId),
    /// The bond itself is already gone; only its endpoints remain.
    BondRemoved { begin: AtomId, end: AtomId },
    BondOrder(BondId),
    /// Depiction type, level or direction of a bond.
    BondStyle(BondId),
}

/// One unit of recomputation or invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    PerceiveRings,
    Recompute(AtomId),
    SlotCache(AtomId),
    BondLines(BondId),
    Crossings(BondId),
    /// Marks the atom and its stereocenter neighbors as needing a new wedge.
    Stereo(AtomId),
}

impl Effect {
    fn phase(&self) -> u8 {
        match self {
            Effect::PerceiveRings => 0,
            Effect::Recompute(_) => 1,
            Effect::SlotCache(_) => 2,
            Effect::BondLines(_) => 3,
            Effect::Crossings(_) => 4,
            Effect::Stereo(_) => 5,
        }
    }
}

impl Change {
    /// Expands the change into the effects it requires, given the current molecule.
    pub fn effects(&self, mol: &Molecule) -> Vec<Effect> {
        match *self {
            Change::AtomChemistry(a) => vec![Effect::Recompute(a), Effect::Stereo(a)],
            Change::AtomDisplay(a) => std::iter::once(Effect::SlotCache(a))
                .chain(incident(mol, a).map(Effect::BondLines))
                .collect(),
            Change::AtomMoved(a) => {
                let mut effects = vec![Effect::Recompute(a), Effect::SlotCache(a), Effect::Stereo(a)];
                for n in mol.neighbors(a) {
                    effects.push(Effect::Recompute(n));
                    effects.push(Effect::SlotCache(n));
                    effects.extend(incident(mol, n).map(Effect::BondLines));
                }
                effects.extend(incident(mol, a).map(Effect::BondLines));
                effects.extend(incident(mol, a).map(Effect::Crossings));
                effects
            }
            Change::BondAdded(b) => {
                let mut effects = vec![Effect::PerceiveRings];
                effects.extend(endpoint_effects(mol, b));
                effects.push(Effect::Crossings(b));
                effects
            }
            Change::BondRemoved { begin, end } => {
                let mut effects = vec![Effect::PerceiveRings];
                for a in [begin, end] {
                    effects.push(Effect::Recompute(a));
                    effects.push(Effect::SlotCache(a));
                    effects.push(Effect::Stereo(a));
                    effects.extend(incident(mol, a).map(Effect::BondLines));
                }
                effects
            }
            Change::BondOrder(b) => endpoint_effects(mol, b),
            Change::BondStyle(b) => {
                let mut effects = vec![Effect::BondLines(b), Effect::Crossings(b)];
                if let Some(bond) = mol.bond(b) {
                    effects.push(Effect::Recompute(bond.begin()));
                    effects.push(Effect::Recompute(bond.end()));
                }
                effects
            }
        }
    }
}

fn incident(mol: &Molecule, a: AtomId) -> impl Iterator<Item = BondId> + '_ {
    mol.atom(a).into_iter().flat_map(|atom| atom.bonds().map(|(_, b)| b))
}

/// Chemistry, slots and lines at both ends of a bond, plus the bond itself.
fn endpoint_effects(mol: &Molecule, b: BondId) -> Vec<Effect> {
    let Some(bond) = mol.bond(b) else {
        return Vec::new();
    };
    let mut effects = vec![Effect::BondLines(b)];
    for a in [bond.begin(), bond.end()] {
        effects.push(Effect::Recompute(a));
        effects.push(Effect::SlotCache(a));
        effects.push(Effect::Stereo(a));
        effects.extend(incident(mol, a).map(Effect::BondLines));
    }
    effects
}

/// Applies every effect the given changes require, each at most once.
pub fn propagate(mol: &mut Molecule, changes: impl IntoIterator<Item = Change>) {
    let mut effects: Vec<Effect> = changes
        .into_iter()
        .flat_map(|c| c.effects(mol))
        .unique()
        .collect();
    effects.sort_by_key(Effect::phase);
    trace!(count = effects.len(), "Propagating effects");
    for effect in effects {
        apply(mol, effect);
    }
}

fn apply(mol: &mut Molecule, effect: Effect) {
    match effect {
        Effect::PerceiveRings => {
            let found = rings::perceive(mol);
            mol.replace_rings(found);
        }
        Effect::Recompute(a) => chemistry::recompute(mol, a),
        Effect::SlotCache(a) => {
            if let Some(atom) = mol.atoms.get_mut(a) {
                atom.slots.valid = false;
            }
            mol.set_dirty(Entity::Atom(a));
        }
        Effect::BondLines(b) => mol.set_dirty(Entity::Bond(b)),
        Effect::Crossings(b) => crossing::update_crossings(mol, b),
        Effect::Stereo(a) => {
            let touched: Vec<AtomId> = std::iter::once(a).chain(mol.neighbors(a)).collect();
            for id in touched {
                if let Some(atom) = mol.atoms.get_mut(id).filter(|atom| atom.stereo.is_some()) {
                    atom.stereo_dirty = true;
                }
            }
        }
    }
}
