use super::atom::{Atom, AtomKind, ElementConstants, SymbolExtent};
use super::bond::{Bond, BondType, Segment};
use super::electron::Electron;
use super::ids::{AtomId, BondId, Entity, RingId};
use super::position::{ChargePosition, Compass, ElectronPosition, HydrogenPosition};
use super::ring::Ring;
use crate::engine::config::DepictionSettings;
use crate::engine::invalidation::{Change, propagate};
use crate::engine::{bond_lines, chemistry, crossing, slots};
use nalgebra::{Point2, Point3};
use slotmap::SlotMap;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// A 2D structure drawing: the arena owning every atom, bond and ring.
///
/// Atoms and bonds reference each other only through [`AtomId`] and [`BondId`]
/// handles. Every mutator routes through [`propagate`], which recomputes
/// chemistry and drops stale geometry before the call returns.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub(crate) atoms: SlotMap<AtomId, Atom>,
    pub(crate) bonds: SlotMap<BondId, Bond>,
    pub(crate) rings: SlotMap<RingId, Ring>,
    pub(crate) settings: DepictionSettings,
    /// Entities whose drawing is stale, drained by [`Molecule::take_redraw`].
    pub(crate) redraw: BTreeSet<Entity>,
}

impl Molecule {
    /// Creates an empty molecule with default depiction settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DepictionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &DepictionSettings {
        &self.settings
    }

    /// Replaces the depiction settings and drops every cached layout.
    pub fn set_settings(&mut self, settings: DepictionSettings) {
        self.settings = settings;
        let atoms: Vec<AtomId> = self.atoms.keys().collect();
        propagate(self, atoms.into_iter().map(Change::AtomDisplay));
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter()
    }

    pub fn rings_iter(&self) -> impl Iterator<Item = (RingId, &Ring)> {
        self.rings.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Atoms bonded to `id`, in handle order.
    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms
            .get(id)
            .into_iter()
            .flat_map(|atom| atom.bonds.keys().copied())
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<BondId> {
        self.atoms.get(a)?.bond_to(b)
    }

    /// Rings containing `atom`, smallest first.
    pub fn atom_rings(&self, atom: AtomId) -> Vec<(RingId, &Ring)> {
        let mut rings: Vec<(RingId, &Ring)> = self
            .rings
            .iter()
            .filter(|(_, ring)| ring.contains_atom(atom))
            .collect();
        rings.sort_by_key(|(_, ring)| ring.size());
        rings
    }

    /// Adds an atom to the molecule and computes its chemistry.
    ///
    /// Electrons already attached to `atom` reserve their compass slots.
    ///
    /// # Arguments
    ///
    /// * `atom` - A detached atom; any bond entries it carries are discarded.
    ///
    /// # Return
    ///
    /// The handle of the new atom.
    pub fn add_atom(&mut self, mut atom: Atom) -> AtomId {
        atom.bonds.clear();
        atom.slots = Default::default();
        for slot in atom.electrons.iter().filter_map(Electron::slot) {
            atom.slots.occupied.insert(slot);
        }
        let id = self.atoms.insert(atom);
        debug!(?id, "Atom added");
        propagate(self, [Change::AtomChemistry(id), Change::AtomDisplay(id)]);
        id
    }

    /// Shorthand for adding an element atom at `(x, y)` with zero depth.
    pub fn add_element(&mut self, z: u8, x: f64, y: f64) -> AtomId {
        self.add_atom(Atom::element(z, x, y))
    }

    /// Removes an atom together with its bonds and electrons.
    ///
    /// Stereo neighbor lists that referenced the atom lose that entry.
    ///
    /// # Return
    ///
    /// Returns `Some(Atom)` if the atom existed and was removed, otherwise `None`.
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let bonds: Vec<BondId> = self.atoms.get(id)?.bonds.values().copied().collect();
        for bond in bonds {
            self.remove_bond(bond);
        }
        let atom = self.atoms.remove(id)?;
        for (other_id, other) in self.atoms.iter_mut() {
            if let Some(stereo) = other.stereo.as_mut() {
                let mut touched = false;
                for slot in stereo.iter_mut().filter(|s| **s == Some(id)) {
                    *slot = None;
                    touched = true;
                }
                if touched {
                    other.stereo_dirty = true;
                    self.redraw.insert(Entity::Atom(other_id));
                }
            }
        }
        self.redraw.remove(&Entity::Atom(id));
        debug!(?id, "Atom removed");
        Some(atom)
    }

    /// Adds a bond between two atoms.
    ///
    /// It is idempotent; adding an existing bond returns the existing handle
    /// without changing it.
    ///
    /// # Arguments
    ///
    /// * `begin` - ID of the first atom.
    /// * `end` - ID of the second atom.
    /// * `order` - Bond order, clamped to 1..=4.
    ///
    /// # Return
    ///
    /// Returns `None` if either atom is missing or both ends are the same atom.
    pub fn add_bond(&mut self, begin: AtomId, end: AtomId, order: u8) -> Option<BondId> {
        self.insert_bond(Bond::new(begin, end, order))
    }

    /// Inserts a detached bond, keeping its type and level.
    pub fn insert_bond(&mut self, mut bond: Bond) -> Option<BondId> {
        let (begin, end) = (bond.begin, bond.end);
        if begin == end || !self.atoms.contains_key(begin) || !self.atoms.contains_key(end) {
            return None;
        }
        if let Some(existing) = self.bond_between(begin, end) {
            return Some(existing);
        }
        bond.rings.clear();
        bond.lines = None;
        bond.crossings.clear();
        let id = self.bonds.insert(bond);
        self.atoms[begin].bonds.insert(end, id);
        self.atoms[end].bonds.insert(begin, id);
        debug!(?id, ?begin, ?end, "Bond added");
        propagate(self, [Change::BondAdded(id)]);
        Some(id)
    }

    /// Removes a bond and every crossing record that mentions it.
    pub fn remove_bond(&mut self, id: BondId) -> Option<Bond> {
        let bond = self.bonds.remove(id)?;
        if let Some(atom) = self.atoms.get_mut(bond.begin) {
            atom.bonds.remove(&bond.end);
        }
        if let Some(atom) = self.atoms.get_mut(bond.end) {
            atom.bonds.remove(&bond.begin);
        }
        for partner in bond.crossings.keys() {
            if let Some(other) = self.bonds.get_mut(*partner) {
                other.crossings.remove(&id);
                self.redraw.insert(Entity::Bond(*partner));
            }
        }
        self.redraw.remove(&Entity::Bond(id));
        debug!(?id, "Bond removed");
        propagate(
            self,
            [Change::BondRemoved {
                begin: bond.begin,
                end: bond.end,
            }],
        );
        Some(bond)
    }

    /// Switches what the atom stands for, in place. Bonds and electrons are kept.
    pub fn set_kind(&mut self, id: AtomId, kind: AtomKind) -> Option<()> {
        let atom = self.atoms.get_mut(id)?;
        atom.constants = ElementConstants::for_kind(&kind);
        atom.kind = kind;
        if let HydrogenPosition::Fixed(side) = atom.hydrogen_position {
            atom.hydrogen_side = side;
        }
        propagate(self, [Change::AtomChemistry(id), Change::AtomDisplay(id)]);
        Some(())
    }

    pub fn set_z(&mut self, id: AtomId, z: u8) -> Option<()> {
        self.set_kind(id, AtomKind::Element { z })
    }

    /// Fixes the formal charge; the value is no longer derived automatically.
    pub fn set_charge(&mut self, id: AtomId, charge: i32) -> Option<()> {
        let atom = self.atoms.get_mut(id)?;
        atom.charge = charge;
        atom.charge_auto = false;
        propagate(self, [Change::AtomChemistry(id)]);
        Some(())
    }

    pub fn set_charge_position(&mut self, id: AtomId, position: ChargePosition) -> Option<()> {
        self.atoms.get_mut(id)?.charge_position = position;
        propagate(self, [Change::AtomDisplay(id)]);
        Some(())
    }

    pub fn set_show_symbol(&mut self, id: AtomId, show: bool) -> Option<()> {
        self.atoms.get_mut(id)?.show_symbol = show;
        propagate(self, [Change::AtomDisplay(id)]);
        Some(())
    }

    pub fn set_show_charge(&mut self, id: AtomId, show: bool) -> Option<()> {
        self.atoms.get_mut(id)?.show_charge = show;
        propagate(self, [Change::AtomDisplay(id)]);
        Some(())
    }

    pub fn set_hydrogen_position(&mut self, id: AtomId, position: HydrogenPosition) -> Option<()> {
        let atom = self.atoms.get_mut(id)?;
        atom.hydrogen_position = position;
        match position {
            HydrogenPosition::Fixed(side) => {
                atom.hydrogen_side = side;
                propagate(self, [Change::AtomDisplay(id)]);
            }
            HydrogenPosition::Auto => {
                propagate(self, [Change::AtomChemistry(id), Change::AtomDisplay(id)]);
            }
        }
        Some(())
    }

    /// Overrides the measured half extents of the atom's drawn symbol.
    pub fn set_symbol_extent(&mut self, id: AtomId, extent: Option<SymbolExtent>) -> Option<()> {
        self.atoms.get_mut(id)?.symbol_extent = extent;
        propagate(self, [Change::AtomDisplay(id)]);
        Some(())
    }

    pub fn move_atom(&mut self, id: AtomId, position: Point3<f64>) -> Option<()> {
        self.atoms.get_mut(id)?.position = position;
        propagate(self, [Change::AtomMoved(id)]);
        Some(())
    }

    /// Attaches an explicit electron marker to an atom.
    ///
    /// With no position the first free slot is used, falling back to the
    /// widest gap between bonds. Compass positions reserve their slot.
    ///
    /// # Return
    ///
    /// The index of the new electron within the atom's electron list.
    pub fn add_electron(
        &mut self,
        id: AtomId,
        is_pair: bool,
        position: Option<ElectronPosition>,
    ) -> Option<usize> {
        if !self.atoms.contains_key(id) {
            return None;
        }
        let position = match position {
            Some(p) => p,
            None => {
                let free = slots::available_position(self, id)?;
                match free.slot {
                    Some(slot) => ElectronPosition::Compass(slot),
                    None => ElectronPosition::Angle {
                        angle: free.angle,
                        dist: 0.0,
                    },
                }
            }
        };
        let electron = Electron { is_pair, position };
        let slot = electron.slot();
        let atom = self.atoms.get_mut(id)?;
        atom.electrons.push(electron);
        let index = atom.electrons.len() - 1;
        if let Some(slot) = slot {
            self.notify_position_occupation(id, slot, true);
        }
        propagate(self, [Change::AtomChemistry(id)]);
        Some(index)
    }

    /// Detaches an electron, releasing its compass slot.
    pub fn remove_electron(&mut self, id: AtomId, index: usize) -> Option<Electron> {
        let atom = self.atoms.get_mut(id)?;
        if index >= atom.electrons.len() {
            return None;
        }
        let electron = atom.electrons.remove(index);
        if let Some(slot) = electron.slot() {
            let still_used = atom.electrons.iter().any(|e| e.slot() == Some(slot));
            if !still_used {
                self.notify_position_occupation(id, slot, false);
            }
        }
        propagate(self, [Change::AtomChemistry(id)]);
        Some(electron)
    }

    /// Reserves or releases a compass slot around an atom.
    pub fn notify_position_occupation(&mut self, id: AtomId, slot: Compass, occupied: bool) {
        let Some(atom) = self.atoms.get_mut(id) else {
            return;
        };
        if occupied {
            atom.slots.occupied.insert(slot);
            atom.slots.available.remove(slot);
        } else {
            atom.slots.occupied.remove(slot);
            atom.slots.valid = false;
        }
        self.set_dirty(Entity::Atom(id));
    }

    /// Point at `dist` from the atom in direction `angle`, or on the symbol
    /// boundary when `dist` is zero.
    pub fn position_at_angle(&self, id: AtomId, angle: f64, dist: f64) -> Option<Point2<f64>> {
        slots::position_at_angle(self, id, angle, dist)
    }

    /// Declares (or clears) the four neighbors of a stereocenter.
    ///
    /// The fourth entry may be `None` for an implicit hydrogen or lone pair.
    pub fn set_stereo_neighbors(
        &mut self,
        id: AtomId,
        neighbors: Option<[Option<AtomId>; 4]>,
    ) -> Option<()> {
        let atom = self.atoms.get_mut(id)?;
        atom.stereo_dirty = neighbors.is_some();
        atom.stereo = neighbors;
        self.set_dirty(Entity::Atom(id));
        Some(())
    }

    pub fn set_bond_order(&mut self, id: BondId, order: u8) -> Option<()> {
        self.bonds.get_mut(id)?.order = order.clamp(1, 4);
        propagate(self, [Change::BondOrder(id)]);
        Some(())
    }

    /// Raises the bond order by `n` when both endpoints can take more bonds.
    ///
    /// The order wraps back to 1 past a triple bond, and also drops to 1 when
    /// either endpoint refuses the extra valence.
    ///
    /// # Return
    ///
    /// The resulting bond order.
    pub fn increment_bond_order(&mut self, id: BondId, n: u8) -> Option<u8> {
        let bond = self.bonds.get(id)?;
        let (begin, end, order) = (bond.begin, bond.end, bond.order);
        let accepted = chemistry::accept_new_bonds(self, begin, i32::from(n))
            && chemistry::accept_new_bonds(self, end, i32::from(n));
        let new_order = if accepted {
            let o = order.saturating_add(n);
            if o > 3 { 1 } else { o }
        } else {
            debug!(?id, "Bond order increment refused by an endpoint");
            1
        };
        self.set_bond_order(id, new_order)?;
        Some(new_order)
    }

    pub fn set_bond_type(&mut self, id: BondId, bond_type: BondType) -> Option<()> {
        self.bonds.get_mut(id)?.bond_type = bond_type;
        propagate(self, [Change::BondStyle(id)]);
        Some(())
    }

    pub fn set_bond_level(&mut self, id: BondId, level: i32) -> Option<()> {
        self.bonds.get_mut(id)?.level = level;
        propagate(self, [Change::BondStyle(id)]);
        Some(())
    }

    /// Swaps the bond's endpoints, which flips the direction of wedges.
    pub fn reverse_bond(&mut self, id: BondId) -> Option<()> {
        let bond = self.bonds.get_mut(id)?;
        std::mem::swap(&mut bond.begin, &mut bond.end);
        propagate(self, [Change::BondStyle(id)]);
        Some(())
    }

    /// Marks an entity for redraw. A bond also drops its cached lines.
    pub fn set_dirty(&mut self, entity: Entity) {
        match entity {
            Entity::Atom(id) if !self.atoms.contains_key(id) => return,
            Entity::Bond(id) => match self.bonds.get_mut(id) {
                Some(bond) => bond.lines = None,
                None => return,
            },
            Entity::Atom(_) => {}
        }
        self.redraw.insert(entity);
    }

    /// Drains the set of entities that need to be redrawn.
    pub fn take_redraw(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.redraw).into_iter().collect()
    }

    /// The parallel lines of a bond, computed on demand and cached.
    ///
    /// Returns `None` for a missing bond or a zero-length one.
    pub fn bond_lines(&mut self, id: BondId) -> Option<&[Segment]> {
        if self.bonds.get(id)?.lines.is_none() {
            match bond_lines::compute_lines(self, id) {
                Some(lines) => self.bonds[id].lines = Some(lines),
                None => {
                    warn!(?id, "Skipping degenerate bond with coincident endpoints");
                    return None;
                }
            }
        }
        self.bonds.get(id)?.lines.as_deref()
    }

    /// Recomputes the crossing records of one bond against every other bond.
    pub fn update_crossings(&mut self, id: BondId) {
        crossing::update_crossings(self, id);
    }

    pub fn update_all_crossings(&mut self) {
        crossing::update_all_crossings(self);
    }

    /// Replaces the ring set and refreshes the ring membership of every bond.
    ///
    /// Bonds whose membership changed lose their cached lines.
    pub fn replace_rings(&mut self, rings: Vec<Ring>) {
        let before: HashMap<BondId, Vec<Vec<AtomId>>> = self
            .bonds
            .iter()
            .map(|(id, bond)| (id, self.ring_atom_sets(&bond.rings)))
            .collect();

        self.rings.clear();
        for bond in self.bonds.values_mut() {
            bond.rings.clear();
        }
        for ring in rings {
            let members = ring.bonds.clone();
            let ring_id = self.rings.insert(ring);
            for bond in members {
                if let Some(b) = self.bonds.get_mut(bond) {
                    b.rings.push(ring_id);
                }
            }
        }

        let changed: Vec<BondId> = self
            .bonds
            .iter()
            .filter(|(id, bond)| {
                before.get(id).cloned().unwrap_or_default() != self.ring_atom_sets(&bond.rings)
            })
            .map(|(id, _)| id)
            .collect();
        for id in changed {
            self.set_dirty(Entity::Bond(id));
        }
        debug!(rings = self.rings.len(), "Ring set replaced");
    }

    fn ring_atom_sets(&self, ids: &[RingId]) -> Vec<Vec<AtomId>> {
        let mut sets: Vec<Vec<AtomId>> = ids
            .iter()
            .filter_map(|r| self.rings.get(*r))
            .map(|r| r.atoms.clone())
            .collect();
        sets.sort();
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::position::HydrogenSide;

    fn ethane() -> (Molecule, AtomId, AtomId, BondId) {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, 0.0, 0.0);
        let b = mol.add_element(6, 30.0, 0.0);
        let bond = mol.add_bond(a, b, 1).unwrap();
        (mol, a, b, bond)
    }

    #[test]
    fn add_bond_links_both_atoms_and_is_idempotent() {
        let (mut mol, a, b, bond) = ethane();
        assert_eq!(mol.bond_between(a, b), Some(bond));
        assert_eq!(mol.bond_between(b, a), Some(bond));
        assert_eq!(mol.add_bond(b, a, 2), Some(bond));
        assert_eq!(mol.bond(bond).unwrap().order(), 1);
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn add_bond_rejects_self_loops_and_missing_atoms() {
        let (mut mol, a, _, _) = ethane();
        assert_eq!(mol.add_bond(a, a, 1), None);
        let c = mol.add_element(8, 0.0, 30.0);
        mol.remove_atom(c);
        assert_eq!(mol.add_bond(a, c, 1), None);
    }

    #[test]
    fn adding_a_bond_recomputes_both_endpoints() {
        let (mol, a, b, _) = ethane();
        assert_eq!(mol.atom(a).unwrap().implicit_hydrogens(), 3);
        assert_eq!(mol.atom(b).unwrap().implicit_hydrogens(), 3);
    }

    #[test]
    fn remove_atom_drops_its_bonds_and_updates_neighbors() {
        let (mut mol, a, b, bond) = ethane();
        mol.remove_atom(b).unwrap();
        assert!(mol.bond(bond).is_none());
        assert_eq!(mol.atom(a).unwrap().bond_count(), 0);
        assert_eq!(mol.atom(a).unwrap().implicit_hydrogens(), 4);
    }

    #[test]
    fn remove_atom_clears_stereo_references() {
        let (mut mol, a, b, _) = ethane();
        mol.set_stereo_neighbors(a, Some([Some(b), None, None, None]));
        mol.remove_atom(b);
        assert_eq!(
            mol.atom(a).unwrap().stereo_neighbors(),
            Some(&[None, None, None, None])
        );
    }

    #[test]
    fn set_z_mutates_kind_in_place_and_keeps_bonds() {
        let (mut mol, a, b, bond) = ethane();
        mol.set_z(b, 8).unwrap();
        let o = mol.atom(b).unwrap();
        assert_eq!(o.symbol(), "O");
        assert_eq!(o.bond_to(a), Some(bond));
        assert_eq!(o.implicit_hydrogens(), 1);
        assert_eq!(o.lone_pairs(), 2);
    }

    #[test]
    fn residue_kind_has_no_implicit_hydrogens() {
        let (mut mol, _, b, _) = ethane();
        mol.set_kind(
            b,
            AtomKind::Residue {
                abbreviation: "Ph".into(),
                attach_z: 6,
            },
        )
        .unwrap();
        let atom = mol.atom(b).unwrap();
        assert_eq!(atom.implicit_hydrogens(), 0);
        assert_eq!(atom.lone_pairs(), 0);
        assert_eq!(atom.symbol(), "Ph");
    }

    #[test]
    fn increment_bond_order_cycles_through_triple() {
        let (mut mol, _, _, bond) = ethane();
        assert_eq!(mol.increment_bond_order(bond, 1), Some(2));
        assert_eq!(mol.increment_bond_order(bond, 1), Some(3));
        assert_eq!(mol.increment_bond_order(bond, 1), Some(1));
    }

    #[test]
    fn increment_bond_order_clamps_to_single_when_an_endpoint_is_saturated() {
        let mut mol = Molecule::new();
        let c = mol.add_element(6, 0.0, 0.0);
        let f = mol.add_element(9, 30.0, 0.0);
        let bond = mol.add_bond(c, f, 1).unwrap();
        assert_eq!(mol.increment_bond_order(bond, 1), Some(1));
        assert_eq!(mol.bond(bond).unwrap().order(), 1);
    }

    #[test]
    fn electrons_reserve_and_release_their_slot() {
        let mut mol = Molecule::new();
        let o = mol.add_element(8, 0.0, 0.0);
        let idx = mol
            .add_electron(o, true, Some(ElectronPosition::Compass(Compass::North)))
            .unwrap();
        assert!(mol.atom(o).unwrap().slots().occupied().contains(Compass::North));
        mol.remove_electron(o, idx).unwrap();
        assert!(!mol.atom(o).unwrap().slots().occupied().contains(Compass::North));
    }

    #[test]
    fn auto_electron_takes_a_free_slot() {
        let mut mol = Molecule::new();
        let n = mol.add_element(7, 0.0, 0.0);
        let idx = mol.add_electron(n, false, None).unwrap();
        let electron = &mol.atom(n).unwrap().electrons()[idx];
        assert_eq!(electron.slot(), Some(Compass::North));
        let second = mol.add_electron(n, false, None).unwrap();
        assert_eq!(
            mol.atom(n).unwrap().electrons()[second].slot(),
            Some(Compass::South)
        );
    }

    #[test]
    fn fixed_hydrogen_position_sets_the_side() {
        let (mut mol, a, _, _) = ethane();
        mol.set_hydrogen_position(a, HydrogenPosition::Fixed(HydrogenSide::Top))
            .unwrap();
        assert_eq!(mol.atom(a).unwrap().hydrogen_side(), HydrogenSide::Top);
    }

    #[test]
    fn auto_hydrogen_position_restores_the_geometric_side() {
        let mut mol = Molecule::new();
        let o = mol.add_element(8, 0.0, 0.0);
        let c = mol.add_element(6, 30.0, 0.0);
        mol.add_bond(o, c, 1).unwrap();
        assert_eq!(mol.atom(o).unwrap().hydrogen_side(), HydrogenSide::Left);

        mol.set_hydrogen_position(o, HydrogenPosition::Fixed(HydrogenSide::Right))
            .unwrap();
        assert_eq!(mol.atom(o).unwrap().hydrogen_side(), HydrogenSide::Right);

        mol.set_hydrogen_position(o, HydrogenPosition::Auto).unwrap();
        slots::update_available_positions(&mut mol, o);
        let atom = mol.atom(o).unwrap();
        assert_eq!(atom.hydrogen_side(), HydrogenSide::Left);
        assert!(!atom.slots().available().contains(Compass::West));
    }

    #[test]
    fn mutations_queue_redraws() {
        let (mut mol, a, _, bond) = ethane();
        mol.take_redraw();
        mol.move_atom(a, Point3::new(0.0, 10.0, 0.0)).unwrap();
        let redraw = mol.take_redraw();
        assert!(redraw.contains(&Entity::Atom(a)));
        assert!(redraw.contains(&Entity::Bond(bond)));
        assert!(mol.take_redraw().is_empty());
    }

    #[test]
    fn bond_lines_are_cached_until_the_bond_changes() {
        let (mut mol, _, _, bond) = ethane();
        assert_eq!(mol.bond_lines(bond).unwrap().len(), 1);
        assert!(mol.bond(bond).unwrap().cached_lines().is_some());
        mol.set_bond_order(bond, 2).unwrap();
        assert!(mol.bond(bond).unwrap().cached_lines().is_none());
        assert_eq!(mol.bond_lines(bond).unwrap().len(), 2);
    }

    #[test]
    fn degenerate_bond_has_no_lines() {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, 5.0, 5.0);
        let b = mol.add_element(6, 5.0, 5.0);
        let bond = mol.add_bond(a, b, 1).unwrap();
        assert!(mol.bond_lines(bond).is_none());
    }

    #[test]
    fn closing_a_ring_updates_bond_membership() {
        let mut mol = Molecule::new();
        let a = mol.add_element(6, 0.0, 0.0);
        let b = mol.add_element(6, 30.0, 0.0);
        let c = mol.add_element(6, 15.0, 26.0);
        let ab = mol.add_bond(a, b, 1).unwrap();
        mol.add_bond(b, c, 1).unwrap();
        assert!(!mol.bond(ab).unwrap().is_in_ring());
        let ca = mol.add_bond(c, a, 1).unwrap();
        assert!(mol.bond(ab).unwrap().is_in_ring());
        assert_eq!(mol.atom_rings(a).len(), 1);
        mol.remove_bond(ca);
        assert!(!mol.bond(ab).unwrap().is_in_ring());
        assert_eq!(mol.rings_iter().count(), 0);
    }
}
