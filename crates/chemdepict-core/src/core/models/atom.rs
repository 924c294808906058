use super::electron::Electron;
use super::ids::{AtomId, BondId};
use super::position::{ChargePosition, CompassMask, HydrogenPosition, HydrogenSide};
use crate::core::elements;
use crate::engine::config::DepictionSettings;
use nalgebra::{Point2, Point3};
use std::collections::BTreeMap;

/// What an atom node stands for.
///
/// Both variants share the same chemistry payload on [`Atom`]; switching between
/// them is an in-place mutation of `Atom::kind` through the molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    /// A plain element; `z == 0` is the unassigned placeholder.
    Element { z: u8 },
    /// An abbreviated group (e.g. `Me`, `Ph`) attached through one atom of
    /// atomic number `attach_z`.
    Residue { abbreviation: String, attach_z: u8 },
}

impl AtomKind {
    /// The atomic number seen by bonded neighbors.
    pub fn z(&self) -> u8 {
        match self {
            AtomKind::Element { z } => *z,
            AtomKind::Residue { attach_z, .. } => *attach_z,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            AtomKind::Element { z } => elements::element(*z).map(|e| e.symbol).unwrap_or("*"),
            AtomKind::Residue { abbreviation, .. } => abbreviation,
        }
    }

    pub fn is_residue(&self) -> bool {
        matches!(self, AtomKind::Residue { .. })
    }
}

/// Element constants copied onto the atom whenever its kind changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementConstants {
    pub valence: u8,
    pub valence_electrons: u8,
    pub valence_orbitals: u8,
    pub max_bonds: u8,
    pub metallic: bool,
    pub best_side: HydrogenSide,
}

impl ElementConstants {
    pub fn for_kind(kind: &AtomKind) -> Self {
        match kind {
            AtomKind::Element { z } => elements::element(*z)
                .map(|e| Self {
                    valence: e.default_valence,
                    valence_electrons: e.valence_electrons,
                    valence_orbitals: e.valence_orbitals(),
                    max_bonds: e.max_bonds,
                    metallic: e.metallic,
                    best_side: e.best_side,
                })
                .unwrap_or_default(),
            // A residue exposes a single attachment point and no free valence.
            AtomKind::Residue { .. } => Self {
                max_bonds: 1,
                ..Self::default()
            },
        }
    }
}

/// Derived valence state, recomputed by the chemistry engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChemState {
    pub lone_pairs: i32,
    pub unpaired: i32,
    pub implicit_hydrogens: i32,
}

/// Half extents of the drawn symbol around the atom center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolExtent {
    pub half_width: f64,
    pub half_height: f64,
}

/// A gap between two consecutive bonds, keyed by its angular width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterBond {
    pub gap: f64,
    pub bisector: f64,
}

/// Cached compass occupancy and bond angle bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct SlotCache {
    /// Slots explicitly reserved by electrons or callers.
    pub(crate) occupied: CompassMask,
    pub(crate) available: CompassMask,
    /// Bond directions in degrees, ascending in [0, 360).
    pub(crate) angles: Vec<f64>,
    /// Gaps between consecutive bonds, ascending by width.
    pub(crate) inter_bonds: Vec<InterBond>,
    pub(crate) valid: bool,
}

impl SlotCache {
    pub fn occupied(&self) -> CompassMask {
        self.occupied
    }

    /// Free slots as of the last refresh; stale while the cache is invalid.
    pub fn available(&self) -> CompassMask {
        self.available
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// An atom of a 2D structure drawing.
#[derive(Debug, Clone)]
pub struct Atom {
    pub(crate) kind: AtomKind,
    pub(crate) constants: ElementConstants,
    /// Document coordinates; `z` is a pseudo-depth used only for crossing order.
    pub(crate) position: Point3<f64>,
    pub(crate) charge: i32,
    pub(crate) charge_auto: bool,
    pub(crate) charge_position: ChargePosition,
    pub(crate) show_symbol: bool,
    pub(crate) show_charge: bool,
    pub(crate) hydrogen_position: HydrogenPosition,
    pub(crate) hydrogen_side: HydrogenSide,
    pub(crate) state: ChemState,
    pub(crate) electrons: Vec<Electron>,
    pub(crate) bonds: BTreeMap<AtomId, BondId>,
    pub(crate) slots: SlotCache,
    pub(crate) draw_circle: bool,
    pub(crate) stereo: Option<[Option<AtomId>; 4]>,
    pub(crate) stereo_dirty: bool,
    pub(crate) symbol_extent: Option<SymbolExtent>,
}

impl Atom {
    /// Creates a detached atom. Chemistry is computed once it joins a molecule.
    pub fn new(kind: AtomKind, position: Point3<f64>) -> Self {
        let constants = ElementConstants::for_kind(&kind);
        Self {
            kind,
            constants,
            position,
            charge: 0,
            charge_auto: false,
            charge_position: ChargePosition::Auto,
            show_symbol: false,
            show_charge: true,
            hydrogen_position: HydrogenPosition::Auto,
            hydrogen_side: constants.best_side,
            state: ChemState::default(),
            electrons: Vec::new(),
            bonds: BTreeMap::new(),
            slots: SlotCache::default(),
            draw_circle: false,
            stereo: None,
            stereo_dirty: false,
            symbol_extent: None,
        }
    }

    pub fn element(z: u8, x: f64, y: f64) -> Self {
        Self::new(AtomKind::Element { z }, Point3::new(x, y, 0.0))
    }

    pub fn kind(&self) -> &AtomKind {
        &self.kind
    }

    pub fn z(&self) -> u8 {
        self.kind.z()
    }

    pub fn symbol(&self) -> &str {
        self.kind.symbol()
    }

    pub fn constants(&self) -> &ElementConstants {
        &self.constants
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn xy(&self) -> Point2<f64> {
        Point2::new(self.position.x, self.position.y)
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn is_charge_auto(&self) -> bool {
        self.charge_auto
    }

    pub fn charge_position(&self) -> ChargePosition {
        self.charge_position
    }

    pub fn show_symbol(&self) -> bool {
        self.show_symbol
    }

    pub fn show_charge(&self) -> bool {
        self.show_charge
    }

    pub fn hydrogen_position(&self) -> HydrogenPosition {
        self.hydrogen_position
    }

    pub fn hydrogen_side(&self) -> HydrogenSide {
        self.hydrogen_side
    }

    pub fn chem_state(&self) -> ChemState {
        self.state
    }

    pub fn lone_pairs(&self) -> i32 {
        self.state.lone_pairs
    }

    pub fn unpaired_electrons(&self) -> i32 {
        self.state.unpaired
    }

    pub fn implicit_hydrogens(&self) -> i32 {
        self.state.implicit_hydrogens
    }

    pub fn electrons(&self) -> &[Electron] {
        &self.electrons
    }

    /// Counts of explicit `(pairs, singles)` among the child electrons.
    pub fn explicit_electron_counts(&self) -> (i32, i32) {
        self.electrons.iter().fold((0, 0), |(p, u), e| {
            if e.is_pair { (p + 1, u) } else { (p, u + 1) }
        })
    }

    /// Neighbor atoms paired with the connecting bond.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomId, BondId)> + '_ {
        self.bonds.iter().map(|(a, b)| (*a, *b))
    }

    pub fn bond_to(&self, neighbor: AtomId) -> Option<BondId> {
        self.bonds.get(&neighbor).copied()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn slots(&self) -> &SlotCache {
        &self.slots
    }

    pub fn draw_circle(&self) -> bool {
        self.draw_circle
    }

    pub fn is_stereocenter(&self) -> bool {
        self.stereo.is_some()
    }

    pub fn stereo_neighbors(&self) -> Option<&[Option<AtomId>; 4]> {
        self.stereo.as_ref()
    }

    pub fn is_stereo_dirty(&self) -> bool {
        self.stereo_dirty
    }

    pub fn symbol_extent(&self) -> Option<SymbolExtent> {
        self.symbol_extent
    }

    /// Whether a text symbol is drawn at this atom. Bonded carbons stay bare
    /// unless the user asked for the symbol.
    pub fn has_drawn_symbol(&self) -> bool {
        match &self.kind {
            AtomKind::Residue { .. } => true,
            AtomKind::Element { z } => *z != 6 || self.show_symbol || self.bonds.is_empty(),
        }
    }

    /// Half width and half height of the area around the atom used for slot
    /// placement. Bare vertices get a padding-sized box.
    pub fn half_extent(&self, settings: &DepictionSettings) -> (f64, f64) {
        if !self.has_drawn_symbol() {
            return (settings.padding, settings.padding);
        }
        match self.symbol_extent {
            Some(ext) => (ext.half_width, ext.half_height),
            None => (settings.symbol_half_width, settings.symbol_half_height),
        }
    }
}
