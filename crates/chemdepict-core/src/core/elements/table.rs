use crate::core::models::position::HydrogenSide;
use phf::{Map, phf_map};

/// Constants describing one element, as needed for valence bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementData {
    pub z: u8,
    pub symbol: &'static str,
    /// Electrons in the outer shell.
    pub valence_electrons: u8,
    /// Electrons the valence shell can hold (2, 8, 18 or 32).
    pub max_valence_electrons: u8,
    pub max_bonds: u8,
    pub default_valence: u8,
    /// True for p-block elements, whose filled d shell does not add orbitals.
    pub p_block: bool,
    pub metallic: bool,
    /// Side on which hydrogens are written for an isolated atom.
    pub best_side: HydrogenSide,
}

impl ElementData {
    /// Number of orbitals available for bonds and lone pairs.
    pub fn valence_orbitals(&self) -> u8 {
        match self.max_valence_electrons {
            2 => 1,
            8 => 4,
            18 | 32 if self.p_block => 4,
            18 | 32 => 6,
            _ => 0,
        }
    }
}

macro_rules! el {
    ($z:expr, $sym:expr, $ve:expr, $maxve:expr, $maxb:expr, $val:expr, $p:expr, $metal:expr, $side:ident) => {
        ElementData {
            z: $z,
            symbol: $sym,
            valence_electrons: $ve,
            max_valence_electrons: $maxve,
            max_bonds: $maxb,
            default_valence: $val,
            p_block: $p,
            metallic: $metal,
            best_side: HydrogenSide::$side,
        }
    };
}

static ELEMENTS: Map<u8, ElementData> = phf_map! {
    1u8 => el!(1, "H", 1, 2, 1, 1, false, false, Right),
    2u8 => el!(2, "He", 2, 2, 0, 0, true, false, Right),
    3u8 => el!(3, "Li", 1, 8, 1, 1, false, true, Right),
    4u8 => el!(4, "Be", 2, 8, 2, 2, false, true, Right),
    5u8 => el!(5, "B", 3, 8, 4, 3, true, false, Right),
    6u8 => el!(6, "C", 4, 8, 4, 4, true, false, Right),
    7u8 => el!(7, "N", 5, 8, 4, 3, true, false, Right),
    8u8 => el!(8, "O", 6, 8, 3, 2, true, false, Left),
    9u8 => el!(9, "F", 7, 8, 1, 1, true, false, Left),
    10u8 => el!(10, "Ne", 8, 8, 0, 0, true, false, Right),
    11u8 => el!(11, "Na", 1, 8, 1, 1, false, true, Right),
    12u8 => el!(12, "Mg", 2, 8, 2, 2, false, true, Right),
    13u8 => el!(13, "Al", 3, 18, 6, 3, true, true, Right),
    14u8 => el!(14, "Si", 4, 18, 6, 4, true, false, Right),
    15u8 => el!(15, "P", 5, 18, 6, 3, true, false, Right),
    16u8 => el!(16, "S", 6, 18, 6, 2, true, false, Left),
    17u8 => el!(17, "Cl", 7, 18, 4, 1, true, false, Left),
    18u8 => el!(18, "Ar", 8, 18, 0, 0, true, false, Right),
    19u8 => el!(19, "K", 1, 8, 1, 1, false, true, Right),
    20u8 => el!(20, "Ca", 2, 8, 2, 2, false, true, Right),
    21u8 => el!(21, "Sc", 3, 18, 6, 3, false, true, Right),
    22u8 => el!(22, "Ti", 4, 18, 6, 4, false, true, Right),
    23u8 => el!(23, "V", 5, 18, 6, 5, false, true, Right),
    24u8 => el!(24, "Cr", 6, 18, 6, 3, false, true, Right),
    25u8 => el!(25, "Mn", 7, 18, 6, 2, false, true, Right),
    26u8 => el!(26, "Fe", 8, 18, 6, 3, false, true, Right),
    27u8 => el!(27, "Co", 9, 18, 6, 3, false, true, Right),
    28u8 => el!(28, "Ni", 10, 18, 6, 2, false, true, Right),
    29u8 => el!(29, "Cu", 11, 18, 6, 2, false, true, Right),
    30u8 => el!(30, "Zn", 12, 18, 4, 2, false, true, Right),
    31u8 => el!(31, "Ga", 3, 18, 4, 3, true, true, Right),
    32u8 => el!(32, "Ge", 4, 18, 6, 4, true, false, Right),
    33u8 => el!(33, "As", 5, 18, 6, 3, true, false, Right),
    34u8 => el!(34, "Se", 6, 18, 6, 2, true, false, Left),
    35u8 => el!(35, "Br", 7, 18, 4, 1, true, false, Left),
    36u8 => el!(36, "Kr", 8, 18, 2, 0, true, false, Right),
    37u8 => el!(37, "Rb", 1, 8, 1, 1, false, true, Right),
    38u8 => el!(38, "Sr", 2, 8, 2, 2, false, true, Right),
    39u8 => el!(39, "Y", 3, 18, 6, 3, false, true, Right),
    40u8 => el!(40, "Zr", 4, 18, 6, 4, false, true, Right),
    41u8 => el!(41, "Nb", 5, 18, 6, 5, false, true, Right),
    42u8 => el!(42, "Mo", 6, 18, 6, 6, false, true, Right),
    43u8 => el!(43, "Tc", 7, 18, 7, 7, false, true, Right),
    44u8 => el!(44, "Ru", 8, 18, 6, 4, false, true, Right),
    45u8 => el!(45, "Rh", 9, 18, 6, 3, false, true, Right),
    46u8 => el!(46, "Pd", 10, 18, 6, 2, false, true, Right),
    47u8 => el!(47, "Ag", 11, 18, 4, 1, false, true, Right),
    48u8 => el!(48, "Cd", 12, 18, 4, 2, false, true, Right),
    49u8 => el!(49, "In", 3, 18, 4, 3, true, true, Right),
    50u8 => el!(50, "Sn", 4, 18, 6, 4, true, true, Right),
    51u8 => el!(51, "Sb", 5, 18, 6, 3, true, false, Right),
    52u8 => el!(52, "Te", 6, 18, 6, 2, true, false, Left),
    53u8 => el!(53, "I", 7, 18, 5, 1, true, false, Left),
    54u8 => el!(54, "Xe", 8, 18, 6, 0, true, false, Right),
    55u8 => el!(55, "Cs", 1, 8, 1, 1, false, true, Right),
    56u8 => el!(56, "Ba", 2, 8, 2, 2, false, true, Right),
    78u8 => el!(78, "Pt", 10, 18, 6, 2, false, true, Right),
    79u8 => el!(79, "Au", 11, 18, 4, 1, false, true, Right),
    80u8 => el!(80, "Hg", 12, 18, 4, 2, false, true, Right),
    82u8 => el!(82, "Pb", 4, 18, 6, 4, true, true, Right),
    83u8 => el!(83, "Bi", 5, 18, 6, 3, true, true, Right),
};

static SYMBOLS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "Ne" => 10, "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15,
    "S" => 16, "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22,
    "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43,
    "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50,
    "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54, "Cs" => 55, "Ba" => 56, "Pt" => 78,
    "Au" => 79, "Hg" => 80, "Pb" => 82, "Bi" => 83,
};

/// Looks up the constants for an atomic number.
pub fn element(z: u8) -> Option<&'static ElementData> {
    ELEMENTS.get(&z)
}

/// Resolves a case-sensitive element symbol (e.g. `"Cl"`) to its atomic number.
pub fn symbol_to_z(symbol: &str) -> Option<u8> {
    SYMBOLS.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table_and_element_table_agree() {
        for (symbol, z) in SYMBOLS.entries() {
            let data = element(*z).expect("every symbol has element data");
            assert_eq!(data.symbol, *symbol);
            assert_eq!(data.z, *z);
        }
        assert_eq!(SYMBOLS.len(), ELEMENTS.len());
    }

    #[test]
    fn placeholder_and_unknown_numbers_have_no_data() {
        assert!(element(0).is_none());
        assert!(element(117).is_none());
        assert_eq!(symbol_to_z("Xx"), None);
        assert_eq!(symbol_to_z("cl"), None);
    }

    #[test]
    fn valence_orbitals_follow_shell_structure() {
        assert_eq!(element(1).unwrap().valence_orbitals(), 1);
        assert_eq!(element(6).unwrap().valence_orbitals(), 4);
        assert_eq!(element(16).unwrap().valence_orbitals(), 4);
        assert_eq!(element(26).unwrap().valence_orbitals(), 6);
    }

    #[test]
    fn chalcogens_and_halogens_prefer_left_hydrogens() {
        assert_eq!(element(8).unwrap().best_side, HydrogenSide::Left);
        assert_eq!(element(17).unwrap().best_side, HydrogenSide::Left);
        assert_eq!(element(7).unwrap().best_side, HydrogenSide::Right);
    }
}
