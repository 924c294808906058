//! # Core Models Module
//!
//! Data structures for a 2D structure drawing.
//!
//! ## Overview
//!
//! Entities live in `slotmap` arenas owned by [`molecule::Molecule`] and refer to
//! each other through stable keys, never through references. Atoms keep a map from
//! neighbor to bond; bonds keep their two endpoints; rings list both.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom kind, element constants, derived chemistry and slot cache
//! - [`bond`] - Order, depiction type, cached lines and crossing records
//! - [`electron`] - Explicit lone pairs and unpaired electrons
//! - [`ring`] - A perceived ring as ordered atoms and bonds
//! - [`position`] - Compass slots, charge and electron placement, hydrogen side
//! - [`ids`] - Key types for the arenas
//! - [`molecule`] - The owning arena and every mutation entry point
//!
//! ## Usage
//!
//! ```ignore
//! use chemdepict::core::models::molecule::Molecule;
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_element(6, 0.0, 0.0);
//! let o = mol.add_element(8, 30.0, 0.0);
//! let bond = mol.add_bond(c, o, 2).unwrap();
//! assert_eq!(mol.atom(o).unwrap().lone_pairs(), 2);
//! let lines = mol.bond_lines(bond).unwrap();
//! ```

pub mod atom;
pub mod bond;
pub mod electron;
pub mod ids;
pub mod molecule;
pub mod position;
pub mod ring;
