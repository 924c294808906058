//! # Elements Module
//!
//! Static periodic-table constants consumed by the chemistry inference engine.
//!
//! ## Overview
//!
//! Every lookup is a pure function of the atomic number. The data covers the main
//! group elements through xenon plus the heavier metals commonly met in drawings.
//! Unknown atomic numbers (including the `0` placeholder) yield `None`, which the
//! engine treats as "no meaningful valence".
//!
//! ## Key Components
//!
//! - [`table`] - The `phf` maps holding the per-element constants and symbol lookup

pub mod table;

pub use table::{ElementData, element, symbol_to_z};
