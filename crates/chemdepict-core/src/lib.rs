//! # chemdepict
//!
//! The chemistry and geometry core of a 2D chemical structure editor.
//!
//! Given atoms placed on a canvas and the bonds between them, the library infers
//! lone pairs, radicals, implicit hydrogens and automatic charges, finds free
//! positions around atom symbols for charge signs and electrons, computes the
//! parallel lines of multiple bonds, orders crossing bonds front to back and picks
//! wedge or hash bonds at stereocenters.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Arena-backed data models, element constants, graph
//!   queries, geometry helpers and persistence.
//!
//! - **[`engine`]: The Logic Core.** Chemistry inference, slot allocation, bond line
//!   geometry, crossing order and stereo assignment, kept current by a central
//!   invalidation table.
//!
//! - **[`workflows`]: The Public API.** One-shot procedures such as laying out a whole
//!   molecule and reporting the result.

pub mod core;
pub mod engine;
pub mod workflows;
