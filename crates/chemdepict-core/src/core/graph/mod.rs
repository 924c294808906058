//! # Graph Queries
//!
//! Topology-only queries over a [`Molecule`](crate::core::models::molecule::Molecule):
//!
//! - [`rings`] - smallest ring through every bond, rebuilt on each topology change
//! - [`chain`] - linear chain walks used to rank stereocenter substituents

pub mod chain;
pub mod rings;
