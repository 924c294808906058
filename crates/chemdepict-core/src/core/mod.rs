//! # Core Module
//!
//! This module provides the data model and the stateless building blocks of the
//! depiction engine.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Arena-backed atoms, bonds, rings and
//!   electrons, plus the [`Molecule`](models::molecule::Molecule) that owns them
//! - **Element Data** ([`elements`]) - Static valence constants per atomic number
//! - **Graph Queries** ([`graph`]) - Ring perception and substituent chain walks
//! - **Persistence** ([`io`]) - Structured nodes and JSON documents
//! - **Geometry** ([`utils`]) - Angle conventions and segment intersection

pub mod elements;
pub mod graph;
pub mod io;
pub mod models;
pub mod utils;
