//! Provides persistence for molecules and their entities.
//!
//! Every atom, bond and electron converts to a format-agnostic [`node::Node`]
//! with string attributes and ordered children through the [`persist::Persist`]
//! trait. The [`document::DocumentFile`] trait reads and writes whole molecules,
//! with [`document::JsonDocument`] storing the node tree as JSON.

pub mod document;
pub mod node;
pub mod persist;
