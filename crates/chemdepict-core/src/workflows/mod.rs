//! # Workflows Module
//!
//! High-level entry points that run the engine over a whole molecule.
//!
//! ## Architecture
//!
//! - **Layout Workflow** ([`layout`]) - Recomputes chemistry, assigns stereo bonds,
//!   computes bond lines, crossings and charge placement, and returns a serializable
//!   report of the result.

pub mod layout;
