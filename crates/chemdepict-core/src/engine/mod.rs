//! # Engine Module
//!
//! The derived-state layer of the depiction engine. Each submodule computes one
//! kind of state from the current molecule and stores it back on the entities.
//!
//! ## Architecture
//!
//! - **Chemistry** ([`chemistry`]) - Lone pairs, unpaired electrons, implicit hydrogens
//!   and automatic charges from valence rules
//! - **Slots** ([`slots`]) - Free compass directions around a symbol for charges and electrons
//! - **Bond Lines** ([`bond_lines`]) - Parallel segments of single to quadruple bonds
//! - **Crossings** ([`crossing`]) - Which of two crossing bonds is drawn in front
//! - **Stereo** ([`stereo`]) - Wedge and hash choice at stereocenters
//! - **Invalidation** ([`invalidation`]) - The table mapping each mutation to what it stales
//! - **Progress Monitoring** ([`progress`]) - Phase events for long workflows
//! - **Configuration** ([`config`]) - Drawing constants
//! - **Error Handling** ([`error`]) - Engine-level error types
//!
//! Every recomputation runs synchronously inside the mutation that triggered it.

pub mod bond_lines;
pub mod chemistry;
pub mod config;
pub mod crossing;
pub mod error;
pub mod invalidation;
pub mod progress;
pub mod slots;
pub mod stereo;
