// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Substrate Stackup Library
//!
//! A Rust library for modeling planar semiconductor substrate stacks and
//! exporting them as substrate definitions for electromagnetic simulators.
//!
//! # Features
//!
//! - Build a stack bottom-to-top from a bulk layer, oxide layers, metals
//!   and vias, with position bookkeeping per interface
//! - Standardize metal extensions (interfaces at both metal boundaries,
//!   all metals extending up), splitting oxide layers where needed
//! - Simplify the oxide stack to the minimum interface count using
//!   series-equivalent dielectric merging, to cut simulation cost
//! - Derive via geometry and equivalent electrical properties for
//!   spaced via arrays
//! - Export ADS Momentum substrate files and Sonnet technology files
//!
//! # Usage
//!
//! ```rust,no_run
//! use substrate_stackup::data::{
//!     BulkLayer, ExtendDirection, MetalLayer, OxideLayer, SubstrateStack,
//! };
//! use substrate_stackup::export::write_momentum_substrate;
//! use substrate_stackup::units::{KA, OHM_CM, OHM_SQ, UM};
//!
//! # fn main() -> anyhow::Result<()> {
//! let bulk = BulkLayer::new(300.0 * UM, 11.9, 20.0 * OHM_CM, 0.0);
//! let mut stack = SubstrateStack::new(bulk);
//! stack.add_oxide_layer_on_top(OxideLayer::new(5.0 * KA, 4.0, 0.0));
//! stack.add_metal_layer(
//!     MetalLayer::new("ME1", 2.0 * KA, 0.1 * OHM_SQ, ExtendDirection::Up),
//!     0,
//! )?;
//! stack.simplify()?;
//! write_momentum_substrate(&mut stack, "my_stack", false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `data`: Core data structures for layers, interfaces, metals, vias and
//!   the substrate stack with its transformation algorithms
//! - `export`: Momentum and Sonnet file writers
//! - `units`: Unit multipliers; all stored quantities are base SI

pub mod data;
pub mod export;
pub mod units;

#[cfg(test)]
mod integration_tests;

// Re-export commonly used types
pub use data::{
    BulkLayer, ExtendDirection, Interface, InterfaceId, MetalLayer, OxideLayer, StackError,
    SubstrateStack, Via,
};

pub use export::{write_momentum_substrate, write_sonnet_technology, ExportError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
