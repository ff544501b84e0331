// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use crate::data::stack::InterfaceId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a metal layer's thickness grows from its attachment interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendDirection {
    Up,
    Down,
}

/// A conductive layer attached to the stack at one interface.
///
/// A metal is created with a single attachment interface; the opposite
/// boundary interface is filled in by `SubstrateStack::standardize`, which
/// also converts every DOWN metal into an equivalent UP one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalLayer {
    pub name: String,
    pub thickness: f64,
    pub sheet_resistance: f64,
    pub extend_direction: ExtendDirection,
    pub(crate) bottom_interface: Option<InterfaceId>,
    pub(crate) top_interface: Option<InterfaceId>,
}

impl MetalLayer {
    pub fn new(
        name: impl Into<String>,
        thickness: f64,
        sheet_resistance: f64,
        extend_direction: ExtendDirection,
    ) -> Self {
        Self {
            name: name.into(),
            thickness,
            sheet_resistance,
            extend_direction,
            bottom_interface: None,
            top_interface: None,
        }
    }

    /// Interface at the lower face, once attached or standardized.
    pub fn bottom_interface(&self) -> Option<InterfaceId> {
        self.bottom_interface
    }

    /// Interface at the upper face, once attached or standardized.
    ///
    /// After `simplify` this id may refer to an interface that was merged
    /// away; it then only records that the metal has been standardized.
    pub fn top_interface(&self) -> Option<InterfaceId> {
        self.top_interface
    }

    /// Volume resistivity in Ohm*m, derived from the sheet resistance.
    pub fn resistivity(&self) -> f64 {
        self.sheet_resistance * self.thickness
    }

    /// Conductivity in S/m.
    pub fn conductivity(&self) -> f64 {
        1.0 / self.resistivity()
    }
}

impl fmt::Display for MetalLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upordown = match self.extend_direction {
            ExtendDirection::Up => "up",
            ExtendDirection::Down => "down",
        };
        write!(f, "{} ({})", self.name, upordown)
    }
}
