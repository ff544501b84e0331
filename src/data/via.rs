// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

/// A vertical connector between two metal layers.
///
/// A via farm of square vias on a regular pitch is modeled as one
/// equivalent solid rectangle: the `fill` factor scales the resistivity so
/// a single drawn rectangle carries the same resistance as the array,
/// which keeps the simulator's mesh count down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub name: String,
    pub resistance: f64,
    pub width: f64,
    pub spacing: f64,
    pub(crate) bottom_metal: Option<String>,
    pub(crate) top_metal: Option<String>,
}

impl Via {
    pub fn new(name: impl Into<String>, resistance: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            resistance,
            width,
            spacing: 0.0,
            bottom_metal: None,
            top_metal: None,
        }
    }

    /// Set the center-to-center gap between vias in the array.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Name of the lower end metal, assigned when added to a stack.
    ///
    /// Ends are ordered by absolute vertical position, not by the order
    /// they were passed to `SubstrateStack::add_via`.
    pub fn bottom_metal(&self) -> Option<&str> {
        self.bottom_metal.as_deref()
    }

    /// Name of the upper end metal, assigned when added to a stack.
    pub fn top_metal(&self) -> Option<&str> {
        self.top_metal.as_deref()
    }

    /// True if either end of the via is the named metal.
    pub fn connects(&self, metal_name: &str) -> bool {
        self.bottom_metal.as_deref() == Some(metal_name)
            || self.top_metal.as_deref() == Some(metal_name)
    }

    /// Conductive fraction of the via-farm footprint.
    pub fn fill(&self) -> f64 {
        self.width.powi(2) / (self.width + self.spacing).powi(2)
    }

    /// Equivalent volume resistivity in Ohm*m for the given via height.
    pub fn resistivity(&self, height: f64) -> f64 {
        self.resistance * self.width.powi(2) / height / self.fill()
    }

    /// Equivalent conductivity in S/m for the given via height.
    pub fn conductivity(&self, height: f64) -> f64 {
        1.0 / self.resistivity(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{OHM, UM};
    use approx::assert_relative_eq;

    #[test]
    fn test_via_creation() {
        let via = Via::new("VI1", 2.0 * OHM, 0.2 * UM);
        assert_eq!(via.name, "VI1");
        assert_eq!(via.resistance, 2.0);
        assert_relative_eq!(via.width, 2e-7, max_relative = 1e-12);
        assert_eq!(via.spacing, 0.0);
        assert!(via.bottom_metal().is_none());
        assert!(via.top_metal().is_none());
    }

    #[test]
    fn test_fill_without_spacing_is_unity() {
        let via = Via::new("CONT", 10.0 * OHM, 0.15 * UM);
        assert_relative_eq!(via.fill(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fill_with_spacing() {
        // 0.2 um vias on a 0.4 um pitch cover a quarter of the footprint
        let via = Via::new("VI1", 2.0 * OHM, 0.2 * UM).with_spacing(0.2 * UM);
        assert_relative_eq!(via.fill(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_resistivity() {
        let via = Via::new("VI1", 2.0 * OHM, 0.2 * UM).with_spacing(0.2 * UM);
        let height = 1.5 * UM;
        // R * w^2 / h / fill = 2 * 4e-14 / 1.5e-6 / 0.25
        assert_relative_eq!(via.resistivity(height), 8e-14 / 1.5e-6 / 0.25, epsilon = 1e-18);
        assert_relative_eq!(
            via.conductivity(height) * via.resistivity(height),
            1.0,
            epsilon = 1e-12
        );
    }
}
