// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::{Deserialize, Serialize};

/// The single base layer of a substrate stack.
///
/// Carries resistivity in addition to the dielectric properties, since the
/// bulk is the only lossy-conductive dielectric in the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkLayer {
    pub thickness: f64,
    pub epsilon_rel: f64,
    pub resistivity: f64,
    pub loss_tangent: f64,
}

impl BulkLayer {
    pub fn new(thickness: f64, epsilon_rel: f64, resistivity: f64, loss_tangent: f64) -> Self {
        Self {
            thickness,
            epsilon_rel,
            resistivity,
            loss_tangent,
        }
    }

    /// Bulk conductivity in S/m.
    pub fn conductivity(&self) -> f64 {
        1.0 / self.resistivity
    }
}

/// A dielectric layer above the bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxideLayer {
    pub thickness: f64,
    pub epsilon_rel: f64,
    pub loss_tangent: f64,
}

impl OxideLayer {
    pub fn new(thickness: f64, epsilon_rel: f64, loss_tangent: f64) -> Self {
        Self {
            thickness,
            epsilon_rel,
            loss_tangent,
        }
    }

    /// Combine a bottom-to-top run of oxide layers into one equivalent layer.
    ///
    /// Thickness adds up. Permittivity combines thickness-weighted
    /// harmonically (series-capacitor model of stacked dielectrics); the
    /// loss tangent is the thickness-weighted arithmetic mean.
    pub fn equivalent(layers: &[OxideLayer]) -> OxideLayer {
        let total_thickness: f64 = layers.iter().map(|l| l.thickness).sum();
        let elastance: f64 = layers.iter().map(|l| l.thickness / l.epsilon_rel).sum();
        let weighted_loss: f64 = layers.iter().map(|l| l.thickness * l.loss_tangent).sum();

        OxideLayer::new(
            total_thickness,
            total_thickness / elastance,
            weighted_loss / total_thickness,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{OHM_CM, UM};
    use approx::assert_relative_eq;

    #[test]
    fn test_bulk_layer_conductivity() {
        let bulk = BulkLayer::new(300.0 * UM, 11.9, 20.0 * OHM_CM, 0.0);
        assert_relative_eq!(bulk.thickness, 3e-4, max_relative = 1e-12);
        assert_relative_eq!(bulk.conductivity(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_preserves_thickness() {
        let layers = vec![
            OxideLayer::new(1.0 * UM, 4.2, 0.001),
            OxideLayer::new(2.0 * UM, 7.0, 0.002),
            OxideLayer::new(0.5 * UM, 3.7, 0.0),
        ];
        let merged = OxideLayer::equivalent(&layers);
        let before: f64 = layers.iter().map(|l| l.thickness).sum();
        assert_relative_eq!(merged.thickness, before, epsilon = 1e-18);
    }

    #[test]
    fn test_equivalent_series_dielectric_law() {
        // 10 um of eps 4 in series with 20 um of eps 7:
        // eps_eq = 30 / (10/4 + 20/7) = 5.6
        let merged = OxideLayer::equivalent(&[
            OxideLayer::new(10.0 * UM, 4.0, 0.0),
            OxideLayer::new(20.0 * UM, 7.0, 0.0),
        ]);
        assert_relative_eq!(merged.thickness, 30.0 * UM, epsilon = 1e-18);
        assert_relative_eq!(merged.epsilon_rel, 5.6, epsilon = 1e-12);
        assert_eq!(merged.loss_tangent, 0.0);
    }

    #[test]
    fn test_equivalent_loss_tangent_weighting() {
        let merged = OxideLayer::equivalent(&[
            OxideLayer::new(1.0 * UM, 4.0, 0.003),
            OxideLayer::new(3.0 * UM, 4.0, 0.001),
        ]);
        // (1*0.003 + 3*0.001) / 4
        assert_relative_eq!(merged.loss_tangent, 0.0015, epsilon = 1e-12);
        assert_relative_eq!(merged.epsilon_rel, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equivalent_of_identical_layers_is_identity() {
        let merged = OxideLayer::equivalent(&[
            OxideLayer::new(2.0 * UM, 4.1, 0.002),
            OxideLayer::new(5.0 * UM, 4.1, 0.002),
        ]);
        assert_relative_eq!(merged.epsilon_rel, 4.1, epsilon = 1e-12);
        assert_relative_eq!(merged.loss_tangent, 0.002, epsilon = 1e-12);
    }
}
