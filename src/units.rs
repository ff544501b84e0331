// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Unit multipliers for stackup quantities.
//!
//! All quantities stored in the data model are base SI: meters, Ohm*m,
//! Ohm/sq, Ohm, S/m. Callers multiply by one of these constants for the
//! unit their process documentation uses, e.g. `300.0 * A` for a 300
//! Angstrom oxide or `20.0 * OHM_CM` for a 20 Ohm*cm bulk.

/// 1 meter
pub const M: f64 = 1.0;
/// 1 millimeter
pub const MM: f64 = 1e-3;
/// 1 micrometer
pub const UM: f64 = 1e-6;
/// 1 Angstrom
pub const A: f64 = 1e-10;
/// 1 kiloAngstrom
pub const KA: f64 = 1e3 * A;

/// 1 Ohm*m (resistivity)
pub const OHM_M: f64 = 1.0;
/// 1 Ohm*cm (resistivity)
pub const OHM_CM: f64 = 1e-2;

/// 1 Siemens/m (conductivity)
pub const S_M: f64 = 1.0;

/// 1 Ohm/square (sheet resistance)
pub const OHM_SQ: f64 = 1.0;
/// 1 milliOhm/square (sheet resistance)
pub const MOHM_SQ: f64 = 1e-3;

/// 1 Ohm (resistance)
pub const OHM: f64 = 1.0;
/// 1 milliOhm (resistance)
pub const MOHM: f64 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_units() {
        assert_relative_eq!(300.0 * UM, 3e-4, max_relative = 1e-12);
        assert_relative_eq!(5.0 * KA, 5e-7, max_relative = 1e-12);
        assert_relative_eq!(300.0 * A, 3e-8, max_relative = 1e-12);
        assert_relative_eq!(1.0 * MM, 1e-3, max_relative = 1e-12);
    }

    #[test]
    fn test_electrical_units() {
        assert_relative_eq!(20.0 * OHM_CM, 0.2, max_relative = 1e-12);
        assert_relative_eq!(120.0 * MOHM_SQ, 0.12, max_relative = 1e-12);
        assert_relative_eq!(500.0 * MOHM, 0.5, max_relative = 1e-12);
        assert_eq!(2.0 * OHM, 2.0);
        assert_eq!(1.0 * S_M, 1.0);
        assert_eq!(1.0 * OHM_M, 1.0);
        assert_eq!(1.0 * OHM_SQ, 1.0);
        assert_eq!(1.0 * M, 1.0);
    }
}
