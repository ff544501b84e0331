// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use crate::data::stack::SubstrateStack;
use crate::export::{append_extension, fmt_g, ExportError};
use crate::units::UM;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the stack as an ADS Momentum substrate file (`.slm` appended to
/// `base_path`).
///
/// The stack is standardized first if needed. Records run top-to-bottom
/// with the vertical reference at the bulk bottom; metals are folded into
/// the oxide record below them and re-emitted as zero-thickness `MET`
/// pseudo-layers at their attachment coordinate. The metal-above and
/// via-inside flags of each record describe the previously emitted
/// record's boundary, so their state lags one iteration.
///
/// With `infinite_ground_plane` the bottom is closed instead of emitting
/// an open-air termination record.
pub fn write_momentum_substrate(
    stack: &mut SubstrateStack,
    base_path: impl AsRef<Path>,
    infinite_ground_plane: bool,
) -> Result<PathBuf, ExportError> {
    if !stack.is_standard() {
        stack.standardize()?;
    }
    let path = append_extension(base_path.as_ref(), "slm");

    let mut text: Vec<String> = Vec::new();
    text.push("VERSION 100".to_string());
    text.push("UNIT um".to_string());
    text.push("SUBNAME".to_string());
    text.push("TOP 0 0 0 0".to_string());
    if infinite_ground_plane {
        text.push("BOTTOM 1 1 0 0".to_string());
    } else {
        text.push("BOTTOM 1 0 0 0".to_string());
    }

    // Metals are expanded out of the oxide records, so the top of the
    // emitted stack sits below the physical top by the total metal
    // thickness.
    let metal_total: f64 = stack.metal_layers().iter().map(|m| m.thickness).sum();
    let mut y = stack.bulk_layer().thickness + stack.get_stack_height() - metal_total;
    text.push(format!(
        "SUB0 TOP 1 1 0 0 1 0 -1 {0} {0} 1 0 3",
        fmt_g(y / UM)
    ));

    let mut metal_text: Vec<String> = Vec::new();
    let mut metal_number = 1;
    let mut last_metal_above = 1;
    let mut last_via_inside = 0;
    let oxide_count = stack.oxide_layers().len();

    for (i, oxide_index) in (0..oxide_count).rev().enumerate() {
        let oxide = &stack.oxide_layers()[oxide_index];
        let mut thickness = oxide.thickness;
        let metal_above;
        let via_inside;

        if let Some(metal) = stack.metal_at_interface(oxide_index) {
            thickness -= metal.thickness;
            metal_above = 2;
            let boundary = (y - thickness) / UM;
            metal_text.push(format!(
                "MET{:<3} {:<10} {:<12} 1 2 3 {:<16} 0 Siemens/m Siemens/m 1 {:<6} um",
                metal_number,
                metal.name,
                boundary,
                metal.conductivity(),
                metal.thickness / UM
            ));
            metal_number += 1;
            if let Some(via) = stack.get_via_by_top_metal(&metal.name) {
                via_inside = 1;
                let sigma = stack.get_via_conductivity(via)?;
                metal_text.push(format!(
                    "MET{:<3} {:<10} {:<12} 0 4 3 {:<16} 0 Siemens/m Siemens/m 0 {:<6} um",
                    metal_number, via.name, boundary, sigma, 0
                ));
                metal_number += 1;
            } else {
                via_inside = 0;
            }
        } else {
            metal_above = 1;
            via_inside = 0;
        }

        text.push(format!(
            "SUB{} ox{} 1 {} {} 0 1 0 {} {} {} {} {} 3",
            i + 1,
            oxide_count - i,
            fmt_g(oxide.epsilon_rel),
            fmt_g(oxide.loss_tangent),
            fmt_g(thickness / UM),
            fmt_g((y - thickness) / UM),
            fmt_g(y / UM),
            last_metal_above,
            last_via_inside
        ));
        y -= thickness;
        last_metal_above = metal_above;
        last_via_inside = via_inside;
    }

    let bulk = stack.bulk_layer();
    text.push(format!(
        "SUB{} bulk 2 {} {} 0 1 0 {} {} {} {} 0 3",
        oxide_count + 1,
        fmt_g(bulk.epsilon_rel),
        fmt_g(bulk.conductivity()),
        fmt_g(bulk.thickness / UM),
        fmt_g(0.0),
        fmt_g(y / UM),
        last_metal_above
    ));
    if !infinite_ground_plane {
        text.push(format!("SUB{} AIR 1 1 0 0 1 0 -1 0 0 1 0 3", oxide_count + 2));
    }
    text.extend(metal_text);

    fs::write(&path, text.join("\n")).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("wrote Momentum substrate file {}", path.display());
    Ok(path)
}
