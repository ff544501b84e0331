// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use crate::data::stack::SubstrateStack;
use crate::export::{append_extension, fmt_g, ExportError};
use crate::units::UM;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the stack as a Sonnet technology file (`.son` appended to
/// `base_path`).
///
/// The stack is standardized first if needed. After the header and the
/// dimension block, every metal and via gets a sequential entry in the
/// property table (`TMM` sheet metals, `NOR` vias, conductivity truncated
/// to whole S/m), followed by the dielectric list top-to-bottom: air,
/// the oxide layers and the conductive bulk.
pub fn write_sonnet_technology(
    stack: &mut SubstrateStack,
    base_path: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    if !stack.is_standard() {
        stack.standardize()?;
    }
    let path = append_extension(base_path.as_ref(), "son");

    let now = Local::now();
    let date = now.format("%m/%d/%Y %H:%M:%S");
    let wide_date = now.format("%m/%d/%Y  %H:%M:%S");

    let mut text: Vec<String> = Vec::new();
    text.push("FTYP SONPROJ 3 ! Sonnet Project File".to_string());
    text.push("VER 11.56".to_string());
    text.push("HEADER".to_string());
    text.push(format!("DAT {date}"));
    text.push(format!(
        "BUILT_BY_CREATED {} r{} {wide_date}",
        crate::NAME,
        crate::VERSION
    ));
    text.push(format!("BUILT_BY_SAVED {} r{}", crate::NAME, crate::VERSION));
    text.push(format!("MDATE {wide_date}"));
    text.push(format!("HDATE {wide_date}"));
    text.push("END HEADER".to_string());
    text.push("DIM".to_string());
    text.push("FREQ GHZ".to_string());
    text.push("IND PH".to_string());
    text.push("LNG UM".to_string());
    text.push("ANG DEG".to_string());
    text.push("CON /OH".to_string());
    text.push("CAP PF".to_string());
    text.push("RES OH".to_string());
    text.push("END DIM".to_string());
    text.push("GEO".to_string());
    text.push(r#"TMET "Lossless" 0 SUP 0 0 0 0"#.to_string());
    text.push(r#"BMET "Lossless" 0 SUP 0 0 0 0"#.to_string());

    let mut metal_index = 0;
    for metal in stack.metal_layers() {
        metal_index += 1;
        text.push(format!(
            r#"MET "{}" {} TMM {} 0 {}"#,
            metal.name,
            metal_index,
            metal.conductivity() as i64,
            fmt_g(metal.thickness / UM)
        ));
    }
    for via in stack.vias() {
        metal_index += 1;
        let height = stack.get_via_height(via)?;
        text.push(format!(
            r#"MET "{}" {} NOR {} 0 {}"#,
            via.name,
            metal_index,
            via.conductivity(height) as i64,
            fmt_g(height / UM)
        ));
    }

    text.push(format!(
        "BOX {} 4064 4064 32 32 20 0",
        stack.oxide_layers().len() + 1
    ));
    // open air above the stack
    text.push(format!(
        r#"      {} {} 1 {} 0 {} 0 "air""#,
        fmt_g(500.0),
        fmt_g(1.0),
        fmt_g(0.0),
        fmt_g(0.0)
    ));
    for oxide in stack.oxide_layers().iter().rev() {
        let mut thickness = oxide.thickness / UM;
        if thickness == 0.0 {
            thickness = 1e-9;
        }
        text.push(format!(
            r#"      {} {} 1 {} 0 0 0 "oxide""#,
            fmt_g(thickness),
            fmt_g(oxide.epsilon_rel),
            fmt_g(oxide.loss_tangent)
        ));
    }
    let bulk = stack.bulk_layer();
    text.push(format!(
        r#"      {} {} 1 {} 0 {} 0 "bulk""#,
        fmt_g(bulk.thickness / UM),
        fmt_g(bulk.epsilon_rel),
        fmt_g(bulk.loss_tangent),
        fmt_g(bulk.conductivity())
    ));
    text.push("NUM 0".to_string());
    text.push("END GEO".to_string());

    fs::write(&path, text.join("\n")).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("wrote Sonnet technology file {}", path.display());
    Ok(path)
}
