// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Writers for EM simulator substrate definition files.
//!
//! Both writers walk a standardized stack top-to-bottom and emit
//! line-oriented, token-delimited text with lengths in micrometers and
//! conductivities in S/m. Field order and units are fixed by the target
//! tools; do not reorder.

pub mod momentum;
pub mod sonnet;

pub use momentum::write_momentum_substrate;
pub use sonnet::write_sonnet_technology;

use crate::data::stack::StackError;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Stack(#[from] StackError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Append a file extension without replacing an existing one.
pub(crate) fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Format a float the way C's `%g` does: six significant digits, trailing
/// zeros stripped, scientific notation with a signed two-digit exponent
/// outside [1e-4, 1e6).
pub(crate) fn fmt_g(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{value:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if !(-4..6).contains(&exp) {
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let precision = (5 - exp).max(0) as usize;
        let fixed = format!("{value:.precision$}");
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    }
}
