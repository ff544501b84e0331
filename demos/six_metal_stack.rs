// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Hypothetical six metal layer CMOS substrate stack with an optional
//! thick top metal, exported for Momentum and Sonnet.
//!
//! The stack is entered bottom-to-top, starting with the bulk. Quantities
//! are given as `<number> * <unit>` using the multipliers in
//! `substrate_stackup::units`; everything is stored in base SI.

use substrate_stackup::data::{
    BulkLayer, ExtendDirection, MetalLayer, OxideLayer, SubstrateStack, Via,
};
use substrate_stackup::export::{write_momentum_substrate, write_sonnet_technology};
use substrate_stackup::units::{A, KA, MOHM_SQ, OHM, OHM_CM, OHM_SQ, UM};

// set to true to use the thick top metal option
const THICK_TOP_METAL: bool = false;

// a non-zero loss tangent can cause problems with Momentum
const LOSS_TANGENT: f64 = 0.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Sonnet uses the bulk loss tangent and resistivity; Momentum only
    // the resistivity.
    let bulk = BulkLayer::new(300.0 * UM, 11.9, 20.0 * OHM_CM, LOSS_TANGENT);
    let mut stack = SubstrateStack::new(bulk);

    stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 7.0, LOSS_TANGENT));
    stack.add_oxide_layer_on_top(OxideLayer::new(5.0 * KA, 4.0, LOSS_TANGENT));
    stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 4.1, LOSS_TANGENT));

    for _ in 0..4 {
        stack.add_oxide_layer_on_top(OxideLayer::new(5.0 * KA, 3.7, LOSS_TANGENT));
        stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 4.1, LOSS_TANGENT));
    }

    if THICK_TOP_METAL {
        stack.add_oxide_layer_on_top(OxideLayer::new(30.0 * KA, 3.7, LOSS_TANGENT));
        stack.add_oxide_layer_on_top(OxideLayer::new(500.0 * A, 4.1, LOSS_TANGENT));
    } else {
        stack.add_oxide_layer_on_top(OxideLayer::new(10.0 * KA, 3.7, LOSS_TANGENT));
        stack.add_oxide_layer_on_top(OxideLayer::new(500.0 * A, 4.1, LOSS_TANGENT));
    }

    // passivation
    stack.add_oxide_layer_on_top(OxideLayer::new(4.0 * KA, 7.0, LOSS_TANGENT));

    stack.add_metal_layer(
        MetalLayer::new("PO1", 1.5 * KA, 10.0 * OHM_SQ, ExtendDirection::Up),
        0,
    )?;
    stack.add_metal_layer(
        MetalLayer::new("ME1", 2.0 * KA, 120.0 * MOHM_SQ, ExtendDirection::Down),
        2,
    )?;
    stack.add_metal_layer(
        MetalLayer::new("ME2", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down),
        4,
    )?;
    stack.add_metal_layer(
        MetalLayer::new("ME3", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down),
        6,
    )?;
    stack.add_metal_layer(
        MetalLayer::new("ME4", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down),
        8,
    )?;
    stack.add_metal_layer(
        MetalLayer::new("ME5", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down),
        10,
    )?;
    if THICK_TOP_METAL {
        stack.add_metal_layer(
            MetalLayer::new("ME6", 20.0 * KA, 10.0 * MOHM_SQ, ExtendDirection::Down),
            12,
        )?;
    } else {
        stack.add_metal_layer(
            MetalLayer::new("ME6", 7.0 * KA, 30.0 * MOHM_SQ, ExtendDirection::Down),
            12,
        )?;
    }

    // Specifying a spacing makes a via carry the equivalent resistivity
    // of the whole via array, so a single drawn rectangle replaces the
    // individual vias. The rectangle should extend the array area by half
    // the spacing on each side.
    stack.add_via(
        Via::new("CONT", 10.0 * OHM, 0.15 * UM).with_spacing(0.20 * UM),
        "PO1",
        "ME1",
    )?;
    stack.add_via(
        Via::new("VI1", 2.0 * OHM, 0.20 * UM).with_spacing(0.20 * UM),
        "ME1",
        "ME2",
    )?;
    stack.add_via(
        Via::new("VI2", 2.0 * OHM, 0.20 * UM).with_spacing(0.20 * UM),
        "ME2",
        "ME3",
    )?;
    stack.add_via(
        Via::new("VI3", 2.0 * OHM, 0.20 * UM).with_spacing(0.20 * UM),
        "ME3",
        "ME4",
    )?;
    stack.add_via(
        Via::new("VI4", 2.0 * OHM, 0.20 * UM).with_spacing(0.20 * UM),
        "ME4",
        "ME5",
    )?;
    stack.add_via(
        Via::new("VI5", 0.5 * OHM, 0.50 * UM).with_spacing(0.60 * UM),
        "ME5",
        "ME6",
    )?;

    stack.simplify()?;

    let slm = write_momentum_substrate(&mut stack, "six_metal_stack", false)?;
    let son = write_sonnet_technology(&mut stack, "six_metal_stack")?;
    println!("wrote {} and {}", slm.display(), son.display());

    // Always compare the exported stack against the stack specification
    // in the design kit before simulating.
    Ok(())
}
