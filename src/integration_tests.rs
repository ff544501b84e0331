// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! End-to-end tests exercising the full build / standardize / simplify
//! pipeline on a realistic six-metal CMOS stackup.

use crate::data::{BulkLayer, ExtendDirection, MetalLayer, OxideLayer, SubstrateStack, Via};
use crate::units::{A, KA, MOHM_SQ, OHM, OHM_CM, OHM_SQ, UM};
use approx::assert_relative_eq;

/// Hypothetical six metal layer CMOS process with a poly layer, entered
/// bottom-to-top the way a design kit describes it.
fn six_metal_stack() -> SubstrateStack {
    let bulk = BulkLayer::new(300.0 * UM, 11.9, 20.0 * OHM_CM, 0.0);
    let mut stack = SubstrateStack::new(bulk);

    stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 7.0, 0.0));
    stack.add_oxide_layer_on_top(OxideLayer::new(5.0 * KA, 4.0, 0.0));
    stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 4.1, 0.0));
    for _ in 0..4 {
        stack.add_oxide_layer_on_top(OxideLayer::new(5.0 * KA, 3.7, 0.0));
        stack.add_oxide_layer_on_top(OxideLayer::new(300.0 * A, 4.1, 0.0));
    }
    stack.add_oxide_layer_on_top(OxideLayer::new(10.0 * KA, 3.7, 0.0));
    stack.add_oxide_layer_on_top(OxideLayer::new(500.0 * A, 4.1, 0.0));
    stack.add_oxide_layer_on_top(OxideLayer::new(4.0 * KA, 7.0, 0.0));

    let layers = [
        ("PO1", 1.5 * KA, 10.0 * OHM_SQ, ExtendDirection::Up, 0),
        ("ME1", 2.0 * KA, 120.0 * MOHM_SQ, ExtendDirection::Down, 2),
        ("ME2", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down, 4),
        ("ME3", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down, 6),
        ("ME4", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down, 8),
        ("ME5", 3.0 * KA, 100.0 * MOHM_SQ, ExtendDirection::Down, 10),
        ("ME6", 7.0 * KA, 30.0 * MOHM_SQ, ExtendDirection::Down, 12),
    ];
    for (name, thickness, sheet, direction, interface) in layers {
        stack
            .add_metal_layer(MetalLayer::new(name, thickness, sheet, direction), interface)
            .unwrap();
    }

    stack
        .add_via(
            Via::new("CONT", 10.0 * OHM, 0.15 * UM).with_spacing(0.20 * UM),
            "PO1",
            "ME1",
        )
        .unwrap();
    for (name, lower, upper) in [
        ("VI1", "ME1", "ME2"),
        ("VI2", "ME2", "ME3"),
        ("VI3", "ME3", "ME4"),
        ("VI4", "ME4", "ME5"),
    ] {
        stack
            .add_via(
                Via::new(name, 2.0 * OHM, 0.20 * UM).with_spacing(0.20 * UM),
                lower,
                upper,
            )
            .unwrap();
    }
    stack
        .add_via(
            Via::new("VI5", 0.5 * OHM, 0.50 * UM).with_spacing(0.60 * UM),
            "ME5",
            "ME6",
        )
        .unwrap();

    stack
}

#[test]
fn test_six_metal_stack_construction() {
    let stack = six_metal_stack();
    assert_eq!(stack.oxide_layers().len(), 14);
    assert_eq!(stack.interfaces().len(), 15);
    assert_eq!(stack.metal_layers().len(), 7);
    assert_eq!(stack.vias().len(), 6);
    assert_relative_eq!(stack.get_stack_height(), 4.13 * UM, epsilon = 1e-16);
    assert!(!stack.is_standard());
}

#[test]
fn test_six_metal_stack_standardize() {
    let mut stack = six_metal_stack();
    stack.standardize().unwrap();
    assert!(stack.is_standard());

    // one split per metal boundary that had no interface yet
    assert_eq!(stack.oxide_layers().len(), 21);
    assert_eq!(stack.interfaces().len(), 22);
    assert_relative_eq!(stack.get_stack_height(), 4.13 * UM, epsilon = 1e-16);

    // ME1 was entered extending down from 530 nm; standardized it extends
    // up from 330 nm
    let me1 = stack.get_metal_layer_by_name("ME1").unwrap();
    assert_eq!(me1.extend_direction, ExtendDirection::Up);
    let bottom = stack.interface_position(me1.bottom_interface().unwrap()).unwrap();
    assert_relative_eq!(bottom, 0.33 * UM, epsilon = 1e-16);
}

#[test]
fn test_six_metal_stack_via_heights() {
    let mut stack = six_metal_stack();
    stack.standardize().unwrap();

    let expectations = [
        ("CONT", 180.0e-9),
        ("VI1", 230.0e-9),
        ("VI2", 230.0e-9),
        ("VI3", 230.0e-9),
        ("VI4", 230.0e-9),
        ("VI5", 330.0e-9),
    ];
    for (name, expected) in expectations {
        let via = stack
            .vias()
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .unwrap();
        assert_relative_eq!(stack.get_via_height(&via).unwrap(), expected, epsilon = 1e-16);
    }
}

#[test]
fn test_six_metal_stack_simplify() {
    let mut stack = six_metal_stack();
    stack.simplify().unwrap();

    // one interface per metal attachment (PO1 shares the bulk top) plus
    // the top of the stack
    assert_eq!(stack.interfaces().len(), 8);
    assert_eq!(stack.oxide_layers().len(), 7);
    assert!(stack.is_standard());
    assert_relative_eq!(stack.get_stack_height(), 4.13 * UM, epsilon = 1e-16);

    // positions stay strictly increasing
    let positions: Vec<f64> = (0..stack.interfaces().len())
        .map(|i| stack.interface_position_at(i).unwrap())
        .collect();
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1]);
    }

    // via heights are untouched by the merge pipeline
    let cont = stack.get_via_by_bottom_metal("PO1").cloned().unwrap();
    assert_relative_eq!(stack.get_via_height(&cont).unwrap(), 180.0e-9, epsilon = 1e-16);

    // and running simplify again changes nothing
    stack.simplify().unwrap();
    assert_eq!(stack.interfaces().len(), 8);
}

#[test]
fn test_via_end_assignment_is_position_based() {
    let mut stack = six_metal_stack();
    // arguments reversed relative to the physical order
    stack
        .add_via(
            Via::new("VI5B", 0.5 * OHM, 0.50 * UM).with_spacing(0.60 * UM),
            "ME6",
            "ME5",
        )
        .unwrap();
    let via = stack.get_via_by_bottom_metal("ME5").unwrap();
    assert_eq!(via.top_metal(), Some("ME6"));

    let equivalent = stack
        .vias()
        .iter()
        .filter(|v| v.bottom_metal() == Some("ME5") && v.top_metal() == Some("ME6"))
        .count();
    assert_eq!(equivalent, 2);
}

#[test]
fn test_remove_metal_drops_connected_vias() {
    let mut stack = six_metal_stack();
    stack.remove_metal_layer_by_name("ME6").unwrap();
    assert!(stack.get_metal_layer_by_name("ME6").is_none());
    assert!(stack.vias().iter().all(|v| v.name != "VI5"));
    assert_eq!(stack.vias().len(), 5);

    // the freed interface can host a replacement metal
    stack
        .add_metal_layer(
            MetalLayer::new("ME6", 20.0 * KA, 10.0 * MOHM_SQ, ExtendDirection::Down),
            12,
        )
        .unwrap();
    stack.standardize().unwrap();
    assert!(stack.is_standard());
}
