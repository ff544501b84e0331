// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use crate::data::layer::{BulkLayer, OxideLayer};
use crate::data::metal::{ExtendDirection, MetalLayer};
use crate::data::via::Via;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Absolute tolerance for matching interface positions, in meters.
pub const POSITION_TOLERANCE: f64 = 1e-15;

/// Stable handle for an interface.
///
/// Ids are never reused within a stack, so a handle held across
/// split/merge edits either still resolves or reports the interface as
/// gone; it can never silently point at a different interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceId(u32);

/// The boundary between two vertically adjacent layers.
///
/// Interfaces are stored bottom-to-top, index-parallel with the oxide
/// layers: interface `i` is the lower face of oxide `i` and the upper face
/// of oxide `i - 1` (interface 0 is the top of the bulk). An interface can
/// host at most one metal, recorded by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    id: InterfaceId,
    metal: Option<String>,
}

impl Interface {
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    /// Name of the metal attached at this interface, if any.
    pub fn metal(&self) -> Option<&str> {
        self.metal.as_deref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("interface index {0} is out of range")]
    InterfaceIndexOutOfRange(usize),

    #[error("interface {0:?} is not part of the stack")]
    UnknownInterface(InterfaceId),

    #[error("metal layer '{0}' not found")]
    UnknownMetal(String),

    #[error("metal layer '{0}' already exists")]
    DuplicateMetal(String),

    #[error("metal layer '{0}' is not attached to the stack")]
    DetachedMetal(String),

    #[error("via '{0}' has not been added to a stack")]
    DetachedVia(String),

    #[error("interface {index} already hosts metal '{occupant}'")]
    InterfaceOccupied { index: usize, occupant: String },

    #[error("metals '{first}' and '{second}' both require an interface at {position} m")]
    SharedBoundary {
        first: String,
        second: String,
        position: f64,
    },

    #[error("no oxide layer straddles position {0} m")]
    NoStraddlingLayer(f64),

    #[error("merging needs at least two oxide layers, got {0}")]
    MergeTooShort(usize),

    #[error("oxide range {start}..{end} is out of range")]
    MergeOutOfRange { start: usize, end: usize },

    #[error("interface between merged layers hosts metal '{0}'")]
    MergeAcrossMetal(String),

    #[error("via '{via}': metals '{bottom}' and '{top}' overlap by {overlap} m")]
    MetalsOverlap {
        via: String,
        bottom: String,
        top: String,
        overlap: f64,
    },
}

/// A planar substrate stack: one bulk layer, oxide layers bottom-to-top,
/// metals attached at oxide interfaces, and vias connecting metals.
///
/// Positions are absolute vertical coordinates in meters with 0 at the top
/// of the bulk layer, increasing upward. Every mutating operation checks
/// its preconditions before touching the stack, so a failed call leaves
/// the stack exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstrateStack {
    bulk_layer: BulkLayer,
    oxide_layers: Vec<OxideLayer>,
    interfaces: Vec<Interface>,
    metal_layers: Vec<MetalLayer>,
    vias: Vec<Via>,
    next_interface_id: u32,
}

impl SubstrateStack {
    /// Create a stack consisting of just the bulk layer and its top
    /// interface.
    pub fn new(bulk_layer: BulkLayer) -> Self {
        let mut stack = Self {
            bulk_layer,
            oxide_layers: Vec::new(),
            interfaces: Vec::new(),
            metal_layers: Vec::new(),
            vias: Vec::new(),
            next_interface_id: 0,
        };
        let id = stack.fresh_interface_id();
        stack.interfaces.push(Interface { id, metal: None });
        stack
    }

    fn fresh_interface_id(&mut self) -> InterfaceId {
        let id = InterfaceId(self.next_interface_id);
        self.next_interface_id += 1;
        id
    }

    pub fn bulk_layer(&self) -> &BulkLayer {
        &self.bulk_layer
    }

    /// Oxide layers, ordered bottom to top.
    pub fn oxide_layers(&self) -> &[OxideLayer] {
        &self.oxide_layers
    }

    /// Interfaces, ordered bottom to top. Always one more than the oxide
    /// layers.
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn metal_layers(&self) -> &[MetalLayer] {
        &self.metal_layers
    }

    pub fn vias(&self) -> &[Via] {
        &self.vias
    }

    /// Add an oxide layer above the current top of the stack.
    pub fn add_oxide_layer_on_top(&mut self, oxide_layer: OxideLayer) {
        self.oxide_layers.push(oxide_layer);
        let id = self.fresh_interface_id();
        self.interfaces.push(Interface { id, metal: None });
    }

    /// Attach a metal at the interface with the given index.
    ///
    /// The metal's opposite boundary stays open until `standardize` fills
    /// it in.
    pub fn add_metal_layer(
        &mut self,
        mut metal_layer: MetalLayer,
        interface_index: usize,
    ) -> Result<(), StackError> {
        if interface_index >= self.interfaces.len() {
            return Err(StackError::InterfaceIndexOutOfRange(interface_index));
        }
        if self.get_metal_layer_by_name(&metal_layer.name).is_some() {
            return Err(StackError::DuplicateMetal(metal_layer.name.clone()));
        }
        if let Some(occupant) = self.interfaces[interface_index].metal.clone() {
            return Err(StackError::InterfaceOccupied {
                index: interface_index,
                occupant,
            });
        }

        let id = self.interfaces[interface_index].id;
        match metal_layer.extend_direction {
            ExtendDirection::Down => metal_layer.top_interface = Some(id),
            ExtendDirection::Up => metal_layer.bottom_interface = Some(id),
        }
        self.interfaces[interface_index].metal = Some(metal_layer.name.clone());
        self.metal_layers.push(metal_layer);
        Ok(())
    }

    pub fn get_metal_layer_by_name(&self, name: &str) -> Option<&MetalLayer> {
        self.metal_layers.iter().find(|m| m.name == name)
    }

    /// Remove a metal and every via connected to it.
    pub fn remove_metal_layer_by_name(&mut self, name: &str) -> Result<(), StackError> {
        let index = self
            .metal_layers
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| StackError::UnknownMetal(name.to_string()))?;

        for interface in &mut self.interfaces {
            if interface.metal.as_deref() == Some(name) {
                interface.metal = None;
            }
        }
        self.vias.retain(|via| !via.connects(name));
        self.metal_layers.remove(index);
        Ok(())
    }

    /// Connect a via between two metals, given in either order.
    ///
    /// The via's top and bottom ends are assigned by comparing the metals'
    /// absolute attachment positions, not the argument order.
    pub fn add_via(
        &mut self,
        mut via: Via,
        metal1_name: &str,
        metal2_name: &str,
    ) -> Result<(), StackError> {
        let position1 = self.metal_attachment_position(metal1_name)?;
        let position2 = self.metal_attachment_position(metal2_name)?;

        if position1 > position2 {
            via.top_metal = Some(metal1_name.to_string());
            via.bottom_metal = Some(metal2_name.to_string());
        } else {
            via.top_metal = Some(metal2_name.to_string());
            via.bottom_metal = Some(metal1_name.to_string());
        }
        self.vias.push(via);
        Ok(())
    }

    /// Position of the interface a metal is attached at.
    fn metal_attachment_position(&self, name: &str) -> Result<f64, StackError> {
        let metal = self
            .get_metal_layer_by_name(name)
            .ok_or_else(|| StackError::UnknownMetal(name.to_string()))?;
        let id = metal
            .bottom_interface
            .or(metal.top_interface)
            .ok_or_else(|| StackError::DetachedMetal(name.to_string()))?;
        self.interface_position(id)
    }

    /// The via whose upper end is the named metal.
    pub fn get_via_by_top_metal(&self, metal_name: &str) -> Option<&Via> {
        self.vias
            .iter()
            .find(|via| via.top_metal.as_deref() == Some(metal_name))
    }

    /// The via whose lower end is the named metal.
    pub fn get_via_by_bottom_metal(&self, metal_name: &str) -> Option<&Via> {
        self.vias
            .iter()
            .find(|via| via.bottom_metal.as_deref() == Some(metal_name))
    }

    /// Index of an interface in bottom-to-top order, if it still exists.
    pub fn interface_index(&self, id: InterfaceId) -> Option<usize> {
        self.interfaces.iter().position(|itf| itf.id == id)
    }

    /// Absolute position of the interface at the given index.
    pub fn interface_position_at(&self, index: usize) -> Option<f64> {
        if index >= self.interfaces.len() {
            return None;
        }
        Some(self.oxide_layers[..index].iter().map(|l| l.thickness).sum())
    }

    /// Absolute position of an interface, in meters above the bulk top.
    pub fn interface_position(&self, id: InterfaceId) -> Result<f64, StackError> {
        let index = self
            .interface_index(id)
            .ok_or(StackError::UnknownInterface(id))?;
        Ok(self.oxide_layers[..index].iter().map(|l| l.thickness).sum())
    }

    /// The interface within `POSITION_TOLERANCE` of the given position.
    pub fn interface_by_position(&self, position: f64) -> Option<&Interface> {
        let mut current = 0.0;
        for (i, interface) in self.interfaces.iter().enumerate() {
            if i > 0 {
                current += self.oxide_layers[i - 1].thickness;
            }
            if (current - position).abs() < POSITION_TOLERANCE {
                return Some(interface);
            }
        }
        None
    }

    /// The metal attached at the interface with the given index.
    pub fn metal_at_interface(&self, index: usize) -> Option<&MetalLayer> {
        let name = self.interfaces.get(index)?.metal.as_deref()?;
        self.get_metal_layer_by_name(name)
    }

    /// Total oxide thickness, from the bulk top to the top of the stack.
    pub fn get_stack_height(&self) -> f64 {
        self.oxide_layers.iter().map(|l| l.thickness).sum()
    }

    /// Vertical gap between the effective top face of the via's bottom
    /// metal and the effective bottom face of its top metal.
    ///
    /// A zero height is legal (directly stacked metals); a negative gap
    /// means the metals overlap and is reported as an error.
    pub fn get_via_height(&self, via: &Via) -> Result<f64, StackError> {
        let bottom_name = via
            .bottom_metal()
            .ok_or_else(|| StackError::DetachedVia(via.name.clone()))?;
        let top_name = via
            .top_metal()
            .ok_or_else(|| StackError::DetachedVia(via.name.clone()))?;
        let bottom = self
            .get_metal_layer_by_name(bottom_name)
            .ok_or_else(|| StackError::UnknownMetal(bottom_name.to_string()))?;
        let top = self
            .get_metal_layer_by_name(top_name)
            .ok_or_else(|| StackError::UnknownMetal(top_name.to_string()))?;

        let top_of_bottom_metal = match bottom.extend_direction {
            ExtendDirection::Up => {
                self.face_position(bottom.bottom_interface, &bottom.name)? + bottom.thickness
            }
            ExtendDirection::Down => self.face_position(bottom.top_interface, &bottom.name)?,
        };
        let bottom_of_top_metal = match top.extend_direction {
            ExtendDirection::Down => {
                self.face_position(top.top_interface, &top.name)? - top.thickness
            }
            ExtendDirection::Up => self.face_position(top.bottom_interface, &top.name)?,
        };

        let height = bottom_of_top_metal - top_of_bottom_metal;
        if height < 0.0 {
            return Err(StackError::MetalsOverlap {
                via: via.name.clone(),
                bottom: bottom.name.clone(),
                top: top.name.clone(),
                overlap: -height,
            });
        }
        Ok(height)
    }

    /// Equivalent conductivity of a via in this stack, in S/m.
    pub fn get_via_conductivity(&self, via: &Via) -> Result<f64, StackError> {
        Ok(via.conductivity(self.get_via_height(via)?))
    }

    fn face_position(&self, id: Option<InterfaceId>, metal: &str) -> Result<f64, StackError> {
        let id = id.ok_or_else(|| StackError::DetachedMetal(metal.to_string()))?;
        self.interface_position(id)
    }

    /// Split the oxide layer straddling `position` into two layers with the
    /// same permittivity and loss tangent, and insert the new interface
    /// between them.
    ///
    /// Fails if the position falls exactly on an existing boundary or
    /// outside the oxide stack.
    pub fn split_oxide_layer(&mut self, position: f64) -> Result<InterfaceId, StackError> {
        let mut bottom = 0.0;
        for i in 0..self.oxide_layers.len() {
            let top = bottom + self.oxide_layers[i].thickness;
            if bottom < position && position < top {
                let upper = OxideLayer::new(
                    top - position,
                    self.oxide_layers[i].epsilon_rel,
                    self.oxide_layers[i].loss_tangent,
                );
                self.oxide_layers[i].thickness = position - bottom;
                self.oxide_layers.insert(i + 1, upper);
                let id = self.fresh_interface_id();
                self.interfaces.insert(i + 1, Interface { id, metal: None });
                log::debug!("split oxide layer {i} at {position:.6e} m");
                return Ok(id);
            }
            bottom = top;
        }
        Err(StackError::NoStraddlingLayer(position))
    }

    /// Merge a contiguous bottom-to-top run of oxide layers, given as a
    /// range of oxide indices, into one equivalent layer.
    ///
    /// The run's boundary interfaces are kept; the interior interfaces are
    /// deleted and must not host a metal. All preconditions are checked
    /// before the sequences are touched.
    pub fn merge_oxide_layers(&mut self, range: Range<usize>) -> Result<(), StackError> {
        if range.len() < 2 {
            return Err(StackError::MergeTooShort(range.len()));
        }
        if range.end > self.oxide_layers.len() {
            return Err(StackError::MergeOutOfRange {
                start: range.start,
                end: range.end,
            });
        }
        for i in range.start + 1..range.end {
            if let Some(name) = self.interfaces[i].metal.clone() {
                return Err(StackError::MergeAcrossMetal(name));
            }
        }

        let merged = OxideLayer::equivalent(&self.oxide_layers[range.clone()]);
        self.oxide_layers.drain(range.start + 1..range.end);
        self.interfaces.drain(range.start + 1..range.end);
        self.oxide_layers[range.start] = merged;
        log::debug!("merged oxide layers {}..{}", range.start, range.end);
        Ok(())
    }

    /// True when every metal owns both of its interfaces and extends up.
    pub fn is_standard(&self) -> bool {
        self.metal_layers.iter().all(|metal| {
            metal.bottom_interface.is_some()
                && metal.top_interface.is_some()
                && metal.extend_direction == ExtendDirection::Up
        })
    }

    /// Bring the stack into canonical form: every metal gets an interface
    /// at both of its boundaries (splitting oxide layers where needed) and
    /// every DOWN metal is converted to an equivalent UP one.
    ///
    /// All missing boundaries are validated first; a failure leaves the
    /// stack unmodified.
    pub fn standardize(&mut self) -> Result<(), StackError> {
        // Missing boundary positions depend only on interfaces that already
        // exist, and splits never move an existing interface, so the whole
        // plan can be validated against the current stack.
        let mut planned: Vec<(usize, f64)> = Vec::new();
        let mut attach_points: Vec<(usize, f64)> = Vec::new();
        for (k, metal) in self.metal_layers.iter().enumerate() {
            if metal.top_interface.is_some() && metal.bottom_interface.is_none() {
                // extends down; its bottom boundary becomes the attachment
                // once the metal is flipped up
                let top = self.face_position(metal.top_interface, &metal.name)?;
                let position = top - metal.thickness;
                self.boundary_exists_or_splittable(position)?;
                if let Some(interface) = self.interface_by_position(position) {
                    if let Some(occupant) = interface.metal() {
                        if occupant != metal.name {
                            let index = self
                                .interface_index(interface.id())
                                .ok_or(StackError::UnknownInterface(interface.id()))?;
                            return Err(StackError::InterfaceOccupied {
                                index,
                                occupant: occupant.to_string(),
                            });
                        }
                    }
                }
                planned.push((k, position));
                attach_points.push((k, position));
            } else if metal.bottom_interface.is_some() && metal.top_interface.is_none() {
                // extends up
                let bottom = self.face_position(metal.bottom_interface, &metal.name)?;
                let position = bottom + metal.thickness;
                self.boundary_exists_or_splittable(position)?;
                planned.push((k, position));
            }
        }

        // Two flipped metals must not land on the same interface.
        for (i, &(k1, p1)) in attach_points.iter().enumerate() {
            for &(k2, p2) in &attach_points[i + 1..] {
                if (p1 - p2).abs() < POSITION_TOLERANCE {
                    return Err(StackError::SharedBoundary {
                        first: self.metal_layers[k1].name.clone(),
                        second: self.metal_layers[k2].name.clone(),
                        position: p1,
                    });
                }
            }
        }

        // Create or look up the planned boundaries.
        for (k, position) in planned {
            let existing = self.interface_by_position(position).map(|itf| itf.id());
            let id = match existing {
                Some(id) => id,
                None => self.split_oxide_layer(position)?,
            };
            let metal = &mut self.metal_layers[k];
            if metal.bottom_interface.is_none() {
                metal.bottom_interface = Some(id);
            } else {
                metal.top_interface = Some(id);
            }
            log::debug!(
                "standardize: boundary for metal '{}' at {position:.6e} m",
                self.metal_layers[k].name
            );
        }

        // Make all metals extend up: move the attachment from the (then
        // redundant) top interface down to the bottom interface.
        for k in 0..self.metal_layers.len() {
            if self.metal_layers[k].extend_direction != ExtendDirection::Down {
                continue;
            }
            let name = self.metal_layers[k].name.clone();
            let (Some(top), Some(bottom)) = (
                self.metal_layers[k].top_interface,
                self.metal_layers[k].bottom_interface,
            ) else {
                return Err(StackError::DetachedMetal(name));
            };
            if let Some(index) = self.interface_index(top) {
                self.interfaces[index].metal = None;
            }
            let index = self
                .interface_index(bottom)
                .ok_or(StackError::UnknownInterface(bottom))?;
            self.interfaces[index].metal = Some(name);
            self.metal_layers[k].extend_direction = ExtendDirection::Up;
        }
        Ok(())
    }

    fn boundary_exists_or_splittable(&self, position: f64) -> Result<(), StackError> {
        if self.interface_by_position(position).is_some() {
            return Ok(());
        }
        let mut bottom = 0.0;
        for layer in &self.oxide_layers {
            let top = bottom + layer.thickness;
            if bottom < position && position < top {
                return Ok(());
            }
            bottom = top;
        }
        Err(StackError::NoStraddlingLayer(position))
    }

    /// Collapse the oxide stack to the minimum number of interfaces still
    /// able to attach every metal.
    ///
    /// Standardizes first if needed, then walks the metals bottom-to-top
    /// and merges every run of two or more oxide layers between successive
    /// metal attachments (and above the last one). Runs already at a
    /// single layer are left alone, so repeated calls are no-ops.
    pub fn simplify(&mut self) -> Result<(), StackError> {
        if !self.is_standard() {
            self.standardize()?;
        }

        let mut attachments: Vec<(f64, InterfaceId)> = Vec::new();
        for metal in &self.metal_layers {
            if let Some(bottom) = metal.bottom_interface {
                attachments.push((self.interface_position(bottom)?, bottom));
            }
        }
        attachments.sort_by(|a, b| a.0.total_cmp(&b.0));

        let interfaces_before = self.interfaces.len();
        let mut start = 0;
        for (_, bottom_id) in attachments {
            let index = self
                .interface_index(bottom_id)
                .ok_or(StackError::UnknownInterface(bottom_id))?;
            if index > start + 1 {
                self.merge_oxide_layers(start..index)?;
            }
            // the next run begins at the oxide directly above this
            // metal's attachment
            start = self
                .interface_index(bottom_id)
                .ok_or(StackError::UnknownInterface(bottom_id))?;
        }
        let end = self.oxide_layers.len();
        if end > start + 1 {
            self.merge_oxide_layers(start..end)?;
        }
        log::info!(
            "simplified stack from {interfaces_before} to {} interfaces",
            self.interfaces.len()
        );
        Ok(())
    }
}
