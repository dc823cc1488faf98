//! Scene batch packing
//!
//! Pure conversion from a [`SceneBatch`] plus the current selection into the
//! instance arrays the GPU draws. Nothing here touches wgpu, so it is tested
//! without a device.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use tk_core::{SceneBatch, SelectionSet};

use crate::constants::{PLATE_HOLE_MARGIN, colors};

/// One drawn solid: world transform and color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SolidInstance {
    /// Column-major mesh → world transform
    pub transform: [[f32; 4]; 4],
    /// Linear RGBA
    pub color: [f32; 4],
}

impl SolidInstance {
    /// Instance for `transform` painted `color`
    pub fn new(transform: &Mat4, color: [f32; 4]) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color,
        }
    }
}

/// Instance data for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBatch {
    /// Grid members in slot order
    pub members: Vec<SolidInstance>,
    /// Inserted members
    pub free_members: Vec<SolidInstance>,
    /// Unit-cylinder markers: member holes then plate holes
    pub markers: Vec<SolidInstance>,
    /// Base plate; its mesh is already in world space
    pub plate: Option<SolidInstance>,
}

impl PackedBatch {
    /// Members followed by free members, the order they share one buffer in
    pub fn solids(&self) -> Vec<SolidInstance> {
        let mut solids = Vec::with_capacity(self.members.len() + self.free_members.len());
        solids.extend_from_slice(&self.members);
        solids.extend_from_slice(&self.free_members);
        solids
    }
}

/// Pack `batch`, tinting every selected slot
pub fn pack_batch(batch: &SceneBatch, selection: &SelectionSet) -> PackedBatch {
    let members = batch
        .transforms
        .iter()
        .enumerate()
        .map(|(slot, transform)| {
            let selected = batch
                .index_map
                .get(slot)
                .is_some_and(|index| selection.contains(*index));
            let color = if selected { colors::SELECTED } else { colors::MEMBER };
            SolidInstance::new(transform, color)
        })
        .collect();

    let free_members = batch
        .free_transforms
        .iter()
        .map(|transform| SolidInstance::new(transform, colors::FREE_MEMBER))
        .collect();

    let mut markers: Vec<SolidInstance> = batch
        .markers
        .iter()
        .map(|marker| SolidInstance::new(&marker.transform, colors::HOLE))
        .collect();

    let plate = batch.plate.as_ref().map(|plate| {
        let depth = plate.thickness + PLATE_HOLE_MARGIN;
        // The marker cylinder runs along Z; stand it upright through the plate
        let upright = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        for hole in &plate.holes {
            let transform = Mat4::from_scale_rotation_translation(
                Vec3::new(2.0 * hole.r, 2.0 * hole.r, depth),
                upright,
                Vec3::new(hole.x, -plate.thickness / 2.0, hole.y),
            );
            markers.push(SolidInstance::new(&transform, colors::PLATE_HOLE));
        }
        SolidInstance::new(&Mat4::IDENTITY, colors::PLATE)
    });

    PackedBatch {
        members,
        free_members,
        markers,
        plate,
    }
}

/// Order-independent fingerprint of the selection, used to skip re-uploads
pub fn selection_hash(selection: &SelectionSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    selection.indices().hash(&mut hasher);
    hasher.finish()
}
