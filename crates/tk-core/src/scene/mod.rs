//! Scene derivation
//!
//! Turns an [`ArrayModel`] snapshot into a render-ready [`SceneBatch`]: one
//! transform per active member packed into consecutive slots, the slot →
//! [`LogicalIndex`] map, hole markers, free members and the plate. The
//! derivation is pure; [`SceneSynchronizer`] caches the last batch and owns
//! the reverse map used by picking.

mod holes;

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::config::HoleSettings;
use crate::math::BoundingBox;
use crate::model::{ArrayModel, Face, LogicalIndex, PlateSpec, ProfileParams};

pub use holes::{axis_hole_offsets, member_markers};

/// Visual marker for a drilled hole. Never part of an exported solid.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleMarker {
    /// Member carrying the hole
    pub index: LogicalIndex,
    pub face: Face,
    /// Unit marker cylinder → world, scale included
    pub transform: Mat4,
    /// World-space centre
    pub center: Vec3,
    /// World-space drilling direction (unit)
    pub axis: Vec3,
    pub diameter: f32,
    pub depth: f32,
}

/// Everything the renderer needs for one frame of the layout
#[derive(Debug, Clone, Default)]
pub struct SceneBatch {
    /// Unique per rebuild; the apply step skips uploads it has already seen
    pub revision: u64,
    /// Snapshot revision this batch was derived from
    pub model_revision: u64,
    pub profile: ProfileParams,
    /// Member transforms, one per active cell, in enumeration order
    pub transforms: Vec<Mat4>,
    /// `index_map[slot]` is the cell drawn in that slot
    pub index_map: Vec<LogicalIndex>,
    pub markers: Vec<HoleMarker>,
    pub free_transforms: Vec<Mat4>,
    pub plate: Option<PlateSpec>,
}

impl SceneBatch {
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// World bounds of members, free members and plate
    pub fn bounds(&self) -> BoundingBox {
        let hw = self.profile.width / 2.0;
        let hl = self.profile.length / 2.0;
        let local = BoundingBox::new(
            Vec3::new(-hw, 0.0, -hl),
            Vec3::new(hw, self.profile.height, hl),
        );
        let mut bounds = self
            .transforms
            .iter()
            .chain(&self.free_transforms)
            .fold(BoundingBox::empty(), |acc, m| acc.union(&local.transform(m)));
        if let Some(plate) = &self.plate {
            bounds = bounds
                .expand_to_include(Vec3::new(-plate.width / 2.0, -plate.thickness, -plate.height / 2.0))
                .expand_to_include(Vec3::new(plate.width / 2.0, 0.0, plate.height / 2.0));
        }
        bounds
    }
}

/// Pure derivation of a batch from a snapshot
pub fn derive(model: &ArrayModel, holes: &HoleSettings) -> SceneBatch {
    let active: Vec<LogicalIndex> = model.active_indices().collect();
    let mut transforms = Vec::with_capacity(active.len());
    let mut markers = Vec::new();

    for &index in &active {
        let transform = model.instance_transform(index);
        if let Some(ov) = model.override_of(index) {
            markers.extend(member_markers(index, ov, &model.profile, holes, &transform));
        }
        transforms.push(transform);
    }

    SceneBatch {
        revision: 0,
        model_revision: model.revision(),
        profile: model.profile.clone(),
        transforms,
        index_map: active,
        markers,
        free_transforms: model.free_members().iter().map(|m| m.transform()).collect(),
        plate: model.plate().cloned(),
    }
}

/// Caches the derived batch and maintains the slot ↔ index map
#[derive(Debug)]
pub struct SceneSynchronizer {
    holes: HoleSettings,
    batch: Arc<SceneBatch>,
    slots: HashMap<LogicalIndex, usize>,
    synced_revision: Option<u64>,
    next_revision: u64,
}

impl SceneSynchronizer {
    pub fn new(holes: HoleSettings) -> Self {
        Self {
            holes,
            batch: Arc::new(SceneBatch::default()),
            slots: HashMap::new(),
            synced_revision: None,
            next_revision: 1,
        }
    }

    /// Rebuild if the snapshot changed since the last sync.
    ///
    /// Returns `true` when a new batch was produced.
    pub fn sync(&mut self, model: &ArrayModel) -> bool {
        if self.synced_revision == Some(model.revision()) {
            return false;
        }
        self.rebuild(model);
        true
    }

    /// Unconditional rebuild
    pub fn rebuild(&mut self, model: &ArrayModel) {
        let mut batch = derive(model, &self.holes);
        batch.revision = self.next_revision;
        self.next_revision += 1;

        self.slots = batch
            .index_map
            .iter()
            .enumerate()
            .map(|(slot, index)| (*index, slot))
            .collect();
        self.synced_revision = Some(model.revision());
        tracing::debug!(
            "Scene rebuilt: {} members, {} markers (batch {})",
            batch.len(),
            batch.markers.len(),
            batch.revision
        );
        self.batch = Arc::new(batch);
    }

    pub fn batch(&self) -> &SceneBatch {
        &self.batch
    }

    pub fn shared_batch(&self) -> Arc<SceneBatch> {
        Arc::clone(&self.batch)
    }

    /// Render slot currently drawing `index`
    pub fn slot_of(&self, index: LogicalIndex) -> Option<usize> {
        self.slots.get(&index).copied()
    }

    /// Cell drawn in `slot`
    pub fn index_at(&self, slot: usize) -> Option<LogicalIndex> {
        self.batch.index_map.get(slot).copied()
    }

    pub fn hole_settings(&self) -> &HoleSettings {
        &self.holes
    }

    /// Change marker layout; the next sync rebuilds
    pub fn set_hole_settings(&mut self, holes: HoleSettings) {
        self.holes = holes;
        self.synced_revision = None;
    }
}

impl Default for SceneSynchronizer {
    fn default() -> Self {
        Self::new(HoleSettings::default())
    }
}
