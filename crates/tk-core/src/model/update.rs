//! Pure update functions
//!
//! Each function returns the successor snapshot, or `None` when the change is
//! refused (locked cell, unknown index) or would not change anything.

use glam::Vec3;
use uuid::Uuid;

use super::params::clamp_length;
use super::{
    ArrayModel, ArraySpec, Axis, FreeMember, InstanceOverride, LogicalIndex, PlateSpec,
    ProfileParams, SideHole,
};

impl ArrayModel {
    /// Edit one cell's override, creating it on first use
    fn edit(
        &self,
        index: LogicalIndex,
        f: impl FnOnce(&mut InstanceOverride),
    ) -> Option<ArrayModel> {
        if !self.contains(index) {
            return None;
        }
        let current = self.override_of(index).cloned().unwrap_or_default();
        let mut edited = current.clone();
        f(&mut edited);
        if edited == current {
            return None;
        }
        let mut next = self.successor();
        next.overrides.insert(index, edited);
        Some(next)
    }

    /// Set a cell's position offset. Locked cells are left untouched.
    pub fn with_position(&self, index: LogicalIndex, position: Vec3) -> Option<ArrayModel> {
        if self.is_locked(index) {
            return None;
        }
        self.edit(index, |o| o.position = position)
    }

    /// Set a cell's Euler rotation in degrees. Locked cells are left untouched.
    pub fn with_rotation(&self, index: LogicalIndex, degrees: Vec3) -> Option<ArrayModel> {
        if self.is_locked(index) {
            return None;
        }
        self.edit(index, |o| o.rotation = degrees)
    }

    /// Add `degrees` to one Euler angle, normalised into [0, 360)
    pub fn with_rotation_step(
        &self,
        index: LogicalIndex,
        axis: Axis,
        degrees: f32,
    ) -> Option<ArrayModel> {
        let mut rotation = self.rotation(index);
        let angle = match axis {
            Axis::X => &mut rotation.x,
            Axis::Y => &mut rotation.y,
            Axis::Z => &mut rotation.z,
        };
        *angle = (*angle + degrees).rem_euclid(360.0);
        self.with_rotation(index, rotation)
    }

    pub fn with_locked(&self, index: LogicalIndex, locked: bool) -> Option<ArrayModel> {
        self.edit(index, |o| o.locked = locked)
    }

    pub fn with_lock_toggled(&self, index: LogicalIndex) -> Option<ArrayModel> {
        self.with_locked(index, !self.is_locked(index))
    }

    /// Soft-delete a cell. The override stays so history remains valid.
    pub fn with_deleted(&self, index: LogicalIndex) -> Option<ArrayModel> {
        if self.is_locked(index) {
            return None;
        }
        self.edit(index, |o| o.deleted = true)
    }

    pub fn with_restored(&self, index: LogicalIndex) -> Option<ArrayModel> {
        self.edit(index, |o| o.deleted = false)
    }

    pub fn with_axis_holes(&self, index: LogicalIndex, enabled: bool) -> Option<ArrayModel> {
        self.edit(index, |o| o.has_axis_holes = enabled)
    }

    /// Append a side hole; offset is clamped onto the member, diameter onto
    /// what fits inside the face.
    pub fn with_side_hole_added(&self, index: LogicalIndex, hole: SideHole) -> Option<ArrayModel> {
        // Left/right faces span the section height, top/bottom its width
        let face_width = if hole.face.normal().x.abs() > 0.5 {
            self.profile.height
        } else {
            self.profile.width
        };
        let hole = SideHole {
            offset: hole.offset.clamp(0.0, self.profile.length),
            diameter: hole.diameter.clamp(0.5, face_width),
            ..hole
        };
        self.edit(index, |o| o.side_holes.push(hole))
    }

    pub fn with_side_hole_removed(&self, index: LogicalIndex, hole: usize) -> Option<ArrayModel> {
        if self.override_of(index)?.side_holes.len() <= hole {
            return None;
        }
        self.edit(index, |o| {
            o.side_holes.remove(hole);
        })
    }

    /// Replace the shared profile, clamping every dimension
    pub fn with_profile(&self, profile: &ProfileParams) -> Option<ArrayModel> {
        let profile = profile.clamped();
        if profile == self.profile {
            return None;
        }
        let mut next = self.successor();
        next.profile = profile;
        Some(next)
    }

    /// Set the shared member length, clamped to the editable range
    pub fn with_length(&self, length: f32) -> Option<ArrayModel> {
        self.with_profile(&ProfileParams {
            length: clamp_length(length),
            ..self.profile.clone()
        })
    }

    /// Change grid size and spacing.
    ///
    /// The grid only grows. `count_y` is the index stride, so it can only
    /// change while no cell carries an override; otherwise the existing value
    /// is kept.
    pub fn with_array(&self, array: ArraySpec) -> Option<ArrayModel> {
        let requested = array.clamped();
        let current = self.array;
        let count_y = if self.overrides.is_empty() {
            requested.count_y.max(current.count_y)
        } else {
            current.count_y
        };
        let array = ArraySpec {
            count_x: requested.count_x.max(current.count_x),
            count_y,
            ..requested
        };
        if array == current {
            return None;
        }
        let mut next = self.successor();
        next.array = array;
        Some(next)
    }

    pub fn with_free_member_added(&self, member: FreeMember) -> Option<ArrayModel> {
        let mut next = self.successor();
        next.free_members.push(member);
        Some(next)
    }

    pub fn with_free_member_removed(&self, id: Uuid) -> Option<ArrayModel> {
        let position = self.free_members.iter().position(|m| m.id == id)?;
        let mut next = self.successor();
        next.free_members.remove(position);
        Some(next)
    }

    pub fn with_plate(&self, plate: Option<PlateSpec>) -> Option<ArrayModel> {
        if plate == self.plate {
            return None;
        }
        let mut next = self.successor();
        next.plate = plate;
        Some(next)
    }
}
