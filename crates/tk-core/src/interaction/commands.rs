//! Commands issued by toolbars, panels and shortcuts

use glam::Vec3;
use uuid::Uuid;

use super::Editor;
use crate::config::{AxisLock, HoleSettings, SnapSettings};
use crate::model::{ArraySpec, Axis, LogicalIndex, PlateSpec, ProfileParams, SideHole};

impl Editor {
    /// Revert the latest committed move. Returns `false` when history is
    /// empty or the member it touched is locked; the entry then stays put.
    pub fn undo(&mut self) -> bool {
        let Some(&entry) = self.history.peek_undo() else {
            return false;
        };
        if self.model().is_locked(entry.index) {
            tracing::debug!("Undo blocked, member {} is locked", entry.index);
            return false;
        }
        self.history.undo();
        if !self.apply(|m| m.with_position(entry.index, entry.prev)) {
            tracing::debug!("Undo on member {} had no effect", entry.index);
        }
        self.dirty = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(&entry) = self.history.peek_redo() else {
            return false;
        };
        if self.model().is_locked(entry.index) {
            tracing::debug!("Redo blocked, member {} is locked", entry.index);
            return false;
        }
        self.history.redo();
        if !self.apply(|m| m.with_position(entry.index, entry.next)) {
            tracing::debug!("Redo on member {} had no effect", entry.index);
        }
        self.dirty = true;
        true
    }

    /// Move one member by `delta` as a single committed step
    pub fn nudge(&mut self, index: LogicalIndex, delta: Vec3) -> bool {
        let prev = self.model().position(index);
        let next = prev + delta;
        if !self.apply(|m| m.with_position(index, next)) {
            return false;
        }
        self.commit_move(index, prev, next, "Nudged member");
        true
    }

    pub fn select(&mut self, index: LogicalIndex) {
        if self.model().is_active(index) {
            self.selection.select_single(index);
            self.dirty = true;
        }
    }

    pub fn select_many(&mut self, indices: impl IntoIterator<Item = LogicalIndex>) {
        let model = self.store.get();
        let active: Vec<LogicalIndex> = indices.into_iter().filter(|i| model.is_active(*i)).collect();
        self.selection.select_many(active);
        self.dirty = true;
    }

    pub fn select_all(&mut self) {
        let active: Vec<LogicalIndex> = self.model().active_indices().collect();
        self.selection.select_many(active);
        self.dirty = true;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.dirty = true;
    }

    /// Soft-delete one member. Locked members stay.
    pub fn delete_member(&mut self, index: LogicalIndex) -> bool {
        if !self.apply(|m| m.with_deleted(index)) {
            tracing::debug!("Member {} not deleted", index);
            return false;
        }
        tracing::info!("Deleted member {}", index);
        self.log(
            "delete",
            "Delete member",
            serde_json::json!({ "index": index.0 }),
        );
        let model = self.store.get();
        self.selection.retain(|i| model.is_active(i));
        true
    }

    /// Soft-delete every selected member that is not locked; returns how many went
    pub fn delete_selected(&mut self) -> usize {
        self.selection
            .indices()
            .into_iter()
            .filter(|index| self.delete_member(*index))
            .count()
    }

    pub fn restore(&mut self, index: LogicalIndex) -> bool {
        self.apply(|m| m.with_restored(index))
    }

    pub fn toggle_lock_selected(&mut self) {
        for index in self.selection.indices() {
            self.apply(|m| m.with_lock_toggled(index));
        }
    }

    /// Add `degrees` about one axis to every selected member
    pub fn rotate_selected(&mut self, axis: Axis, degrees: f32) {
        for index in self.selection.indices() {
            self.apply(|m| m.with_rotation_step(index, axis, degrees));
        }
    }

    pub fn set_axis_holes(&mut self, enabled: bool) {
        for index in self.selection.indices() {
            self.apply(|m| m.with_axis_holes(index, enabled));
        }
    }

    /// Turn axis holes on for the whole selection unless all of it already has them
    pub fn toggle_axis_holes_selected(&mut self) {
        let model = self.store.get();
        let all_on = self
            .selection
            .indices()
            .into_iter()
            .all(|i| model.override_of(i).is_some_and(|o| o.has_axis_holes));
        self.set_axis_holes(!all_on);
    }

    pub fn add_side_hole(&mut self, index: LogicalIndex, hole: SideHole) -> bool {
        self.apply(|m| m.with_side_hole_added(index, hole))
    }

    pub fn remove_side_hole(&mut self, index: LogicalIndex, hole: usize) -> bool {
        self.apply(|m| m.with_side_hole_removed(index, hole))
    }

    pub fn set_profile(&mut self, profile: &ProfileParams) -> bool {
        self.apply(|m| m.with_profile(profile))
    }

    pub fn set_length(&mut self, length: f32) -> bool {
        self.apply(|m| m.with_length(length))
    }

    pub fn set_array(&mut self, array: ArraySpec) -> bool {
        self.apply(|m| m.with_array(array))
    }

    pub fn set_plate(&mut self, plate: Option<PlateSpec>) -> bool {
        self.apply(|m| m.with_plate(plate))
    }

    pub fn remove_free_member(&mut self, id: Uuid) -> bool {
        self.apply(|m| m.with_free_member_removed(id))
    }

    /// Point the camera at everything in the scene
    pub fn frame_all(&mut self) {
        let bounds = self.scene.batch().bounds();
        self.camera.fit_bounds(&bounds);
        self.dirty = true;
    }

    pub fn set_snap_settings(&mut self, settings: SnapSettings) {
        self.settings.snap = settings.clone();
        self.snap.settings = settings;
    }

    pub fn set_axis_lock(&mut self, lock: AxisLock) {
        self.settings.snap.axis_lock = lock;
        self.snap.settings.axis_lock = lock;
    }

    pub fn set_hole_settings(&mut self, holes: HoleSettings) {
        self.settings.holes = holes.clone();
        self.scene.set_hole_settings(holes);
        self.scene.sync(self.store.get());
        self.dirty = true;
    }
}
