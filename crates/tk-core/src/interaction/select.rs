//! Select-mode pointer handling: handle steps, member grabs, box start

use glam::{Vec2, Vec3};

use super::input::Modifiers;
use super::state::{DragSession, InteractionState, LengthAdjustSession};
use super::Editor;
use crate::model::{Axis, LogicalIndex};
use crate::picking::{MemberHit, PickHit};

impl Editor {
    pub(super) fn select_pointer_down(&mut self, position: Vec2, modifiers: Modifiers) {
        let ray = self.ray_at(position);
        let handles = self.handles();
        let mesh = self.profile_mesh();

        match self.picking.pick(&ray, handles.as_ref(), &self.scene, &mesh) {
            PickHit::Handle { axis, point } => {
                if let (Some(handles), Some(index)) = (handles, self.selection.single()) {
                    self.handle_step(index, axis, handles.direction(axis), point);
                }
            }
            PickHit::Member(hit) => self.grab_member(&hit),
            PickHit::Plane { .. } | PickHit::Miss => self.begin_box_select(position, modifiers),
        }
    }

    /// One grid step along a handle, committed at once, then drag along it
    fn handle_step(&mut self, index: LogicalIndex, axis: Axis, direction: Vec3, grab: Vec3) {
        let prev = self.model().position(index);
        let next = prev + direction * self.snap.settings.step();
        if !self.apply(|m| m.with_position(index, next)) {
            tracing::debug!("Axis step on member {} ignored", index);
            return;
        }
        self.commit_move(index, prev, next, &format!("Axis {axis:?} step"));
        self.set_state(InteractionState::Drag(DragSession::along_axis(
            index, next, grab, axis, direction,
        )));
    }

    /// Body hit: select, then adjust length near an end face or drag elsewhere
    fn grab_member(&mut self, hit: &MemberHit) {
        let index = hit.index;
        let model = self.model();
        if model.is_locked(index) || model.is_deleted(index) {
            tracing::debug!("Member {} is locked, grab ignored", index);
            return;
        }

        let half = model.profile.length / 2.0;
        let tolerance = self.settings.length_tolerance;
        let z = hit.local_point.z;
        let end = if (z - half).abs() < tolerance {
            Some(Vec3::Z)
        } else if (z + half).abs() < tolerance {
            Some(Vec3::NEG_Z)
        } else {
            None
        };

        let state = match end {
            Some(local) => {
                let direction = model.instance_transform(index).transform_vector3(local);
                InteractionState::LengthAdjust(LengthAdjustSession::new(index, hit.point, direction))
            }
            None => InteractionState::Drag(DragSession::horizontal(
                index,
                model.position(index),
                hit.point,
            )),
        };

        self.selection.select_single(index);
        self.set_state(state);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::testing::*;
    use super::super::{DragConstraint, InteractionState};
    use crate::model::{Axis, LogicalIndex};

    #[test]
    fn test_body_grab_selects_and_drags() {
        let (mut editor, _) = editor(2);
        down(&mut editor, Vec3::new(100.0, 20.0, 30.0));
        assert_eq!(editor.selection().single(), Some(LogicalIndex(1)));
        match editor.state() {
            InteractionState::Drag(session) => {
                assert_eq!(session.index, LogicalIndex(1));
                assert_eq!(session.constraint, DragConstraint::Horizontal);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_end_face_grab_adjusts_length() {
        let (mut editor, _) = editor(1);
        down(&mut editor, Vec3::new(0.0, 20.0, -95.0));
        match editor.state() {
            InteractionState::LengthAdjust(session) => {
                assert_eq!(session.index, LogicalIndex(0));
                assert_eq!(session.direction, Vec3::NEG_Z);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locked_member_ignored() {
        let (mut editor, recorder) = editor(1);
        editor.select(LogicalIndex(0));
        editor.toggle_lock_selected();
        editor.clear_selection();

        down(&mut editor, Vec3::new(0.0, 20.0, 30.0));
        assert_eq!(editor.state(), &InteractionState::Select);
        assert!(editor.selection().is_empty());
        assert!(!editor.history().can_undo());
        assert!(recorder.positions().is_empty());
    }

    #[test]
    fn test_handle_step_commits_and_drags_along_axis() {
        let (mut editor, recorder) = editor(2);
        editor.select(LogicalIndex(0));

        // the X handle runs from the section centre to x = 120
        down(&mut editor, Vec3::new(60.0, 10.0, 0.0));
        assert_eq!(editor.model().position(LogicalIndex(0)), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(editor.history().len(), 1);
        assert_eq!(recorder.log_kinds(), vec!["move".to_string()]);
        assert_eq!(recorder.positions()[0].x, 10.0);
        match editor.state() {
            InteractionState::Drag(session) => {
                assert!(matches!(session.constraint, DragConstraint::Axis { axis: Axis::X, .. }));
                assert_eq!(session.start_offset, Vec3::new(10.0, 0.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }

        // releasing without motion adds nothing
        up(&mut editor);
        assert_eq!(editor.history().len(), 1);
        assert_eq!(recorder.positions().len(), 1);

        editor.undo();
        assert_eq!(editor.model().position(LogicalIndex(0)), Vec3::ZERO);
    }

    #[test]
    fn test_locked_handle_step_leaves_no_history() {
        let (mut editor, recorder) = editor(1);
        editor.select(LogicalIndex(0));
        editor.toggle_lock_selected();

        down(&mut editor, Vec3::new(60.0, 10.0, 0.0));
        assert_eq!(editor.model().position(LogicalIndex(0)), Vec3::ZERO);
        assert!(!editor.history().can_undo());
        assert!(recorder.log_kinds().is_empty());
        assert_eq!(editor.state(), &InteractionState::Select);
    }

    #[test]
    fn test_press_on_plane_starts_box() {
        let (mut editor, _) = editor(1);
        down(&mut editor, Vec3::new(50.0, 0.0, -40.0));
        assert!(matches!(editor.state(), InteractionState::BoxSelect(_)));
    }
}
