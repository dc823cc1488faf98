//! Insert tool: place free members with snapping

use glam::Vec2;

use super::Editor;
use super::input::Modifiers;
use super::state::{InsertionSession, InteractionState};
use crate::config::AxisLock;
use crate::math::Plane;
use crate::model::FreeMember;
use crate::snap::{SnapInput, grid_snap_point, nearest_feature};

impl Editor {
    /// Start a session on the member batch first, the reference plane second.
    /// Existing members are never selected from here.
    pub(super) fn insert_pointer_down(&mut self, position: Vec2) {
        let ray = self.ray_at(position);
        let mesh = self.profile_mesh();
        let settings = &self.snap.settings;

        let (base, normal) = match self.picking.pick_member(&ray, &self.scene, &mesh) {
            Some(hit) if settings.snap_to_point => (nearest_feature(hit.point, hit.triangle), hit.normal),
            Some(hit) => (grid_snap_point(hit.point, settings.snap_size), hit.normal),
            None => match self.picking.reference_plane.intersect(&ray) {
                Some(point) => (
                    grid_snap_point(point, settings.snap_size),
                    self.picking.reference_plane.plane.normal,
                ),
                None => {
                    tracing::debug!("Insert press hit nothing");
                    return;
                }
            },
        };

        let session = InsertionSession::new(base, Plane::new(base, normal), self.insert_yaw);
        self.set_state(InteractionState::Insert(Some(session)));
    }

    pub(super) fn insert_pointer_move(&mut self, position: Vec2, modifiers: Modifiers) {
        let ray = self.ray_at(position);
        let mesh = self.profile_mesh();
        let InteractionState::Insert(Some(session)) = &self.state else {
            return;
        };
        let settings = &self.snap.settings;

        let hit = if settings.snap_to_point && settings.axis_lock == AxisLock::Free {
            self.picking
                .pick_member(&ray, &self.scene, &mesh)
                .map(|hit| (hit.point, hit.triangle))
        } else {
            None
        };

        let raw = match settings.axis_lock {
            // vertical insert: camera-facing upright plane through the base
            AxisLock::LockY => {
                Plane::vertical_facing(session.base, self.camera.view_direction()).intersect(&ray)
            }
            _ => session.plane.intersect(&ray),
        };
        let Some(raw) = raw.or(hit.map(|(point, _)| point)) else {
            return;
        };

        let input = SnapInput {
            raw,
            base: session.base,
            hit,
            forward: modifiers.shift.then(|| session.forward()),
        };
        let candidate = self.snap.resolve(&input);

        if let InteractionState::Insert(Some(session)) = &mut self.state {
            session.place(candidate);
            self.dirty = true;
        }
    }

    /// Commit a free member at the preview pose; the tool stays active
    pub(super) fn insert_pointer_up(&mut self) {
        let InteractionState::Insert(Some(session)) = self.take_state() else {
            return;
        };
        let pose = session.preview;
        let member = FreeMember::new(pose.position, session.yaw, pose.orientation);
        if self.apply(|m| m.with_free_member_added(member)) {
            tracing::info!("Inserted member at {:?}", pose.position);
            self.log(
                "insert",
                "Insert member",
                serde_json::json!({ "x": pose.position.x, "y": pose.position.y, "z": pose.position.z }),
            );
        }
        self.set_state(InteractionState::Insert(None));
    }

    /// Space: quarter turn for the current and following insertions
    pub(super) fn rotate_insert_yaw(&mut self) {
        self.insert_yaw = (self.insert_yaw + 90.0).rem_euclid(360.0);
        let yaw = self.insert_yaw;
        if let InteractionState::Insert(Some(session)) = &mut self.state {
            session.set_yaw(yaw);
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::super::testing::*;
    use super::super::{InteractionState, Key, Readout, Tool};
    use crate::config::AxisLock;

    #[test]
    fn test_insert_commits_free_member() {
        let (mut editor, recorder) = editor(1);
        editor.set_tool(Tool::Insert);

        down(&mut editor, Vec3::new(203.0, 0.0, 98.0));
        match editor.state() {
            InteractionState::Insert(Some(session)) => {
                assert_eq!(session.base, Vec3::new(200.0, 0.0, 100.0));
            }
            other => panic!("unexpected {other:?}"),
        }

        move_to(&mut editor, Vec3::new(263.0, 0.0, 104.0));
        match editor.readout() {
            Some(Readout::Insert { distance, heading }) => {
                assert_relative_eq!(distance, 60.0, epsilon = 1e-3);
                assert_relative_eq!(heading, 90.0, epsilon = 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }

        up(&mut editor);
        let members = editor.model().free_members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].position, Vec3::new(260.0, 0.0, 100.0));
        let forward = members[0].orientation * Vec3::Z;
        assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
        assert_eq!(editor.state(), &InteractionState::Insert(None));
        assert_eq!(recorder.log_kinds(), vec!["insert".to_string()]);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_space_turns_preview() {
        let (mut editor, _) = editor(1);
        editor.set_tool(Tool::Insert);
        key(&mut editor, Key::Space);
        assert_eq!(editor.insert_yaw(), 90.0);

        down(&mut editor, Vec3::new(200.0, 0.0, 100.0));
        key(&mut editor, Key::Space);
        up(&mut editor);
        assert_eq!(editor.model().free_members()[0].yaw, 180.0);

        for _ in 0..2 {
            key(&mut editor, Key::Space);
        }
        assert_eq!(editor.insert_yaw(), 0.0);
    }

    #[test]
    fn test_press_on_member_does_not_select() {
        let (mut editor, _) = editor(1);
        editor.set_tool(Tool::Insert);
        down(&mut editor, Vec3::new(0.0, 20.0, 30.0));
        assert!(editor.selection().is_empty());
        match editor.state() {
            InteractionState::Insert(Some(session)) => {
                assert_eq!(session.base, Vec3::new(0.0, 20.0, 30.0));
                assert_relative_eq!(session.plane.normal.y, 1.0, epsilon = 1e-5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_axis_lock_keeps_base_coordinates() {
        let (mut editor, _) = editor(1);
        editor.set_axis_lock(AxisLock::LockX);
        editor.set_tool(Tool::Insert);
        down(&mut editor, Vec3::new(200.0, 0.0, 100.0));
        move_to(&mut editor, Vec3::new(247.0, 0.0, 171.0));
        up(&mut editor);
        assert_eq!(editor.model().free_members()[0].position, Vec3::new(250.0, 0.0, 100.0));
    }

    #[test]
    fn test_enter_leaves_insert() {
        let (mut editor, _) = editor(1);
        editor.set_tool(Tool::Insert);
        down(&mut editor, Vec3::new(200.0, 0.0, 100.0));
        key(&mut editor, Key::Enter);
        assert_eq!(editor.state(), &InteractionState::Select);
        assert!(editor.model().free_members().is_empty());
    }
}
