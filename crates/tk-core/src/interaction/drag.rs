//! Dragging a member, freely on the ground plane or along one handle axis

use glam::Vec2;

use super::Editor;
use super::state::InteractionState;

impl Editor {
    pub(super) fn drag_pointer_move(&mut self, position: Vec2) {
        let InteractionState::Drag(session) = &self.state else {
            return;
        };
        let ray = self.ray_at(position);
        let Some(offset) = session.offset_for(&ray, self.camera.view_direction()) else {
            return;
        };
        let index = session.index;
        // live update only; history is written on release
        self.apply(|m| m.with_position(index, offset));
    }

    pub(super) fn drag_pointer_up(&mut self) {
        let InteractionState::Drag(session) = self.take_state() else {
            return;
        };
        let index = session.index;
        let next = self.model().position(index);
        if next != session.start_offset {
            self.commit_move(index, session.start_offset, next, "Moved member");
            tracing::debug!("Member {} moved to {:?}", index, next);
        }
        self.set_state(InteractionState::Select);
    }
}
