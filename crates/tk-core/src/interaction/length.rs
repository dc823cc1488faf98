//! Length adjustment by dragging a member's end face

use glam::Vec2;

use super::Editor;
use super::state::InteractionState;
use crate::model::clamp_length;

impl Editor {
    pub(super) fn length_pointer_move(&mut self, position: Vec2) {
        let ray = self.ray_at(position);
        let InteractionState::LengthAdjust(session) = &mut self.state else {
            return;
        };
        if let Some(delta) = session.measure(&ray) {
            session.delta = delta;
            self.dirty = true;
        }
    }

    pub(super) fn length_pointer_up(&mut self) {
        let InteractionState::LengthAdjust(session) = self.take_state() else {
            return;
        };
        if session.delta > 0.0 {
            let length = clamp_length(session.delta);
            if self.apply(|m| m.with_length(length)) {
                tracing::info!("Member length set to {} mm", length);
                self.log(
                    "length",
                    "Adjust length",
                    serde_json::json!({ "length": length }),
                );
            }
        } else {
            tracing::debug!("Length adjust ignored: delta {} mm", session.delta);
        }
        self.set_state(InteractionState::Select);
    }
}
