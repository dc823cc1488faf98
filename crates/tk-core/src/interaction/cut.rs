//! Cut tool: pick a target, then pick another member to confirm deletion

use glam::Vec2;

use super::Editor;
use super::state::InteractionState;

impl Editor {
    pub(super) fn cut_pointer_down(&mut self, position: Vec2) {
        let InteractionState::Cut { target } = self.state else {
            return;
        };
        let ray = self.ray_at(position);
        let mesh = self.profile_mesh();
        let Some(hit) = self.picking.pick_member(&ray, &self.scene, &mesh) else {
            tracing::debug!("Cut pick missed, still waiting");
            return;
        };
        if self.model().is_locked(hit.index) {
            tracing::debug!("Member {} is locked, cut pick ignored", hit.index);
            return;
        }

        match target {
            None => {
                self.selection.select_single(hit.index);
                self.set_state(InteractionState::Cut {
                    target: Some(hit.index),
                });
            }
            Some(target) if target == hit.index => {}
            Some(target) => {
                self.delete_member(target);
                self.set_state(InteractionState::Select);
            }
        }
    }
}
