//! Screen-space rubber-band selection

use glam::{Vec2, Vec3};

use super::Editor;
use super::input::Modifiers;
use super::state::{BoxSelectSession, InteractionState};
use crate::model::LogicalIndex;
use crate::selection::SelectionModifier;

impl Editor {
    pub(super) fn begin_box_select(&mut self, position: Vec2, modifiers: Modifiers) {
        let session =
            BoxSelectSession::new(position, modifiers.selection_modifier(), self.selection.clone());
        self.set_state(InteractionState::BoxSelect(session));
    }

    pub(super) fn box_pointer_move(&mut self, position: Vec2) {
        let threshold = self.settings.box_select_threshold;
        let InteractionState::BoxSelect(session) = &mut self.state else {
            return;
        };
        session.current = position;
        if !session.active && session.start.distance(position) > threshold {
            session.active = true;
        }
        if session.active {
            let session = session.clone();
            self.apply_box(&session);
        }
    }

    pub(super) fn box_pointer_up(&mut self) {
        let InteractionState::BoxSelect(session) = self.take_state() else {
            return;
        };
        if session.active {
            self.apply_box(&session);
        } else if session.modifier == SelectionModifier::Replace {
            // plain click on empty space
            self.selection.clear();
        }
        self.set_state(InteractionState::Select);
    }

    /// Combine the members inside the rectangle with the selection from before the gesture
    fn apply_box(&mut self, session: &BoxSelectSession) {
        let candidates = self.members_in_box(session);
        let mut selection = session.prior.clone();
        selection.combine(candidates, session.modifier);
        self.selection = selection;
        self.dirty = true;
    }

    /// Active members whose projected section centre lies inside the rectangle
    fn members_in_box(&self, session: &BoxSelectSession) -> Vec<LogicalIndex> {
        let batch = self.scene.batch();
        let centre = Vec3::new(0.0, batch.profile.height / 2.0, 0.0);
        batch
            .transforms
            .iter()
            .zip(&batch.index_map)
            .filter_map(|(transform, index)| {
                let screen = self
                    .camera
                    .world_to_screen(transform.transform_point3(centre), self.viewport)?;
                session.contains(screen).then_some(*index)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::testing::*;
    use super::super::{InteractionState, Modifiers};
    use crate::model::LogicalIndex;

    fn ids(values: &[u32]) -> Vec<LogicalIndex> {
        values.iter().map(|v| LogicalIndex(*v)).collect()
    }

    /// Box around members 1 and 2 of a three-member row
    fn drag_box(editor: &mut super::Editor, modifiers: Modifiers) {
        down_with(editor, Vec3::new(50.0, 0.0, -40.0), modifiers);
        move_to(editor, Vec3::new(250.0, 0.0, 40.0));
        up(editor);
    }

    #[test]
    fn test_plain_box_replaces() {
        let (mut editor, _) = editor(3);
        editor.select(LogicalIndex(0));
        drag_box(&mut editor, Modifiers::NONE);
        assert_eq!(editor.selection().indices(), ids(&[1, 2]));
        assert_eq!(editor.state(), &InteractionState::Select);
    }

    #[test]
    fn test_ctrl_box_unions() {
        let (mut editor, _) = editor(3);
        editor.select(LogicalIndex(0));
        drag_box(&mut editor, Modifiers::ctrl());
        assert_eq!(editor.selection().indices(), ids(&[0, 1, 2]));
    }

    #[test]
    fn test_alt_box_subtracts() {
        let (mut editor, _) = editor(3);
        editor.select_all();
        drag_box(&mut editor, Modifiers::alt());
        assert_eq!(editor.selection().single(), Some(LogicalIndex(0)));
    }

    #[test]
    fn test_shift_box_toggles() {
        let (mut editor, _) = editor(3);
        editor.select_many(ids(&[0, 1]));
        drag_box(&mut editor, Modifiers::shift());
        assert_eq!(editor.selection().indices(), ids(&[0, 2]));
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let (mut editor, _) = editor(3);
        editor.select(LogicalIndex(1));
        down(&mut editor, Vec3::new(50.0, 0.0, -40.0));
        up(&mut editor);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_modified_click_keeps_selection() {
        let (mut editor, _) = editor(3);
        editor.select(LogicalIndex(1));
        down_with(&mut editor, Vec3::new(50.0, 0.0, -40.0), Modifiers::ctrl());
        up(&mut editor);
        assert_eq!(editor.selection().single(), Some(LogicalIndex(1)));
    }

    #[test]
    fn test_deleted_members_never_boxed() {
        let (mut editor, _) = editor(3);
        editor.select(LogicalIndex(2));
        editor.delete_selected();
        drag_box(&mut editor, Modifiers::NONE);
        assert_eq!(editor.selection().indices(), ids(&[1]));
    }
}
