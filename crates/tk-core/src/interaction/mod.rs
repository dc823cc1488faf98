//! Interaction state machine
//!
//! [`Editor`] owns the whole editing session: the model store, the derived
//! scene, history, selection, snapping, camera and collaborators. Input
//! arrives through [`Editor::handle`]; every handler runs synchronously and
//! rebuilds the scene before returning.
//!
//! ```text
//!            Select ──handle/body──▶ Drag ──up──▶ Select
//!              │  └──end face──▶ LengthAdjust ──up──▶ Select
//!              └──plane/miss──▶ BoxSelect ──up──▶ Select
//!  Insert(None) ──down──▶ Insert(Some) ──up──▶ Insert(None)
//!  Cut{None} ──pick──▶ Cut{Some} ──pick other──▶ Select
//! ```

mod box_select;
mod commands;
mod cut;
mod drag;
mod input;
mod insert;
mod length;
mod select;
mod state;

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::collab::{Collaborators, LogEntry, NullCollaborators, PositionRecord};
use crate::config::EditorSettings;
use crate::constants::POSITIONS_GROUP;
use crate::geometry::{GeometryFactory, TriangleMesh};
use crate::history::{HistoryEntry, HistoryManager};
use crate::math::Ray;
use crate::model::{ArrayModel, Axis, LogicalIndex, ModelStore};
use crate::picking::{AxisHandles, PickingEngine, ReferencePlane};
use crate::scene::{SceneBatch, SceneSynchronizer};
use crate::selection::SelectionSet;
use crate::snap::SnapResolver;

pub use input::{InputEvent, Key, Modifiers, Tool};
pub use state::{
    BoxSelectSession, DragConstraint, DragSession, InsertionSession, InteractionState,
    LengthAdjustSession, PreviewPose, Readout, insert_orientation,
};

/// Interactive layout session
pub struct Editor {
    store: ModelStore,
    scene: SceneSynchronizer,
    geometry: GeometryFactory,
    history: HistoryManager,
    selection: SelectionSet,
    picking: PickingEngine,
    snap: SnapResolver,
    settings: EditorSettings,
    camera: Camera,
    viewport: Vec2,
    collaborators: Box<dyn Collaborators>,
    state: InteractionState,
    /// Yaw increment carried into the next insertion (degrees)
    insert_yaw: f32,
    dirty: bool,
}

impl Editor {
    pub fn new(model: ArrayModel, settings: EditorSettings) -> Self {
        let viewport = Vec2::new(1280.0, 720.0);
        let mut scene = SceneSynchronizer::new(settings.holes.clone());
        scene.sync(&model);

        Self {
            store: ModelStore::new(model),
            scene,
            geometry: GeometryFactory::new(),
            history: HistoryManager::new(settings.history_limit),
            selection: SelectionSet::new(),
            picking: PickingEngine::new(ReferencePlane {
                half_extent: settings.reference_plane_half_extent,
                ..Default::default()
            }),
            snap: SnapResolver::new(settings.snap.clone()),
            camera: Camera::new(viewport.x / viewport.y),
            viewport,
            collaborators: Box::new(NullCollaborators),
            state: InteractionState::Select,
            insert_yaw: 0.0,
            dirty: true,
            settings,
        }
    }

    pub fn with_collaborators(mut self, collaborators: impl Collaborators + 'static) -> Self {
        self.collaborators = Box::new(collaborators);
        self
    }

    pub fn set_collaborators(&mut self, collaborators: Box<dyn Collaborators>) {
        self.collaborators = collaborators;
    }

    pub fn model(&self) -> &ArrayModel {
        self.store.get()
    }

    pub fn snapshot(&self) -> Arc<ArrayModel> {
        self.store.snapshot()
    }

    /// Register a callback for every new snapshot
    pub fn subscribe(&mut self, subscriber: impl FnMut(&ArrayModel) + 'static) {
        self.store.subscribe(subscriber);
    }

    pub fn scene(&self) -> &SceneSynchronizer {
        &self.scene
    }

    pub fn batch(&self) -> Arc<SceneBatch> {
        self.scene.shared_batch()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> Tool {
        self.state.tool()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera access for orbit/pan/zoom; schedules a redraw
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.dirty = true;
        &mut self.camera
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.camera.update_aspect(self.viewport.x / self.viewport.y);
        self.dirty = true;
    }

    /// Yaw increment the next insertion starts with
    pub fn insert_yaw(&self) -> f32 {
        self.insert_yaw
    }

    /// Shared member mesh for the current profile
    pub fn profile_mesh(&mut self) -> Arc<TriangleMesh> {
        self.geometry.profile_mesh(&self.store.get().profile)
    }

    pub fn geometry(&mut self) -> &mut GeometryFactory {
        &mut self.geometry
    }

    /// Returns whether anything changed since the last call and clears the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Axis handles of the single selected member, shown in Select only
    pub fn handles(&self) -> Option<AxisHandles> {
        if !matches!(self.state, InteractionState::Select) {
            return None;
        }
        let index = self.selection.single()?;
        let model = self.model();
        model.is_active(index).then(|| {
            AxisHandles::for_member(
                &model.instance_transform(index),
                &model.profile,
                &self.settings.handle,
            )
        })
    }

    /// Measurement for the gesture in progress
    pub fn readout(&self) -> Option<Readout> {
        match &self.state {
            InteractionState::Insert(Some(session)) => Some(Readout::Insert {
                distance: session.preview.distance,
                heading: session.preview.heading,
            }),
            InteractionState::LengthAdjust(session) => Some(Readout::Length(session.readout())),
            _ => None,
        }
    }

    /// Replace the whole model (project load). History and selection refer to
    /// the old layout and are dropped.
    pub fn load_model(&mut self, model: ArrayModel) {
        self.cancel();
        self.store.replace(model);
        self.scene.sync(self.store.get());
        self.history.clear();
        self.selection.clear();
        self.dirty = true;
    }

    /// Feed one input event
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers),
            InputEvent::PointerMove {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Key { key, modifiers } => self.key(key, modifiers),
        }
    }

    /// Switch tools, discarding any gesture in progress
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel();
        let state = match tool {
            Tool::Select => InteractionState::Select,
            Tool::Insert => InteractionState::Insert(None),
            Tool::Cut => InteractionState::Cut { target: None },
        };
        self.set_state(state);
    }

    fn pointer_down(&mut self, position: Vec2, modifiers: Modifiers) {
        match &self.state {
            InteractionState::Select => self.select_pointer_down(position, modifiers),
            InteractionState::Insert(_) => self.insert_pointer_down(position),
            InteractionState::Cut { .. } => self.cut_pointer_down(position),
            state => tracing::debug!("Pointer down ignored during {}", state.name()),
        }
    }

    fn pointer_move(&mut self, position: Vec2, modifiers: Modifiers) {
        match &self.state {
            InteractionState::Insert(Some(_)) => self.insert_pointer_move(position, modifiers),
            InteractionState::LengthAdjust(_) => self.length_pointer_move(position),
            InteractionState::Drag(_) => self.drag_pointer_move(position),
            InteractionState::BoxSelect(_) => self.box_pointer_move(position),
            _ => {}
        }
    }

    fn pointer_up(&mut self) {
        match &self.state {
            InteractionState::Insert(Some(_)) => self.insert_pointer_up(),
            InteractionState::LengthAdjust(_) => self.length_pointer_up(),
            InteractionState::Drag(_) => self.drag_pointer_up(),
            InteractionState::BoxSelect(_) => self.box_pointer_up(),
            _ => {}
        }
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) {
        match key {
            Key::Escape => self.set_tool(Tool::Select),
            Key::Enter => {
                if matches!(self.state, InteractionState::Insert(_)) {
                    self.set_tool(Tool::Select);
                }
            }
            Key::Space => {
                if matches!(self.state, InteractionState::Insert(_)) {
                    self.rotate_insert_yaw();
                }
            }
            // gestures in progress only react to Escape
            _ if !self.state.is_idle() => {}
            Key::Delete => {
                if matches!(self.state, InteractionState::Select) {
                    self.delete_selected();
                }
            }
            Key::Char(c) => match (c.to_ascii_lowercase(), modifiers.ctrl) {
                ('z', true) if modifiers.shift => {
                    self.redo();
                }
                ('z', true) => {
                    self.undo();
                }
                ('y', true) => {
                    self.redo();
                }
                (c, false) if matches!(self.state, InteractionState::Select) => match c {
                    'l' => self.toggle_lock_selected(),
                    'h' => self.toggle_axis_holes_selected(),
                    'r' => self.rotate_selected(Axis::Y, 90.0),
                    _ => {}
                },
                _ => {}
            },
        }
    }

    /// Leave the current gesture. A live drag is rolled back to its start
    /// offset since it never reached history.
    fn cancel(&mut self) {
        if let InteractionState::Drag(session) = self.take_state() {
            let (index, start) = (session.index, session.start_offset);
            self.apply(|m| m.with_position(index, start));
        }
    }

    fn take_state(&mut self) -> InteractionState {
        self.dirty = true;
        std::mem::take(&mut self.state)
    }

    fn set_state(&mut self, state: InteractionState) {
        if self.state.name() != state.name() {
            tracing::debug!("Interaction {} -> {}", self.state.name(), state.name());
        }
        self.state = state;
        self.dirty = true;
    }

    /// Run a pure model update and resync the scene when it took effect
    fn apply(&mut self, update: impl FnOnce(&ArrayModel) -> Option<ArrayModel>) -> bool {
        let changed = self.store.apply(update);
        if changed {
            self.scene.sync(self.store.get());
            self.dirty = true;
        }
        changed
    }

    fn ray_at(&self, position: Vec2) -> Ray {
        self.camera.screen_to_ray(position, self.viewport)
    }

    /// History, persistence and log for a committed move
    fn commit_move(&mut self, index: LogicalIndex, prev: Vec3, next: Vec3, message: &str) {
        self.history.push(HistoryEntry { index, prev, next });
        self.persist_position(index);
        self.log(
            "move",
            message,
            serde_json::json!({ "index": index.0, "x": next.x, "y": next.y, "z": next.z }),
        );
    }

    fn persist_position(&self, index: LogicalIndex) {
        let record = PositionRecord::new(POSITIONS_GROUP, index, self.model().position(index));
        self.collaborators.save_position(record);
    }

    fn log(&self, kind: &str, message: &str, data: serde_json::Value) {
        self.collaborators
            .write_log(LogEntry::new(kind, message, data));
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state.name())
            .field("revision", &self.model().revision())
            .field("selection", &self.selection)
            .field("history", &self.history.len())
            .finish()
    }
}
