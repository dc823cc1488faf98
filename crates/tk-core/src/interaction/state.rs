//! Interaction states and their ephemeral sessions

use glam::{Quat, Vec2, Vec3};

use super::input::Tool;
use crate::math::{Plane, Ray};
use crate::model::{Axis, LogicalIndex, clamp_length};
use crate::selection::{SelectionModifier, SelectionSet};

/// Current mode of the editor. Each variant owns the data of the gesture in
/// progress, so leaving a state drops its session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Select,
    /// Insert tool; a session exists while the pointer is held
    Insert(Option<InsertionSession>),
    LengthAdjust(LengthAdjustSession),
    Drag(DragSession),
    BoxSelect(BoxSelectSession),
    /// Cut tool, waiting for the first or second pick
    Cut { target: Option<LogicalIndex> },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Select => "select",
            InteractionState::Insert(_) => "insert",
            InteractionState::LengthAdjust(_) => "length-adjust",
            InteractionState::Drag(_) => "drag",
            InteractionState::BoxSelect(_) => "box-select",
            InteractionState::Cut { .. } => "cut",
        }
    }

    /// Tool the state belongs to
    pub fn tool(&self) -> Tool {
        match self {
            InteractionState::Insert(_) => Tool::Insert,
            InteractionState::Cut { .. } => Tool::Cut,
            _ => Tool::Select,
        }
    }

    /// True when no pointer gesture is in progress
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            InteractionState::Select | InteractionState::Insert(None) | InteractionState::Cut { .. }
        )
    }
}

/// Live measurement shown next to the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readout {
    /// Planar distance from the base point and heading in degrees
    Insert { distance: f32, heading: f32 },
    /// Candidate member length
    Length(f32),
}

/// Preview member orientation: +Z turned onto `direction`, rolled by `yaw`
/// degrees about its own axis. A zero direction only applies the yaw about Y.
pub fn insert_orientation(direction: Vec3, yaw: f32) -> Quat {
    let yaw = yaw.to_radians();
    if direction.length_squared() > 1e-6 {
        Quat::from_rotation_arc(Vec3::Z, direction.normalize()) * Quat::from_rotation_z(yaw)
    } else {
        Quat::from_rotation_y(yaw)
    }
}

/// Preview member pose while inserting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub distance: f32,
    pub heading: f32,
}

/// Insert-mode drag started by a pointer-down on a member or the reference plane
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionSession {
    pub base: Vec3,
    /// Plane pointer rays are projected onto
    pub plane: Plane,
    pub yaw: f32,
    pub preview: PreviewPose,
}

impl InsertionSession {
    pub fn new(base: Vec3, plane: Plane, yaw: f32) -> Self {
        let mut session = Self {
            base,
            plane,
            yaw,
            preview: PreviewPose {
                position: base,
                orientation: Quat::IDENTITY,
                distance: 0.0,
                heading: 0.0,
            },
        };
        session.place(base);
        session
    }

    /// Move the preview to a resolved candidate
    pub fn place(&mut self, candidate: Vec3) {
        let delta = candidate - self.base;
        self.preview = PreviewPose {
            position: candidate,
            orientation: insert_orientation(delta, self.yaw),
            distance: (delta.x * delta.x + delta.z * delta.z).sqrt(),
            heading: delta.x.atan2(delta.z).to_degrees(),
        };
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.place(self.preview.position);
    }

    /// Forward direction of the current preview
    pub fn forward(&self) -> Vec3 {
        self.preview.orientation * Vec3::Z
    }
}

/// Dragging a member end to change the shared length
#[derive(Debug, Clone, PartialEq)]
pub struct LengthAdjustSession {
    pub index: LogicalIndex,
    /// Grabbed world point
    pub anchor: Vec3,
    /// Outward direction of the grabbed end (world, unit)
    pub direction: Vec3,
    /// Signed pointer travel along `direction`, rounded to whole mm
    pub delta: f32,
}

impl LengthAdjustSession {
    pub fn new(index: LogicalIndex, anchor: Vec3, direction: Vec3) -> Self {
        Self {
            index,
            anchor,
            direction: direction.normalize_or_zero(),
            delta: 0.0,
        }
    }

    /// Travel for a pointer ray, measured on the horizontal plane through the anchor
    pub fn measure(&self, ray: &Ray) -> Option<f32> {
        let point = Plane::horizontal(self.anchor.y).intersect(ray)?;
        Some((point - self.anchor).dot(self.direction).round())
    }

    pub fn readout(&self) -> f32 {
        clamp_length(self.delta)
    }
}

/// How pointer motion maps onto the member offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragConstraint {
    /// Body grab: free motion in the horizontal plane through the grab point
    Horizontal,
    /// Handle grab: motion along one world direction only
    Axis { axis: Axis, direction: Vec3 },
}

/// Moving one member with the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub index: LogicalIndex,
    /// Offset at drag start; the history entry's `prev`
    pub start_offset: Vec3,
    pub grab: Vec3,
    pub constraint: DragConstraint,
}

impl DragSession {
    pub fn horizontal(index: LogicalIndex, start_offset: Vec3, grab: Vec3) -> Self {
        Self {
            index,
            start_offset,
            grab,
            constraint: DragConstraint::Horizontal,
        }
    }

    pub fn along_axis(
        index: LogicalIndex,
        start_offset: Vec3,
        grab: Vec3,
        axis: Axis,
        direction: Vec3,
    ) -> Self {
        Self {
            index,
            start_offset,
            grab,
            constraint: DragConstraint::Axis {
                axis,
                direction: direction.normalize_or_zero(),
            },
        }
    }

    /// Offset for a pointer ray. `view_dir` orients the plane used for axis drags.
    pub fn offset_for(&self, ray: &Ray, view_dir: Vec3) -> Option<Vec3> {
        match self.constraint {
            DragConstraint::Horizontal => {
                let point = Plane::horizontal(self.grab.y).intersect(ray)?;
                let delta = point - self.grab;
                Some(self.start_offset + Vec3::new(delta.x, 0.0, delta.z))
            }
            DragConstraint::Axis { direction, .. } => {
                let plane = Plane::containing_axis(self.grab, direction, view_dir);
                let point = plane.intersect(ray)?;
                Some(self.start_offset + direction * (point - self.grab).dot(direction))
            }
        }
    }
}

/// Rubber-band selection in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSelectSession {
    pub start: Vec2,
    pub current: Vec2,
    /// Captured at pointer-down
    pub modifier: SelectionModifier,
    /// Selection before the gesture; live results combine against it
    pub prior: SelectionSet,
    /// Set once the pointer travelled past the drag threshold
    pub active: bool,
}

impl BoxSelectSession {
    pub fn new(start: Vec2, modifier: SelectionModifier, prior: SelectionSet) -> Self {
        Self {
            start,
            current: start,
            modifier,
            prior,
            active: false,
        }
    }

    /// Normalised rectangle corners `(min, max)`
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.start.min(self.current), self.start.max(self.current))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = self.rect();
        point.cmpge(min).all() && point.cmple(max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_measure_along_end_direction() {
        let session = LengthAdjustSession::new(LogicalIndex(0), Vec3::new(0.0, 20.0, 100.0), Vec3::Z);
        let down = |z: f32| Ray::new(Vec3::new(0.0, 300.0, z), Vec3::NEG_Y);
        assert_eq!(session.measure(&down(475.2)), Some(375.0));
        assert_eq!(session.measure(&down(100.0)), Some(0.0));
        assert_eq!(session.measure(&down(60.0)), Some(-40.0));
        // ray parallel to the plane never meets it
        assert_eq!(session.measure(&Ray::new(Vec3::new(0.0, 300.0, 0.0), Vec3::X)), None);
    }

    #[test]
    fn test_length_readout_clamped() {
        let mut session = LengthAdjustSession::new(LogicalIndex(0), Vec3::ZERO, Vec3::Z);
        session.delta = 9000.0;
        assert_eq!(session.readout(), 5000.0);
        session.delta = 0.0;
        assert_eq!(session.readout(), 50.0);
    }

    #[test]
    fn test_axis_drag_keeps_along_axis_component() {
        let session = DragSession::along_axis(LogicalIndex(0), Vec3::ZERO, Vec3::ZERO, Axis::X, Vec3::X);
        // looking down -Y at x = 35, z = 12
        let ray = Ray::new(Vec3::new(35.0, 100.0, 12.0), Vec3::NEG_Y);
        let offset = session.offset_for(&ray, Vec3::NEG_Y).unwrap();
        assert_relative_eq!(offset.x, 35.0, epsilon = 1e-4);
        assert_relative_eq!(offset.y, 0.0);
        assert_relative_eq!(offset.z, 0.0);
    }

    #[test]
    fn test_horizontal_drag_adds_planar_delta() {
        let session = DragSession::horizontal(LogicalIndex(0), Vec3::new(5.0, 2.0, 0.0), Vec3::new(0.0, 20.0, 0.0));
        let ray = Ray::new(Vec3::new(30.0, 200.0, -10.0), Vec3::NEG_Y);
        let offset = session.offset_for(&ray, Vec3::NEG_Y).unwrap();
        assert_relative_eq!(offset.x, 35.0, epsilon = 1e-4);
        assert_relative_eq!(offset.y, 2.0);
        assert_relative_eq!(offset.z, -10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_preview_faces_candidate() {
        let mut session = InsertionSession::new(Vec3::ZERO, Plane::horizontal(0.0), 0.0);
        session.place(Vec3::new(30.0, 0.0, 40.0));
        assert_relative_eq!(session.preview.distance, 50.0, epsilon = 1e-4);
        assert_relative_eq!(session.preview.heading, 36.869_9, epsilon = 1e-3);
        let forward = session.forward();
        assert_relative_eq!(forward.x, 0.6, epsilon = 1e-5);
        assert_relative_eq!(forward.z, 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_box_rect_normalised() {
        let mut session = BoxSelectSession::new(Vec2::new(50.0, 10.0), SelectionModifier::Replace, SelectionSet::Empty);
        session.current = Vec2::new(10.0, 40.0);
        assert_eq!(session.rect(), (Vec2::new(10.0, 10.0), Vec2::new(50.0, 40.0)));
        assert!(session.contains(Vec2::new(20.0, 20.0)));
        assert!(!session.contains(Vec2::new(60.0, 20.0)));
    }
}
