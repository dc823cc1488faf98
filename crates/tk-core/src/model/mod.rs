//! Array model
//!
//! The array is a `count_x` × `count_y` grid of identical members sharing one
//! [`ProfileParams`]. Per-cell deviations live in a sparse override map keyed
//! by [`LogicalIndex`]. Snapshots are immutable; every change goes through a
//! pure update function (see `update.rs`) that returns a successor snapshot.

mod params;
mod store;
mod update;

use std::collections::BTreeMap;
use std::fmt;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use params::{ArraySpec, PlateHole, PlateSpec, ProfileKey, ProfileParams, clamp_length};
pub use store::{ModelStore, Subscriber};

/// Stable identity of a grid cell: `ix * count_y + iy`.
///
/// Survives deletion and render compaction and is never reused in a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogicalIndex(pub u32);

impl fmt::Display for LogicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation axis for fixed-increment member rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

/// Long face of a member, in the member's local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    /// Outward normal in member-local space
    pub fn normal(&self) -> Vec3 {
        match self {
            Face::Top => Vec3::Y,
            Face::Bottom => Vec3::NEG_Y,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
        }
    }

    pub fn all() -> [Face; 4] {
        [Face::Top, Face::Bottom, Face::Right, Face::Left]
    }
}

/// How deep a side hole goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoleMode {
    /// Only the wall on the chosen face
    #[default]
    SingleWall,
    /// Through both opposite walls
    Through,
}

/// A hole drilled into one long face of a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideHole {
    pub face: Face,
    /// Distance from the member's -Z end (mm)
    pub offset: f32,
    pub diameter: f32,
    pub mode: HoleMode,
}

/// Sparse per-cell deviation from the default grid placement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceOverride {
    /// Offset from the grid position (mm)
    pub position: Vec3,
    /// Euler angles in degrees, applied in YXZ order
    pub rotation: Vec3,
    pub locked: bool,
    pub deleted: bool,
    pub has_axis_holes: bool,
    pub side_holes: Vec<SideHole>,
}

/// A member inserted freely in space, outside the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeMember {
    pub id: Uuid,
    pub position: Vec3,
    /// Quarter-turn increment chosen while inserting (degrees)
    pub yaw: f32,
    pub orientation: Quat,
}

impl FreeMember {
    pub fn new(position: Vec3, yaw: f32, orientation: Quat) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            yaw,
            orientation,
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}

/// Rotation matrix for Euler angles in degrees.
///
/// The order is fixed to YXZ intrinsic (R = Ry · Rx · Rz) for every member.
pub fn rotation_matrix(degrees: Vec3) -> Mat4 {
    Mat4::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Immutable snapshot of the whole layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayModel {
    /// Bumped by every successful update
    #[serde(skip)]
    revision: u64,
    pub profile: ProfileParams,
    pub array: ArraySpec,
    overrides: BTreeMap<LogicalIndex, InstanceOverride>,
    #[serde(default)]
    free_members: Vec<FreeMember>,
    #[serde(default)]
    plate: Option<PlateSpec>,
}

impl Default for ArrayModel {
    fn default() -> Self {
        Self::new(ProfileParams::default(), ArraySpec::default())
    }
}

impl ArrayModel {
    pub fn new(profile: ProfileParams, array: ArraySpec) -> Self {
        Self {
            revision: 0,
            profile: profile.clamped(),
            array: array.clamped(),
            overrides: BTreeMap::new(),
            free_members: Vec::new(),
            plate: None,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of grid cells, deleted ones included
    pub fn cell_count(&self) -> u32 {
        self.array.count_x.saturating_mul(self.array.count_y)
    }

    pub fn contains(&self, index: LogicalIndex) -> bool {
        index.0 < self.cell_count()
    }

    pub fn logical_index(&self, ix: u32, iy: u32) -> LogicalIndex {
        LogicalIndex(ix.saturating_mul(self.array.count_y).saturating_add(iy))
    }

    /// Grid coordinates `(ix, iy)` of a cell
    pub fn cell_of(&self, index: LogicalIndex) -> Option<(u32, u32)> {
        if !self.contains(index) {
            return None;
        }
        let count_y = self.array.count_y.max(1);
        Some((index.0 / count_y, index.0 % count_y))
    }

    pub fn override_of(&self, index: LogicalIndex) -> Option<&InstanceOverride> {
        self.overrides.get(&index)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (LogicalIndex, &InstanceOverride)> {
        self.overrides.iter().map(|(k, v)| (*k, v))
    }

    /// Undisplaced grid position of a cell
    pub fn base_position(&self, index: LogicalIndex) -> Vec3 {
        let (ix, iy) = self.cell_of(index).unwrap_or((0, 0));
        Vec3::new(
            ix as f32 * self.array.spacing_x,
            0.0,
            iy as f32 * self.array.spacing_y,
        )
    }

    /// Position offset override (zero when absent)
    pub fn position(&self, index: LogicalIndex) -> Vec3 {
        self.override_of(index).map_or(Vec3::ZERO, |o| o.position)
    }

    /// Rotation override in degrees (zero when absent)
    pub fn rotation(&self, index: LogicalIndex) -> Vec3 {
        self.override_of(index).map_or(Vec3::ZERO, |o| o.rotation)
    }

    pub fn is_locked(&self, index: LogicalIndex) -> bool {
        self.override_of(index).is_some_and(|o| o.locked)
    }

    pub fn is_deleted(&self, index: LogicalIndex) -> bool {
        self.override_of(index).is_some_and(|o| o.deleted)
    }

    /// True when the cell exists and has not been deleted
    pub fn is_active(&self, index: LogicalIndex) -> bool {
        self.contains(index) && !self.is_deleted(index)
    }

    /// Non-deleted cells in enumeration order (ix outer, iy inner)
    pub fn active_indices(&self) -> impl Iterator<Item = LogicalIndex> + '_ {
        let count_y = self.array.count_y;
        (0..self.array.count_x)
            .flat_map(move |ix| (0..count_y).map(move |iy| LogicalIndex(ix * count_y + iy)))
            .filter(|index| !self.is_deleted(*index))
    }

    pub fn active_count(&self) -> usize {
        self.active_indices().count()
    }

    /// World transform: Translate(grid + offset) · Rotate(YXZ)
    pub fn instance_transform(&self, index: LogicalIndex) -> Mat4 {
        let translation = self.base_position(index) + self.position(index);
        Mat4::from_translation(translation) * rotation_matrix(self.rotation(index))
    }

    pub fn free_members(&self) -> &[FreeMember] {
        &self.free_members
    }

    pub fn plate(&self) -> Option<&PlateSpec> {
        self.plate.as_ref()
    }

    /// Clone with the revision bumped; the starting point of every update
    /// Copy with the profile and grid pulled back into their editable ranges.
    /// Overrides of cells that fall outside the grid are dropped.
    ///
    /// Snapshots read from disk bypass the update functions, so they go
    /// through here before use.
    pub fn normalized(&self) -> ArrayModel {
        let mut next = self.clone();
        next.profile = self.profile.clamped();
        next.array = self.array.clamped();
        let cells = next.cell_count();
        next.overrides.retain(|index, _| index.0 < cells);
        next
    }

    fn successor(&self) -> ArrayModel {
        let mut next = self.clone();
        next.revision = self.revision + 1;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(count_x: u32, count_y: u32) -> ArrayModel {
        ArrayModel::new(
            ProfileParams::default(),
            ArraySpec {
                count_x,
                count_y,
                spacing_x: 50.0,
                spacing_y: 50.0,
            },
        )
    }

    #[test]
    fn test_logical_indices_cover_grid() {
        let model = grid(2, 3);
        let indices: Vec<u32> = model.active_indices().map(|i| i.0).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(model.cell_of(LogicalIndex(4)), Some((1, 1)));
        assert_eq!(model.cell_of(LogicalIndex(6)), None);
        assert_eq!(model.logical_index(1, 2), LogicalIndex(5));
    }

    #[test]
    fn test_base_position_follows_spacing() {
        let model = grid(2, 3);
        assert_eq!(model.base_position(LogicalIndex(5)), Vec3::new(50.0, 0.0, 100.0));
    }

    #[test]
    fn test_instance_transform_translation_then_rotation() {
        let model = grid(2, 1)
            .with_position(LogicalIndex(1), Vec3::new(1.0, 2.0, 3.0))
            .and_then(|m| m.with_rotation(LogicalIndex(1), Vec3::new(0.0, 90.0, 0.0)))
            .unwrap();
        let m = model.instance_transform(LogicalIndex(1));
        let origin = m.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 51.0, epsilon = 1e-4);
        assert_relative_eq!(origin.y, 2.0, epsilon = 1e-4);
        assert_relative_eq!(origin.z, 3.0, epsilon = 1e-4);
        // +90° about Y turns local +Z into world +X
        let axis = m.transform_vector3(Vec3::Z);
        assert_relative_eq!(axis.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalized_clamps_grid_and_profile() {
        let mut model = grid(3, 2)
            .with_position(LogicalIndex(5), Vec3::X)
            .and_then(|m| m.with_position(LogicalIndex(1), Vec3::Z))
            .unwrap();
        model.array.count_x = 0;
        model.array.count_y = 70_000;
        model.profile.length = 1e9;
        model.profile.thickness = f32::NAN;

        let normalized = model.normalized();
        assert_eq!(normalized.array.count_x, 1);
        assert_eq!(normalized.array.count_y, crate::constants::MAX_ARRAY_COUNT);
        assert_eq!(normalized.profile.length, crate::constants::MAX_LENGTH);
        assert_eq!(normalized.profile.thickness, crate::constants::MIN_THICKNESS);
        assert_eq!(normalized.cell_count(), 20);
        assert_eq!(normalized.position(LogicalIndex(1)), Vec3::Z);
        assert!(normalized.override_of(LogicalIndex(5)).is_some());
    }

    #[test]
    fn test_cell_count_saturates() {
        let mut model = grid(1, 1);
        model.array.count_x = 70_000;
        model.array.count_y = 70_000;
        assert_eq!(model.cell_count(), u32::MAX);
    }

    #[test]
    fn test_rotation_order_is_yxz() {
        let r = rotation_matrix(Vec3::new(30.0, 60.0, 10.0));
        let expected = Mat4::from_rotation_y(60f32.to_radians())
            * Mat4::from_rotation_x(30f32.to_radians())
            * Mat4::from_rotation_z(10f32.to_radians());
        assert!(r.abs_diff_eq(expected, 1e-5));
    }
}
