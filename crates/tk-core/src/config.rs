//! Editor configuration structures
//!
//! Tunables for snapping, hole markers, handles and history. Everything here
//! is serde-friendly and falls back to defaults for missing fields, so the
//! host application can embed [`EditorSettings`] in its own config file.

use serde::{Deserialize, Serialize};

use crate::model::Face;

/// Coordinate lock applied while inserting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLock {
    /// Move freely in the constraint plane
    #[default]
    Free,
    /// Only X changes
    LockX,
    /// Only Y changes (vertical insert)
    LockY,
    /// Only Z changes
    LockZ,
}

/// Snapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Grid quantum in mm; zero or less disables grid snapping
    pub snap_size: f32,
    /// Snap to vertices and edge midpoints of hit members
    pub snap_to_point: bool,
    pub axis_lock: AxisLock,
    /// Keep only the dominant planar direction
    pub orthogonal: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            snap_size: 10.0,
            snap_to_point: false,
            axis_lock: AxisLock::Free,
            orthogonal: false,
        }
    }
}

impl SnapSettings {
    /// Distance moved by one click on an axis handle
    pub fn step(&self) -> f32 {
        self.snap_size.max(1.0)
    }
}

/// Axis hole marker layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleSettings {
    /// Centre distance between consecutive holes (mm)
    pub pitch: f32,
    pub diameter: f32,
    /// Marker depth into the face (mm)
    pub depth: f32,
    /// Faces that receive axis holes
    pub faces: Vec<Face>,
}

impl Default for HoleSettings {
    fn default() -> Self {
        Self {
            pitch: 20.0,
            diameter: 3.0,
            depth: 5.0,
            faces: Face::all().to_vec(),
        }
    }
}

/// Axis handle dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleSettings {
    pub length: f32,
    /// Pick radius around the handle axis
    pub radius: f32,
}

impl Default for HandleSettings {
    fn default() -> Self {
        Self {
            length: 120.0,
            radius: 4.0,
        }
    }
}

/// Everything the interaction engine can be tuned with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub snap: SnapSettings,
    pub holes: HoleSettings,
    pub handle: HandleSettings,
    /// Maximum number of undo entries kept
    pub history_limit: usize,
    /// Local-Z distance from an end face that counts as a boundary hit (mm)
    pub length_tolerance: f32,
    /// Pointer travel (px) before a press on empty space becomes a box
    pub box_select_threshold: f32,
    /// Half size of the reference plane; `None` makes it unbounded
    pub reference_plane_half_extent: Option<f32>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            holes: HoleSettings::default(),
            handle: HandleSettings::default(),
            history_limit: 200,
            length_tolerance: 10.0,
            box_select_threshold: 3.0,
            reference_plane_half_extent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: EditorSettings = ron::from_str("(snap: (snap_size: 5.0))").unwrap();
        assert_eq!(settings.snap.snap_size, 5.0);
        assert_eq!(settings.snap.axis_lock, AxisLock::Free);
        assert_eq!(settings.history_limit, 200);
        assert_eq!(settings.holes.faces.len(), 4);
    }

    #[test]
    fn test_step_never_below_one() {
        let snap = SnapSettings {
            snap_size: 0.0,
            ..Default::default()
        };
        assert_eq!(snap.step(), 1.0);
    }
}
