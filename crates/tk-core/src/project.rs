//! Project file serialization

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::config::EditorSettings;
use crate::model::ArrayModel;

/// Format version written into new project files
pub const PROJECT_FORMAT_VERSION: &str = "1.0.0";

/// A saved layout: the model snapshot plus the editor settings it was made with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// File format version (semver)
    pub version: String,
    pub name: String,
    pub model: ArrayModel,
    #[serde(default)]
    pub settings: EditorSettings,
}

impl Default for Project {
    fn default() -> Self {
        Self::new("New Layout", ArrayModel::default(), EditorSettings::default())
    }
}

impl Project {
    pub fn new(name: impl Into<String>, model: ArrayModel, settings: EditorSettings) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION.to_string(),
            name: name.into(),
            model,
            settings,
        }
    }

    /// Save project to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let content = self.to_bytes()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ProjectError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ProjectError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ProjectError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load project from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ProjectError::Io(e.to_string()))?;
        Self::load_from_str(&content)
    }

    /// Parse a project. Out-of-range dimensions and counts are clamped the
    /// same way the editor clamps them.
    pub fn load_from_str(content: &str) -> Result<Self, ProjectError> {
        let mut project: Project =
            ron::from_str(content).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        project.check_version()?;
        project.model = project.model.normalized();
        Ok(project)
    }

    /// Files from a newer major format are refused
    fn check_version(&self) -> Result<(), ProjectError> {
        let found = Version::parse(&self.version)
            .map_err(|e| ProjectError::Deserialize(format!("bad version {:?}: {e}", self.version)))?;
        let supported = Version::parse(PROJECT_FORMAT_VERSION)
            .map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        if found.major > supported.major {
            return Err(ProjectError::Deserialize(format!(
                "project format {found} is newer than supported {supported}"
            )));
        }
        Ok(())
    }
}

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::model::{ArraySpec, FreeMember, LogicalIndex, PlateSpec, ProfileParams};

    fn sample() -> Project {
        let model = ArrayModel::new(
            ProfileParams::default(),
            ArraySpec {
                count_x: 3,
                count_y: 2,
                ..Default::default()
            },
        )
        .with_position(LogicalIndex(4), Vec3::new(10.0, 0.0, -20.0))
        .and_then(|m| m.with_deleted(LogicalIndex(1)))
        .and_then(|m| m.with_plate(Some(PlateSpec::default())))
        .and_then(|m| m.with_free_member_added(FreeMember::new(Vec3::X, 90.0, Default::default())))
        .unwrap();
        Project::new("frame", model, EditorSettings::default())
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.tkp");
        let project = sample();
        project.save(&path).unwrap();

        let loaded = Project::load(&path).unwrap();
        assert_eq!(loaded.name, "frame");
        assert_eq!(loaded.model.position(LogicalIndex(4)), Vec3::new(10.0, 0.0, -20.0));
        assert!(loaded.model.is_deleted(LogicalIndex(1)));
        assert_eq!(loaded.model.free_members(), project.model.free_members());
        assert_eq!(loaded.model.plate(), project.model.plate());
    }

    #[test]
    fn test_newer_major_refused() {
        let mut project = sample();
        project.version = "2.0.0".to_string();
        let text = String::from_utf8(project.to_bytes().unwrap()).unwrap();
        assert!(matches!(
            Project::load_from_str(&text),
            Err(ProjectError::Deserialize(_))
        ));
    }

    fn reloaded(project: &Project) -> Project {
        let text = String::from_utf8(project.to_bytes().unwrap()).unwrap();
        Project::load_from_str(&text).unwrap()
    }

    #[test]
    fn test_load_clamps_hand_edited_values() {
        let mut project = sample();
        project.model.array.count_x = 0;
        project.model.array.count_y = 0;
        project.model.profile.length = 1e9;

        let loaded = reloaded(&project);
        assert_eq!(loaded.model.array.count_x, 1);
        assert_eq!(loaded.model.array.count_y, 1);
        assert_eq!(loaded.model.cell_count(), 1);
        assert_eq!(loaded.model.profile.length, crate::constants::MAX_LENGTH);
    }

    #[test]
    fn test_load_huge_grid_does_not_overflow() {
        let mut project = sample();
        project.model.array.count_x = 70_000;
        project.model.array.count_y = 70_000;

        let loaded = reloaded(&project);
        let max = crate::constants::MAX_ARRAY_COUNT;
        assert_eq!(loaded.model.cell_count(), max * max);
        // cell 1 was deleted in the sample
        assert_eq!(loaded.model.active_count(), (max * max) as usize - 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Project::load(dir.path().join("absent.tkp")),
            Err(ProjectError::Io(_))
        ));
    }
}
