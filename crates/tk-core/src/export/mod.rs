//! Layout exports
//!
//! Every active member and every free member is written as an independent
//! solid copy of the member mesh. Deleted members and hole markers never
//! become solids; the 2D formats draw holes as circles.

mod dxf;
mod stl;
mod svg;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::TriangleMesh;
use crate::model::ProfileParams;
use crate::scene::SceneBatch;

pub use dxf::write_dxf;
pub use stl::{write_stl_ascii, write_stl_binary};
pub use svg::write_svg;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    StlAscii,
    StlBinary,
    Dxf,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::StlAscii | ExportFormat::StlBinary => "stl",
            ExportFormat::Dxf => "dxf",
            ExportFormat::Svg => "svg",
        }
    }

    /// Short name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::StlAscii => "stl",
            ExportFormat::StlBinary => "stl-binary",
            ExportFormat::Dxf => "dxf",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" | "stl-ascii" => Ok(ExportFormat::StlAscii),
            "stl-binary" => Ok(ExportFormat::StlBinary),
            "dxf" => Ok(ExportFormat::Dxf),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Export-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("STL write failed: {0}")]
    Stl(String),
    #[error("Nothing to export")]
    Empty,
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e.to_string())
    }
}

/// World transforms of every exported solid: grid members first, then free members
pub fn solid_transforms(batch: &SceneBatch) -> impl Iterator<Item = &Mat4> {
    batch.transforms.iter().chain(&batch.free_transforms)
}

pub fn solid_count(batch: &SceneBatch) -> usize {
    batch.transforms.len() + batch.free_transforms.len()
}

/// Write `batch` to `path` in the given format
pub fn export_to_file(
    path: &Path,
    format: ExportFormat,
    batch: &SceneBatch,
    mesh: &TriangleMesh,
) -> Result<(), ExportError> {
    if solid_count(batch) == 0 {
        return Err(ExportError::Empty);
    }

    let file = File::create(path).map_err(|e| ExportError::Io(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::StlAscii => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("layout");
            write_stl_ascii(&mut writer, name, batch, mesh)?
        }
        ExportFormat::StlBinary => write_stl_binary(&mut writer, batch, mesh)?,
        ExportFormat::Dxf => write_dxf(&mut writer, batch)?,
        ExportFormat::Svg => write_svg(&mut writer, batch)?,
    }
    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;

    tracing::info!(
        "Exported {} solids as {:?} to {}",
        solid_count(batch),
        format,
        path.display()
    );
    Ok(())
}

/// Project a world point onto the top view plane `(x, z)`
fn top_view(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Top-view outline of a member: convex hull of its projected box corners,
/// counter-clockwise in `(x, z)`
pub(crate) fn footprint(transform: &Mat4, profile: &ProfileParams) -> Vec<Vec2> {
    let hw = profile.width / 2.0;
    let hl = profile.length / 2.0;
    let mut corners = Vec::with_capacity(8);
    for x in [-hw, hw] {
        for y in [0.0, profile.height] {
            for z in [-hl, hl] {
                corners.push(top_view(transform.transform_point3(Vec3::new(x, y, z))));
            }
        }
    }
    convex_hull(corners)
}

/// Member centre line in top view
pub(crate) fn axis_segment(transform: &Mat4, profile: &ProfileParams) -> (Vec2, Vec2) {
    let hl = profile.length / 2.0;
    let mid = profile.height / 2.0;
    (
        top_view(transform.transform_point3(Vec3::new(0.0, mid, -hl))),
        top_view(transform.transform_point3(Vec3::new(0.0, mid, hl))),
    )
}

/// Monotone chain hull; collinear and repeated points are dropped
fn convex_hull(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let turn = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);
    let half = |iter: &mut dyn Iterator<Item = Vec2>| {
        let mut chain: Vec<Vec2> = Vec::new();
        for p in iter {
            while chain.len() >= 2 && turn(chain[chain.len() - 2], chain[chain.len() - 1], p) <= 1e-3 {
                chain.pop();
            }
            chain.push(p);
        }
        chain.pop();
        chain
    };

    let mut hull = half(&mut points.iter().copied());
    hull.extend(half(&mut points.iter().rev().copied()));
    hull
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Axis, LogicalIndex};

    #[test]
    fn test_footprint_of_straight_member() {
        let profile = ProfileParams::default();
        let hull = footprint(&Mat4::IDENTITY, &profile);
        assert_eq!(hull.len(), 4);
        assert!(hull.contains(&Vec2::new(-10.0, -100.0)));
        assert!(hull.contains(&Vec2::new(10.0, 100.0)));
    }

    #[test]
    fn test_footprint_follows_rotation() {
        let profile = ProfileParams::default();
        let model = crate::model::ArrayModel::default()
            .with_rotation_step(LogicalIndex(0), Axis::Y, 90.0)
            .unwrap();
        let hull = footprint(&model.instance_transform(LogicalIndex(0)), &profile);
        let max_x = hull.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((max_x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_format_names_parse_back() {
        for format in [
            ExportFormat::StlAscii,
            ExportFormat::StlBinary,
            ExportFormat::Dxf,
            ExportFormat::Svg,
        ] {
            assert_eq!(format.to_string().parse::<ExportFormat>(), Ok(format));
        }
        assert!("step".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_to_file_and_empty_batch() {
        let (batch, mesh) = fixtures::layout();
        let dir = tempfile::tempdir().unwrap();
        for format in [
            ExportFormat::StlAscii,
            ExportFormat::StlBinary,
            ExportFormat::Dxf,
            ExportFormat::Svg,
        ] {
            let path = dir.path().join(format!("layout.{}", format.extension()));
            export_to_file(&path, format, &batch, &mesh).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }

        let empty = SceneBatch::default();
        let path = dir.path().join("empty.stl");
        assert!(matches!(
            export_to_file(&path, ExportFormat::StlAscii, &empty, &mesh),
            Err(ExportError::Empty)
        ));
    }
}
