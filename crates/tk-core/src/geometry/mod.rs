//! Parametric geometry generation
//!
//! Builds triangle meshes for members, the base plate and hole markers.
//! Meshes are memoized by exact dimensions, so repeated requests for the same
//! tuple hand back the same shared mesh.

mod builder;
mod marker;
mod plate;
mod profile;

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;

use crate::math::BoundingBox;
use crate::model::{PlateSpec, ProfileKey, ProfileParams};

pub use marker::generate_marker_mesh;
pub use plate::generate_plate_mesh;
pub use profile::generate_profile_mesh;

/// Indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `i`
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let base = i * 3;
        [
            self.positions[self.indices[base] as usize],
            self.positions[self.indices[base + 1] as usize],
            self.positions[self.indices[base + 2] as usize],
        ]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied())
    }
}

/// Memoizing mesh factory
#[derive(Debug, Default)]
pub struct GeometryFactory {
    profiles: HashMap<ProfileKey, Arc<TriangleMesh>>,
    plates: HashMap<ProfileKey, Arc<TriangleMesh>>,
    marker: Option<Arc<TriangleMesh>>,
    builds: usize,
}

impl GeometryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Member mesh for the given section; cached by exact dimensions
    pub fn profile_mesh(&mut self, profile: &ProfileParams) -> Arc<TriangleMesh> {
        let key = profile.key();
        if let Some(mesh) = self.profiles.get(&key) {
            return Arc::clone(mesh);
        }
        tracing::debug!(
            "Building profile mesh {}x{}x{} L{}",
            profile.width,
            profile.height,
            profile.thickness,
            profile.length
        );
        let mesh = Arc::new(generate_profile_mesh(profile));
        self.builds += 1;
        self.profiles.insert(key, Arc::clone(&mesh));
        mesh
    }

    /// Plate mesh; holes are not cut, so only the outer dimensions matter
    pub fn plate_mesh(&mut self, plate: &PlateSpec) -> Arc<TriangleMesh> {
        let key = plate.key();
        if let Some(mesh) = self.plates.get(&key) {
            return Arc::clone(mesh);
        }
        let mesh = Arc::new(generate_plate_mesh(plate));
        self.builds += 1;
        self.plates.insert(key, Arc::clone(&mesh));
        mesh
    }

    /// Unit cylinder used for every hole marker
    pub fn unit_marker_mesh(&mut self) -> Arc<TriangleMesh> {
        if let Some(mesh) = &self.marker {
            return Arc::clone(mesh);
        }
        let mesh = Arc::new(generate_marker_mesh());
        self.builds += 1;
        self.marker = Some(Arc::clone(&mesh));
        mesh
    }

    /// Number of meshes actually generated since creation
    pub fn build_count(&self) -> usize {
        self.builds
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.plates.clear();
        self.marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_dimensions_reuse_mesh() {
        let mut factory = GeometryFactory::new();
        let a = factory.profile_mesh(&ProfileParams::default());
        let b = factory.profile_mesh(&ProfileParams {
            material: "Q345".into(),
            ..Default::default()
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.build_count(), 1);

        let c = factory.profile_mesh(&ProfileParams {
            length: 300.0,
            ..Default::default()
        });
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(factory.build_count(), 2);
    }

    #[test]
    fn test_clear_forces_rebuild() {
        let mut factory = GeometryFactory::new();
        factory.unit_marker_mesh();
        factory.clear();
        factory.unit_marker_mesh();
        assert_eq!(factory.build_count(), 2);
    }
}
