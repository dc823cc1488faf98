//! Unit hole-marker cylinder

use std::f32::consts::TAU;

use glam::Vec3;

use super::TriangleMesh;
use crate::constants::MARKER_SEGMENTS;

/// Cylinder of diameter 1 along local Z, spanning `[-0.5, 0.5]`.
///
/// Scale by `(diameter, diameter, depth)` to size a marker.
pub fn generate_marker_mesh() -> TriangleMesh {
    let segments = MARKER_SEGMENTS;
    let mut mesh = TriangleMesh::default();

    // Side: two rings sharing radial normals
    for i in 0..=segments {
        let angle = TAU * i as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        let normal = Vec3::new(cos, sin, 0.0);
        for z in [-0.5, 0.5] {
            mesh.positions.push(Vec3::new(cos * 0.5, sin * 0.5, z));
            mesh.normals.push(normal);
        }
    }
    for i in 0..segments {
        let a = i * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
    }

    // Caps as triangle fans
    for (z, normal) in [(0.5, Vec3::Z), (-0.5, Vec3::NEG_Z)] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, 0.0, z));
        mesh.normals.push(normal);
        for i in 0..segments {
            let angle = TAU * i as f32 / segments as f32;
            let (sin, cos) = angle.sin_cos();
            mesh.positions.push(Vec3::new(cos * 0.5, sin * 0.5, z));
            mesh.normals.push(normal);
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments;
            if z > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    mesh
}
