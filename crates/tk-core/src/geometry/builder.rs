//! Flat-shaded quad accumulation

use glam::Vec3;

use super::TriangleMesh;

/// Collects quads into a [`TriangleMesh`], 4 vertices per face so each face
/// keeps its own normal.
#[derive(Default)]
pub(super) struct MeshBuilder {
    mesh: TriangleMesh,
}

impl MeshBuilder {
    /// Add a planar quad. Winding is flipped if needed so the front face
    /// points along `normal`.
    pub fn quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let [a, b, c, d] = corners;
        let corners = if (b - a).cross(c - a).dot(normal) < 0.0 {
            [a, d, c, b]
        } else {
            corners
        };

        let base = self.mesh.positions.len() as u32;
        for corner in corners {
            self.mesh.positions.push(corner);
            self.mesh.normals.push(normal);
        }
        self.mesh
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Rectangle in a constant-Z plane
    pub fn cap(&mut self, x: [f32; 2], y: [f32; 2], z: f32, normal: Vec3) {
        self.quad(
            [
                Vec3::new(x[0], y[0], z),
                Vec3::new(x[1], y[0], z),
                Vec3::new(x[1], y[1], z),
                Vec3::new(x[0], y[1], z),
            ],
            normal,
        );
    }

    /// Wall in a constant-X plane running the full length
    pub fn wall_x(&mut self, x: f32, y: [f32; 2], z: [f32; 2], normal: Vec3) {
        self.quad(
            [
                Vec3::new(x, y[0], z[0]),
                Vec3::new(x, y[1], z[0]),
                Vec3::new(x, y[1], z[1]),
                Vec3::new(x, y[0], z[1]),
            ],
            normal,
        );
    }

    /// Wall in a constant-Y plane running the full length
    pub fn wall_y(&mut self, y: f32, x: [f32; 2], z: [f32; 2], normal: Vec3) {
        self.quad(
            [
                Vec3::new(x[0], y, z[0]),
                Vec3::new(x[1], y, z[0]),
                Vec3::new(x[1], y, z[1]),
                Vec3::new(x[0], y, z[1]),
            ],
            normal,
        );
    }

    /// Closed axis-aligned box
    pub fn cuboid(&mut self, min: Vec3, max: Vec3) {
        let (x, y, z) = ([min.x, max.x], [min.y, max.y], [min.z, max.z]);
        self.wall_x(max.x, y, z, Vec3::X);
        self.wall_x(min.x, y, z, Vec3::NEG_X);
        self.wall_y(max.y, x, z, Vec3::Y);
        self.wall_y(min.y, x, z, Vec3::NEG_Y);
        self.cap(x, y, max.z, Vec3::Z);
        self.cap(x, y, min.z, Vec3::NEG_Z);
    }

    pub fn finish(self) -> TriangleMesh {
        self.mesh
    }
}
