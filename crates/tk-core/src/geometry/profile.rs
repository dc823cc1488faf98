//! Hollow rectangular section extruded along local Z

use glam::Vec3;

use super::TriangleMesh;
use super::builder::MeshBuilder;
use crate::model::ProfileParams;

/// Generate the member solid.
///
/// The section is centred on X, sits on y = 0 (occupying `[0, height]`) and
/// spans `[-length/2, length/2]` along Z. When the walls meet the cavity
/// collapses and a plain bar (12 triangles) is produced. A hollow section has
/// 4 outer walls, 4 inner walls and 4 strips per end cap (32 triangles).
pub fn generate_profile_mesh(profile: &ProfileParams) -> TriangleMesh {
    let hw = profile.width / 2.0;
    let h = profile.height;
    let hl = profile.length / 2.0;

    let mut builder = MeshBuilder::default();

    if profile.is_solid() {
        builder.cuboid(Vec3::new(-hw, 0.0, -hl), Vec3::new(hw, h, hl));
        return builder.finish();
    }

    let ihw = profile.inner_width() / 2.0;
    let iy0 = (h - profile.inner_height()) / 2.0;
    let iy1 = iy0 + profile.inner_height();
    let z = [-hl, hl];

    // Outer walls
    builder.wall_x(hw, [0.0, h], z, Vec3::X);
    builder.wall_x(-hw, [0.0, h], z, Vec3::NEG_X);
    builder.wall_y(h, [-hw, hw], z, Vec3::Y);
    builder.wall_y(0.0, [-hw, hw], z, Vec3::NEG_Y);

    // Cavity walls face inward
    builder.wall_x(ihw, [iy0, iy1], z, Vec3::NEG_X);
    builder.wall_x(-ihw, [iy0, iy1], z, Vec3::X);
    builder.wall_y(iy1, [-ihw, ihw], z, Vec3::NEG_Y);
    builder.wall_y(iy0, [-ihw, ihw], z, Vec3::Y);

    // Ring caps
    for (end, normal) in [(hl, Vec3::Z), (-hl, Vec3::NEG_Z)] {
        builder.cap([-hw, hw], [0.0, iy0], end, normal);
        builder.cap([-hw, hw], [iy1, h], end, normal);
        builder.cap([-hw, -ihw], [iy0, iy1], end, normal);
        builder.cap([ihw, hw], [iy0, iy1], end, normal);
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hollow_section() {
        let mesh = generate_profile_mesh(&ProfileParams::default());
        assert_eq!(mesh.triangle_count(), 32);
        assert_eq!(mesh.positions.len(), mesh.normals.len());

        let bounds = mesh.bounds();
        assert_relative_eq!(bounds.min.x, -10.0);
        assert_relative_eq!(bounds.max.x, 10.0);
        assert_relative_eq!(bounds.min.y, 0.0);
        assert_relative_eq!(bounds.max.y, 20.0);
        assert_relative_eq!(bounds.min.z, -100.0);
        assert_relative_eq!(bounds.max.z, 100.0);
    }

    #[test]
    fn test_degenerate_section_is_solid_bar() {
        let profile = ProfileParams {
            width: 10.0,
            height: 10.0,
            thickness: 5.0,
            ..Default::default()
        };
        let mesh = generate_profile_mesh(&profile);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_winding_matches_normals() {
        let mesh = generate_profile_mesh(&ProfileParams::default());
        for (i, [a, b, c]) in mesh.triangles().enumerate() {
            let face = (b - a).cross(c - a);
            let normal = mesh.normals[mesh.indices[i * 3] as usize];
            assert!(face.dot(normal) > 0.0, "triangle {i} is wound backwards");
        }
    }
}
