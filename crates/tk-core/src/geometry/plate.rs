//! Base plate solid

use glam::Vec3;

use super::TriangleMesh;
use super::builder::MeshBuilder;
use crate::model::PlateSpec;

/// Flat box centred on the origin in XZ with its top face at y = 0.
///
/// Plate `width` runs along X and `height` along Z. Holes are drawn as
/// markers, never cut.
pub fn generate_plate_mesh(plate: &PlateSpec) -> TriangleMesh {
    let half = Vec3::new(plate.width / 2.0, 0.0, plate.height / 2.0);
    let mut builder = MeshBuilder::default();
    builder.cuboid(
        Vec3::new(-half.x, -plate.thickness, -half.z),
        Vec3::new(half.x, 0.0, half.z),
    );
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_top_at_zero() {
        let mesh = generate_plate_mesh(&PlateSpec::default());
        let bounds = mesh.bounds();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(bounds.max.y, 0.0);
        assert_eq!(bounds.min.y, -5.0);
        assert_eq!(bounds.size().x, 1000.0);
    }
}
