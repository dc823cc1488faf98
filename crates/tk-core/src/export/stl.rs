//! STL writers

use std::io::Write;

use glam::{Mat4, Vec3};

use super::{ExportError, solid_transforms};
use crate::geometry::TriangleMesh;
use crate::scene::SceneBatch;

/// One world-space facet
struct Facet {
    normal: Vec3,
    vertices: [Vec3; 3],
}

fn facets<'a>(batch: &'a SceneBatch, mesh: &'a TriangleMesh) -> impl Iterator<Item = Facet> + 'a {
    solid_transforms(batch).flat_map(move |transform| {
        mesh.triangles().map(move |tri| transform_facet(transform, tri))
    })
}

fn transform_facet(transform: &Mat4, tri: [Vec3; 3]) -> Facet {
    let vertices = tri.map(|v| transform.transform_point3(v));
    let normal = (vertices[1] - vertices[0])
        .cross(vertices[2] - vertices[0])
        .normalize_or_zero();
    Facet { normal, vertices }
}

/// ASCII STL: one `solid` block holding every member's facets
pub fn write_stl_ascii<W: Write>(
    writer: &mut W,
    name: &str,
    batch: &SceneBatch,
    mesh: &TriangleMesh,
) -> Result<(), ExportError> {
    writeln!(writer, "solid {name}")?;
    for facet in facets(batch, mesh) {
        let n = facet.normal;
        writeln!(writer, "  facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in facet.vertices {
            writeln!(writer, "      vertex {} {} {}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

/// Binary STL through `stl_io`
pub fn write_stl_binary<W: Write>(
    writer: &mut W,
    batch: &SceneBatch,
    mesh: &TriangleMesh,
) -> Result<(), ExportError> {
    let triangles: Vec<stl_io::Triangle> = facets(batch, mesh)
        .map(|facet| stl_io::Triangle {
            normal: stl_io::Normal::new(facet.normal.to_array()),
            vertices: facet.vertices.map(|v| stl_io::Vertex::new(v.to_array())),
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter()).map_err(|e| ExportError::Stl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::super::fixtures;
    use super::*;
    use crate::geometry::generate_profile_mesh;
    use crate::model::LogicalIndex;

    fn ascii(batch: &SceneBatch, mesh: &TriangleMesh) -> String {
        let mut out = Vec::new();
        write_stl_ascii(&mut out, "layout", batch, mesh).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ascii_has_one_copy_per_member() {
        let (batch, mesh) = fixtures::layout();
        let text = ascii(&batch, &mesh);
        assert!(text.starts_with("solid layout\n"));
        assert!(text.trim_end().ends_with("endsolid layout"));
        assert_eq!(
            text.matches("facet normal").count(),
            2 * mesh.triangle_count()
        );
    }

    #[test]
    fn test_deleted_excluded_free_included() {
        let model = fixtures::model()
            .with_deleted(LogicalIndex(0))
            .unwrap();
        let model = fixtures::with_free_member(&model);
        let mesh = generate_profile_mesh(&model.profile);
        let text = ascii(&fixtures::batch(&model), &mesh);
        assert_eq!(
            text.matches("facet normal").count(),
            2 * mesh.triangle_count()
        );
        // the free member sits at z = -500, its far end reaches z = -600
        assert!(text.contains(" -600\n"));
    }

    #[test]
    fn test_binary_reads_back() {
        let (batch, mesh) = fixtures::layout();
        let mut out = Vec::new();
        write_stl_binary(&mut out, &batch, &mesh).unwrap();
        assert_eq!(out.len(), 84 + 50 * 2 * mesh.triangle_count());

        let read = stl_io::read_stl(&mut Cursor::new(out)).unwrap();
        assert_eq!(read.faces.len(), 2 * mesh.triangle_count());
        let max_z = read
            .vertices
            .iter()
            .map(|v| v[2])
            .fold(f32::MIN, f32::max);
        assert!((max_z - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_normals_follow_rotation() {
        let (_, mesh) = fixtures::layout();
        let model = crate::model::ArrayModel::default()
            .with_rotation(LogicalIndex(0), Vec3::new(0.0, 90.0, 0.0))
            .unwrap();
        let batch = fixtures::batch(&model);
        for facet in facets(&batch, &mesh) {
            // end caps now face along ±X
            let n = facet.normal;
            assert!(n.z.abs() < 1e-4 || n.x.abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
