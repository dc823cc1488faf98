//! Vertex formats and instance attribute helpers

use bytemuck::{Pod, Zeroable};
use tk_core::TriangleMesh;

/// Mesh vertex with position and normal; color comes from the instance
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in mesh-local space
    pub position: [f32; 3],
    /// Unit normal in mesh-local space
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(MeshVertex, position) as u64,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(MeshVertex, normal) as u64,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Per-vertex buffer layout
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }

    /// Interleave a core mesh. A missing normal becomes zero.
    pub fn from_mesh(mesh: &TriangleMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .enumerate()
            .map(|(i, p)| MeshVertex {
                position: p.to_array(),
                normal: mesh.normals.get(i).map(|n| n.to_array()).unwrap_or([0.0; 3]),
            })
            .collect()
    }
}

/// A `Mat4` instance attribute as four consecutive `Float32x4` columns
pub fn mat4_instance_attributes(start_location: u32) -> [wgpu::VertexAttribute; 4] {
    std::array::from_fn(|column| wgpu::VertexAttribute {
        offset: (column * 16) as u64,
        shader_location: start_location + column as u32,
        format: wgpu::VertexFormat::Float32x4,
    })
}

/// Transform columns followed by an RGBA color, matching
/// [`SolidInstance`](crate::packing::SolidInstance)
pub fn solid_instance_attributes(start_location: u32) -> [wgpu::VertexAttribute; 5] {
    let [c0, c1, c2, c3] = mat4_instance_attributes(start_location);
    let color = wgpu::VertexAttribute {
        offset: 64,
        shader_location: start_location + 4,
        format: wgpu::VertexFormat::Float32x4,
    };
    [c0, c1, c2, c3, color]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_mat4_columns() {
        let attrs = mat4_instance_attributes(2);
        assert_eq!(attrs[0].shader_location, 2);
        assert_eq!(attrs[3].shader_location, 5);
        assert_eq!(attrs[3].offset, 48);
    }

    #[test]
    fn test_solid_instance_color_follows_matrix() {
        let attrs = solid_instance_attributes(2);
        assert_eq!(attrs[4].shader_location, 6);
        assert_eq!(
            attrs[4].offset as usize,
            std::mem::offset_of!(crate::packing::SolidInstance, color)
        );
    }

    #[test]
    fn test_from_mesh_interleaves() {
        let mesh = TriangleMesh {
            positions: vec![Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z],
            indices: vec![],
        };
        let vertices = MeshVertex::from_mesh(&mesh);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].position, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
    }
}
