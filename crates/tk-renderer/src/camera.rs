//! Camera uniform

use bytemuck::{Pod, Zeroable};
use tk_core::Camera;

/// Camera data as laid out in the shader's `CameraUniform`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection × view
    pub view_proj: [[f32; 4]; 4],
    /// World → view
    pub view: [[f32; 4]; 4],
    /// View → clip
    pub proj: [[f32; 4]; 4],
    /// Eye position, `w = 1`
    pub eye: [f32; 4],
}

impl CameraUniform {
    /// Snapshot the matrices of `camera`
    pub fn from_camera(camera: &Camera) -> Self {
        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }

    /// Bind group layout with the uniform at binding 0
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }
}
