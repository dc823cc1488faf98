//! Member renderer
//!
//! Owns the GPU copies of the member, marker and plate meshes plus their
//! instance buffers. [`MemberRenderer::apply`] is idempotent: a batch is
//! uploaded once per (batch revision, selection) pair.

use std::sync::Arc;

use tk_core::model::ProfileKey;
use tk_core::{GeometryFactory, ProfileParams, SceneBatch, SelectionSet, TriangleMesh};
use wgpu::util::DeviceExt;

use crate::constants::instances;
use crate::instanced::InstanceBuffer;
use crate::packing::{SolidInstance, pack_batch, selection_hash};
use crate::pipeline::{PipelineConfig, create_camera_bind_group};
use crate::vertex::{MeshVertex, solid_instance_attributes};

/// Indexed mesh resident on the GPU
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &TriangleMesh) -> Self {
        let vertices = MeshVertex::from_mesh(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        instances: &'a InstanceBuffer<SolidInstance>,
    ) {
        if instances.is_empty() || self.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, instances.slice());
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..instances.count());
    }
}

/// Draws the layout: members, free members, hole markers and the plate
pub struct MemberRenderer {
    solid_pipeline: wgpu::RenderPipeline,
    plate_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    geometry: GeometryFactory,
    member_mesh: Option<GpuMesh>,
    member_key: Option<ProfileKey>,
    marker_mesh: GpuMesh,
    plate_mesh: Option<GpuMesh>,
    plate_key: Option<ProfileKey>,
    solids: InstanceBuffer<SolidInstance>,
    markers: InstanceBuffer<SolidInstance>,
    plate: InstanceBuffer<SolidInstance>,
    /// (batch revision, selection hash) of the last upload
    applied: Option<(u64, u64)>,
}

impl MemberRenderer {
    /// Build pipelines and buffers. The camera uniform lives in `camera_buffer`.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
    ) -> Self {
        let bind_group = create_camera_bind_group(device, camera_layout, camera_buffer, "Member");
        let shader = include_str!("shaders/member.wgsl");
        let attributes = solid_instance_attributes(2);
        let instance_layout = || wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SolidInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &attributes,
        };

        let solid_pipeline = PipelineConfig::new("Member", shader, format, depth_format, &[camera_layout])
            .with_vertex_layouts(vec![MeshVertex::layout(), instance_layout()])
            .build(device);

        let plate_pipeline = PipelineConfig::new("Plate", shader, format, depth_format, &[camera_layout])
            .with_vertex_layouts(vec![MeshVertex::layout(), instance_layout()])
            .with_cull_mode(None)
            .translucent()
            .build(device);

        let mut geometry = GeometryFactory::new();
        let marker_mesh = GpuMesh::upload(device, "Hole Marker", &geometry.unit_marker_mesh());

        Self {
            solid_pipeline,
            plate_pipeline,
            bind_group,
            geometry,
            member_mesh: None,
            member_key: None,
            marker_mesh,
            plate_mesh: None,
            plate_key: None,
            solids: InstanceBuffer::new(
                device,
                "Member",
                instances::INITIAL_SOLIDS,
                instances::MAX_SOLIDS,
            ),
            markers: InstanceBuffer::new(
                device,
                "Hole Marker",
                instances::INITIAL_MARKERS,
                instances::MAX_MARKERS,
            ),
            plate: InstanceBuffer::new(device, "Plate", 1, 1),
            applied: None,
        }
    }

    /// Upload a member mesh already built for `profile`, e.g. by the editor's
    /// own factory. `apply` only regenerates when the batch profile differs.
    pub fn set_mesh(&mut self, device: &wgpu::Device, profile: &ProfileParams, mesh: &TriangleMesh) {
        self.member_mesh = Some(GpuMesh::upload(device, "Member", mesh));
        self.member_key = Some(profile.key());
    }

    /// Upload `batch` unless this exact batch and selection are already resident.
    ///
    /// Returns whether anything was uploaded.
    pub fn apply(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        batch: &SceneBatch,
        selection: &SelectionSet,
    ) -> bool {
        let key = (batch.revision, selection_hash(selection));
        if self.applied == Some(key) {
            return false;
        }

        let profile_key = batch.profile.key();
        if self.member_key != Some(profile_key) {
            let mesh: Arc<TriangleMesh> = self.geometry.profile_mesh(&batch.profile);
            self.member_mesh = Some(GpuMesh::upload(device, "Member", &mesh));
            self.member_key = Some(profile_key);
        }

        let plate_key = batch.plate.as_ref().map(|p| p.key());
        if self.plate_key != plate_key {
            self.plate_mesh = batch
                .plate
                .as_ref()
                .map(|plate| GpuMesh::upload(device, "Plate", &self.geometry.plate_mesh(plate)));
            self.plate_key = plate_key;
        }

        let packed = pack_batch(batch, selection);
        self.solids.update(device, queue, &packed.solids());
        self.markers.update(device, queue, &packed.markers);
        match packed.plate {
            Some(plate) => self.plate.update(device, queue, &[plate]),
            None => self.plate.clear(),
        }

        tracing::debug!(
            "Applied batch {} ({} solids, {} markers)",
            batch.revision,
            self.solids.count(),
            self.markers.count()
        );
        self.applied = Some(key);
        true
    }

    /// Draw everything uploaded by the last `apply`
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(0, &self.bind_group, &[]);

        pass.set_pipeline(&self.solid_pipeline);
        if let Some(mesh) = &self.member_mesh {
            mesh.draw(pass, &self.solids);
        }
        self.marker_mesh.draw(pass, &self.markers);

        if let Some(mesh) = &self.plate_mesh {
            pass.set_pipeline(&self.plate_pipeline);
            mesh.draw(pass, &self.plate);
        }
    }
}
