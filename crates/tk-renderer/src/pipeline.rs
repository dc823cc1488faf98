//! Render pipeline builder
//!
//! Every tubekit pipeline shares the same shape: one WGSL module with
//! `vs_main`/`fs_main`, the camera at group 0, a depth attachment and a
//! single color target. Only culling, depth writes and blending differ.

/// Settings for one render pipeline
pub struct PipelineConfig<'a> {
    /// Debug label prefix
    pub label: &'a str,
    /// WGSL source
    pub shader_source: &'a str,
    /// Color target format
    pub format: wgpu::TextureFormat,
    /// Depth attachment format
    pub depth_format: wgpu::TextureFormat,
    /// Bind group layouts, camera first
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Vertex then instance buffer layouts
    pub vertex_layouts: Vec<wgpu::VertexBufferLayout<'a>>,
    /// Face culling
    pub cull_mode: Option<wgpu::Face>,
    /// Whether fragments write depth
    pub depth_write: bool,
    /// Color blending
    pub blend: Option<wgpu::BlendState>,
}

impl<'a> PipelineConfig<'a> {
    /// Opaque defaults: back-face culling, depth write with `Less`, no blending
    pub fn new(
        label: &'a str,
        shader_source: &'a str,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    ) -> Self {
        Self {
            label,
            shader_source,
            format,
            depth_format,
            bind_group_layouts,
            vertex_layouts: Vec::new(),
            cull_mode: Some(wgpu::Face::Back),
            depth_write: true,
            blend: None,
        }
    }

    /// Set vertex buffer layouts
    pub fn with_vertex_layouts(mut self, layouts: Vec<wgpu::VertexBufferLayout<'a>>) -> Self {
        self.vertex_layouts = layouts;
        self
    }

    /// Set face culling
    pub fn with_cull_mode(mut self, cull_mode: Option<wgpu::Face>) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Alpha-blended and depth-tested without writing depth
    pub fn translucent(mut self) -> Self {
        self.depth_write = false;
        self.blend = Some(wgpu::BlendState::ALPHA_BLENDING);
        self
    }

    fn color_target(&self) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.format,
            blend: self.blend,
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    fn depth_stencil(&self) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: self.depth_format,
            depth_write_enabled: self.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }
    }

    /// Compile the shader and create the pipeline
    pub fn build(self, device: &wgpu::Device) -> wgpu::RenderPipeline {
        let label = self.label;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} Shader")),
            source: wgpu::ShaderSource::Wgsl(self.shader_source.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: self.bind_group_layouts,
            push_constant_ranges: &[],
        });
        let targets = [Some(self.color_target())];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} Pipeline")),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &self.vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &targets,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: self.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(self.depth_stencil()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Bind `buffer` as the camera uniform
pub fn create_camera_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Camera Bind Group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
