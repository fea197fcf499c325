use bytemuck::{Pod, Zeroable};

use crate::scene::{Camera, Material, Palette, Transform};

use super::mesh::{GpuMesh, MeshVertex};
use super::texture::Texture2d;
use super::RenderCtx;

/// Clear color of every scene pass.
pub const SCENE_CLEAR: wgpu::Color = wgpu::Color { r: 0.6, g: 0.8, b: 0.92, a: 1.0 };

const COMMON_SRC: &str = include_str!("shaders/scene_common.wgsl");

/// Lighting model plus the textures it samples.
pub enum Shading {
    BlinnPhong { albedo: Texture2d },
    Toon { albedo: Texture2d, ramp: Texture2d },
}

impl Shading {
    fn label(&self) -> &'static str {
        match self {
            Shading::BlinnPhong { .. } => "blinn-phong",
            Shading::Toon { .. } => "toon",
        }
    }

    fn fragment_src(&self) -> &'static str {
        match self {
            Shading::BlinnPhong { .. } => include_str!("shaders/blinnphong.wgsl"),
            Shading::Toon { .. } => include_str!("shaders/toon.wgsl"),
        }
    }

    /// Sampled textures in binding order; each takes a sampler slot then a view slot.
    fn textures(&self) -> Vec<&Texture2d> {
        match self {
            Shading::BlinnPhong { albedo } => vec![albedo],
            Shading::Toon { albedo, ramp } => vec![albedo, ramp],
        }
    }

    fn params_size(&self) -> u64 {
        match self {
            Shading::BlinnPhong { .. } => std::mem::size_of::<crate::scene::MaterialUniform>() as u64,
            Shading::Toon { .. } => std::mem::size_of::<crate::scene::PaletteUniform>() as u64,
        }
    }
}

/// Per-draw scene state.
pub struct SceneFrame<'a> {
    pub camera: &'a Camera,
    pub transform: &'a Transform,
    pub material: &'a Material,
    pub palette: &'a Palette,
}

/// Attachment formats of the pass the scene is drawn into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PassFormats {
    pub color: wgpu::TextureFormat,
    /// `None` disables the depth test.
    pub depth: Option<wgpu::TextureFormat>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 3],
    pub _pad: f32,
}

impl CameraUniform {
    pub fn new(camera: &Camera, transform: &Transform) -> Self {
        let model = transform.model_matrix();
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye_pos: camera.position.to_array(),
            _pad: 0.0,
        }
    }
}

/// Draws one textured mesh with depth test (Less) and back-face culling.
///
/// The caller owns the pass: an offscreen pass or a default-target pass with
/// a surface depth buffer. The pipeline is rebuilt when the pass formats change.
pub struct SceneRenderer {
    shading: Shading,

    pipeline_formats: Option<PassFormats>,
    pipeline: Option<wgpu::RenderPipeline>,

    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    camera_ubo: wgpu::Buffer,
    params_ubo: wgpu::Buffer,
    uniform_group: wgpu::BindGroup,
    texture_group: wgpu::BindGroup,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, shading: Shading) -> Self {
        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lantern scene uniforms bgl"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let textures = shading.textures();
        let mut texture_entries = Vec::with_capacity(textures.len() * 2);
        for i in 0..textures.len() as u32 {
            texture_entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 * i,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
            texture_entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 * i + 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
        }
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lantern scene textures bgl"),
            entries: &texture_entries,
        });

        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern scene camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern scene shading ubo"),
            size: shading.params_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern scene uniforms"),
            layout: &uniform_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: camera_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: params_ubo.as_entire_binding() },
            ],
        });

        let mut group_entries = Vec::with_capacity(textures.len() * 2);
        for (i, tex) in textures.iter().enumerate() {
            let i = i as u32;
            group_entries.push(wgpu::BindGroupEntry {
                binding: 2 * i,
                resource: wgpu::BindingResource::Sampler(&tex.sampler),
            });
            group_entries.push(wgpu::BindGroupEntry {
                binding: 2 * i + 1,
                resource: wgpu::BindingResource::TextureView(&tex.view),
            });
        }
        let texture_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern scene textures"),
            layout: &texture_layout,
            entries: &group_entries,
        });

        Self {
            shading,
            pipeline_formats: None,
            pipeline: None,
            uniform_layout,
            texture_layout,
            camera_ubo,
            params_ubo,
            uniform_group,
            texture_group,
        }
    }

    /// Uploads this frame's uniforms and draws `mesh` into `pass`.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        pass: &mut wgpu::RenderPass<'_>,
        formats: PassFormats,
        mesh: &GpuMesh,
        frame: &SceneFrame<'_>,
    ) {
        self.ensure_pipeline(ctx.device, formats);
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let camera = CameraUniform::new(frame.camera, frame.transform);
        ctx.queue.write_buffer(&self.camera_ubo, 0, bytemuck::bytes_of(&camera));
        match &self.shading {
            Shading::BlinnPhong { .. } => {
                let u = frame.material.uniform();
                ctx.queue.write_buffer(&self.params_ubo, 0, bytemuck::bytes_of(&u));
            }
            Shading::Toon { .. } => {
                let u = frame.palette.uniform();
                ctx.queue.write_buffer(&self.params_ubo, 0, bytemuck::bytes_of(&u));
            }
        }

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.uniform_group, &[]);
        pass.set_bind_group(1, &self.texture_group, &[]);
        mesh.draw(pass);
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, formats: PassFormats) {
        if self.pipeline_formats == Some(formats) && self.pipeline.is_some() {
            return;
        }

        let label = format!("lantern scene {}", self.shading.label());
        let source = format!("{COMMON_SRC}\n{}", self.shading.fragment_src());
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&label),
            bind_group_layouts: &[&self.uniform_layout, &self.texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: formats.color,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: formats.depth.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("scene pipeline built for {formats:?}");
        self.pipeline_formats = Some(formats);
        self.pipeline = Some(pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3, Vec4};

    #[test]
    fn camera_uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 208);
    }

    #[test]
    fn eye_position_is_camera_position() {
        let cam = Camera::default();
        let u = CameraUniform::new(&cam, &Transform::default());
        assert_eq!(u.eye_pos, [0.0, 0.0, 5.0]);
        assert_eq!(u.model, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let t = Transform { scale: Vec3::new(2.0, 1.0, 1.0), ..Default::default() };
        let u = CameraUniform::new(&Camera::default(), &t);
        let n = Mat4::from_cols_array_2d(&u.normal) * Vec4::new(1.0, 1.0, 0.0, 0.0);
        // Inverse-transpose of a 2x stretch halves x.
        assert!((n.x - 0.5).abs() < 1e-6 && (n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shaders_share_the_vertex_stage() {
        assert!(COMMON_SRC.contains("fn vs_main"));
        for src in [include_str!("shaders/blinnphong.wgsl"), include_str!("shaders/toon.wgsl")] {
            assert!(src.contains("fn fs_main"));
            assert!(!src.contains("fn vs_main"));
        }
    }
}
