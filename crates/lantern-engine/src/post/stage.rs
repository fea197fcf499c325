use std::collections::HashMap;

use crate::render::fullscreen_quad::{FullscreenQuad, QuadVertex};
use crate::render::offscreen::OffscreenTarget;
use crate::render::target::ActiveTarget;
use crate::render::{RenderCtx, RenderTarget};

use super::effect::{AberrationUniform, BlurUniform, EffectKind, EffectSettings};
use super::plan::PostPassPlan;

const VERTEX_SRC: &str = include_str!("shaders/fullscreen.wgsl");

fn fragment_src(kind: EffectKind) -> Option<&'static str> {
    match kind {
        EffectKind::None => Some(include_str!("shaders/passthrough.wgsl")),
        EffectKind::Grayscale => Some(include_str!("shaders/grayscale.wgsl")),
        EffectKind::Blur => Some(include_str!("shaders/blur.wgsl")),
        EffectKind::Inverse => Some(include_str!("shaders/inverse.wgsl")),
        EffectKind::ChromaticAberration => Some(include_str!("shaders/chromatic.wgsl")),
        EffectKind::Crt => None,
    }
}

/// Size of the uniform block a program reads at group 1, if any.
fn params_size(kind: EffectKind) -> Option<u64> {
    match kind {
        EffectKind::Blur => Some(std::mem::size_of::<BlurUniform>() as u64),
        EffectKind::ChromaticAberration => Some(std::mem::size_of::<AberrationUniform>() as u64),
        EffectKind::None | EffectKind::Grayscale | EffectKind::Inverse | EffectKind::Crt => None,
    }
}

struct Program {
    pipeline: wgpu::RenderPipeline,
    params: Option<(wgpu::Buffer, wgpu::BindGroup)>,
}

/// Draws the offscreen color image to the window through the active effect.
///
/// Programs are built lazily for the surface format and kept in a table keyed
/// by [`EffectKind`].
#[derive(Default)]
pub struct PostProcessStage {
    pipeline_format: Option<wgpu::TextureFormat>,
    programs: HashMap<EffectKind, Program>,

    source_layout: Option<wgpu::BindGroupLayout>,
    params_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    quad: Option<FullscreenQuad>,
}

impl PostProcessStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one post pass into the default target.
    ///
    /// The default target is always cleared to black. With an incomplete
    /// source nothing else is drawn.
    pub fn apply(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        settings: &EffectSettings,
        source: &OffscreenTarget,
    ) {
        debug_assert_eq!(target.active(), ActiveTarget::Default);

        self.ensure_shared(ctx);
        self.ensure_programs(ctx);

        let plan = PostPassPlan::new(settings, source.is_complete());

        let program = self.programs.get(&plan.program);
        if let (Some(program), Some(bytes)) = (program, plan.uniforms.as_bytes()) {
            if let Some((ubo, _)) = program.params.as_ref() {
                ctx.queue.write_buffer(ubo, 0, bytes);
            }
        }

        let source_group = source.color_view().and_then(|view| self.source_bind_group(ctx, view));

        let mut rpass = target.begin_default_pass("lantern post pass", Some(plan.clear), None);

        if !plan.draws_quad() {
            return;
        }
        let (Some(program), Some(source_group), Some(quad)) =
            (program, source_group.as_ref(), self.quad.as_ref())
        else {
            return;
        };

        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, source_group, &[]);
        if let Some((_, params_group)) = program.params.as_ref() {
            rpass.set_bind_group(1, params_group, &[]);
        }
        quad.draw(&mut rpass);
    }

    fn source_bind_group(
        &self,
        ctx: &RenderCtx<'_>,
        view: &wgpu::TextureView,
    ) -> Option<wgpu::BindGroup> {
        let layout = self.source_layout.as_ref()?;
        let sampler = self.sampler.as_ref()?;
        Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern post source bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
            ],
        }))
    }

    fn ensure_shared(&mut self, ctx: &RenderCtx<'_>) {
        if self.source_layout.is_some() {
            return;
        }

        self.source_layout = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("lantern post source bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                ],
            },
        ));

        self.params_layout = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("lantern post params bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        ));

        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lantern post sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        }));

        self.quad = Some(FullscreenQuad::new(ctx.device));
    }

    fn ensure_programs(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && !self.programs.is_empty() {
            return;
        }
        let (Some(source_layout), Some(params_layout)) =
            (self.source_layout.as_ref(), self.params_layout.as_ref())
        else {
            return;
        };

        self.programs.clear();
        for kind in EffectKind::ALL {
            let Some(fragment) = fragment_src(kind) else { continue };
            let program = build_program(ctx, kind, fragment, source_layout, params_layout);
            self.programs.insert(kind, program);
        }
        log::debug!(
            "post stage: built {} programs for {:?}",
            self.programs.len(),
            ctx.surface_format
        );
        self.pipeline_format = Some(ctx.surface_format);
    }
}

fn build_program(
    ctx: &RenderCtx<'_>,
    kind: EffectKind,
    fragment: &str,
    source_layout: &wgpu::BindGroupLayout,
    params_layout: &wgpu::BindGroupLayout,
) -> Program {
    let label = format!("lantern post {}", kind.label());
    let source = format!("{VERTEX_SRC}\n{fragment}");
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let params = params_size(kind).map(|size| {
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: params_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });
        (ubo, group)
    });

    let mut layouts = vec![source_layout];
    if params.is_some() {
        layouts.push(params_layout);
    }
    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&label),
        bind_group_layouts: &layouts,
        immediate_size: 0,
    });

    let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        // No depth test for the quad.
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    Program { pipeline, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_implemented_effect_has_a_program_source() {
        for kind in EffectKind::ALL {
            assert_eq!(fragment_src(kind).is_some(), kind.is_implemented(), "{kind}");
        }
    }

    #[test]
    fn param_blocks_only_for_parameterized_effects() {
        assert_eq!(params_size(EffectKind::Blur), Some(16));
        assert_eq!(params_size(EffectKind::ChromaticAberration), Some(32));
        assert_eq!(params_size(EffectKind::None), None);
        assert_eq!(params_size(EffectKind::Grayscale), None);
        assert_eq!(params_size(EffectKind::Inverse), None);
    }

    #[test]
    fn fragments_rely_on_shared_bindings() {
        assert!(VERTEX_SRC.contains("@group(0) @binding(0) var src_sampler"));
        assert!(VERTEX_SRC.contains("@group(0) @binding(1) var src_tex"));
        for kind in EffectKind::ALL {
            let Some(src) = fragment_src(kind) else { continue };
            assert!(src.contains("fn fs_main"));
            assert_eq!(src.contains("@group(1)"), params_size(kind).is_some(), "{kind}");
        }
    }

    // ── readback ──

    const SIZE: u32 = 64;
    /// Bytes per row of the readback buffer (copy alignment).
    const ROW: u32 = 256;

    fn create_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;
        let desc = wgpu::DeviceDescriptor {
            label: Some("post stage test device"),
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Default::default()
        };
        pollster::block_on(adapter.request_device(&desc)).ok()
    }

    /// Fills the offscreen image with `rgb`, runs the stage with `kind` into
    /// an `Rgba8Unorm` window stand-in and returns its center pixel.
    fn composite(device: &wgpu::Device, queue: &wgpu::Queue, kind: EffectKind, rgb: [u8; 3]) -> [u8; 4] {
        let format = wgpu::TextureFormat::Rgba8Unorm;
        let ctx = RenderCtx::new(device, queue, format, (SIZE, SIZE));
        let source = OffscreenTarget::new(device, crate::render::OffscreenDesc::new(SIZE, SIZE, false));

        let out = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("post stage test output"),
            size: wgpu::Extent3d { width: SIZE, height: SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let out_view = out.create_view(&wgpu::TextureViewDescriptor::default());
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("post stage test readback"),
            size: (ROW * SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut settings = EffectSettings::default();
        settings.select(kind).unwrap();
        let clear = wgpu::Color {
            r: rgb[0] as f64 / 255.0,
            g: rgb[1] as f64 / 255.0,
            b: rgb[2] as f64 / 255.0,
            a: 1.0,
        };

        let mut stage = PostProcessStage::new();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let mut target = RenderTarget::new(&mut encoder, &out_view);
            drop(source.bind(&mut target, clear));
            stage.apply(&ctx, &mut target, &settings, &source);
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &out,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(ROW),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d { width: SIZE, height: SIZE, depth_or_array_layers: 1 },
        );
        queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        slice.map_async(wgpu::MapMode::Read, |r| r.unwrap());
        device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
        let bytes = slice.get_mapped_range();
        let at = (SIZE / 2 * ROW + SIZE / 2 * 4) as usize;
        [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 3]) {
        for c in 0..3 {
            let diff = (actual[c] as i32 - expected[c] as i32).abs();
            assert!(diff <= 2, "channel {c}: got {actual:?}, expected {expected:?}");
        }
    }

    #[test]
    fn effects_operate_on_displayed_values() {
        let Some((device, queue)) = create_device_queue() else {
            eprintln!("No GPU adapter available, skipping test");
            return;
        };
        let color = [203, 231, 246];

        let passthrough = composite(&device, &queue, EffectKind::None, color);
        assert_near(passthrough, color);

        let inverse = composite(&device, &queue, EffectKind::Inverse, color);
        assert_near(inverse, [52, 24, 9]);
    }
}
