use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use egui::epaint::{ImageDelta, Primitive, Vertex};

use crate::render::target::ActiveTarget;
use crate::render::{RenderCtx, RenderTarget};

use super::layer::UiFrame;

const SHADER_SRC: &str = include_str!("ui.wgsl");

/// Bytes per egui vertex: position, uv, packed sRGBA.
pub(crate) const VERTEX_STRIDE: u64 = 20;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Locals {
    screen_size: [f32; 2],
    _pad: [f32; 2],
}

/// Scissor rectangle in physical pixels, clamped to the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub fn new(clip: &egui::Rect, pixels_per_point: f32, target: (u32, u32)) -> Self {
        let to_px = |v: f32| (v * pixels_per_point).round().max(0.0) as u32;

        let min_x = to_px(clip.min.x).min(target.0);
        let min_y = to_px(clip.min.y).min(target.1);
        let max_x = to_px(clip.max.x).clamp(min_x, target.0);
        let max_y = to_px(clip.max.y).clamp(min_y, target.1);

        Self { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One indexed draw out of the packed buffers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawCall {
    pub texture: egui::TextureId,
    pub clip: egui::Rect,
    /// Element range in the index buffer.
    pub indices: Range<u32>,
    pub base_vertex: i32,
}

/// Packs every mesh primitive into one vertex and one index array.
/// Paint callbacks are not supported and are skipped.
pub(crate) fn pack_meshes(primitives: &[egui::ClippedPrimitive]) -> (Vec<Vertex>, Vec<u32>, Vec<DrawCall>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut calls = Vec::new();

    for prim in primitives {
        let Primitive::Mesh(mesh) = &prim.primitive else {
            log::trace!("ui paint callback skipped");
            continue;
        };
        if mesh.indices.is_empty() {
            continue;
        }
        let first = indices.len() as u32;
        calls.push(DrawCall {
            texture: mesh.texture_id,
            clip: prim.clip_rect,
            indices: first..first + mesh.indices.len() as u32,
            base_vertex: vertices.len() as i32,
        });
        indices.extend_from_slice(&mesh.indices);
        vertices.extend_from_slice(&mesh.vertices);
    }

    (vertices, indices, calls)
}

struct UiTexture {
    /// `None` for views registered from outside (not owned, not updatable).
    texture: Option<wgpu::Texture>,
    options: egui::TextureOptions,
    bind_group: wgpu::BindGroup,
}

struct GrowBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
}

/// Paints tessellated egui output over the finished frame.
///
/// GPU objects are built lazily for the surface format. Managed egui
/// textures (fonts, images) are uploaded from each frame's texture delta;
/// renderer-owned images are added with [`register_view`](Self::register_view).
#[derive(Default)]
pub struct UiPainter {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    locals_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    locals: Option<(wgpu::Buffer, wgpu::BindGroup)>,
    vertex: Option<GrowBuffer>,
    index: Option<GrowBuffer>,

    textures: HashMap<egui::TextureId, UiTexture>,
    samplers: HashMap<egui::TextureOptions, wgpu::Sampler>,
    next_user_id: u64,
    /// Texture changes from frames that were never painted.
    held: egui::TexturesDelta,
}

impl UiPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a texture view drawable from egui as an image.
    pub fn register_view(&mut self, device: &wgpu::Device, view: &wgpu::TextureView) -> egui::TextureId {
        self.ensure_layouts(device);
        let id = egui::TextureId::User(self.next_user_id);
        self.next_user_id += 1;

        let options = egui::TextureOptions::LINEAR;
        if let Some(bind_group) = self.texture_bind_group(device, view, options) {
            self.textures.insert(id, UiTexture { texture: None, options, bind_group });
        }
        id
    }

    /// Uploads texture changes, draws `frame` into the default target on top
    /// of what is there, then frees the textures egui released.
    pub fn paint(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &UiFrame) {
        debug_assert_eq!(target.active(), ActiveTarget::Default);

        self.ensure_layouts(ctx.device);
        self.ensure_pipeline(ctx);

        let held = std::mem::take(&mut self.held);
        for (id, delta) in &held.set {
            self.update_texture(ctx, *id, delta);
        }
        for id in &held.free {
            self.textures.remove(id);
        }
        for (id, delta) in &frame.textures_delta.set {
            self.update_texture(ctx, *id, delta);
        }

        let (vertices, indices, calls) = pack_meshes(&frame.primitives);
        if !calls.is_empty() {
            self.upload(ctx, frame, &vertices, &indices);
            self.draw(ctx, target, frame, &calls);
        }

        for id in &frame.textures_delta.free {
            self.textures.remove(id);
        }
    }

    /// Keeps the texture changes of a frame that was skipped so the next
    /// [`paint`](Self::paint) applies them.
    pub fn skip(&mut self, frame: UiFrame) {
        self.held.append(frame.textures_delta);
    }

    fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &UiFrame, calls: &[DrawCall]) {
        let (Some(pipeline), Some((_, locals_group)), Some(vertex), Some(index)) = (
            self.pipeline.as_ref(),
            self.locals.as_ref(),
            self.vertex.as_ref(),
            self.index.as_ref(),
        ) else {
            return;
        };

        let mut rpass = target.begin_default_pass("lantern ui pass", None, None);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, locals_group, &[]);
        rpass.set_vertex_buffer(0, vertex.buffer.slice(..));
        rpass.set_index_buffer(index.buffer.slice(..), wgpu::IndexFormat::Uint32);

        for call in calls {
            let rect = ScissorRect::new(&call.clip, frame.pixels_per_point, ctx.surface_size);
            if rect.is_empty() {
                continue;
            }
            let Some(texture) = self.textures.get(&call.texture) else {
                log::warn!("ui texture {:?} missing", call.texture);
                continue;
            };
            rpass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
            rpass.set_bind_group(1, &texture.bind_group, &[]);
            rpass.draw_indexed(call.indices.clone(), call.base_vertex, 0..1);
        }
    }

    fn upload(&mut self, ctx: &RenderCtx<'_>, frame: &UiFrame, vertices: &[Vertex], indices: &[u32]) {
        let ppp = frame.pixels_per_point.max(f32::EPSILON);
        let locals = Locals {
            screen_size: [ctx.surface_size.0 as f32 / ppp, ctx.surface_size.1 as f32 / ppp],
            _pad: [0.0; 2],
        };
        if let Some((ubo, _)) = self.locals.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&locals));
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);
        let vertex = grow(&mut self.vertex, ctx.device, "lantern ui vertices", wgpu::BufferUsages::VERTEX, vertex_bytes.len() as u64);
        ctx.queue.write_buffer(vertex, 0, vertex_bytes);
        let index = grow(&mut self.index, ctx.device, "lantern ui indices", wgpu::BufferUsages::INDEX, index_bytes.len() as u64);
        ctx.queue.write_buffer(index, 0, index_bytes);
    }

    fn update_texture(&mut self, ctx: &RenderCtx<'_>, id: egui::TextureId, delta: &ImageDelta) {
        let egui::ImageData::Color(image) = &delta.image;
        let [width, height] = image.size;
        let size = wgpu::Extent3d {
            width: width as u32,
            height: height as u32,
            depth_or_array_layers: 1,
        };

        let origin = match delta.pos {
            Some([x, y]) => {
                if self.textures.get(&id).is_some_and(|t| t.options != delta.options) {
                    self.rebind(ctx.device, id, delta.options);
                }
                wgpu::Origin3d { x: x as u32, y: y as u32, z: 0 }
            }
            None => {
                let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("lantern ui texture"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                });
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                let Some(bind_group) = self.texture_bind_group(ctx.device, &view, delta.options) else { return };
                self.textures.insert(id, UiTexture { texture: Some(texture), options: delta.options, bind_group });
                wgpu::Origin3d::ZERO
            }
        };

        let Some(texture) = self.textures.get(&id).and_then(|t| t.texture.as_ref()) else {
            log::warn!("ui texture {id:?} updated before it was created");
            return;
        };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(image.pixels.as_slice()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
    }

    fn rebind(&mut self, device: &wgpu::Device, id: egui::TextureId, options: egui::TextureOptions) {
        let Some(view) = self
            .textures
            .get(&id)
            .and_then(|t| t.texture.as_ref())
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
        else {
            return;
        };
        let Some(bind_group) = self.texture_bind_group(device, &view, options) else { return };
        if let Some(entry) = self.textures.get_mut(&id) {
            entry.bind_group = bind_group;
            entry.options = options;
        }
    }

    fn texture_bind_group(
        &mut self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
        options: egui::TextureOptions,
    ) -> Option<wgpu::BindGroup> {
        let sampler = self.samplers.entry(options).or_insert_with(|| create_sampler(device, options));
        let layout = self.texture_layout.as_ref()?;
        Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern ui texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }))
    }

    fn ensure_layouts(&mut self, device: &wgpu::Device) {
        if self.locals_layout.is_some() {
            return;
        }

        let locals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lantern ui locals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lantern ui texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern ui locals"),
            size: std::mem::size_of::<Locals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern ui locals bind group"),
            layout: &locals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.locals = Some((ubo, group));
        self.locals_layout = Some(locals_layout);
        self.texture_layout = Some(texture_layout);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let (Some(locals_layout), Some(texture_layout)) =
            (self.locals_layout.as_ref(), self.texture_layout.as_ref())
        else {
            return;
        };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lantern ui shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lantern ui pipeline layout"),
            bind_group_layouts: &[locals_layout, texture_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lantern ui pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Uint32],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(fragment_entry(ctx.surface_format)),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::OneMinusDstAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("ui painter: pipeline built for {:?}", ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.pipeline_format = Some(ctx.surface_format);
    }
}

/// egui colors are gamma-encoded; an sRGB target needs them linearized first.
fn fragment_entry(format: wgpu::TextureFormat) -> &'static str {
    if format.is_srgb() { "fs_linear" } else { "fs_gamma" }
}

fn create_sampler(device: &wgpu::Device, options: egui::TextureOptions) -> wgpu::Sampler {
    let filter = |f: egui::TextureFilter| match f {
        egui::TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        egui::TextureFilter::Linear => wgpu::FilterMode::Linear,
    };
    let address = match options.wrap_mode {
        egui::TextureWrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        egui::TextureWrapMode::Repeat => wgpu::AddressMode::Repeat,
        egui::TextureWrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("lantern ui sampler"),
        mag_filter: filter(options.magnification),
        min_filter: filter(options.minification),
        address_mode_u: address,
        address_mode_v: address,
        ..Default::default()
    })
}

/// Returns a buffer of at least `len` bytes, reallocating at the next power
/// of two when the current one is too small.
fn grow<'b>(
    slot: &'b mut Option<GrowBuffer>,
    device: &wgpu::Device,
    label: &str,
    usage: wgpu::BufferUsages,
    len: u64,
) -> &'b wgpu::Buffer {
    if slot.as_ref().is_some_and(|b| b.capacity < len) {
        *slot = None;
    }
    let grown = slot.get_or_insert_with(|| {
        let capacity = len.max(wgpu::COPY_BUFFER_ALIGNMENT).next_power_of_two();
        log::trace!("{label}: {capacity} bytes");
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        GrowBuffer { buffer, capacity }
    });
    &grown.buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Color32, Rect};

    fn mesh(texture: egui::TextureId, verts: usize, indices: &[u32]) -> egui::ClippedPrimitive {
        let mut m = egui::Mesh::with_texture(texture);
        m.vertices = vec![Vertex { pos: pos2(0.0, 0.0), uv: pos2(0.0, 0.0), color: Color32::WHITE }; verts];
        m.indices = indices.to_vec();
        egui::ClippedPrimitive {
            clip_rect: Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0)),
            primitive: Primitive::Mesh(m),
        }
    }

    // ── vertex layout ──

    #[test]
    fn egui_vertex_matches_pipeline_stride() {
        assert_eq!(std::mem::size_of::<Vertex>() as u64, VERTEX_STRIDE);
        assert_eq!(std::mem::size_of::<Locals>(), 16);
    }

    #[test]
    fn shader_entry_follows_target_encoding() {
        assert_eq!(fragment_entry(wgpu::TextureFormat::Bgra8Unorm), "fs_gamma");
        assert_eq!(fragment_entry(wgpu::TextureFormat::Bgra8UnormSrgb), "fs_linear");
        for entry in ["fn vs_main", "fn fs_gamma", "fn fs_linear"] {
            assert!(SHADER_SRC.contains(entry), "{entry}");
        }
    }

    // ── scissor ──

    #[test]
    fn scissor_scales_by_pixels_per_point() {
        let clip = Rect::from_min_max(pos2(10.0, 20.0), pos2(110.0, 70.0));
        let r = ScissorRect::new(&clip, 2.0, (1080, 720));
        assert_eq!(r, ScissorRect { x: 20, y: 40, width: 200, height: 100 });
    }

    #[test]
    fn scissor_clamps_to_target() {
        let clip = Rect::from_min_max(pos2(-50.0, 600.0), pos2(2000.0, 900.0));
        let r = ScissorRect::new(&clip, 1.0, (1080, 720));
        assert_eq!(r, ScissorRect { x: 0, y: 600, width: 1080, height: 120 });
    }

    #[test]
    fn scissor_outside_target_is_empty() {
        let clip = Rect::from_min_max(pos2(2000.0, 10.0), pos2(2100.0, 20.0));
        assert!(ScissorRect::new(&clip, 1.0, (1080, 720)).is_empty());
        assert!(ScissorRect::new(&Rect::NOTHING, 1.0, (1080, 720)).is_empty());
    }

    // ── packing ──

    #[test]
    fn meshes_pack_into_consecutive_ranges() {
        let font = egui::TextureId::Managed(0);
        let user = egui::TextureId::User(0);
        let prims = [mesh(font, 4, &[0, 1, 2, 2, 3, 0]), mesh(user, 3, &[0, 1, 2])];

        let (vertices, indices, calls) = pack_meshes(&prims);
        assert_eq!(vertices.len(), 7);
        assert_eq!(indices.len(), 9);
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].indices.clone(), calls[0].base_vertex), (0..6, 0));
        assert_eq!((calls[1].indices.clone(), calls[1].base_vertex), (6..9, 4));
        assert_eq!(calls[1].texture, user);
    }

    #[test]
    fn empty_meshes_draw_nothing() {
        let (vertices, indices, calls) = pack_meshes(&[mesh(egui::TextureId::Managed(0), 0, &[])]);
        assert!(vertices.is_empty() && indices.is_empty() && calls.is_empty());
    }

    // ── skipped frames ──

    fn ui_frame(ctx: &egui::Context) -> UiFrame {
        let raw = egui::RawInput {
            screen_rect: Some(Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))),
            ..Default::default()
        };
        let output = ctx.run(raw, |ctx| {
            egui::Window::new("Settings").show(ctx, |ui| {
                ui.label("Effect");
            });
        });
        UiFrame {
            primitives: ctx.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    #[test]
    fn skipped_frames_keep_their_texture_uploads() {
        let ctx = egui::Context::default();
        let mut painter = UiPainter::new();

        let first = ui_frame(&ctx);
        assert!(!first.textures_delta.set.is_empty());
        painter.skip(first);
        painter.skip(ui_frame(&ctx));

        assert!(painter.held.set.iter().any(|(id, _)| *id == egui::TextureId::default()));
    }
}
