use lantern_engine::assets::{checker, toon_ramp};
use lantern_engine::controls::{ControlPanel, Controls, FramebufferView, PanelResponse};
use lantern_engine::core::{App, AppControl, FrameCtx};
use lantern_engine::post::PostProcessStage;
use lantern_engine::render::{
    GpuMesh, OffscreenTarget, PassFormats, SceneFrame, SceneRenderer, Shading, SurfaceDepth,
    Texture2d, TextureKind, SCENE_CLEAR,
};
use lantern_engine::scene::{Camera, CameraController, Transform};
use lantern_engine::ui::UiPainter;

use crate::config::{DemoConfig, ShadingChoice};

const BRICK: [u8; 4] = [156, 74, 52, 255];
const MORTAR: [u8; 4] = [200, 190, 176, 255];

/// GPU resources, created on the first frame.
struct Resources {
    mesh: GpuMesh,
    scene: SceneRenderer,
    offscreen: Option<OffscreenTarget>,
    /// Offscreen color image as seen by the settings window.
    framebuffer: Option<egui::TextureId>,
}

/// One shading demo: a spinning textured mesh, optionally post-processed.
pub struct ShadingDemo {
    config: DemoConfig,
    controls: Controls,
    panel: ControlPanel,

    camera: Camera,
    controller: CameraController,
    transform: Transform,
    show_preview: bool,

    resources: Option<Resources>,
    post: PostProcessStage,
    painter: UiPainter,
    depth: SurfaceDepth,
}

impl ShadingDemo {
    pub fn new(config: DemoConfig) -> Self {
        let panel = ControlPanel::new(config.panel);
        let controls = Controls::default();
        log::info!("{}: {}", config.title, panel.summary(&controls));

        Self {
            config,
            controls,
            panel,
            camera: Camera::default(),
            controller: CameraController::default(),
            transform: Transform::default(),
            show_preview: true,
            resources: None,
            post: PostProcessStage::new(),
            painter: UiPainter::new(),
            depth: SurfaceDepth::new(),
        }
    }

    fn ensure_resources(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.resources.is_some() {
            return;
        }

        let assets = &self.config.assets;
        let mesh = GpuMesh::new(device, "lantern scene mesh", &assets.mesh_or_sphere(self.config.mesh));

        let brick = || checker(256, 32, BRICK, MORTAR);
        let shading = match &self.config.shading {
            ShadingChoice::BlinnPhong { albedo } => Shading::BlinnPhong {
                albedo: Texture2d::from_image(
                    device,
                    queue,
                    "lantern albedo",
                    &assets.image_or(albedo, brick),
                    TextureKind::Color,
                ),
            },
            ShadingChoice::Toon { albedo, ramp } => Shading::Toon {
                albedo: Texture2d::from_image(
                    device,
                    queue,
                    "lantern albedo",
                    &assets.image_or(albedo, brick),
                    TextureKind::Color,
                ),
                ramp: Texture2d::from_image(
                    device,
                    queue,
                    "lantern toon ramp",
                    &assets.image_or(ramp, || toon_ramp(256, 3)),
                    TextureKind::Lookup,
                ),
            },
        };

        let offscreen = self.config.offscreen.map(|desc| OffscreenTarget::new(device, desc));
        let framebuffer = offscreen
            .as_ref()
            .and_then(OffscreenTarget::color_view)
            .map(|view| self.painter.register_view(device, view));

        self.resources = Some(Resources {
            mesh,
            scene: SceneRenderer::new(device, shading),
            offscreen,
            framebuffer,
        });
    }
}

impl App for ShadingDemo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;
        self.ensure_resources(ctx.gpu.device(), ctx.gpu.queue());

        let Self {
            config,
            controls,
            panel,
            camera,
            controller,
            transform,
            show_preview,
            resources,
            post,
            painter,
            depth,
        } = self;

        // ── Controls ──────────────────────────────────────────────────────
        let mut resp = if ctx.ui.wants_keyboard() {
            PanelResponse::default()
        } else {
            panel.handle(ctx.input, ctx.input_frame, controls)
        };
        let framebuffer = resources.as_ref().and_then(|res| {
            let offscreen = res.offscreen.as_ref()?;
            Some(FramebufferView {
                texture: res.framebuffer.unwrap_or_default(),
                aspect: offscreen.aspect(),
                status: offscreen.status(),
                visible: *show_preview,
            })
        });
        let ui_frame = ctx.build_ui(|egui| {
            resp = resp | panel.show(egui, &config.title, controls, framebuffer);
        });

        if resp.exit {
            return AppControl::Exit;
        }
        if resp.reset_camera {
            controller.reset(camera);
            log::info!("camera reset");
        }
        if resp.toggle_preview && config.offscreen.is_some() {
            *show_preview = !*show_preview;
            log::info!("framebuffer image: {}", if *show_preview { "on" } else { "off" });
        }

        // ── Update ────────────────────────────────────────────────────────
        controller.update(camera, ctx.input, ctx.input_frame, dt);
        transform.spin(dt);

        // ── Render ────────────────────────────────────────────────────────
        let Some(res) = resources.as_mut() else {
            painter.skip(ui_frame);
            return AppControl::Continue;
        };
        let palette = controls.palette.current();
        let mut painted = false;

        let control = ctx.render(|rctx, target| {
            match res.offscreen.as_ref() {
                Some(offscreen) => {
                    camera.aspect = offscreen.aspect();
                    let frame = SceneFrame { camera, transform, material: &controls.material, palette };
                    let formats = PassFormats {
                        color: offscreen.desc().color_format,
                        depth: offscreen.desc().depth_format,
                    };
                    if let Some(mut pass) = offscreen.bind(target, SCENE_CLEAR) {
                        res.scene.draw(rctx, &mut pass, formats, &res.mesh, &frame);
                    }
                    post.apply(rctx, target, &controls.effects, offscreen);
                }
                None => {
                    camera.aspect = rctx.surface_aspect();
                    let frame = SceneFrame { camera, transform, material: &controls.material, palette };
                    let formats = PassFormats {
                        color: rctx.surface_format,
                        depth: Some(SurfaceDepth::FORMAT),
                    };
                    let depth_view = depth.ensure(rctx.device, rctx.surface_size);
                    let mut pass =
                        target.begin_default_pass("lantern scene pass", Some(SCENE_CLEAR), Some(depth_view));
                    res.scene.draw(rctx, &mut pass, formats, &res.mesh, &frame);
                }
            }
            painter.paint(rctx, target, &ui_frame);
            painted = true;
        });

        if !painted {
            painter.skip(ui_frame);
        }
        control
    }
}
