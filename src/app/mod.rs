use anyhow::Result;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;
use winit::window::Window;

use crate::audio::AmbientAudio;
use crate::renderer_wgpu::camera::{OrbitCamera, OrbitController};
use crate::renderer_wgpu::egui_bridge::EguiBridge;
use crate::renderer_wgpu::egui_pass::EguiPass;
use crate::renderer_wgpu::gpu_context::GpuContext;
use crate::renderer_wgpu::normal_map::NormalMap;
use crate::renderer_wgpu::scene::SceneRenderer;
use crate::scene_core::command::CommandBox;
use crate::scene_core::config::SceneConfig;
use crate::scene_core::input::{route_input, InputKind, InputRoute};
use crate::scene_core::tick::{compute_frame, FrameInputs, WaterSun};
use crate::scene_core::time::{unix_seconds_now, SceneClock, TimeOverride};
use crate::scene_core::viewport::Viewport;
use crate::ui::command_box;

#[cfg(not(target_arch = "wasm32"))]
use crate::renderer_wgpu::asset_watcher::NormalMapWatcher;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

mod event_loop;

pub use event_loop::run_event_loop;
#[cfg(target_arch = "wasm32")]
pub use event_loop::run_event_loop_web;

pub struct AppState {
    window: &'static Window,
    gpu: GpuContext,
    scene: SceneRenderer,
    config: SceneConfig,
    camera: OrbitCamera,
    controller: OrbitController,
    viewport: Viewport,
    command_box: CommandBox,
    time_override: TimeOverride,
    clock: SceneClock,
    audio: AmbientAudio,
    egui_bridge: EguiBridge,
    egui_pass: EguiPass,
    water_sun: WaterSun,
    last_frame: Instant,
    frame_time_ms: f32,
    #[cfg(not(target_arch = "wasm32"))]
    normal_map_watcher: Option<NormalMapWatcher>,
}

impl AppState {
    pub async fn new(
        window: &'static Window,
        config: SceneConfig,
        time_override: Option<f64>,
    ) -> Result<Self> {
        let physical = window.inner_size();
        let scale_factor = window.scale_factor();
        let viewport = Viewport::from_physical(
            physical.width,
            physical.height,
            scale_factor,
            config.renderer.max_pixel_ratio,
        );
        let (buffer, pixels_per_point) = drawing_buffer(&viewport, physical, scale_factor);

        let gpu = GpuContext::new(window, buffer.0, buffer.1).await?;

        #[cfg(not(target_arch = "wasm32"))]
        let normal_map_path = std::path::PathBuf::from(&config.water.normal_map);
        #[cfg(not(target_arch = "wasm32"))]
        let normal_map = NormalMap::load_or_fallback(&normal_map_path);
        #[cfg(target_arch = "wasm32")]
        let normal_map = NormalMap::fallback();

        let scene = SceneRenderer::new(&gpu.device, &gpu.queue, &gpu.config, &config, &normal_map);

        let camera = OrbitCamera::from_config(&config.camera);
        let controller = OrbitController::new(&config.camera);

        let mut override_state = TimeOverride::default();
        if let Some(value) = time_override {
            log::info!("time override from launch options: {value}");
            override_state.set(value);
        }

        let audio = AmbientAudio::new(&config.audio);
        let egui_bridge = EguiBridge::new(
            pixels_per_point,
            scale_factor as f32,
            gpu.config.width,
            gpu.config.height,
        );
        let water_sun = WaterSun::new(config.water.track_sun);
        let egui_pass = EguiPass::new(&gpu.device, gpu.config.format);

        Ok(Self {
            window,
            gpu,
            scene,
            config,
            camera,
            controller,
            viewport,
            command_box: CommandBox::new(),
            time_override: override_state,
            clock: SceneClock::new(),
            audio,
            egui_bridge,
            egui_pass,
            water_sun,
            last_frame: Instant::now(),
            frame_time_ms: 0.0,
            #[cfg(not(target_arch = "wasm32"))]
            normal_map_watcher: NormalMapWatcher::start(&normal_map_path),
        })
    }

    fn process_window_event(&mut self, event: &WindowEvent) {
        if is_user_gesture(event) {
            self.audio.on_user_gesture();
        }

        match route_input(input_kind(event), self.egui_bridge.wants_keyboard_input()) {
            InputRoute::CommandBox => {
                self.command_box.slash_pressed(&mut self.time_override);
                self.controller.reset_inputs();
            }
            InputRoute::Overlay => {
                self.egui_bridge.on_window_event(event);
            }
            InputRoute::OverlayThenCamera => {
                if !self.egui_bridge.on_window_event(event) {
                    let height = self.window.inner_size().height as f32;
                    self.controller
                        .process_window_event(event, &self.camera, height);
                }
            }
        }
    }

    fn resize(&mut self, physical: PhysicalSize<u32>) {
        if physical.width == 0 || physical.height == 0 {
            return;
        }
        let scale_factor = self.window.scale_factor();
        self.viewport = Viewport::from_physical(
            physical.width,
            physical.height,
            scale_factor,
            self.config.renderer.max_pixel_ratio,
        );
        let ((width, height), pixels_per_point) =
            drawing_buffer(&self.viewport, physical, scale_factor);

        self.gpu.resize(width, height);
        self.scene.resize(&self.gpu.device, &self.gpu.config);
        self.egui_bridge.resize(
            self.gpu.config.width,
            self.gpu.config.height,
            pixels_per_point,
            scale_factor as f32,
        );
    }

    fn update(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        self.reload_normal_map_if_changed();

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.frame_time_ms = self.frame_time_ms * 0.94 + (dt as f32 * 1000.0) * 0.06;
        self.clock.advance(dt);

        let params = compute_frame(
            &FrameInputs {
                elapsed_seconds: self.clock.elapsed(),
                time_override: self.time_override.get(),
                unix_seconds: unix_seconds_now(),
            },
            f64::from(self.config.water.time_scale),
        );

        let water_sun = self.water_sun.direction(params.sun_position).as_vec3();

        self.controller.update_camera(&mut self.camera);

        self.scene.update_frame(
            &self.gpu.queue,
            &self.camera,
            self.viewport.aspect() as f32,
            self.clock.elapsed() as f32,
            &params,
            water_sun,
        );

        self.window.set_title(&format!(
            "ocean-scene | {:.1}ms ({:.0}fps) | time: {:.3}{} | rayleigh: {:.2}",
            self.frame_time_ms,
            1000.0 / self.frame_time_ms.max(0.01),
            params.time_of_day,
            if self.time_override.is_set() { " (override)" } else { "" },
            params.rayleigh,
        ));
    }

    fn render(&mut self) -> Result<(), SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ocean-scene-render-encoder"),
            });

        self.scene.render(&mut encoder, &view);

        let command_box = &mut self.command_box;
        let time_override = &mut self.time_override;
        self.egui_pass.run(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &view,
            [self.gpu.config.width, self.gpu.config.height],
            &mut self.egui_bridge,
            |ctx| command_box::show(ctx, command_box, time_override),
        );

        self.gpu.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn reload_normal_map_if_changed(&mut self) {
        let Some(path) = self
            .normal_map_watcher
            .as_ref()
            .and_then(NormalMapWatcher::latest_change)
        else {
            return;
        };

        match NormalMap::load(&path) {
            Ok(map) => {
                self.scene
                    .set_normal_map(&self.gpu.device, &self.gpu.queue, &map);
                log::info!("reloaded normal map {}", path.display());
            }
            Err(e) => log::warn!("keeping previous normal map: {e:#}"),
        }
    }
}

/// Surface size and egui scale for a viewport. The web canvas honours the
/// clamped pixel ratio; native swapchains must match the window.
#[cfg(target_arch = "wasm32")]
fn drawing_buffer(
    viewport: &Viewport,
    _physical: PhysicalSize<u32>,
    _scale_factor: f64,
) -> ((u32, u32), f32) {
    (viewport.buffer_size(), viewport.pixel_ratio as f32)
}

#[cfg(not(target_arch = "wasm32"))]
fn drawing_buffer(
    _viewport: &Viewport,
    physical: PhysicalSize<u32>,
    scale_factor: f64,
) -> ((u32, u32), f32) {
    (
        (physical.width.max(1), physical.height.max(1)),
        scale_factor as f32,
    )
}

fn input_kind(event: &WindowEvent) -> InputKind {
    match event {
        WindowEvent::KeyboardInput { event, .. }
            if event.state == ElementState::Pressed
                && !event.repeat
                && event.logical_key.as_ref() == Key::Character("/") =>
        {
            InputKind::Slash
        }
        WindowEvent::KeyboardInput { .. } | WindowEvent::ModifiersChanged(_) => InputKind::Keyboard,
        WindowEvent::CursorMoved { .. }
        | WindowEvent::CursorLeft { .. }
        | WindowEvent::MouseInput { .. }
        | WindowEvent::MouseWheel { .. } => InputKind::Pointer,
        _ => InputKind::Other,
    }
}

fn is_user_gesture(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => event.state == ElementState::Pressed,
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Pressed,
        _ => false,
    }
}
