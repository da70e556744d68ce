use glam::Vec3;

use super::camera::OrbitCamera;
use super::material::{FrameBindGroup, FrameUniform, SkyUniform, WaterUniform};
use super::normal_map::{NormalMap, NormalMapTexture};
use super::pipeline::DepthTexture;
use super::reflection::{MirrorView, ReflectionTarget};
use super::sky_pass::SkyPass;
use super::water_pass::WaterPass;
use crate::scene_core::config::{SceneConfig, ToneMapping};
use crate::scene_core::tick::FrameParams;

/// Owns every GPU object in the scene: sky dome, water plane and the
/// reflection target the water samples.
pub struct SceneRenderer {
    config: SceneConfig,
    main_frame: FrameBindGroup,
    mirror_frame: FrameBindGroup,
    sky: SkyPass,
    water: WaterPass,
    reflection: ReflectionTarget,
    normals: NormalMapTexture,
    depth: DepthTexture,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_config: &wgpu::SurfaceConfiguration,
        config: &SceneConfig,
        normal_map: &NormalMap,
    ) -> Self {
        let format = surface_config.format;
        let frame_layout = FrameBindGroup::create_layout(device);
        let main_frame = FrameBindGroup::new(device, &frame_layout, "main-frame");
        let mirror_frame = FrameBindGroup::new(device, &frame_layout, "mirror-frame");

        let reflection = ReflectionTarget::new(device, format, config.water.texture_size);
        let normals = NormalMapTexture::new(device, queue, normal_map);

        let sky = SkyPass::new(device, format, &frame_layout, &config.sky);
        let water = WaterPass::new(
            device,
            format,
            &frame_layout,
            &config.water,
            &normals,
            &reflection,
        );

        log::info!(
            "scene created: water {}x{}, reflection {}px, sky scale {}",
            config.water.plane_size,
            config.water.plane_size,
            config.water.texture_size,
            config.sky.scale
        );

        Self {
            config: config.clone(),
            main_frame,
            mirror_frame,
            sky,
            water,
            reflection,
            normals,
            depth: DepthTexture::new(
                device,
                surface_config.width,
                surface_config.height,
                "scene-depth",
            ),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, surface_config: &wgpu::SurfaceConfiguration) {
        self.depth = DepthTexture::new(
            device,
            surface_config.width,
            surface_config.height,
            "scene-depth",
        );
    }

    pub fn set_normal_map(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, map: &NormalMap) {
        self.normals = NormalMapTexture::new(device, queue, map);
        self.water
            .set_normal_map(device, &self.normals, &self.reflection);
    }

    /// Push this tick's values into the uniform buffers.
    pub fn update_frame(
        &self,
        queue: &wgpu::Queue,
        camera: &OrbitCamera,
        aspect: f32,
        elapsed: f32,
        params: &FrameParams,
        water_sun_direction: Vec3,
    ) {
        let view_proj = camera.view_projection(aspect);
        let eye = camera.position();
        let time_of_day = params.time_of_day as f32;
        let renderer = &self.config.renderer;

        self.main_frame.update(
            queue,
            &FrameUniform::new(
                view_proj,
                eye,
                elapsed,
                time_of_day,
                renderer.tone_mapping,
                renderer.exposure,
            ),
        );

        // The reflection is sampled by the water, which tone maps it again.
        let mirror = MirrorView::new(view_proj, eye);
        self.mirror_frame.update(
            queue,
            &FrameUniform::new(
                mirror.view_proj,
                mirror.camera_position,
                elapsed,
                time_of_day,
                ToneMapping::None,
                1.0,
            ),
        );

        self.sky.update(
            queue,
            &SkyUniform::new(
                &self.config.sky,
                params.rayleigh as f32,
                params.sun_position.as_vec3(),
            ),
        );

        self.water.update(
            queue,
            &WaterUniform::new(
                &self.config.water,
                mirror.texture_matrix,
                water_sun_direction.normalize_or_zero(),
                params.water_time as f32,
            ),
        );
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("reflection-render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.reflection.view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.reflection.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sky.render(&mut pass, &self.mirror_frame.bind_group);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.water.render(&mut pass, &self.main_frame.bind_group);
        self.sky.render(&mut pass, &self.main_frame.bind_group);
    }
}
