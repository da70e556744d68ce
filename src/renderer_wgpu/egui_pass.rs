use egui_wgpu::ScreenDescriptor;

use super::egui_bridge::EguiBridge;

/// Draws an egui frame on top of the already rendered scene.
pub struct EguiPass {
    renderer: egui_wgpu::Renderer,
}

impl EguiPass {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Self {
        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: false,
                ..Default::default()
            },
        );
        Self { renderer }
    }

    /// Run `build_ui` against the bridge's pending input and record the
    /// result into `encoder`.
    pub fn run(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        surface_size: [u32; 2],
        bridge: &mut EguiBridge,
        build_ui: impl FnMut(&egui::Context),
    ) {
        let raw_input = bridge.take_raw_input();
        let full_output = bridge.ctx().run(raw_input, build_ui);

        let screen = ScreenDescriptor {
            size_in_pixels: surface_size,
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let paint_jobs = bridge
            .ctx()
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui-render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static pass; it is dropped before the encoder is used again.
            self.renderer
                .render(&mut pass.forget_lifetime(), &paint_jobs, &screen);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
