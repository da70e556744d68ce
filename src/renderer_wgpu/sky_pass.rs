use super::geometry::{sky_cube, GpuMesh};
use super::material::{SkyMaterial, SkyUniform};
use super::pipeline::create_sky_pipeline;
use crate::scene_core::config::SkyConfig;

pub struct SkyPass {
    pipeline: wgpu::RenderPipeline,
    material: SkyMaterial,
    mesh: GpuMesh,
}

impl SkyPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        config: &SkyConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sky.wgsl").into()),
        });

        let material = SkyMaterial::new(device, config);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky-pipeline-layout"),
            bind_group_layouts: &[frame_layout, &material.layout],
            push_constant_ranges: &[],
        });

        let pipeline = create_sky_pipeline(device, format, &layout, &shader, "sky-pipeline");
        let mesh = GpuMesh::upload(device, &sky_cube(), "sky");

        Self {
            pipeline,
            material,
            mesh,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &SkyUniform) {
        self.material.update(queue, uniform);
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, frame: &'a wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, frame, &[]);
        pass.set_bind_group(1, &self.material.bind_group, &[]);
        self.mesh.draw(pass);
    }
}
