use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::scene_core::config::{hex_to_rgb, SkyConfig, ToneMapping, WaterConfig};

#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// x: elapsed seconds, y: time of day.
    pub time: [f32; 4],
    /// x: tone mapping flag, y: exposure.
    pub tone: [f32; 4],
}

impl FrameUniform {
    pub fn new(
        view_proj: Mat4,
        camera_position: Vec3,
        elapsed: f32,
        time_of_day: f32,
        tone_mapping: ToneMapping,
        exposure: f32,
    ) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: [camera_position.x, camera_position.y, camera_position.z, 0.0],
            time: [elapsed, time_of_day, 0.0, 0.0],
            tone: [tone_mapping.shader_flag(), exposure, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
pub struct SkyUniform {
    pub sun_position: [f32; 4],
    /// turbidity, rayleigh, mie coefficient, mie directional g
    pub scattering: [f32; 4],
    /// x: dome scale.
    pub dome: [f32; 4],
}

impl SkyUniform {
    pub fn new(config: &SkyConfig, rayleigh: f32, sun_position: Vec3) -> Self {
        Self {
            sun_position: [sun_position.x, sun_position.y, sun_position.z, 0.0],
            scattering: [
                config.turbidity,
                rayleigh,
                config.mie_coefficient,
                config.mie_directional_g,
            ],
            dome: [config.scale, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Zeroable, Pod)]
pub struct WaterUniform {
    pub texture_matrix: [[f32; 4]; 4],
    /// xyz: sun direction, w: alpha.
    pub sun_direction: [f32; 4],
    /// xyz: sun color, w: distortion scale.
    pub sun_color: [f32; 4],
    /// xyz: water color, w: normal tiling.
    pub water_color: [f32; 4],
    /// x: scrolled time.
    pub time: [f32; 4],
}

impl WaterUniform {
    pub fn new(config: &WaterConfig, texture_matrix: Mat4, sun_direction: Vec3, time: f32) -> Self {
        let sun = hex_to_rgb(config.sun_color);
        let water = hex_to_rgb(config.water_color);
        Self {
            texture_matrix: texture_matrix.to_cols_array_2d(),
            sun_direction: [sun_direction.x, sun_direction.y, sun_direction.z, config.alpha],
            sun_color: [sun[0], sun[1], sun[2], config.distortion_scale],
            water_color: [water[0], water[1], water[2], config.size],
            time: [time, 0.0, 0.0, 0.0],
        }
    }
}

pub fn uniform_layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub struct FrameBindGroup {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrameBindGroup {
    pub fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        })
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let initial = FrameUniform::new(Mat4::IDENTITY, Vec3::ZERO, 0.0, 0.0, ToneMapping::None, 1.0);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-uniform-buffer")),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

pub struct SkyMaterial {
    pub layout: wgpu::BindGroupLayout,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl SkyMaterial {
    pub fn new(device: &wgpu::Device, config: &SkyConfig) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky-material-layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });

        // Sun starts on the horizon; the first tick overwrites it.
        let initial = SkyUniform::new(config, 0.0, Vec3::new(0.0, 0.0, 1.0));
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-material-buffer"),
            contents: bytemuck::cast_slice(&[initial]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky-material-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &SkyUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SkyUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<WaterUniform>() % 16, 0);
    }

    #[test]
    fn sky_uniform_packs_scattering_terms() {
        let uniform = SkyUniform::new(&SkyConfig::default(), 1.5, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(uniform.scattering, [10.0, 1.5, 0.005, 0.6]);
        assert_eq!(uniform.sun_position, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(uniform.dome[0], 45_000.0);
    }

    #[test]
    fn water_uniform_packs_config() {
        let uniform = WaterUniform::new(&WaterConfig::default(), Mat4::IDENTITY, Vec3::Y, 4.0);
        assert_eq!(uniform.sun_direction[3], 1.0);
        assert_eq!(uniform.sun_color, [1.0, 1.0, 1.0, 3.0]);
        assert_eq!(uniform.water_color[3], 10.0);
        assert_eq!(uniform.time[0], 4.0);
    }
}
