use glam::{Mat4, Vec3};

use super::pipeline::DepthTexture;

/// Reflects across the y = 0 water plane.
pub const MIRROR_Y: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, -1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
]);

/// Maps clip space to reflection texture coordinates (y flipped for wgpu).
pub const CLIP_TO_UV: Mat4 = Mat4::from_cols_array(&[
    0.5, 0.0, 0.0, 0.0, //
    0.0, -0.5, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.5, 0.5, 0.0, 1.0,
]);

/// Camera mirrored across the water plane.
pub struct MirrorView {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    /// World position -> homogeneous reflection UV.
    pub texture_matrix: Mat4,
}

impl MirrorView {
    pub fn new(view_proj: Mat4, camera_position: Vec3) -> Self {
        let mirrored = view_proj * MIRROR_Y;
        Self {
            view_proj: mirrored,
            camera_position: camera_position * Vec3::new(1.0, -1.0, 1.0),
            texture_matrix: CLIP_TO_UV * mirrored,
        }
    }
}

/// Offscreen square target the mirrored sky is rendered into.
pub struct ReflectionTarget {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub depth: DepthTexture,
    _texture: wgpu::Texture,
}

impl ReflectionTarget {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: u32) -> Self {
        let size = size.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("water-reflection-texture"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("water-reflection-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            view,
            sampler,
            depth: DepthTexture::new(device, size, size, "water-reflection-depth"),
            _texture: texture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn camera() -> (Mat4, Vec3) {
        let eye = Vec3::new(3.0, 2.5, 20.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        (proj * view, eye)
    }

    #[test]
    fn points_on_the_plane_project_identically() {
        let (view_proj, eye) = camera();
        let mirror = MirrorView::new(view_proj, eye);
        let point = Vec4::new(4.0, 0.0, -7.0, 1.0);
        let a = view_proj * point;
        let b = mirror.view_proj * point;
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn mirrored_camera_sits_below_the_plane() {
        let (view_proj, eye) = camera();
        let mirror = MirrorView::new(view_proj, eye);
        assert_eq!(mirror.camera_position, Vec3::new(3.0, -2.5, 20.0));
    }

    #[test]
    fn screen_centre_maps_to_texture_centre() {
        let uv = CLIP_TO_UV * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert!((uv.x - 0.5).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);
        let top_left = CLIP_TO_UV * Vec4::new(-1.0, 1.0, 0.5, 1.0);
        assert!(top_left.x.abs() < 1e-6);
        assert!(top_left.y.abs() < 1e-6);
    }
}
