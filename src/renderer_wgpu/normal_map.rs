use std::f64::consts::TAU;

use noise::{NoiseFn, Perlin};

pub const PROCEDURAL_SIZE: u32 = 256;
const PROCEDURAL_SEED: u32 = 1021;

/// Tangent-space normal map, RGBA8, blue pointing up.
pub struct NormalMap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl NormalMap {
    /// Seamlessly tiling ripple normals from fractal Perlin noise sampled on
    /// a 4D torus.
    pub fn procedural(size: u32, seed: u32) -> Self {
        let size = size.max(4);
        let side = size as usize;
        let perlin = Perlin::new(seed);

        let mut heights = vec![0.0_f64; side * side];
        for y in 0..side {
            for x in 0..side {
                let u = x as f64 / side as f64;
                let v = y as f64 / side as f64;
                heights[y * side + x] = torus_fbm(&perlin, u, v);
            }
        }

        let strength = 2.5;
        let mut rgba = Vec::with_capacity(side * side * 4);
        for y in 0..side {
            for x in 0..side {
                let left = heights[y * side + (x + side - 1) % side];
                let right = heights[y * side + (x + 1) % side];
                let down = heights[((y + side - 1) % side) * side + x];
                let up = heights[((y + 1) % side) * side + x];

                let nx = (left - right) * strength;
                let ny = (down - up) * strength;
                let len = (nx * nx + ny * ny + 1.0).sqrt();
                rgba.extend_from_slice(&[
                    encode(nx / len),
                    encode(ny / len),
                    encode(1.0 / len),
                    255,
                ]);
            }
        }

        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    pub fn fallback() -> Self {
        Self::procedural(PROCEDURAL_SIZE, PROCEDURAL_SEED)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let image = image::open(path)
            .with_context(|| format!("failed to open normal map {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_fallback(path: &std::path::Path) -> Self {
        if !path.exists() {
            log::info!("no normal map at {}, generating one", path.display());
            return Self::fallback();
        }
        match Self::load(path) {
            Ok(map) => {
                log::info!("loaded normal map {} ({}x{})", path.display(), map.width, map.height);
                map
            }
            Err(e) => {
                log::warn!("{e:#}, generating one");
                Self::fallback()
            }
        }
    }
}

fn torus_fbm(perlin: &Perlin, u: f64, v: f64) -> f64 {
    let (su, cu) = (u * TAU).sin_cos();
    let (sv, cv) = (v * TAU).sin_cos();

    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut radius = 1.0;
    for _ in 0..4 {
        total += amplitude * perlin.get([cu * radius, su * radius, cv * radius, sv * radius]);
        amplitude *= 0.5;
        radius *= 2.0;
    }
    total
}

fn encode(component: f64) -> u8 {
    ((component * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8
}

pub struct NormalMapTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    _texture: wgpu::Texture,
}

impl NormalMapTexture {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, map: &NormalMap) -> Self {
        let size = wgpu::Extent3d {
            width: map.width,
            height: map.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("water-normal-texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &map.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * map.width),
                rows_per_image: Some(map.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("water-normal-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            view,
            sampler,
            _texture: texture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_map_has_expected_layout() {
        let map = NormalMap::procedural(32, 7);
        assert_eq!(map.width, 32);
        assert_eq!(map.height, 32);
        assert_eq!(map.rgba.len(), 32 * 32 * 4);
    }

    #[test]
    fn normals_point_mostly_up() {
        let map = NormalMap::procedural(32, 7);
        for texel in map.rgba.chunks(4) {
            assert!(texel[2] >= 128, "blue channel {} should face up", texel[2]);
            assert_eq!(texel[3], 255);
        }
    }

    #[test]
    fn procedural_map_is_deterministic() {
        assert_eq!(
            NormalMap::procedural(16, 3).rgba,
            NormalMap::procedural(16, 3).rgba
        );
    }
}
