use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub sky: SkyConfig,
    pub water: WaterConfig,
    pub camera: CameraConfig,
    pub audio: AudioConfig,
    pub renderer: RendererConfig,
}

impl SceneConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        if !path.exists() {
            log::info!("no {} found, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                log::warn!("failed to parse {}: {e}, using defaults", path.display());
                Self::default()
            }),
            Err(e) => {
                log::warn!("failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        log::info!("loaded scene config");
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub scale: f32,
    pub turbidity: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            scale: 45_000.0,
            turbidity: 10.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub plane_size: f32,
    pub texture_size: u32,
    /// Normal map tiling, the `size` uniform.
    pub size: f32,
    pub alpha: f32,
    pub water_color: u32,
    pub sun_color: u32,
    pub distortion_scale: f32,
    /// Scroll speed multiplier applied to elapsed seconds.
    pub time_scale: f32,
    /// Feed the moving sun to the water each tick instead of freezing the
    /// bootstrap direction.
    pub track_sun: bool,
    pub normal_map: String,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            plane_size: 1000.0,
            texture_size: 512,
            size: 10.0,
            alpha: 1.0,
            water_color: 0x001122,
            sun_color: 0xffffff,
            distortion_scale: 3.0,
            time_scale: 0.8,
            track_sun: true,
            normal_map: "assets/textures/water/normals.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [3.0, 2.5, 20.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub path: String,
    pub volume: f32,
    pub looped: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "sounds/sea/waves.mp3".to_string(),
            volume: 0.08,
            looped: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    #[default]
    None,
    AcesFilmic,
}

impl ToneMapping {
    pub fn shader_flag(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::AcesFilmic => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub max_pixel_ratio: f64,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            tone_mapping: ToneMapping::None,
            exposure: 1.0,
        }
    }
}

/// Split a `0xRRGGBB` color into `[0, 1]` channels.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_bootstrap() {
        let config = SceneConfig::default();
        assert_eq!(config.sky.scale, 45_000.0);
        assert_eq!(config.sky.turbidity, 10.0);
        assert_eq!(config.water.plane_size, 1000.0);
        assert_eq!(config.water.texture_size, 512);
        assert_eq!(config.water.water_color, 0x001122);
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.position, [3.0, 2.5, 20.0]);
        assert_eq!(config.renderer.max_pixel_ratio, 2.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "water": { "time_scale": 0.5 }, "renderer": { "tone_mapping": "aces_filmic" } }"#,
        )
        .unwrap();
        assert_eq!(config.water.time_scale, 0.5);
        assert_eq!(config.water.distortion_scale, 3.0);
        assert_eq!(config.renderer.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(config.audio.volume, 0.08);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SceneConfig::from_json("{ sky: ").is_err());
    }

    #[test]
    fn hex_colors_split_into_channels() {
        assert_eq!(hex_to_rgb(0xffffff), [1.0, 1.0, 1.0]);
        let water = hex_to_rgb(0x001122);
        assert_eq!(water[0], 0.0);
        assert!((water[1] - 17.0 / 255.0).abs() < 1e-6);
        assert!((water[2] - 34.0 / 255.0).abs() < 1e-6);
    }
}
