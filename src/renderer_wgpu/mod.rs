#[cfg(not(target_arch = "wasm32"))]
pub mod asset_watcher;
pub mod camera;
pub mod egui_bridge;
pub mod egui_pass;
pub mod geometry;
pub mod gpu_context;
pub mod material;
pub mod normal_map;
pub mod pipeline;
pub mod reflection;
pub mod scene;

mod sky_pass;
mod water_pass;
