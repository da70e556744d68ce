// Binary entry point, native only.
// On wasm32 the cdylib entry point in lib.rs is used instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use winit::dpi::PhysicalSize;
    use winit::event_loop::EventLoop;
    use winit::window::WindowBuilder;

    use ocean_scene::app::{self, AppState};
    use ocean_scene::scene_core::config::SceneConfig;
    use ocean_scene::scene_core::launch::LaunchOptions;

    env_logger::init();
    let options = LaunchOptions::from_env_args()?;
    log::info!(
        "config: {}, time override: {:?}",
        options.config_path.display(),
        options.time_override
    );
    let config = SceneConfig::load(&options.config_path);

    let event_loop = EventLoop::new()?;

    let window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title("ocean-scene")
            .with_inner_size(PhysicalSize::new(1600, 900))
            .build(&event_loop)
            .context("failed to create window")?,
    ));

    let app = pollster::block_on(AppState::new(window, config, options.time_override))?;

    app::run_event_loop(app, event_loop)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Wasm entry point is #[wasm_bindgen(start)] in lib.rs.
}
