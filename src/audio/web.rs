use js_sys::ArrayBuffer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioContext, GainNode, Response};

/// Web Audio graph: buffer source -> gain -> destination.
pub struct WebAudioPlayer {
    ctx: AudioContext,
}

impl WebAudioPlayer {
    /// Builds the graph and starts fetching `path`. Playback begins once the
    /// track is decoded; it stays inaudible until the context is resumed.
    pub fn start(path: &str, volume: f32, looped: bool) -> Result<Self, JsValue> {
        let ctx = AudioContext::new()?;
        let gain = ctx.create_gain()?;
        gain.gain().set_value(volume);
        gain.connect_with_audio_node(&ctx.destination())?;

        let load_ctx = ctx.clone();
        let path = path.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match load_and_play(&load_ctx, &gain, &path, looped).await {
                Ok(()) => log::info!("ambient audio playing: {path}"),
                Err(e) => log::warn!("failed to load ambient audio {path}: {e:?}"),
            }
        });

        Ok(Self { ctx })
    }

    pub fn resume(&self) {
        let _ = self.ctx.resume();
    }
}

async fn load_and_play(
    ctx: &AudioContext,
    gain: &GainNode,
    path: &str,
    looped: bool,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }

    let bytes: ArrayBuffer = JsFuture::from(response.array_buffer()?).await?.dyn_into()?;
    let buffer: AudioBuffer = JsFuture::from(ctx.decode_audio_data(&bytes)?)
        .await?
        .dyn_into()?;

    let source = ctx.create_buffer_source()?;
    source.set_buffer(Some(&buffer));
    source.set_loop(looped);
    source.connect_with_audio_node(gain)?;
    source.start()?;
    Ok(())
}
