//! Looping ambient track. Playback exists only on the web build; native
//! builds keep the same facade and stay silent.

#[cfg(target_arch = "wasm32")]
mod web;

use crate::scene_core::config::AudioConfig;

pub struct AmbientAudio {
    enabled: bool,
    volume: f32,
    unlocked: bool,
    #[cfg(target_arch = "wasm32")]
    player: Option<web::WebAudioPlayer>,
}

impl AmbientAudio {
    pub fn new(config: &AudioConfig) -> Self {
        let volume = config.volume.clamp(0.0, 1.0);

        if !config.enabled {
            log::info!("ambient audio disabled by config");
            return Self::silent(volume);
        }

        #[cfg(target_arch = "wasm32")]
        {
            match web::WebAudioPlayer::start(&config.path, volume, config.looped) {
                Ok(player) => Self {
                    enabled: true,
                    volume,
                    unlocked: false,
                    player: Some(player),
                },
                Err(e) => {
                    log::warn!("failed to start ambient audio: {e:?}");
                    Self::silent(volume)
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            log::info!(
                "ambient audio ({}) plays on the web build only",
                config.path
            );
            Self {
                enabled: true,
                volume,
                unlocked: false,
            }
        }
    }

    fn silent(volume: f32) -> Self {
        Self {
            enabled: false,
            volume,
            unlocked: false,
            #[cfg(target_arch = "wasm32")]
            player: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Browsers keep audio suspended until a user gesture; call on every key
    /// or mouse press. Only the first call does anything.
    pub fn on_user_gesture(&mut self) {
        if !self.enabled || self.unlocked {
            return;
        }
        self.unlocked = true;

        #[cfg(target_arch = "wasm32")]
        if let Some(player) = &self.player {
            player.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_is_silent() {
        let config = AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        };
        let mut audio = AmbientAudio::new(&config);
        assert!(!audio.is_enabled());
        audio.on_user_gesture();
        assert!(!audio.unlocked);
    }

    #[test]
    fn volume_is_clamped() {
        let config = AudioConfig {
            volume: 3.0,
            ..AudioConfig::default()
        };
        assert_eq!(AmbientAudio::new(&config).volume(), 1.0);
    }

    #[test]
    fn first_gesture_unlocks_once() {
        let mut audio = AmbientAudio::new(&AudioConfig::default());
        assert!(audio.is_enabled());
        audio.on_user_gesture();
        assert!(audio.unlocked);
        audio.on_user_gesture();
        assert!(audio.unlocked);
    }
}
