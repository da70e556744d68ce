use glam::DVec3;

use crate::scene_core::sky::SkyState;
use crate::scene_core::time::resolve_time_of_day;

/// Everything a tick reads from the outside world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub elapsed_seconds: f64,
    pub time_override: Option<f64>,
    pub unix_seconds: f64,
}

/// Shader-facing values produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub time_of_day: f64,
    pub orientation: f64,
    pub rayleigh: f64,
    pub sun_position: DVec3,
    pub water_time: f64,
}

/// Pure per-frame derivation: same inputs, same output.
pub fn compute_frame(inputs: &FrameInputs, water_time_scale: f64) -> FrameParams {
    let time_of_day = resolve_time_of_day(inputs.time_override, inputs.unix_seconds);
    let sky = SkyState::at(time_of_day);
    FrameParams {
        time_of_day,
        orientation: sky.orientation,
        rayleigh: sky.rayleigh,
        sun_position: sky.sun_position,
        water_time: inputs.elapsed_seconds * water_time_scale,
    }
}

/// Sun direction handed to the water shader. Tracks the sky sun, or holds
/// the first tick's sun when tracking is off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterSun {
    track: bool,
    frozen: Option<DVec3>,
}

impl WaterSun {
    pub fn new(track: bool) -> Self {
        Self {
            track,
            frozen: None,
        }
    }

    pub fn direction(&mut self, sky_sun: DVec3) -> DVec3 {
        if self.track {
            sky_sun
        } else {
            *self.frozen.get_or_insert(sky_sun)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(params: &FrameParams) -> [u64; 7] {
        [
            params.time_of_day.to_bits(),
            params.orientation.to_bits(),
            params.rayleigh.to_bits(),
            params.sun_position.x.to_bits(),
            params.sun_position.y.to_bits(),
            params.sun_position.z.to_bits(),
            params.water_time.to_bits(),
        ]
    }

    #[test]
    fn identical_inputs_are_bit_reproducible() {
        let cases = [
            FrameInputs {
                elapsed_seconds: 12.345,
                time_override: None,
                unix_seconds: 1_700_000_123.456,
            },
            FrameInputs {
                elapsed_seconds: 0.0,
                time_override: Some(43_200.0),
                unix_seconds: 5.0,
            },
        ];
        for inputs in cases {
            let a = compute_frame(&inputs, 0.8);
            let b = compute_frame(&inputs, 0.8);
            assert_eq!(bits(&a), bits(&b));
        }
    }

    #[test]
    fn water_time_scales_elapsed_seconds() {
        let inputs = FrameInputs {
            elapsed_seconds: 10.0,
            time_override: None,
            unix_seconds: 0.0,
        };
        assert!((compute_frame(&inputs, 0.8).water_time - 8.0).abs() < 1e-12);
        assert!((compute_frame(&inputs, 0.5).water_time - 5.0).abs() < 1e-12);
    }

    #[test]
    fn override_drives_sky_regardless_of_wall_clock() {
        let base = FrameInputs {
            elapsed_seconds: 1.0,
            time_override: Some(500.0),
            unix_seconds: 0.0,
        };
        let later = FrameInputs {
            unix_seconds: 40_000.0,
            ..base
        };
        let a = compute_frame(&base, 0.8);
        let b = compute_frame(&later, 0.8);
        assert_eq!(a.sun_position, b.sun_position);
        assert!((a.time_of_day - 0.5).abs() < 1e-12);
        assert!((a.sun_position.y - 1.0).abs() < 1e-9);
    }

    fn sun_at(time_override: f64) -> DVec3 {
        let inputs = FrameInputs {
            elapsed_seconds: 0.0,
            time_override: Some(time_override),
            unix_seconds: 0.0,
        };
        compute_frame(&inputs, 0.8).sun_position
    }

    #[test]
    fn tracking_water_sun_follows_the_sky() {
        let mut water_sun = WaterSun::new(true);
        for value in [100.0, 250.0, 600.0] {
            let sun = sun_at(value);
            assert_eq!(water_sun.direction(sun), sun);
        }
    }

    #[test]
    fn frozen_water_sun_keeps_the_first_tick() {
        let mut water_sun = WaterSun::new(false);
        let first = sun_at(100.0);
        assert_eq!(water_sun.direction(first), first);

        let later = sun_at(600.0);
        assert_ne!(first, later);
        assert_eq!(water_sun.direction(later), first);
    }
}
