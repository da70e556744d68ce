pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Override values are entered in thousandths of a day.
pub const OVERRIDE_SCALE: f64 = 1000.0;

/// User-entered time-of-day override. Once set it can be replaced but never
/// cleared; NaN is a valid (if useless) value produced by unparsable input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeOverride(Option<f64>);

impl TimeOverride {
    pub fn set(&mut self, value: f64) {
        self.0 = Some(value);
    }

    pub fn get(&self) -> Option<f64> {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

/// Map an optional override or the wall clock to a time-of-day scalar.
///
/// Without an override the result is in `[0, 1)`. With one it is
/// `override / 1000`, unclamped.
pub fn resolve_time_of_day(time_override: Option<f64>, unix_seconds: f64) -> f64 {
    match time_override {
        Some(value) => value / OVERRIDE_SCALE,
        None => (unix_seconds % SECONDS_PER_DAY) / SECONDS_PER_DAY,
    }
}

/// Elapsed seconds since scene start. Only ever moves forward.
pub struct SceneClock {
    elapsed: f64,
}

impl SceneClock {
    pub fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    pub fn advance(&mut self, dt_seconds: f64) {
        if dt_seconds > 0.0 {
            self.elapsed += dt_seconds;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn unix_seconds_now() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn unix_seconds_now() -> f64 {
    use web_time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_wraps_once_per_day() {
        assert_eq!(resolve_time_of_day(None, 0.0), 0.0);
        assert!((resolve_time_of_day(None, 43_200.0) - 0.5).abs() < 1e-12);
        assert!((resolve_time_of_day(None, SECONDS_PER_DAY * 3.0 + 21_600.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn wall_clock_result_stays_in_unit_range() {
        for seconds in [0.0, 1.5, 86_399.999, 1_700_000_000.25, 2_000_000_123.0] {
            let t = resolve_time_of_day(None, seconds);
            assert!((0.0..1.0).contains(&t), "t={t} for {seconds}");
        }
    }

    #[test]
    fn override_takes_precedence_and_is_unclamped() {
        assert!((resolve_time_of_day(Some(250.0), 12_345.0) - 0.25).abs() < 1e-12);
        assert!((resolve_time_of_day(Some(43_200.0), 0.0) - 43.2).abs() < 1e-9);
        assert!(resolve_time_of_day(Some(-500.0), 0.0) < 0.0);
    }

    #[test]
    fn nan_override_propagates() {
        assert!(resolve_time_of_day(Some(f64::NAN), 100.0).is_nan());
    }

    #[test]
    fn override_can_be_replaced_but_stays_set() {
        let mut time_override = TimeOverride::default();
        assert!(!time_override.is_set());
        time_override.set(100.0);
        time_override.set(200.0);
        assert_eq!(time_override.get(), Some(200.0));
    }

    #[test]
    fn clock_ignores_negative_steps() {
        let mut clock = SceneClock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 1e-12);
    }
}
