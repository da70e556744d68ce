use std::f64::consts::{PI, TAU};

use glam::DVec3;

/// Sun azimuth. Fixed, so `sun.x` never changes after bootstrap.
pub const SUN_PHI: f64 = TAU * (0.25 - 0.5);

pub fn orientation(time: f64) -> f64 {
    0.5 + time * 2.0
}

pub fn rayleigh(time: f64) -> f64 {
    (time * TAU).sin().abs() * 2.0
}

pub fn sun_theta(time: f64) -> f64 {
    PI * orientation(time)
}

pub fn sun_position(time: f64) -> DVec3 {
    let theta = sun_theta(time);
    DVec3::new(
        SUN_PHI.cos(),
        SUN_PHI.sin() * theta.sin(),
        SUN_PHI.sin() * theta.cos(),
    )
}

/// Per-tick sky inputs derived from the time-of-day scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyState {
    pub orientation: f64,
    pub rayleigh: f64,
    pub sun_position: DVec3,
}

impl SkyState {
    pub fn at(time: f64) -> Self {
        Self {
            orientation: orientation(time),
            rayleigh: rayleigh(time),
            sun_position: sun_position(time),
        }
    }

    /// Sun height above the horizon, in [-1, 1].
    pub fn sun_elevation(&self) -> f64 {
        self.sun_position.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn rayleigh_stays_within_bounds_over_a_day() {
        for i in 0..1000 {
            let t = i as f64 / 1000.0;
            let r = rayleigh(t);
            assert!((0.0..=2.0).contains(&r), "rayleigh({t}) = {r}");
        }
    }

    #[test]
    fn rayleigh_zeroes_and_peaks() {
        assert!(rayleigh(0.0).abs() < EPS);
        assert!(rayleigh(0.5).abs() < EPS);
        assert!(rayleigh(1.0).abs() < EPS);
        assert!((rayleigh(0.25) - 2.0).abs() < EPS);
        assert!((rayleigh(0.75) - 2.0).abs() < EPS);
    }

    #[test]
    fn orientation_is_linear_and_increasing() {
        assert_eq!(orientation(0.0), 0.5);
        assert!((orientation(0.999_999) - 2.5).abs() < 1e-5);
        let mut previous = orientation(0.0);
        for i in 1..100 {
            let next = orientation(i as f64 / 100.0);
            assert!(next > previous);
            assert!((next - previous - 0.02).abs() < EPS);
            previous = next;
        }
    }

    #[test]
    fn phi_is_minus_quarter_turn() {
        assert!((SUN_PHI + std::f64::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn sun_traces_unit_circle_in_yz_plane() {
        for i in 0..200 {
            let t = i as f64 / 200.0;
            let sun = sun_position(t);
            assert!(sun.x.abs() < EPS);
            let radius = (sun.y * sun.y + sun.z * sun.z).sqrt();
            assert!((radius - 1.0).abs() < EPS, "radius {radius} at {t}");
        }
    }

    #[test]
    fn sun_is_overhead_at_midday_and_underfoot_at_midnight() {
        assert!((sun_position(0.5).y - 1.0).abs() < EPS);
        assert!((sun_position(0.0).y + 1.0).abs() < EPS);
        assert!(SkyState::at(0.25).sun_elevation().abs() < EPS);
    }
}
