use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::scene_core::config::CameraConfig;

const POLAR_EPSILON: f32 = 1e-4;
const WHEEL_LINE_PIXELS: f32 = 100.0;

/// Perspective camera orbiting a target point in spherical coordinates.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +Z.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            fov_y_radians: 45.0f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(Vec3::from(config.position), Vec3::from(config.target));
        camera.fov_y_radians = config.fov_degrees.to_radians();
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let projection = Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far);
        projection * view
    }
}

/// Mouse-driven orbit controls with damping: left drag rotates, right drag
/// pans, the wheel zooms.
pub struct OrbitController {
    rotating: bool,
    panning: bool,
    last_cursor: Option<(f64, f64)>,
    theta_delta: f32,
    phi_delta: f32,
    pan_delta: Vec3,
    zoom_scale: f32,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            rotating: false,
            panning: false,
            last_cursor: None,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_delta: Vec3::ZERO,
            zoom_scale: 1.0,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    /// Feed a window event. `viewport_height` is in physical pixels and sets
    /// how far a drag rotates or pans.
    pub fn process_window_event(
        &mut self,
        event: &WindowEvent,
        camera: &OrbitCamera,
        viewport_height: f32,
    ) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.rotating = pressed,
                    MouseButton::Right => self.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = (position.x, position.y);
                let Some(last) = self.last_cursor.replace(current) else {
                    return;
                };
                let dx = (current.0 - last.0) as f32;
                let dy = (current.1 - last.1) as f32;
                if self.rotating {
                    self.rotate(dx, dy, viewport_height);
                } else if self.panning {
                    self.pan(dx, dy, camera, viewport_height);
                }
            }
            WindowEvent::CursorLeft { .. } => self.last_cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * WHEEL_LINE_PIXELS,
                    MouseScrollDelta::PixelDelta(d) => d.y as f32,
                };
                self.zoom(scroll);
            }
            _ => {}
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.theta_delta -= TAU * dx / height * self.rotate_speed;
        self.phi_delta -= TAU * dy / height * self.rotate_speed;
    }

    pub fn pan(&mut self, dx: f32, dy: f32, camera: &OrbitCamera, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let world_per_pixel = 2.0 * camera.radius * (camera.fov_y_radians * 0.5).tan() / height;
        self.pan_delta += camera.right() * (-dx * world_per_pixel);
        self.pan_delta += camera.up() * (dy * world_per_pixel);
    }

    /// Positive `scroll` (wheel up) moves the camera closer.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed);
        if scroll > 0.0 {
            self.zoom_scale *= step;
        } else {
            self.zoom_scale /= step;
        }
    }

    pub fn reset_inputs(&mut self) {
        self.rotating = false;
        self.panning = false;
        self.last_cursor = None;
    }

    /// Apply a damped share of the pending motion. Call once per frame.
    pub fn update_camera(&mut self, camera: &mut OrbitCamera) {
        let damping = if self.damping_factor > 0.0 {
            self.damping_factor
        } else {
            1.0
        };

        camera.theta = (camera.theta + self.theta_delta * damping).rem_euclid(TAU);
        camera.phi = (camera.phi + self.phi_delta * damping).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        camera.target += self.pan_delta * damping;
        camera.radius = (camera.radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);

        self.theta_delta *= 1.0 - damping;
        self.phi_delta *= 1.0 - damping;
        self.pan_delta *= 1.0 - damping;
        self.zoom_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitController, OrbitCamera) {
        let config = CameraConfig::default();
        (OrbitController::new(&config), OrbitCamera::from_config(&config))
    }

    #[test]
    fn spherical_round_trip_preserves_position() {
        let camera = OrbitCamera::new(Vec3::new(3.0, 2.5, 20.0), Vec3::ZERO);
        assert!((camera.position() - Vec3::new(3.0, 2.5, 20.0)).length() < 1e-4);
    }

    #[test]
    fn idle_controller_leaves_camera_still() {
        let (mut controller, mut camera) = setup();
        let before = camera.position();
        for _ in 0..10 {
            controller.update_camera(&mut camera);
        }
        assert!((camera.position() - before).length() < 1e-5);
    }

    #[test]
    fn damped_rotation_converges_to_full_delta() {
        let (mut controller, mut camera) = setup();
        let start = camera.theta;
        controller.rotate(-100.0, 0.0, 1000.0);

        controller.update_camera(&mut camera);
        let first_step = camera.theta - start;
        assert!(first_step > 0.0);

        for _ in 0..500 {
            controller.update_camera(&mut camera);
        }
        let expected = TAU * 100.0 / 1000.0;
        assert!(((camera.theta - start) - expected).abs() < 1e-3);
        assert!(first_step < expected * 0.1);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let (mut controller, mut camera) = setup();
        controller.damping_factor = 0.0;
        controller.rotate(0.0, 100_000.0, 100.0);
        controller.update_camera(&mut camera);
        assert!(camera.phi >= POLAR_EPSILON);
        controller.rotate(0.0, -200_000.0, 100.0);
        controller.update_camera(&mut camera);
        assert!(camera.phi <= PI - POLAR_EPSILON);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let (mut controller, mut camera) = setup();
        for _ in 0..500 {
            controller.zoom(1.0);
            controller.update_camera(&mut camera);
        }
        assert!((camera.radius - controller.min_distance).abs() < 1e-5);
        for _ in 0..1000 {
            controller.zoom(-1.0);
            controller.update_camera(&mut camera);
        }
        assert!((camera.radius - controller.max_distance).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_sideways() {
        let (mut controller, mut camera) = setup();
        controller.damping_factor = 0.0;
        let right = camera.right();
        controller.pan(-50.0, 0.0, &camera, 500.0);
        controller.update_camera(&mut camera);
        assert!(camera.target.dot(right) > 0.0);
    }
}
