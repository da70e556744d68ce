/// Drawing-buffer geometry derived from a resize event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub logical_width: f64,
    pub logical_height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    /// `device_pixel_ratio` is whatever the host reports; it is clamped to
    /// `max_pixel_ratio` and floored at a tiny positive value.
    pub fn new(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        Self {
            logical_width,
            logical_height,
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio, max_pixel_ratio),
        }
    }

    /// Build from a physical size and the scale factor that produced it.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            f64::from(width) / scale,
            f64::from(height) / scale,
            scale,
            max_pixel_ratio,
        )
    }

    pub fn aspect(&self) -> f64 {
        self.logical_width / self.logical_height
    }

    /// Drawing buffer size in pixels. Never zero, so it can configure a surface.
    pub fn buffer_size(&self) -> (u32, u32) {
        let w = (self.logical_width * self.pixel_ratio).round().max(1.0);
        let h = (self.logical_height * self.pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }
}

pub fn clamp_pixel_ratio(device_pixel_ratio: f64, max_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_nan() || device_pixel_ratio <= 0.0 {
        return 1.0_f64.min(max_pixel_ratio);
    }
    device_pixel_ratio.min(max_pixel_ratio)
}
