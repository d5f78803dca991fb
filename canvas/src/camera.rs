#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{ZOOM_MAX, ZOOM_MIN};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport state for pan/zoom on the infinite board canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels and are never scaled by zoom.
/// `zoom` is a scale factor (1.0 = no zoom), always within
/// [`ZOOM_MIN`]..=[`ZOOM_MAX`] when changed through the methods below.
///
/// Zoom is anchored at the canvas origin: changing it leaves the pan offset
/// untouched, so content slides toward or away from the top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Add `delta` to the zoom factor, clamped to the allowed range. Returns the new zoom.
    pub fn adjust_zoom(&mut self, delta: f64) -> f64 {
        self.set_zoom(self.zoom + delta)
    }

    /// Set the zoom factor, clamped to the allowed range. Returns the new zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = if zoom.is_nan() { self.zoom } else { zoom.clamp(ZOOM_MIN, ZOOM_MAX) };
        self.zoom
    }

    /// Zoom as a whole percentage, for display next to the zoom buttons.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// Return to `{0, 0, 1}`. Called whenever the active board changes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
