//! Zoom and pan state of a raster shown inside a viewport.
//!
//! Screen coordinates relate to raster pixels by
//! `screen = pan + raster * scale`, where `scale = base_fit * zoom`.

use serde::Serialize;

use crate::geometry::Point2D;

use super::config::ViewportConfig;

/// Read-only view of the controller for surrounding chrome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewportSnapshot {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub base_fit: f64,
    pub scale: f64,
}

#[derive(Clone, Debug)]
pub struct ViewportController {
    zoom: f64,
    pan: Point2D,
    base_fit: f64,
    content: (f64, f64),
    viewport: (f64, f64),
    min_zoom: f64,
    max_zoom: f64,
    wheel_step: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

fn fit_scale(content: (f64, f64), viewport: (f64, f64)) -> f64 {
    let (rw, rh) = content;
    let (vw, vh) = viewport;
    if rw <= 0.0 || rh <= 0.0 || vw <= 0.0 || vh <= 0.0 {
        return 1.0;
    }
    (vw / rw).min(vh / rh)
}

/// Pan on one axis: centered when the content fits, otherwise kept within
/// `[viewport - content, 0]` so no edge enters the viewport.
fn clamp_axis(pan: f64, content: f64, viewport: f64) -> f64 {
    if content <= viewport {
        (viewport - content) / 2.0
    } else {
        pan.clamp(viewport - content, 0.0)
    }
}

impl ViewportController {
    pub fn new(config: &ViewportConfig) -> Self {
        let min_zoom = config.min_zoom.max(f64::MIN_POSITIVE);
        Self {
            zoom: min_zoom,
            pan: Point2D::default(),
            base_fit: 1.0,
            content: (0.0, 0.0),
            viewport: (0.0, 0.0),
            min_zoom,
            max_zoom: config.max_zoom.max(min_zoom),
            wheel_step: config.wheel_step,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point2D {
        self.pan
    }

    pub fn base_fit(&self) -> f64 {
        self.base_fit
    }

    pub fn scale(&self) -> f64 {
        self.base_fit * self.zoom
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    /// Scaled content size in screen pixels.
    pub fn content_size(&self) -> (f64, f64) {
        (self.content.0 * self.scale(), self.content.1 * self.scale())
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            zoom: self.zoom,
            pan_x: self.pan.x,
            pan_y: self.pan.y,
            base_fit: self.base_fit,
            scale: self.scale(),
        }
    }

    /// Fit the raster inside the viewport, reset zoom and center.
    pub fn fit_to_container(
        &mut self,
        raster_width: f64,
        raster_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) {
        self.content = (raster_width, raster_height);
        self.viewport = (viewport_width, viewport_height);
        self.base_fit = fit_scale(self.content, self.viewport);
        self.reset();
    }

    /// Viewport size changed: refit the base scale, keep zoom and the
    /// raster point at the viewport center.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        let center = Point2D::new(self.viewport.0 / 2.0, self.viewport.1 / 2.0);
        let focus = self.screen_to_raster(center);
        self.viewport = (viewport_width, viewport_height);
        self.base_fit = fit_scale(self.content, self.viewport);
        let scale = self.scale();
        self.pan = Point2D::new(
            viewport_width / 2.0 - focus.x * scale,
            viewport_height / 2.0 - focus.y * scale,
        );
        self.clamp_pan();
    }

    /// Zoom back to the fit scale, centered.
    pub fn reset(&mut self) {
        self.zoom = self.min_zoom;
        let (cw, ch) = self.content_size();
        self.pan = Point2D::new((self.viewport.0 - cw) / 2.0, (self.viewport.1 - ch) / 2.0);
        self.clamp_pan();
    }

    /// Zoom to `next` keeping the raster point under `cursor` fixed on screen.
    pub fn zoom_at(&mut self, next: f64, cursor: Point2D) {
        if !next.is_finite() {
            return;
        }
        let world = self.screen_to_raster(cursor);
        self.zoom = next.clamp(self.min_zoom, self.max_zoom);
        let scale = self.scale();
        self.pan = Point2D::new(cursor.x - world.x * scale, cursor.y - world.y * scale);
        self.clamp_pan();
    }

    /// Zoom anchored at the viewport center.
    pub fn set_zoom(&mut self, next: f64) {
        let center = Point2D::new(self.viewport.0 / 2.0, self.viewport.1 / 2.0);
        self.zoom_at(next, center);
    }

    /// Wheel zoom: `steps` notches of the configured step (negative zooms out).
    pub fn zoom_by_steps(&mut self, steps: f64, anchor: Point2D) {
        self.zoom_at(self.zoom + steps * self.wheel_step, anchor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
        self.clamp_pan();
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan = Point2D::new(x, y);
        self.clamp_pan();
    }

    pub fn clamp_pan(&mut self) {
        let (cw, ch) = self.content_size();
        self.pan.x = clamp_axis(self.pan.x, cw, self.viewport.0);
        self.pan.y = clamp_axis(self.pan.y, ch, self.viewport.1);
    }

    pub fn screen_to_raster(&self, p: Point2D) -> Point2D {
        let scale = self.scale();
        Point2D::new((p.x - self.pan.x) / scale, (p.y - self.pan.y) / scale)
    }

    pub fn raster_to_screen(&self, p: Point2D) -> Point2D {
        let scale = self.scale();
        Point2D::new(self.pan.x + p.x * scale, self.pan.y + p.y * scale)
    }

    /// Convert a screen-pixel distance to raster pixels at the current scale.
    pub fn screen_to_raster_distance(&self, d: f64) -> f64 {
        d / self.scale()
    }
}
