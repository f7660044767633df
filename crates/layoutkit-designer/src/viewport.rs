//! Preview viewport: conversion between on-screen editor pixels and logical
//! canvas units.
//!
//! The editor paints the canvas inside a scaling wrapper. Pointer deltas and
//! measured rectangles arrive in screen pixels and are divided by the preview
//! scale to get back to logical units.

use layoutkit_core::{Bounds, CanvasSize};

/// The preview transformation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    canvas: CanvasSize,
}

impl Viewport {
    /// Creates a viewport. Non-positive or non-finite scales fall back to 1.0.
    pub fn new(scale: f64, canvas: CanvasSize) -> Self {
        let scale = if scale > 0.0 && scale.is_finite() {
            scale
        } else {
            tracing::warn!(scale, "invalid preview scale, using 1.0");
            1.0
        };
        Self { scale, canvas }
    }

    /// Gets the preview scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Gets the logical canvas size.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Size of the scaled canvas on screen, in pixels.
    pub fn screen_size(&self) -> (f64, f64) {
        (
            self.canvas.width * self.scale,
            self.canvas.height * self.scale,
        )
    }

    /// Converts a screen-pixel delta to a logical delta.
    pub fn screen_delta_to_logical(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.scale, dy / self.scale)
    }

    /// Converts a logical point to wrapper-relative screen pixels.
    pub fn logical_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale, y * self.scale)
    }

    /// Converts a measured on-screen rectangle back to logical bounds.
    ///
    /// `node` and `wrapper_origin` are both in page pixels; the node position is
    /// taken relative to the wrapper.
    pub fn screen_rect_to_logical(
        &self,
        node: (f64, f64, f64, f64),
        wrapper_origin: (f64, f64),
    ) -> Bounds {
        let (x, y, w, h) = node;
        Bounds::new(
            (x - wrapper_origin.0) / self.scale,
            (y - wrapper_origin.1) / self.scale,
            w / self.scale,
            h / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_divides_by_scale() {
        let vp = Viewport::new(0.72, CanvasSize::SQUARE);
        let (dx, dy) = vp.screen_delta_to_logical(72.0, -36.0);
        assert!((dx - 100.0).abs() < 1e-9);
        assert!((dy + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_rect_relative_to_wrapper() {
        let vp = Viewport::new(0.5, CanvasSize::SQUARE);
        let b = vp.screen_rect_to_logical((110.0, 220.0, 50.0, 25.0), (10.0, 20.0));
        assert_eq!(b, Bounds::new(200.0, 400.0, 100.0, 50.0));
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let vp = Viewport::new(0.0, CanvasSize::SQUARE);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.screen_size(), (1080.0, 1080.0));
    }
}
