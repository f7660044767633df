//! Grid snapping and canvas clamping.

use layoutkit_core::CanvasSize;

/// Rounds `value` to the nearest multiple of `step`. A step of zero or less
/// disables snapping.
pub fn snap(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Clamps an origin so a `width` x `height` box stays inside the canvas.
///
/// A box larger than the canvas is pinned to the origin on that axis.
pub fn clamp_to_canvas(x: f64, y: f64, width: f64, height: f64, canvas: CanvasSize) -> (f64, f64) {
    let max_x = (canvas.width - width).max(0.0);
    let max_y = (canvas.height - height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Zeroes the smaller component so motion follows the dominant axis.
pub fn constrain_to_axis(dx: f64, dy: f64) -> (f64, f64) {
    if dx.abs() >= dy.abs() {
        (dx, 0.0)
    } else {
        (0.0, dy)
    }
}
