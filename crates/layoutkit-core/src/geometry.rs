//! Geometry records shared by every layer.
//!
//! All values are logical canvas units. The on-screen preview scale never
//! leaks into these types.

use serde::{Deserialize, Serialize};

/// Logical canvas size of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Square canvas used by every social layout template.
    pub const SQUARE: CanvasSize = CanvasSize {
        width: 1080.0,
        height: 1080.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::SQUARE
    }
}

/// Base geometry of a template element, as authored in the layout spec.
///
/// `width`/`height` of `None` mean "intrinsic": the painted element sizes to
/// its content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementGeometry {
    pub top: f64,
    pub left: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl ElementGeometry {
    pub fn new(left: f64, top: f64) -> Self {
        Self {
            top,
            left,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// Per-SKU partial geometry patch for one element of one layout.
///
/// Every present field wins over the layout default; absent fields fall through.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl PartialGeometry {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    /// An override with every field absent is equivalent to no override.
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.rotation.is_none()
            && self.z_index.is_none()
    }

    /// Layers `patch` on top of `self`; fields present in `patch` win.
    pub fn merged(&self, patch: &PartialGeometry) -> PartialGeometry {
        PartialGeometry {
            x: patch.x.or(self.x),
            y: patch.y.or(self.y),
            width: patch.width.or(self.width),
            height: patch.height.or(self.height),
            rotation: patch.rotation.or(self.rotation),
            z_index: patch.z_index.or(self.z_index),
        }
    }
}

/// Resolved geometry consumed by the painter and the bounds provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveGeometry {
    pub top: f64,
    pub left: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: i32,
    pub rotation: f64,
}

impl EffectiveGeometry {
    /// Bounds using `fallback` for any unset dimension.
    pub fn bounds_or(&self, fallback: (f64, f64)) -> Bounds {
        Bounds::new(
            self.left,
            self.top,
            self.width.unwrap_or(fallback.0),
            self.height.unwrap_or(fallback.1),
        )
    }
}

/// Axis-aligned box of a painted element in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub right: f64,
    pub bottom: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            right: x + width,
            bottom: y + height,
            center_x: x + width / 2.0,
            center_y: y + height / 2.0,
        }
    }

    /// Same size, new origin.
    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right && y >= self.y && y <= self.bottom
    }
}
