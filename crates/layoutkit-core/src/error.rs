//! Error handling for LayoutKit
//!
//! Provides error types for every layer of the layout engine:
//! - Geometry errors (resolution of spec + override data)
//! - Bounds errors (bounding-box lookup for editing operations)
//! - Gesture errors (interactive manipulation entry guards)
//! - Render errors (rasterization and encoding)
//! - Export errors (single-layout export failures surfaced to the caller)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::fmt;

use thiserror::Error;

/// Geometry resolution error type
///
/// Raised when the resolver has nothing to work from. Callers substitute a
/// template default instead of aborting the paint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Neither a base spec geometry nor an override exists for the element
    #[error("No geometry for element '{element_key}' in layout '{layout_key}'")]
    MissingGeometry {
        /// The layout the element was looked up in.
        layout_key: String,
        /// The element key that could not be resolved.
        element_key: String,
    },
}

/// Bounds lookup error type
///
/// Alignment and distribution skip elements that fail with this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    /// All three bounds sources were exhausted
    #[error("Bounds of element '{element_key}' could not be resolved")]
    UnresolvableBounds {
        /// The element key whose bounds are unknown.
        element_key: String,
    },
}

/// Reasons a gesture refused to start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureRejected {
    /// The editor is not in edit mode
    #[error("Editor is not in edit mode")]
    NotEditing,

    /// The target element is locked
    #[error("Element '{element_key}' is locked")]
    Locked {
        /// The locked element key.
        element_key: String,
    },

    /// The target is not the only selected element
    #[error("Element '{element_key}' is not the sole selection")]
    NotSoleSelection {
        /// The element the gesture was aimed at.
        element_key: String,
    },

    /// Another gesture is still in progress
    #[error("A {active} gesture is already active")]
    GestureActive {
        /// Name of the active gesture.
        active: &'static str,
    },

    /// The target element has no resolvable bounds
    #[error("Element '{element_key}' has no resolvable bounds")]
    NoBounds {
        /// The element key.
        element_key: String,
    },
}

/// Render error type
///
/// Represents failures while turning a resolved layout into raster bytes.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested layout type is not registered
    #[error("Unknown layout type: {layout_type}")]
    UnknownLayout {
        /// The layout type that was requested.
        layout_type: String,
    },

    /// The output surface could not be allocated
    #[error("Cannot allocate a {width}x{height} canvas")]
    InvalidCanvas {
        /// Requested pixel width.
        width: u32,
        /// Requested pixel height.
        height: u32,
    },

    /// Export scale outside the supported range
    #[error("Invalid export scale {scale}")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },

    /// A transform string failed to parse
    #[error("Invalid transform '{input}': {reason}")]
    InvalidTransform {
        /// The transform string.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An image asset could not be loaded or decoded
    #[error("Asset '{reference}' could not be loaded: {reason}")]
    Asset {
        /// The asset reference from the content binding.
        reference: String,
        /// The underlying failure.
        reason: String,
    },

    /// Encoding the raster to the target format failed
    #[error("Failed to encode {format}: {reason}")]
    Encode {
        /// Target format name.
        format: String,
        /// The underlying failure.
        reason: String,
    },

    /// Building the export archive failed
    #[error("Archive error: {reason}")]
    Archive {
        /// The underlying failure.
        reason: String,
    },

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {reason}")]
    Task {
        /// The join failure.
        reason: String,
    },
}

/// Export error type
///
/// The only error class surfaced to the user: a single-layout export failed.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Rendering one requested layout failed
    #[error("Failed to render layout '{layout}': {source}")]
    RenderFailure {
        /// Layout type or display name.
        layout: String,
        /// The render failure.
        #[source]
        source: RenderError,
    },

    /// No item of a batch succeeded, so there is nothing to archive
    #[error("Batch export produced no layouts ({} failed)", failures.len())]
    EmptyBatch {
        /// Every requested item with its reason, in request order.
        failures: Vec<BatchItemFailure>,
    },

    /// Archive assembly failed after the renders completed
    #[error(transparent)]
    Archive(RenderError),
}

/// A batch item that was left out of the archive. A report record, not an
/// error of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItemFailure {
    /// Display name of the requested layout.
    pub layout: String,
    pub reason: String,
}

impl fmt::Display for BatchItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.layout, self.reason)
    }
}

/// Main error type for LayoutKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Bounds error
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Gesture entry error
    #[error(transparent)]
    Gesture(#[from] GestureRejected),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error is recoverable locally by skipping the element
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::Geometry(_) | Error::Bounds(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_geometry_message() {
        let err = GeometryError::MissingGeometry {
            layout_key: "hero".into(),
            element_key: "headline".into(),
        };
        assert_eq!(
            err.to_string(),
            "No geometry for element 'headline' in layout 'hero'"
        );
    }

    #[test]
    fn test_skippable_classification() {
        let bounds: Error = BoundsError::UnresolvableBounds {
            element_key: "logo".into(),
        }
        .into();
        assert!(bounds.is_skippable());

        let export: Error = ExportError::RenderFailure {
            layout: "story".into(),
            source: RenderError::UnknownLayout {
                layout_type: "story".into(),
            },
        }
        .into();
        assert!(!export.is_skippable());
        assert!(export.is_export_error());
    }

    #[test]
    fn test_empty_batch_keeps_item_reasons() {
        let err = ExportError::EmptyBatch {
            failures: vec![
                BatchItemFailure {
                    layout: "Story".into(),
                    reason: "Unknown layout type: story".into(),
                },
                BatchItemFailure {
                    layout: "Square".into(),
                    reason: "bad transform".into(),
                },
            ],
        };
        assert_eq!(err.to_string(), "Batch export produced no layouts (2 failed)");
        if let ExportError::EmptyBatch { failures } = err {
            assert_eq!(failures[0].to_string(), "Story: Unknown layout type: story");
        }
    }
}
