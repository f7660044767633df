//! Bounds lookup for editing operations.
//!
//! Bounds come from the first of three sources that knows the element:
//! the custom-element record, the element's position override, or a
//! measurement of the painted preview surface.

use std::collections::HashMap;

use layoutkit_core::{Bounds, BoundsError, LayoutSpec, SkuDocument};

use crate::resolver;
use crate::viewport::Viewport;

/// Where a bounds lookup was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsSource {
    CustomElement,
    Override,
    Surface,
}

/// A mounted preview surface that can report where it painted each node.
///
/// Rectangles are `(x, y, width, height)` in page pixels.
pub trait RenderedSurface {
    fn node_rect(&self, element_key: &str) -> Option<(f64, f64, f64, f64)>;

    /// Page-pixel origin of the scaling wrapper the canvas is painted in.
    fn wrapper_origin(&self) -> Option<(f64, f64)>;
}

/// Node rectangles recorded while painting a preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuredSurface {
    origin: (f64, f64),
    nodes: HashMap<String, (f64, f64, f64, f64)>,
}

impl MeasuredSurface {
    pub fn new(origin: (f64, f64)) -> Self {
        Self {
            origin,
            nodes: HashMap::new(),
        }
    }

    pub fn record(&mut self, element_key: impl Into<String>, rect: (f64, f64, f64, f64)) {
        self.nodes.insert(element_key.into(), rect);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl RenderedSurface for MeasuredSurface {
    fn node_rect(&self, element_key: &str) -> Option<(f64, f64, f64, f64)> {
        self.nodes.get(element_key).copied()
    }

    fn wrapper_origin(&self) -> Option<(f64, f64)> {
        Some(self.origin)
    }
}

/// Answers `bounds_of` queries for one layout of one SKU.
pub struct BoundsProvider<'a> {
    layout_key: &'a str,
    spec: Option<&'a LayoutSpec>,
    document: &'a SkuDocument,
    viewport: Viewport,
    default_size: (f64, f64),
    surface: Option<&'a dyn RenderedSurface>,
}

impl<'a> BoundsProvider<'a> {
    pub fn new(
        layout_key: &'a str,
        document: &'a SkuDocument,
        viewport: Viewport,
        default_size: (f64, f64),
    ) -> Self {
        Self {
            layout_key,
            spec: None,
            document,
            viewport,
            default_size,
            surface: None,
        }
    }

    /// Supplies spec base geometry for override-sourced bounds.
    pub fn with_spec(mut self, spec: &'a LayoutSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Enables the live measurement source.
    pub fn with_surface(mut self, surface: &'a dyn RenderedSurface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Bounds of `element_key`, or `None` when no source knows it.
    pub fn bounds_of(&self, element_key: &str) -> Option<Bounds> {
        self.locate(element_key).map(|(bounds, _)| bounds)
    }

    /// Like [`Self::bounds_of`] but reports the miss as an error.
    pub fn try_bounds_of(&self, element_key: &str) -> Result<Bounds, BoundsError> {
        self.bounds_of(element_key)
            .ok_or_else(|| BoundsError::UnresolvableBounds {
                element_key: element_key.to_string(),
            })
    }

    /// Bounds together with the source that produced them.
    pub fn locate(&self, element_key: &str) -> Option<(Bounds, BoundsSource)> {
        if let Some(custom) = self.document.custom_element(self.layout_key, element_key) {
            return Some((custom.bounds(), BoundsSource::CustomElement));
        }

        if self
            .document
            .override_for(self.layout_key, element_key)
            .is_some()
        {
            let base = self.spec.and_then(|s| s.base_geometry(element_key));
            if let Ok(effective) = resolver::resolve(
                self.layout_key,
                element_key,
                base,
                &self.document.position_overrides,
            ) {
                return Some((effective.bounds_or(self.default_size), BoundsSource::Override));
            }
        }

        if let Some(bounds) = self.measure(element_key) {
            return Some((bounds, BoundsSource::Surface));
        }

        tracing::debug!(
            layout = self.layout_key,
            element = element_key,
            "no bounds source resolved"
        );
        None
    }

    fn measure(&self, element_key: &str) -> Option<Bounds> {
        let surface = self.surface?;
        let node = surface.node_rect(element_key)?;
        let origin = surface.wrapper_origin()?;
        Some(self.viewport.screen_rect_to_logical(node, origin))
    }
}
