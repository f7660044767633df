//! # LayoutKit Core
//!
//! Core types for LayoutKit: the layout spec and per-SKU document data model,
//! element style classes, content bindings, brand/SKU records and the error
//! taxonomy shared by the designer and export crates.

pub mod content;
pub mod document;
pub mod error;
pub mod format;
pub mod geometry;
pub mod layout;
pub mod records;
pub mod style;

pub use content::{ContentBinding, ResolvedContent};
pub use document::{
    CustomElement, CustomElementType, ElementOverrides, OverrideMap, SkuDocument,
};
pub use error::{
    BatchItemFailure, BoundsError, Error, ExportError, GeometryError, GestureRejected,
    RenderError, Result,
};
pub use format::ExportFormat;
pub use geometry::{Bounds, CanvasSize, EffectiveGeometry, ElementGeometry, PartialGeometry};
pub use layout::{LayoutRegistry, LayoutSpec, SpecElement};
pub use records::{BrandPalette, BrandRecord, SkuRecord};
pub use style::{
    BackgroundStyle, BrandSlot, Color, ColorValue, ContainerStyle, ElementKind, ImageFit,
    ImageStyle, TextAlign, TextStyle,
};
