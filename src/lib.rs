//! # LayoutKit
//!
//! Composes branded marketing images for product SKUs. Each layout spec
//! describes a canvas of text, image, container and background elements; every
//! SKU can move, resize, rotate and add elements per layout without touching the
//! shared spec, and the result is exported as PNG, JPEG or WebP, alone or as a
//! zip of all layouts.
//!
//! ## Architecture
//!
//! LayoutKit is organized as a workspace with multiple crates:
//!
//! 1. **layoutkit-core** - Data model, records, style classes, errors
//! 2. **layoutkit-settings** - Configuration loading, validation and defaults
//! 3. **layoutkit-designer** - Geometry resolution, bounds, alignment,
//!    manipulation, history and rasterization
//! 4. **layoutkit-export** - Single and batch export, encoding, archives
//! 5. **layoutkit** - Logging setup and the command line binary

pub mod cli;

pub use layoutkit_core::{
    Bounds, BrandRecord, CustomElement, EffectiveGeometry, Error, ExportError, ExportFormat,
    LayoutRegistry, LayoutSpec, PartialGeometry, RenderError, Result, SkuDocument, SkuRecord,
};
pub use layoutkit_designer as designer;
pub use layoutkit_designer::{LayoutEditor, Renderer};
pub use layoutkit_export::{BatchExport, ExportOptions, ExportPipeline, LayoutRequest};
pub use layoutkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr so command output stays clean
/// - RUST_LOG environment variable support, `info` otherwise
/// - Target, level and line numbers on every event
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
