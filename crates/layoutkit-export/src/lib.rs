//! # LayoutKit Export
//!
//! Turns resolved layouts into raster files: a single layout as PNG, JPEG or
//! WebP bytes, or an ordered batch of layouts as one zip archive where a
//! failing layout is reported and skipped.

pub mod archive;
pub mod naming;
pub mod options;
pub mod pipeline;

pub use archive::ArchiveBuilder;
pub use naming::{archive_file_name, layout_file_name, sanitize};
pub use options::{encode, ExportOptions, DEFAULT_QUALITY};
pub use layoutkit_core::BatchItemFailure;
pub use pipeline::{BatchExport, ExportPipeline, LayoutRequest};
