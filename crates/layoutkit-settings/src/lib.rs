//! LayoutKit Settings Crate
//!
//! Handles application configuration and settings persistence.

pub mod config;

pub use config::{CanvasSettings, Config, EditorSettings, ExportSettings, RenderSettings};
