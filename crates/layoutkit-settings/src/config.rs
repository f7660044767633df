//! Configuration and settings management for LayoutKit
//!
//! Provides configuration file handling, settings management, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Editor settings (preview scale, grid, size limits, history)
//! - Canvas defaults
//! - Export defaults (scale, format, quality, output directory)
//! - Render settings (fonts, asset root)

use layoutkit_core::{CanvasSize, Error, ExportFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interactive editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Ratio of on-screen preview pixels to logical canvas units
    pub preview_scale: f64,
    /// Grid step in logical units (0 disables grid snapping)
    pub grid_step: f64,
    /// Minimum element width reachable by resizing
    pub min_width: f64,
    /// Minimum element height reachable by resizing
    pub min_height: f64,
    /// Size assumed for override-sourced bounds without width/height
    pub default_bounds_width: f64,
    pub default_bounds_height: f64,
    /// Delay before a history checkpoint is taken after an edit
    pub history_debounce_ms: u64,
    /// Maximum number of undo steps kept
    pub history_limit: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            preview_scale: 0.72,
            grid_step: 10.0,
            min_width: 50.0,
            min_height: 20.0,
            default_bounds_width: 100.0,
            default_bounds_height: 100.0,
            history_debounce_ms: 300,
            history_limit: 50,
        }
    }
}

impl EditorSettings {
    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }

    pub fn default_bounds_size(&self) -> (f64, f64) {
        (self.default_bounds_width, self.default_bounds_height)
    }
}

/// Canvas defaults for layouts that do not declare their own size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: CanvasSize::SQUARE.width,
            height: CanvasSize::SQUARE.height,
        }
    }
}

impl CanvasSettings {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }
}

/// Export defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output pixel multiplier relative to the logical canvas
    pub scale: f64,
    pub format: ExportFormat,
    /// Lossy encoder quality in 0..=1
    pub quality: f64,
    /// Default output directory
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            format: ExportFormat::Png,
            quality: 0.92,
            output_dir: dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Font family used when an element does not name one
    pub font_family: String,
    /// Explicit TTF/OTF file that takes precedence over system lookup
    pub font_path: Option<PathBuf>,
    /// Directory relative image references are resolved against
    pub asset_root: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            font_family: "Sans".to_string(),
            font_path: None,
            asset_root: PathBuf::from("."),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub canvas: CanvasSettings,
    pub export: ExportSettings,
    pub render: RenderSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location: `<config_dir>/layoutkit/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("layoutkit").join("config.toml"))
    }

    /// Loads the config at the default location, or defaults when absent
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other(
                "Config file must be .json or .toml".to_string(),
            ));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other(
                "Config file must be .json or .toml".to_string(),
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::other(format!("Failed to create config dir: {}", e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let editor = &self.editor;
        if !(editor.preview_scale > 0.0) {
            return Err(Error::other("Preview scale must be > 0".to_string()));
        }
        if editor.grid_step < 0.0 {
            return Err(Error::other("Grid step must be >= 0".to_string()));
        }
        if editor.min_width <= 0.0 || editor.min_height <= 0.0 {
            return Err(Error::other("Minimum element size must be > 0".to_string()));
        }
        if editor.default_bounds_width <= 0.0 || editor.default_bounds_height <= 0.0 {
            return Err(Error::other("Default bounds size must be > 0".to_string()));
        }
        if editor.history_limit == 0 {
            return Err(Error::other("History limit must be > 0".to_string()));
        }

        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(Error::other("Canvas dimensions must be > 0".to_string()));
        }

        if !(self.export.scale > 0.0 && self.export.scale <= 8.0) {
            return Err(Error::other("Export scale must be in (0, 8]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.export.quality) {
            return Err(Error::other("Export quality must be in [0, 1]".to_string()));
        }

        Ok(())
    }

    /// Merge another config into this one (only sections that differ from defaults)
    pub fn merge(&mut self, other: &Config) {
        if other.editor != EditorSettings::default() {
            self.editor = other.editor.clone();
        }
        if other.canvas != CanvasSettings::default() {
            self.canvas = other.canvas.clone();
        }
        if other.export != ExportSettings::default() {
            self.export = other.export.clone();
        }
        if other.render != RenderSettings::default() {
            self.render = other.render.clone();
        }
    }
}
