//! Layout specs (templates) and the registry that loads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::content::ContentBinding;
use crate::geometry::{CanvasSize, ElementGeometry};
use crate::style::ElementKind;

/// One element of a layout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecElement {
    pub geometry: ElementGeometry,
    pub style: ElementKind,
    #[serde(default)]
    pub content: ContentBinding,
    /// Static base transform, e.g. `translate(0px, 4px) scale(1.1)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl SpecElement {
    pub fn new(geometry: ElementGeometry, style: ElementKind) -> Self {
        Self {
            geometry,
            style,
            content: ContentBinding::None,
            transform: None,
        }
    }

    pub fn with_content(mut self, content: ContentBinding) -> Self {
        self.content = content;
        self
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }
}

/// Immutable layout template: a canvas plus base element geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    /// Layout type, the key overrides are stored under.
    pub key: String,
    /// Display name used in export file names.
    pub name: String,
    #[serde(default)]
    pub canvas: CanvasSize,
    pub elements: BTreeMap<String, SpecElement>,
}

impl LayoutSpec {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            canvas: CanvasSize::default(),
            elements: BTreeMap::new(),
        }
    }

    pub fn with_element(mut self, key: impl Into<String>, element: SpecElement) -> Self {
        self.elements.insert(key.into(), element);
        self
    }

    pub fn element(&self, key: &str) -> Option<&SpecElement> {
        self.elements.get(key)
    }

    pub fn base_geometry(&self, key: &str) -> Option<&ElementGeometry> {
        self.elements.get(key).map(|e| &e.geometry)
    }
}

/// Layout registry - loads and caches layout specs by type
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, LayoutSpec>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self {
            layouts: BTreeMap::new(),
        }
    }

    /// Loads every `*.json` spec in `dir` on the default square canvas.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        Self::load_from_dir_with_canvas(dir, CanvasSize::SQUARE)
    }

    /// Loads every `*.json` spec in `dir`. Specs without a `canvas` get
    /// `default_canvas`. Unreadable or invalid files are logged and skipped.
    pub fn load_from_dir_with_canvas(
        dir: &Path,
        default_canvas: CanvasSize,
    ) -> Result<Self, std::io::Error> {
        let mut registry = Self::new();
        if !dir.exists() {
            warn!(dir = %dir.display(), "layout directory does not exist");
            return Ok(registry);
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|c| parse_spec(&c, default_canvas).map_err(|e| e.to_string()));
            match parsed {
                Ok(spec) => {
                    debug!(layout = %spec.key, path = %path.display(), "loaded layout spec");
                    registry.register(spec);
                }
                Err(reason) => warn!(path = %path.display(), %reason, "skipping layout spec"),
            }
        }
        Ok(registry)
    }

    pub fn get(&self, layout_type: &str) -> Option<&LayoutSpec> {
        self.layouts.get(layout_type)
    }

    /// All specs ordered by layout type.
    pub fn list(&self) -> Vec<&LayoutSpec> {
        self.layouts.values().collect()
    }

    pub fn register(&mut self, spec: LayoutSpec) {
        self.layouts.insert(spec.key.clone(), spec);
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

fn parse_spec(content: &str, default_canvas: CanvasSize) -> serde_json::Result<LayoutSpec> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    if let Some(fields) = value.as_object_mut() {
        if !fields.contains_key("canvas") {
            fields.insert("canvas".to_string(), serde_json::to_value(default_canvas)?);
        }
    }
    serde_json::from_value(value)
}
