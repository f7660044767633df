//! Per-SKU editing document: position overrides, custom elements and their
//! content overrides, keyed by layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::content::ContentBinding;
use crate::geometry::{Bounds, PartialGeometry};
use crate::style::{ContainerStyle, ElementKind, ImageStyle, TextStyle};

/// `elementKey -> override` for one layout.
pub type ElementOverrides = BTreeMap<String, PartialGeometry>;

/// `layoutKey -> elementKey -> override`.
pub type OverrideMap = BTreeMap<String, ElementOverrides>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomElementType {
    Text,
    Image,
    Container,
}

/// An element owned by one SKU with no template counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: CustomElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub content_binding: ContentBinding,
    /// Style record; must match `element_type` or it is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementKind>,
}

impl CustomElement {
    /// Creates an element with a fresh `custom-<uuid>` id.
    pub fn new(element_type: CustomElementType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Self::fresh_id(),
            element_type,
            x,
            y,
            width,
            height,
            rotation: None,
            z_index: 0,
            content_binding: ContentBinding::None,
            style: None,
        }
    }

    pub fn fresh_id() -> String {
        format!("custom-{}", Uuid::new_v4())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Style to paint with, falling back to the type's default style.
    pub fn kind(&self) -> ElementKind {
        match (&self.style, self.element_type) {
            (Some(k @ ElementKind::Text(_)), CustomElementType::Text)
            | (Some(k @ ElementKind::Image(_)), CustomElementType::Image)
            | (Some(k @ ElementKind::Container(_)), CustomElementType::Container) => k.clone(),
            (_, CustomElementType::Text) => ElementKind::Text(TextStyle::default()),
            (_, CustomElementType::Image) => ElementKind::Image(ImageStyle::default()),
            (_, CustomElementType::Container) => ElementKind::Container(ContainerStyle::default()),
        }
    }

    /// Writes the present fields of `patch` into the record.
    pub fn apply(&mut self, patch: &PartialGeometry) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = Some(r);
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
    }
}

/// The persisted editing state of one SKU.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDocument {
    #[serde(default)]
    pub position_overrides: OverrideMap,
    #[serde(default)]
    pub custom_elements: BTreeMap<String, Vec<CustomElement>>,
    #[serde(default)]
    pub custom_element_content: BTreeMap<String, String>,
}

impl SkuDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout_overrides(&self, layout_key: &str) -> Option<&ElementOverrides> {
        self.position_overrides.get(layout_key)
    }

    pub fn override_for(&self, layout_key: &str, element_key: &str) -> Option<&PartialGeometry> {
        self.position_overrides.get(layout_key)?.get(element_key)
    }

    /// Merges `patch` into the element's override.
    ///
    /// An override left with no fields is removed, as is an emptied layout entry.
    pub fn apply_override(&mut self, layout_key: &str, element_key: &str, patch: PartialGeometry) {
        let layout = self
            .position_overrides
            .entry(layout_key.to_string())
            .or_default();
        let merged = layout
            .get(element_key)
            .map(|existing| existing.merged(&patch))
            .unwrap_or(patch);
        if merged.is_empty() {
            layout.remove(element_key);
        } else {
            layout.insert(element_key.to_string(), merged);
        }
        if layout.is_empty() {
            self.position_overrides.remove(layout_key);
        }
    }

    /// Drops the element's override so the layout defaults apply again.
    pub fn clear_override(&mut self, layout_key: &str, element_key: &str) -> Option<PartialGeometry> {
        let layout = self.position_overrides.get_mut(layout_key)?;
        let removed = layout.remove(element_key);
        if layout.is_empty() {
            self.position_overrides.remove(layout_key);
        }
        removed
    }

    pub fn custom_elements(&self, layout_key: &str) -> &[CustomElement] {
        self.custom_elements
            .get(layout_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn custom_element(&self, layout_key: &str, id: &str) -> Option<&CustomElement> {
        self.custom_elements(layout_key).iter().find(|e| e.id == id)
    }

    pub fn custom_element_mut(&mut self, layout_key: &str, id: &str) -> Option<&mut CustomElement> {
        self.custom_elements
            .get_mut(layout_key)?
            .iter_mut()
            .find(|e| e.id == id)
    }

    pub fn is_custom(&self, layout_key: &str, key: &str) -> bool {
        self.custom_element(layout_key, key).is_some()
    }

    pub fn push_custom_element(&mut self, layout_key: &str, element: CustomElement) {
        self.custom_elements
            .entry(layout_key.to_string())
            .or_default()
            .push(element);
    }

    /// Removes a custom element together with its content override.
    pub fn remove_custom_element(&mut self, layout_key: &str, id: &str) -> Option<CustomElement> {
        let list = self.custom_elements.get_mut(layout_key)?;
        let index = list.iter().position(|e| e.id == id)?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.custom_elements.remove(layout_key);
        }
        self.custom_element_content.remove(id);
        Some(removed)
    }

    pub fn content_for(&self, id: &str) -> Option<&str> {
        self.custom_element_content.get(id).map(String::as_str)
    }

    pub fn set_content(&mut self, id: &str, text: impl Into<String>) {
        self.custom_element_content.insert(id.to_string(), text.into());
    }
}
