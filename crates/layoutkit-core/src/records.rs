//! Brand and SKU records as delivered by the persistence service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::SkuDocument;
use crate::style::{BrandSlot, Color, ColorValue};

/// Brand colour palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandPalette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl BrandPalette {
    pub fn get(&self, slot: BrandSlot) -> Color {
        match slot {
            BrandSlot::Primary => self.primary,
            BrandSlot::Secondary => self.secondary,
            BrandSlot::Accent => self.accent,
        }
    }

    /// Resolves a template colour against this palette.
    pub fn resolve(&self, value: ColorValue) -> Color {
        match value {
            ColorValue::Fixed(color) => color,
            ColorValue::Brand(slot) => self.get(slot),
        }
    }
}

impl Default for BrandPalette {
    fn default() -> Self {
        Self {
            primary: Color::rgb(33, 33, 33),
            secondary: Color::WHITE,
            accent: Color::rgb(230, 81, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub palette: BrandPalette,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl BrandRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            palette: BrandPalette::default(),
            logo: None,
            font_family: None,
            fields: BTreeMap::new(),
        }
    }
}

/// A product with its copy, images and per-layout editing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(flatten)]
    pub document: SkuDocument,
}

impl SkuRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: BTreeMap::new(),
            images: BTreeMap::new(),
            document: SkuDocument::default(),
        }
    }
}
