//! Content bindings: where an element's text or image comes from.

use serde::{Deserialize, Serialize};

use crate::records::{BrandRecord, SkuRecord};

/// Source of an element's content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "camelCase")]
pub enum ContentBinding {
    /// Fixed text.
    Literal(String),
    /// Named text field of the SKU (title, price, generated copy...).
    SkuField(String),
    /// Named text field of the brand; `name` maps to the brand name.
    BrandField(String),
    /// Named image of the SKU.
    SkuImage(String),
    /// The brand logo.
    BrandLogo,
    /// Direct asset reference.
    Asset(String),
    #[default]
    None,
}

/// Content after binding resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedContent {
    Text(String),
    Image(String),
    Empty,
}

impl ResolvedContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            ResolvedContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            ResolvedContent::Image(r) => Some(r),
            _ => None,
        }
    }
}

impl ContentBinding {
    /// Resolves the binding against the brand and SKU records.
    ///
    /// Missing fields resolve to `Empty`; the element still paints its box.
    pub fn resolve(&self, brand: &BrandRecord, sku: &SkuRecord) -> ResolvedContent {
        let text = |v: Option<&String>| {
            v.map(|s| ResolvedContent::Text(s.clone()))
                .unwrap_or(ResolvedContent::Empty)
        };
        let image = |v: Option<&String>| {
            v.map(|s| ResolvedContent::Image(s.clone()))
                .unwrap_or(ResolvedContent::Empty)
        };
        match self {
            ContentBinding::Literal(s) => ResolvedContent::Text(s.clone()),
            ContentBinding::SkuField(field) if field == "name" => {
                ResolvedContent::Text(sku.name.clone())
            }
            ContentBinding::SkuField(field) => text(sku.fields.get(field)),
            ContentBinding::BrandField(field) if field == "name" => {
                ResolvedContent::Text(brand.name.clone())
            }
            ContentBinding::BrandField(field) => text(brand.fields.get(field)),
            ContentBinding::SkuImage(key) => image(sku.images.get(key)),
            ContentBinding::BrandLogo => image(brand.logo.as_ref()),
            ContentBinding::Asset(reference) => ResolvedContent::Image(reference.clone()),
            ContentBinding::None => ResolvedContent::Empty,
        }
    }
}
