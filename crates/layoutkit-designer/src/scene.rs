//! Scene building: a layout spec plus one SKU's document becomes the ordered
//! list of nodes the rasterizer paints.

use layoutkit_core::{
    BrandPalette, BrandRecord, CanvasSize, ContentBinding, EffectiveGeometry, ElementKind,
    LayoutSpec, ResolvedContent, SkuRecord,
};

use crate::resolver;
use crate::transform;

/// One painted element.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub key: String,
    pub kind: ElementKind,
    pub geometry: EffectiveGeometry,
    /// Composed base transform and rotation.
    pub transform: Option<String>,
    pub content: ResolvedContent,
    pub custom: bool,
}

/// A fully resolved layout instance, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub layout_key: String,
    pub canvas: CanvasSize,
    pub palette: BrandPalette,
    pub font_family: Option<String>,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn node(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }
}

/// Resolves every spec element and custom element of `spec` for `sku`.
///
/// Nodes are ordered by zIndex, ties broken by key. Elements that fail to
/// resolve are logged and left out.
pub fn build_scene(spec: &LayoutSpec, brand: &BrandRecord, sku: &SkuRecord) -> Scene {
    let document = &sku.document;
    let mut nodes = Vec::with_capacity(spec.elements.len());

    for (key, element) in &spec.elements {
        let geometry = match resolver::resolve_element(spec, document, key) {
            Ok(g) => g,
            Err(err) => {
                tracing::warn!(%err, "skipping element");
                continue;
            }
        };
        let rotation = (geometry.rotation != 0.0).then_some(geometry.rotation);
        nodes.push(SceneNode {
            key: key.clone(),
            kind: element.style.clone(),
            geometry,
            transform: transform::combine(element.transform.as_deref(), rotation),
            content: element.content.resolve(brand, sku),
            custom: false,
        });
    }

    for custom in document.custom_elements(&spec.key) {
        if spec.elements.contains_key(&custom.id) {
            tracing::warn!(id = %custom.id, "custom element shadows a spec key, skipping");
            continue;
        }
        let content = match (document.content_for(&custom.id), &custom.content_binding) {
            (Some(text), _) => ResolvedContent::Text(text.to_string()),
            (None, ContentBinding::None) => ResolvedContent::Empty,
            (None, binding) => binding.resolve(brand, sku),
        };
        nodes.push(SceneNode {
            key: custom.id.clone(),
            kind: custom.kind(),
            geometry: EffectiveGeometry {
                top: custom.y,
                left: custom.x,
                width: Some(custom.width),
                height: Some(custom.height),
                z_index: custom.z_index,
                rotation: custom.rotation.unwrap_or(0.0),
            },
            transform: transform::combine(None, custom.rotation),
            content,
            custom: true,
        });
    }

    nodes.sort_by(|a, b| {
        a.geometry
            .z_index
            .cmp(&b.geometry.z_index)
            .then_with(|| a.key.cmp(&b.key))
    });

    tracing::debug!(layout = %spec.key, nodes = nodes.len(), "built scene");
    Scene {
        layout_key: spec.key.clone(),
        canvas: spec.canvas,
        palette: brand.palette.clone(),
        font_family: brand.font_family.clone(),
        nodes,
    }
}
