//! Geometry resolution: template base geometry + SKU override -> effective geometry.
//!
//! Resolution is a pure function of its inputs. Every field present in the
//! override wins over the layout value; absent fields fall through. Width and
//! height stay `None` ("intrinsic") when neither side sets them.

use layoutkit_core::{
    EffectiveGeometry, ElementGeometry, GeometryError, LayoutSpec, OverrideMap, PartialGeometry,
    SkuDocument,
};

/// Resolves the effective geometry of one element.
///
/// Fails with [`GeometryError::MissingGeometry`] when there is neither a base
/// geometry nor an override; callers substitute a template default.
pub fn resolve(
    layout_key: &str,
    element_key: &str,
    base: Option<&ElementGeometry>,
    overrides: &OverrideMap,
) -> Result<EffectiveGeometry, GeometryError> {
    let patch = overrides
        .get(layout_key)
        .and_then(|layout| layout.get(element_key));

    match (base, patch) {
        (None, None) => Err(GeometryError::MissingGeometry {
            layout_key: layout_key.to_string(),
            element_key: element_key.to_string(),
        }),
        (Some(base), patch) => Ok(merge(base, patch)),
        (None, Some(patch)) => Ok(merge(&ElementGeometry::default(), Some(patch))),
    }
}

/// Resolves an element of `spec` against the SKU document.
pub fn resolve_element(
    spec: &LayoutSpec,
    document: &SkuDocument,
    element_key: &str,
) -> Result<EffectiveGeometry, GeometryError> {
    resolve(
        &spec.key,
        element_key,
        spec.base_geometry(element_key),
        &document.position_overrides,
    )
}

/// Like [`resolve`], falling back to `default` instead of failing.
pub fn resolve_or(
    layout_key: &str,
    element_key: &str,
    base: Option<&ElementGeometry>,
    overrides: &OverrideMap,
    default: &ElementGeometry,
) -> EffectiveGeometry {
    resolve(layout_key, element_key, base, overrides).unwrap_or_else(|err| {
        tracing::warn!(%err, "substituting template default geometry");
        merge(default, None)
    })
}

fn merge(base: &ElementGeometry, patch: Option<&PartialGeometry>) -> EffectiveGeometry {
    let patch = patch.copied().unwrap_or_default();
    EffectiveGeometry {
        top: patch.y.unwrap_or(base.top),
        left: patch.x.unwrap_or(base.left),
        width: patch.width.or(base.width),
        height: patch.height.or(base.height),
        z_index: patch.z_index.unwrap_or(base.z_index),
        rotation: patch.rotation.or(base.rotation).unwrap_or(0.0),
    }
}
