use layoutkit_core::{
    ContainerStyle, ElementGeometry, ElementKind, GeometryError, LayoutSpec, PartialGeometry,
    SkuDocument, SpecElement,
};
use layoutkit_designer::{resolve, resolve_element, resolve_or};
use proptest::prelude::*;

fn spec() -> LayoutSpec {
    LayoutSpec::new("square", "Square").with_element(
        "logo",
        SpecElement::new(
            ElementGeometry::new(40.0, 60.0)
                .with_size(200.0, 100.0)
                .with_z_index(3),
            ElementKind::Container(ContainerStyle::default()),
        ),
    )
}

#[test]
fn test_no_override_yields_spec_geometry() {
    let g = resolve_element(&spec(), &SkuDocument::new(), "logo").unwrap();
    assert_eq!(g.left, 40.0);
    assert_eq!(g.top, 60.0);
    assert_eq!(g.width, Some(200.0));
    assert_eq!(g.z_index, 3);
    assert_eq!(g.rotation, 0.0);
}

#[test]
fn test_override_for_other_layout_is_ignored() {
    let mut doc = SkuDocument::new();
    doc.apply_override("story", "logo", PartialGeometry::position(1.0, 1.0));
    let g = resolve_element(&spec(), &doc, "logo").unwrap();
    assert_eq!(g.left, 40.0);
}

#[test]
fn test_unknown_element_without_override_fails() {
    let doc = SkuDocument::new();
    assert!(matches!(
        resolve_element(&spec(), &doc, "ghost"),
        Err(GeometryError::MissingGeometry { .. })
    ));

    let fallback = ElementGeometry::new(5.0, 6.0);
    let g = resolve_or("square", "ghost", None, &doc.position_overrides, &fallback);
    assert_eq!((g.left, g.top), (5.0, 6.0));
}

#[test]
fn test_override_only_element_resolves() {
    let mut doc = SkuDocument::new();
    doc.apply_override("square", "extra", PartialGeometry::position(7.0, 8.0));
    let g = resolve("square", "extra", None, &doc.position_overrides).unwrap();
    assert_eq!((g.left, g.top), (7.0, 8.0));
    assert_eq!(g.width, None);
}

#[test]
fn test_revert_is_idempotent() {
    let base = spec();
    let mut doc = SkuDocument::new();
    doc.apply_override("square", "logo", PartialGeometry::rect(1.0, 2.0, 3.0, 4.0));
    assert!(doc.clear_override("square", "logo").is_some());
    let once = doc.clone();
    assert!(doc.clear_override("square", "logo").is_none());
    assert_eq!(doc, once);
    assert!(doc.position_overrides.is_empty());
    assert_eq!(
        resolve_element(&base, &doc, "logo").unwrap(),
        resolve_element(&base, &SkuDocument::new(), "logo").unwrap()
    );
}

fn partial() -> impl Strategy<Value = PartialGeometry> {
    (
        proptest::option::of(-500.0..2000.0f64),
        proptest::option::of(-500.0..2000.0f64),
        proptest::option::of(1.0..1000.0f64),
        proptest::option::of(1.0..1000.0f64),
        proptest::option::of(-360.0..360.0f64),
        proptest::option::of(-10..10i32),
    )
        .prop_map(|(x, y, width, height, rotation, z_index)| PartialGeometry {
            x,
            y,
            width,
            height,
            rotation,
            z_index,
        })
}

proptest! {
    #[test]
    fn prop_present_override_fields_win(patch in partial()) {
        let spec = spec();
        let base = spec.base_geometry("logo").unwrap().clone();
        let mut doc = SkuDocument::new();
        doc.apply_override("square", "logo", patch);
        let g = resolve_element(&spec, &doc, "logo").unwrap();

        prop_assert_eq!(g.left, patch.x.unwrap_or(base.left));
        prop_assert_eq!(g.top, patch.y.unwrap_or(base.top));
        prop_assert_eq!(g.width, patch.width.or(base.width));
        prop_assert_eq!(g.height, patch.height.or(base.height));
        prop_assert_eq!(g.z_index, patch.z_index.unwrap_or(base.z_index));
        prop_assert_eq!(g.rotation, patch.rotation.or(base.rotation).unwrap_or(0.0));
    }

    #[test]
    fn prop_later_patch_fields_replace_earlier(first in partial(), second in partial()) {
        let mut doc = SkuDocument::new();
        doc.apply_override("square", "logo", first);
        doc.apply_override("square", "logo", second);
        let merged = doc.override_for("square", "logo").copied().unwrap_or_default();
        prop_assert_eq!(merged.x, second.x.or(first.x));
        prop_assert_eq!(merged.width, second.width.or(first.width));
        prop_assert_eq!(merged.rotation, second.rotation.or(first.rotation));
    }
}
