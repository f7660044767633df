use std::sync::Arc;

use image::{Rgba, RgbaImage};
use layoutkit_core::{
    BackgroundStyle, BrandRecord, BrandSlot, CanvasSize, Color, ColorValue, ContainerStyle,
    ContentBinding, CustomElement, CustomElementType, ElementGeometry, ElementKind, ImageFit,
    ImageStyle, LayoutSpec, RenderError, SkuDocument, SkuRecord, SpecElement,
};
use layoutkit_designer::{
    build_scene, BoundsProvider, BoundsSource, MemoryAssetSource, Renderer, Viewport,
};
use layoutkit_settings::RenderSettings;

fn spec() -> LayoutSpec {
    let mut spec = LayoutSpec::new("banner", "Banner")
        .with_element(
            "bg",
            SpecElement::new(
                ElementGeometry::new(0.0, 0.0),
                ElementKind::Background(BackgroundStyle {
                    color: Some(ColorValue::Brand(BrandSlot::Primary)),
                }),
            ),
        )
        .with_element(
            "photo",
            SpecElement::new(
                ElementGeometry::new(100.0, 40.0)
                    .with_size(80.0, 80.0)
                    .with_z_index(2),
                ElementKind::Image(ImageStyle {
                    fit: ImageFit::Fill,
                    opacity: None,
                }),
            )
            .with_content(ContentBinding::SkuImage("main".into())),
        );
    spec.canvas = CanvasSize::new(400.0, 200.0);
    spec
}

fn brand() -> BrandRecord {
    let mut brand = BrandRecord::new(7, "Acme");
    brand.palette.primary = Color::rgb(0, 0, 255);
    brand
}

fn sku() -> SkuRecord {
    let mut sku = SkuRecord::new(9, "Anvil");
    sku.images.insert("main".into(), "anvil.png".into());
    sku
}

fn renderer() -> Renderer {
    let assets = MemoryAssetSource::new().with_image(
        "anvil.png",
        RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])),
    );
    Renderer::new(RenderSettings::default(), Arc::new(assets))
}

#[test]
fn test_brand_colour_and_image_painted() {
    let scene = build_scene(&spec(), &brand(), &sku());
    let image = renderer().render(&scene, 1.0).unwrap().to_image();
    assert_eq!(image.dimensions(), (400, 200));
    assert_eq!(image.get_pixel(10, 10), &Rgba([0, 0, 255, 255]));
    assert_eq!(image.get_pixel(140, 80), &Rgba([255, 0, 0, 255]));
}

#[test]
fn test_export_scale_multiplies_dimensions() {
    let scene = build_scene(&spec(), &brand(), &sku());
    let frame = renderer().render(&scene, 2.0).unwrap();
    assert_eq!((frame.pixmap.width(), frame.pixmap.height()), (800, 400));
}

#[test]
fn test_preview_surface_recovers_logical_bounds() {
    let mut sku = sku();
    let mut el = CustomElement::new(CustomElementType::Container, 300.0, 20.0, 40.0, 40.0);
    el.id = "badge".into();
    el.style = Some(ElementKind::Container(ContainerStyle {
        background: Some(ColorValue::Fixed(Color::rgb(0, 255, 0))),
        ..Default::default()
    }));
    sku.document.push_custom_element("banner", el);

    let spec = spec();
    let scene = build_scene(&spec, &brand(), &sku);
    let frame = renderer()
        .render_preview(&scene, 0.5, (30.0, 60.0))
        .unwrap();

    let doc = SkuDocument::new();
    let provider = BoundsProvider::new("banner", &doc, Viewport::new(0.5, spec.canvas), (100.0, 100.0))
        .with_spec(&spec)
        .with_surface(&frame.surface);
    let (photo, source) = provider.locate("photo").unwrap();
    assert_eq!(source, BoundsSource::Surface);
    assert_eq!((photo.x, photo.y, photo.width, photo.height), (100.0, 40.0, 80.0, 80.0));
    // the custom element was painted too
    let badge = provider.bounds_of("badge").unwrap();
    assert_eq!((badge.x, badge.width), (300.0, 40.0));
}

#[test]
fn test_invalid_transform_fails_render() {
    let mut spec = spec();
    if let Some(photo) = spec.elements.get_mut("photo") {
        photo.transform = Some("skew(10deg)".into());
    }
    let scene = build_scene(&spec, &brand(), &sku());
    assert!(matches!(
        renderer().render(&scene, 1.0),
        Err(RenderError::InvalidTransform { .. })
    ));
}
