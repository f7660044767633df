//! Scene renderer
//! Rasterizes a resolved [`Scene`] with tiny-skia at an arbitrary scale.
//!
//! Features:
//! - Anti-aliased fills for backgrounds and containers (corner radius, border)
//! - Image elements decoded through `image` and fitted contain/cover/fill
//! - Text drawn from `rusttype` glyph coverage, wrapped to the element width
//! - Per-element transforms applied about the element centre
//! - Node rectangle capture for the live bounds source
//!
//! Each element is painted into its own layer in local coordinates and then
//! composited with the element's placement transform.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use layoutkit_core::{
    Color, ContainerStyle, ElementKind, ImageFit, ImageStyle, RenderError, ResolvedContent,
    TextAlign, TextStyle,
};
use layoutkit_settings::RenderSettings;
use rusttype::{point as rt_point, Font, Scale};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use crate::assets::AssetSource;
use crate::bounds::MeasuredSurface;
use crate::font_manager::{self, DEFAULT_LINE_HEIGHT};
use crate::scene::{Scene, SceneNode};
use crate::transform::{self, Affine};

/// Largest output multiplier accepted.
pub const MAX_SCALE: f64 = 8.0;

/// A painted frame plus the rectangles of its nodes.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub pixmap: Pixmap,
    pub surface: MeasuredSurface,
}

impl RenderedFrame {
    pub fn to_image(&self) -> RgbaImage {
        to_rgba_image(&self.pixmap)
    }
}

pub struct Renderer {
    settings: RenderSettings,
    assets: Arc<dyn AssetSource>,
}

impl Renderer {
    pub fn new(settings: RenderSettings, assets: Arc<dyn AssetSource>) -> Self {
        Self { settings, assets }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Renders at `scale` output pixels per logical unit.
    pub fn render(&self, scene: &Scene, scale: f64) -> Result<RenderedFrame, RenderError> {
        self.paint(scene, scale, (0.0, 0.0))
    }

    /// Renders a preview as if the canvas wrapper sat at `wrapper_origin` on
    /// the page; recorded node rectangles are in page pixels.
    pub fn render_preview(
        &self,
        scene: &Scene,
        preview_scale: f64,
        wrapper_origin: (f64, f64),
    ) -> Result<RenderedFrame, RenderError> {
        self.paint(scene, preview_scale, wrapper_origin)
    }

    fn paint(
        &self,
        scene: &Scene,
        scale: f64,
        origin: (f64, f64),
    ) -> Result<RenderedFrame, RenderError> {
        if !(scale > 0.0 && scale <= MAX_SCALE) {
            return Err(RenderError::InvalidScale { scale });
        }
        let width = (scene.canvas.width * scale).round() as u32;
        let height = (scene.canvas.height * scale).round() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidCanvas { width, height })?;
        let mut surface = MeasuredSurface::new(origin);

        for node in &scene.nodes {
            let image = self.load_image(node);
            let (w, h) = self.node_size(scene, node, image.as_deref());

            let local = match &node.transform {
                Some(t) => transform::parse(t)?,
                None => Affine::IDENTITY,
            };
            let placement = Affine::scale(scale, scale)
                .then_local(&Affine::translate(node.geometry.left, node.geometry.top))
                .then_local(&local.about(w / 2.0, h / 2.0));

            let (rx, ry, rw, rh) = placement.map_rect(0.0, 0.0, w, h);
            surface.record(node.key.clone(), (rx + origin.0, ry + origin.1, rw, rh));

            let layer_w = (w * scale).ceil() as u32;
            let layer_h = (h * scale).ceil() as u32;
            let Some(mut layer) = Pixmap::new(layer_w, layer_h) else {
                continue;
            };

            let opacity = match &node.kind {
                ElementKind::Background(style) => {
                    let color = style
                        .color
                        .map(|c| scene.palette.resolve(c))
                        .unwrap_or(Color::WHITE);
                    fill_rect(&mut layer, color, 0.0, None);
                    1.0
                }
                ElementKind::Container(style) => {
                    paint_container(&mut layer, scene, style, scale);
                    style.opacity.unwrap_or(1.0)
                }
                ElementKind::Image(style) => {
                    if let Some(image) = &image {
                        paint_image(&mut layer, image, style);
                    }
                    style.opacity.unwrap_or(1.0)
                }
                ElementKind::Text(style) => {
                    if let Some(text) = node.content.text() {
                        self.paint_text(&mut layer, scene, style, text, scale);
                    }
                    1.0
                }
            };

            let composite = placement.then_local(&Affine::scale(1.0 / scale, 1.0 / scale));
            let paint = PixmapPaint {
                opacity: opacity.clamp(0.0, 1.0) as f32,
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, composite.to_skia(), None);
        }

        tracing::debug!(
            layout = %scene.layout_key,
            width,
            height,
            nodes = scene.nodes.len(),
            "rendered scene"
        );
        Ok(RenderedFrame { pixmap, surface })
    }

    fn load_image(&self, node: &SceneNode) -> Option<Arc<RgbaImage>> {
        if !matches!(node.kind, ElementKind::Image(_)) {
            return None;
        }
        let reference = node.content.image()?;
        match self.assets.load(reference) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(element = %node.key, %err, "image not drawn");
                None
            }
        }
    }

    fn font_for(&self, scene: &Scene, style: &TextStyle) -> Option<&'static Font<'static>> {
        let family = style
            .font_family
            .as_deref()
            .or(scene.font_family.as_deref())
            .unwrap_or(&self.settings.font_family);
        font_manager::resolve_font(
            self.settings.font_path.as_deref(),
            family,
            style.bold,
            style.italic,
        )
    }

    /// Logical size of a node, filling in intrinsic dimensions.
    fn node_size(&self, scene: &Scene, node: &SceneNode, image: Option<&RgbaImage>) -> (f64, f64) {
        let g = &node.geometry;
        if let (Some(w), Some(h)) = (g.width, g.height) {
            return (w.max(0.0), h.max(0.0));
        }
        match &node.kind {
            ElementKind::Text(style) => {
                let text = node.content.text().unwrap_or("");
                let font = self.font_for(scene, style);
                let line_height = style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);
                let (tw, th) =
                    font_manager::measure_text(font, text, style.font_size, line_height, g.width);
                (g.width.unwrap_or(tw), g.height.unwrap_or(th))
            }
            ElementKind::Image(_) => match image {
                Some(img) if img.width() > 0 && img.height() > 0 => {
                    let (iw, ih) = (img.width() as f64, img.height() as f64);
                    match (g.width, g.height) {
                        (Some(w), None) => (w, w * ih / iw),
                        (None, Some(h)) => (h * iw / ih, h),
                        _ => (iw, ih),
                    }
                }
                _ => (g.width.unwrap_or(0.0), g.height.unwrap_or(0.0)),
            },
            ElementKind::Container(_) | ElementKind::Background(_) => (
                g.width.unwrap_or(scene.canvas.width),
                g.height.unwrap_or(scene.canvas.height),
            ),
        }
    }

    fn paint_text(
        &self,
        layer: &mut Pixmap,
        scene: &Scene,
        style: &TextStyle,
        text: &str,
        scale: f64,
    ) {
        let Some(font) = self.font_for(scene, style) else {
            return;
        };
        let color = style
            .color
            .map(|c| scene.palette.resolve(c))
            .unwrap_or(Color::BLACK);
        let size = style.font_size * scale;
        let line_height = size * style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);
        let layer_w = layer.width() as f64;
        let lines = font_manager::wrap_lines(Some(font), text, size, Some(layer_w));

        let rt_scale = Scale::uniform(size as f32);
        let ascent = font.v_metrics(rt_scale).ascent;
        let (width, height) = (layer.width() as i32, layer.height() as i32);
        let data = layer.data_mut();

        for (i, line) in lines.iter().enumerate() {
            let line_w = font_manager::line_width(Some(font), line, size);
            let x = match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (layer_w - line_w) / 2.0,
                TextAlign::Right => layer_w - line_w,
            };
            let baseline = (i as f64 * line_height) as f32 + ascent;
            for glyph in font.layout(line, rt_scale, rt_point(x as f32, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px < 0 || py < 0 || px >= width || py >= height {
                        return;
                    }
                    let idx = ((py * width + px) * 4) as usize;
                    blend_over(&mut data[idx..idx + 4], color, coverage);
                });
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` into one premultiplied pixel.
fn blend_over(pixel: &mut [u8], color: Color, coverage: f32) {
    let sa = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let src = [
        color.r as f32 * sa,
        color.g as f32 * sa,
        color.b as f32 * sa,
        255.0 * sa,
    ];
    for (dst, s) in pixel.iter_mut().zip(src) {
        *dst = (s + *dst as f32 * (1.0 - sa)).round().clamp(0.0, 255.0) as u8;
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<tiny_skia::Path> {
    let r = radius.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

fn fill_rect(layer: &mut Pixmap, color: Color, radius: f32, inset: Option<f32>) {
    let inset = inset.unwrap_or(0.0);
    let (w, h) = (layer.width() as f32, layer.height() as f32);
    let Some(path) = rounded_rect(inset, inset, w - 2.0 * inset, h - 2.0 * inset, radius) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    layer.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}

fn paint_container(layer: &mut Pixmap, scene: &Scene, style: &ContainerStyle, scale: f64) {
    let radius = (style.border_radius.unwrap_or(0.0) * scale) as f32;
    if let Some(background) = style.background {
        fill_rect(layer, scene.palette.resolve(background), radius, None);
    }
    let border_width = (style.border_width.unwrap_or(0.0) * scale) as f32;
    if border_width > 0.0 {
        let color = style
            .border_color
            .map(|c| scene.palette.resolve(c))
            .unwrap_or(Color::BLACK);
        let (w, h) = (layer.width() as f32, layer.height() as f32);
        let half = border_width / 2.0;
        let Some(path) = rounded_rect(half, half, w - border_width, h - border_width, radius)
        else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: border_width,
            ..Default::default()
        };
        layer.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

fn paint_image(layer: &mut Pixmap, image: &RgbaImage, style: &ImageStyle) {
    let Some(source) = image_to_pixmap(image) else {
        return;
    };
    let (lw, lh) = (layer.width() as f32, layer.height() as f32);
    let (iw, ih) = (source.width() as f32, source.height() as f32);
    let (sx, sy) = match style.fit {
        ImageFit::Fill => (lw / iw, lh / ih),
        ImageFit::Contain => {
            let k = (lw / iw).min(lh / ih);
            (k, k)
        }
        ImageFit::Cover => {
            let k = (lw / iw).max(lh / ih);
            (k, k)
        }
    };
    let tx = (lw - iw * sx) / 2.0;
    let ty = (lh - ih * sy) / 2.0;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    layer.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_row(sx, 0.0, 0.0, sy, tx, ty),
        None,
    );
}

/// Converts a premultiplied pixmap to straight-alpha RGBA.
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetSource;
    use crate::bounds::RenderedSurface;
    use layoutkit_core::{
        BackgroundStyle, BrandRecord, CanvasSize, ColorValue, ContentBinding, ElementGeometry,
        LayoutSpec, SkuRecord, SpecElement,
    };

    fn renderer(assets: MemoryAssetSource) -> Renderer {
        Renderer::new(RenderSettings::default(), Arc::new(assets))
    }

    fn spec() -> LayoutSpec {
        let mut spec = LayoutSpec::new("square", "Square")
            .with_element(
                "bg",
                SpecElement::new(
                    ElementGeometry::new(0.0, 0.0),
                    ElementKind::Background(BackgroundStyle {
                        color: Some(ColorValue::Fixed(Color::rgb(10, 20, 30))),
                    }),
                ),
            )
            .with_element(
                "box",
                SpecElement::new(
                    ElementGeometry::new(10.0, 10.0).with_size(20.0, 20.0).with_z_index(1),
                    ElementKind::Container(ContainerStyle {
                        background: Some(ColorValue::Fixed(Color::rgb(255, 0, 0))),
                        ..Default::default()
                    }),
                ),
            )
            .with_element(
                "photo",
                SpecElement::new(
                    ElementGeometry::new(50.0, 0.0).with_z_index(2),
                    ElementKind::Image(ImageStyle::default()),
                )
                .with_content(ContentBinding::Asset("photo.png".into())),
            );
        spec.canvas = CanvasSize::new(100.0, 50.0);
        spec
    }

    fn scene() -> Scene {
        crate::scene::build_scene(&spec(), &BrandRecord::new(1, "Acme"), &SkuRecord::new(2, "Kettle"))
    }

    #[test]
    fn test_render_scales_output() {
        let frame = renderer(MemoryAssetSource::new()).render(&scene(), 2.0).unwrap();
        assert_eq!((frame.pixmap.width(), frame.pixmap.height()), (200, 100));
        let img = frame.to_image();
        assert_eq!(img.get_pixel(2, 2), &Rgba([10, 20, 30, 255]));
        assert_eq!(img.get_pixel(40, 40), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_image_intrinsic_size_and_measurement() {
        let assets = MemoryAssetSource::new()
            .with_image("photo.png", RgbaImage::from_pixel(30, 20, Rgba([0, 255, 0, 255])));
        let frame = renderer(assets)
            .render_preview(&scene(), 0.5, (100.0, 200.0))
            .unwrap();
        let rect = frame.surface.node_rect("photo").unwrap();
        assert_eq!(rect, (125.0, 200.0, 15.0, 10.0));
        let img = frame.to_image();
        assert_eq!(img.get_pixel(30, 5), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let frame = renderer(MemoryAssetSource::new()).render(&scene(), 1.0).unwrap();
        assert_eq!(frame.surface.node_rect("photo"), Some((50.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rejects_bad_scale_and_transform() {
        let r = renderer(MemoryAssetSource::new());
        assert!(matches!(
            r.render(&scene(), 0.0),
            Err(RenderError::InvalidScale { .. })
        ));
        let mut s = scene();
        s.nodes[1].transform = Some("skew(4deg)".into());
        assert!(matches!(
            r.render(&s, 1.0),
            Err(RenderError::InvalidTransform { .. })
        ));
    }

    #[test]
    fn test_rotation_changes_measured_box() {
        let mut s = scene();
        let node = s.nodes.iter_mut().find(|n| n.key == "box").unwrap();
        node.transform = Some("rotate(45deg)".into());
        let frame = renderer(MemoryAssetSource::new()).render(&s, 1.0).unwrap();
        let (_, _, w, _) = frame.surface.node_rect("box").unwrap();
        assert!((w - 20.0 * 2f64.sqrt()).abs() < 1e-6);
    }
}
