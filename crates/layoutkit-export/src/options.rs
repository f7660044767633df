//! Export options and raster encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use layoutkit_core::{ExportFormat, RenderError};
use layoutkit_settings::ExportSettings;

/// JPEG quality used when none is given.
pub const DEFAULT_QUALITY: f64 = 0.92;

/// How one layout is rasterized and encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Output pixels per logical canvas unit.
    pub scale: f64,
    pub format: ExportFormat,
    /// Encoder quality in `0..=1`. Ignored by lossless formats.
    pub quality: Option<f64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            format: ExportFormat::Png,
            quality: None,
        }
    }
}

impl ExportOptions {
    pub fn new(scale: f64, format: ExportFormat) -> Self {
        Self {
            scale,
            format,
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            scale: settings.scale,
            format: settings.format,
            quality: Some(settings.quality),
        }
    }

    /// Quality as the 1..=100 value JPEG encoders take.
    pub fn jpeg_quality(&self) -> u8 {
        let q = self.quality.unwrap_or(DEFAULT_QUALITY);
        let q = if q.is_finite() { q.clamp(0.0, 1.0) } else { DEFAULT_QUALITY };
        ((q * 100.0).round() as u8).max(1)
    }
}

/// Encodes `image` in the requested format.
pub fn encode(image: &RgbaImage, options: &ExportOptions) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    let (w, h) = image.dimensions();
    let format = options.format;
    let result = match format {
        ExportFormat::Png => {
            PngEncoder::new(Cursor::new(&mut buf)).write_image(image, w, h, ExtendedColorType::Rgba8)
        }
        ExportFormat::Jpg => {
            let flat = flatten_on_white(image);
            JpegEncoder::new_with_quality(Cursor::new(&mut buf), options.jpeg_quality())
                .write_image(&flat, w, h, ExtendedColorType::Rgb8)
        }
        ExportFormat::Webp => WebPEncoder::new_lossless(Cursor::new(&mut buf)).write_image(
            image,
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| RenderError::Encode {
        format: format.to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!(%format, width = w, height = h, bytes = buf.len(), "encoded raster");
    Ok(buf)
}

/// Composites RGBA pixels over white; JPEG has no alpha channel.
fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = a as u32;
        let over = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]))
    }

    #[test]
    fn test_png_signature() {
        let bytes = encode(&sample(), &ExportOptions::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_jpeg_signature_and_quality() {
        let opts = ExportOptions::new(1.0, ExportFormat::Jpg).with_quality(0.5);
        assert_eq!(opts.jpeg_quality(), 50);
        let bytes = encode(&sample(), &opts).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_webp_is_riff() {
        let bytes = encode(&sample(), &ExportOptions::new(1.0, ExportFormat::Webp)).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_quality_bounds() {
        assert_eq!(ExportOptions::default().jpeg_quality(), 92);
        assert_eq!(ExportOptions::default().with_quality(0.0).jpeg_quality(), 1);
        assert_eq!(ExportOptions::default().with_quality(7.0).jpeg_quality(), 100);
        assert_eq!(ExportOptions::default().with_quality(f64::NAN).jpeg_quality(), 92);
    }

    #[test]
    fn test_transparent_flattens_to_white() {
        let clear = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(flatten_on_white(&clear).get_pixel(0, 0).0, [255, 255, 255]);
    }
}
