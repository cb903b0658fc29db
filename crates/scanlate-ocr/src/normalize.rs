use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageResult};

use crate::ScannedPage;

pub const MAX_JPEG_QUALITY: u8 = 100;

/// Re-encode a page as maximum-quality JPEG and decode it again.
///
/// The recognizer then always sees an 8-bit RGB raster whatever the source
/// pixel format was. Any encode or decode failure hands back the original
/// page untouched.
pub fn normalize(page: ScannedPage) -> ScannedPage {
    normalize_with(page, encode_jpeg)
}

fn normalize_with<F>(page: ScannedPage, encode: F) -> ScannedPage
where
    F: FnOnce(&DynamicImage) -> ImageResult<Vec<u8>>,
{
    let bytes = match encode(page.image()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("JPEG re-encode failed, keeping original page: {}", e);
            return page;
        }
    };

    match image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg) {
        Ok(image) => {
            tracing::debug!(
                "Normalized {}x{} page into {} JPEG bytes",
                image.width(),
                image.height(),
                bytes.len()
            );
            ScannedPage::with_quality(image, MAX_JPEG_QUALITY)
        }
        Err(e) => {
            tracing::warn!("JPEG reload failed, keeping original page: {}", e);
            page
        }
    }
}

fn encode_jpeg(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), MAX_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use image::error::{ParameterError, ParameterErrorKind};
    use image::{ColorType, ImageError, Rgba, RgbaImage};

    use super::*;

    fn page() -> ScannedPage {
        let image = RgbaImage::from_fn(8, 6, |x, y| Rgba([(x * 30) as u8, (y * 40) as u8, 90, 200]));
        ScannedPage::new(DynamicImage::ImageRgba8(image))
    }

    #[test]
    fn test_normalize_produces_rgb_jpeg_raster() {
        let normalized = normalize(page());

        assert_eq!(normalized.width(), 8);
        assert_eq!(normalized.height(), 6);
        assert_eq!(normalized.quality(), Some(MAX_JPEG_QUALITY));
        assert_eq!(normalized.image().color(), ColorType::Rgb8);
    }

    #[test]
    fn test_encode_failure_returns_original() {
        let original = page();
        let expected = original.image().as_bytes().to_vec();

        let normalized = normalize_with(original, |_| {
            Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::Generic("encoder exploded".to_string()),
            )))
        });

        assert_eq!(normalized.quality(), None);
        assert_eq!(normalized.image().color(), ColorType::Rgba8);
        assert_eq!(normalized.image().as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_decode_failure_returns_original() {
        let original = page();
        let expected = original.image().as_bytes().to_vec();

        let normalized = normalize_with(original, |_| Ok(vec![0xde, 0xad, 0xbe, 0xef]));

        assert_eq!(normalized.quality(), None);
        assert_eq!(normalized.image().as_bytes(), expected.as_slice());
    }
}
