//! 출력 포맷 인코더.
//!
//! PNG/BMP는 image crate, JPEG은 품질 지정 인코더, WebP는 webp crate를 사용한다.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use pageshot_core::config::OutputFormat;
use pageshot_core::error::CoreError;
use std::io::Cursor;
use tracing::debug;

/// 이미지를 출력 포맷으로 인코딩
///
/// `quality`는 손실 포맷(JPEG, WebP)에만 적용된다 (1 ~ 100).
pub fn encode(image: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, CoreError> {
    let quality = quality.clamp(1, 100);
    let bytes = match format {
        OutputFormat::Png => encode_with(image, ImageFormat::Png)?,
        OutputFormat::Bmp => encode_with(image, ImageFormat::Bmp)?,
        OutputFormat::Jpeg => encode_jpeg(image, quality)?,
        OutputFormat::Webp => encode_webp(image, quality),
    };

    debug!(
        "{:?} 인코딩: {}x{} → {} bytes",
        format,
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(bytes)
}

/// JPEG 인코딩 (알파 채널은 버린다)
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CoreError> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CoreError::Transform(format!("JPEG 인코딩 실패: {e}")))?;
    Ok(buf)
}

/// WebP 손실 인코딩
pub fn encode_webp(image: &DynamicImage, quality: u8) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    webp::Encoder::from_rgba(&rgba, w, h)
        .encode(quality as f32)
        .to_vec()
}

fn encode_with(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CoreError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .map_err(|e| CoreError::Transform(format!("{format:?} 인코딩 실패: {e}")))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        let mut img = RgbaImage::new(32, 24);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgba([(x * 8) as u8, (y * 10) as u8, 128, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn encodes_each_format_with_magic_bytes() {
        let img = sample();
        assert!(encode(&img, OutputFormat::Png, 90).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(encode(&img, OutputFormat::Jpeg, 90).unwrap().starts_with(&[0xFF, 0xD8]));
        assert!(encode(&img, OutputFormat::Bmp, 90).unwrap().starts_with(b"BM"));

        let webp = encode(&img, OutputFormat::Webp, 80).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn jpeg_quality_affects_size() {
        let img = sample().resize_exact(256, 192, image::imageops::FilterType::Nearest);
        let low = encode_jpeg(&img, 10).unwrap();
        let high = encode_jpeg(&img, 95).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn decoded_png_keeps_dimensions() {
        let bytes = encode(&sample(), OutputFormat::Png, 100).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }
}
