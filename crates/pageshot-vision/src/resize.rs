//! 고속 리사이즈.
//!
//! fast_image_resize 기반. 배율 단계와 최대 크기 단계가 공유한다.

use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};
use pageshot_core::error::CoreError;
use tracing::debug;

/// 지정 크기로 리사이즈 (RGBA 결과)
pub fn fast_resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<DynamicImage, CoreError> {
    let (src_w, src_h) = (image.width(), image.height());

    if src_w == width && src_h == height {
        return Ok(image.clone());
    }
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Transform("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Transform("목표 이미지 크기 0".to_string()));
    }

    let src_image = FirImage::from_vec_u8(
        src_w,
        src_h,
        image.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| CoreError::Transform(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Lanczos3,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Transform(format!("리사이즈 실패: {e}")))?;

    let result = RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Transform("결과 이미지 생성 실패".to_string()))?;

    debug!("리사이즈: {}x{} → {}x{}", src_w, src_h, width, height);
    Ok(DynamicImage::ImageRgba8(result))
}

/// 비율 유지 크기 계산 (긴 변 = `max_dim`)
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 || longest <= max_dim {
        return (width, height);
    }
    let ratio = max_dim as f64 / longest as f64;
    (
        ((width as f64 * ratio).round() as u32).max(1),
        ((height as f64 * ratio).round() as u32).max(1),
    )
}
