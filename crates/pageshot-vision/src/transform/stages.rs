//! 기하/색상 변환 단계.
//!
//! 각 함수는 입력을 소비하지 않고 새 이미지를 돌려준다.
//! 설정상 변환이 필요 없으면(no-op) 입력을 그대로 복제한다.

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use pageshot_core::config::CropConfig;
use pageshot_core::error::CoreError;
use tracing::debug;

use crate::resize::{fast_resize, fit_within};

/// 여백 자르기
///
/// 남는 영역이 없으면(`left + right >= width` 또는 `top + bottom >= height`)
/// 원본을 그대로 돌려준다.
pub fn crop_margins(image: &DynamicImage, crop: &CropConfig) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let horizontal = crop.left.saturating_add(crop.right);
    let vertical = crop.top.saturating_add(crop.bottom);

    if horizontal >= w || vertical >= h {
        debug!(
            "자르기 영역이 비어 원본 유지: {}x{}, 여백 l{} t{} r{} b{}",
            w, h, crop.left, crop.top, crop.right, crop.bottom
        );
        return image.clone();
    }

    image.crop_imm(crop.left, crop.top, w - horizontal, h - vertical)
}

/// 해상도 배율 (% 단위, 100이면 변환 없음)
pub fn scale_percent(image: &DynamicImage, percent: u32) -> Result<DynamicImage, CoreError> {
    if percent == 100 {
        return Ok(image.clone());
    }
    if percent == 0 {
        return Err(CoreError::Transform("배율 0%".to_string()));
    }
    let scale = |v: u32| ((v as u64 * percent as u64 + 50) / 100).max(1) as u32;
    fast_resize(image, scale(image.width()), scale(image.height()))
}

/// 그레이스케일 (휘도 → 3채널 RGB)
pub fn to_grayscale(image: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(image.to_luma8()).to_rgb8().into()
}

/// 긴 변을 `max_dim` 이하로 축소 (확대는 하지 않음)
pub fn limit_max_dimension(image: &DynamicImage, max_dim: u32) -> Result<DynamicImage, CoreError> {
    if max_dim == 0 {
        return Ok(image.clone());
    }
    let (w, h) = fit_within(image.width(), image.height(), max_dim);
    if (w, h) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    fast_resize(image, w, h)
}

/// 단색 테두리 (캔버스가 각 축으로 `2 × size` 커진다)
pub fn add_border(image: &DynamicImage, size: u32, color: Rgba<u8>) -> DynamicImage {
    if size == 0 {
        return image.clone();
    }
    let width = image.width().saturating_add(size.saturating_mul(2));
    let height = image.height().saturating_add(size.saturating_mul(2));

    let mut canvas = RgbaImage::from_pixel(width, height, color);
    imageops::replace(&mut canvas, &image.to_rgba8(), size as i64, size as i64);
    DynamicImage::ImageRgba8(canvas)
}
