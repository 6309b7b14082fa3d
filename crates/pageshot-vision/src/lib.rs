//! # pageshot-vision
//!
//! 이미지 처리 크레이트.
//! 창 영역 캡처, 지각 해시 기반 중복 페이지 감지, 저장 전 변환 파이프라인
//! (자르기 → 배율 → 그레이스케일 → 최대 크기 → 테두리 → 워터마크 → 압축)과
//! 출력 포맷 인코딩을 담당한다.

pub mod capture;
pub mod encoder;
pub mod hash;
pub mod resize;
pub mod similarity;
pub mod transform;

use image::{DynamicImage, RgbaImage};
use pageshot_core::error::CoreError;
use pageshot_core::models::capture::RawFrame;

/// 원시 프레임 → `DynamicImage`
pub fn frame_to_image(frame: &RawFrame) -> Result<DynamicImage, CoreError> {
    RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| {
            CoreError::Capture(format!(
                "프레임 버퍼 크기 불일치: {}x{}, {} bytes",
                frame.width,
                frame.height,
                frame.rgba.len()
            ))
        })
}

/// `DynamicImage` → 원시 RGBA 프레임
pub fn image_to_frame(image: &DynamicImage) -> RawFrame {
    let rgba = image.to_rgba8();
    RawFrame::new(rgba.width(), rgba.height(), rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_image_conversion() {
        let frame = RawFrame::new(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]);
        let image = frame_to_image(&frame).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        assert_eq!(image_to_frame(&image), frame);
    }

    #[test]
    fn mismatched_buffer_is_capture_error() {
        let frame = RawFrame::new(4, 4, vec![0; 10]);
        assert!(matches!(frame_to_image(&frame), Err(CoreError::Capture(_))));
    }
}
