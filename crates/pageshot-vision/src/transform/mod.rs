//! TransformPipeline: 저장 전 이미지 변환.
//!
//! 단계 순서는 고정이다:
//! 자르기 → 배율 → 그레이스케일 → 최대 크기 → 테두리 → 워터마크 → 압축 재인코딩.
//! 워터마크는 크기 변경이 끝난 뒤에 적용되어야 픽셀 오프셋이 최종 크기 기준이 된다.
//!
//! 선택 단계가 실패하면 경고 로그 후 해당 단계만 건너뛴다.
//! 최종 인코딩 실패만 파이프라인 실패로 전파된다.

pub mod color;
pub mod stages;
pub mod watermark;

use chrono::{DateTime, Local};
use image::DynamicImage;
use pageshot_core::config::{OutputConfig, OutputFormat, TransformConfig};
use pageshot_core::error::CoreError;
use tracing::{debug, warn};

use crate::encoder;
use color::{parse_hex_color, WHITE};

pub use stages::{add_border, crop_margins, limit_max_dimension, scale_percent, to_grayscale};
pub use watermark::apply_watermark;

/// 파이프라인 결과
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// 최종 인코딩 바이트
    pub bytes: Vec<u8>,
    /// 적용된 출력 포맷
    pub format: OutputFormat,
    /// 변환이 끝난 이미지 (훅 전달용)
    pub image: DynamicImage,
}

/// 변환 파이프라인 (상태 없음)
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformPipeline;

impl TransformPipeline {
    pub fn new() -> Self {
        Self
    }

    /// 변환 단계 적용 후 출력 포맷으로 인코딩
    pub fn run(
        &self,
        frame: DynamicImage,
        transform: &TransformConfig,
        output: &OutputConfig,
        captured_at: DateTime<Local>,
    ) -> Result<TransformOutput, CoreError> {
        let image = self.apply(frame, transform, captured_at);
        let bytes = encoder::encode(&image, output.format, output.quality)?;
        Ok(TransformOutput {
            bytes,
            format: output.format,
            image,
        })
    }

    /// 인코딩 전까지의 단계만 적용
    pub fn apply(
        &self,
        frame: DynamicImage,
        config: &TransformConfig,
        captured_at: DateTime<Local>,
    ) -> DynamicImage {
        let mut image = frame;

        if config.crop.enabled {
            image = crop_margins(&image, &config.crop);
        }

        if config.scale_percent != 100 {
            image = stage("scale", image, |img| scale_percent(img, config.scale_percent));
        }

        if config.grayscale {
            image = to_grayscale(&image);
        }

        if let Some(max_dim) = config.max_dimension.filter(|d| *d > 0) {
            image = stage("max_dimension", image, |img| limit_max_dimension(img, max_dim));
        }

        if config.border.enabled && config.border.size > 0 {
            let color = parse_hex_color(&config.border.color).unwrap_or_else(|e| {
                warn!("테두리 색상 파싱 실패, 흰색 사용: {e}");
                WHITE
            });
            image = add_border(&image, config.border.size, color);
        }

        if config.watermark.enabled {
            image = stage("watermark", image, |img| {
                apply_watermark(img, &config.watermark, captured_at)
            });
        }

        if config.compression.enabled {
            image = stage("compression", image, |img| {
                recompress(img, config.compression.quality)
            });
        }

        debug!("변환 완료: {}x{}", image.width(), image.height());
        image
    }
}

/// 손실 재인코딩 후 다시 디코딩 (최종 출력 포맷과 별개의 용량 절감 단계)
pub fn recompress(image: &DynamicImage, quality: u8) -> Result<DynamicImage, CoreError> {
    let jpeg = encoder::encode_jpeg(image, quality)?;
    image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg)
        .map_err(|e| CoreError::Transform(format!("압축 결과 디코딩 실패: {e}")))
}

/// 실패하면 경고 후 입력을 그대로 돌려주는 단계 래퍼
fn stage<F>(name: &str, image: DynamicImage, f: F) -> DynamicImage
where
    F: FnOnce(&DynamicImage) -> Result<DynamicImage, CoreError>,
{
    match f(&image) {
        Ok(out) => out,
        Err(e) => {
            warn!("변환 단계 '{name}' 건너뜀: {e}");
            image
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{GenericImageView, Rgba, RgbaImage};
    use pageshot_core::config::{WatermarkConfig, WatermarkKind};

    fn page(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbaImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgba([(x % 200) as u8, (y % 200) as u8, 60, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn default_config_is_identity_png() {
        let output = OutputConfig::default();
        let result = TransformPipeline::new()
            .run(page(64, 48), &TransformConfig::default(), &output, now())
            .unwrap();

        assert_eq!(result.format, OutputFormat::Png);
        assert_eq!(result.image.dimensions(), (64, 48));
        let decoded = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!(decoded.to_rgba8(), page(64, 48).to_rgba8());
    }

    #[test]
    fn stages_apply_in_order() {
        let mut config = TransformConfig::default();
        config.crop.enabled = true;
        config.crop.left = 10;
        config.crop.right = 10;
        config.scale_percent = 50;
        config.max_dimension = Some(30);
        config.border.enabled = true;
        config.border.size = 3;

        // 220x100 → crop 200x100 → 50% 100x50 → max 30x15 → border 36x21
        let image = TransformPipeline::new().apply(page(220, 100), &config, now());
        assert_eq!(image.dimensions(), (36, 21));
    }

    #[test]
    fn bad_border_color_falls_back_to_white() {
        let mut config = TransformConfig::default();
        config.border.enabled = true;
        config.border.size = 2;
        config.border.color = "not-a-color".to_string();

        let image = TransformPipeline::new().apply(page(10, 10), &config, now());
        assert_eq!(image.dimensions(), (14, 14));
        assert_eq!(image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn failing_watermark_is_skipped() {
        let mut config = TransformConfig::default();
        config.watermark = WatermarkConfig {
            enabled: true,
            kind: WatermarkKind::Image,
            image_path: Some("/missing/logo.png".into()),
            ..WatermarkConfig::default()
        };

        let original = page(40, 30);
        let image = TransformPipeline::new().apply(original.clone(), &config, now());
        assert_eq!(image.to_rgba8(), original.to_rgba8());
    }

    #[test]
    fn degenerate_crop_keeps_original_size() {
        let mut config = TransformConfig::default();
        config.crop.enabled = true;
        config.crop.top = 60;
        config.crop.bottom = 60;

        let image = TransformPipeline::new().apply(page(50, 100), &config, now());
        assert_eq!(image.dimensions(), (50, 100));
    }

    #[test]
    fn grayscale_output_is_rgb() {
        let mut config = TransformConfig::default();
        config.grayscale = true;
        let image = TransformPipeline::new().apply(page(8, 8), &config, now());
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn compression_keeps_dimensions() {
        let mut config = TransformConfig::default();
        config.compression.enabled = true;
        config.compression.quality = 20;

        let image = TransformPipeline::new().apply(page(64, 64), &config, now());
        assert_eq!(image.dimensions(), (64, 64));
    }

    #[test]
    fn jpeg_output_format() {
        let output = OutputConfig {
            format: OutputFormat::Jpeg,
            quality: 70,
            ..OutputConfig::default()
        };
        let result = TransformPipeline::new()
            .run(page(32, 32), &TransformConfig::default(), &output, now())
            .unwrap();
        assert_eq!(result.format, OutputFormat::Jpeg);
        assert!(result.bytes.starts_with(&[0xFF, 0xD8]));
    }
}
