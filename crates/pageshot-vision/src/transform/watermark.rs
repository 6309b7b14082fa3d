//! 워터마크 렌더링.
//!
//! 텍스트는 font8x8 비트맵 글리프를 `scale`배 확대해 그린다.
//! 텍스트 변형은 가독성을 위해 반투명 배경 사각형을 먼저 깐다.

use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use pageshot_core::config::{WatermarkConfig, WatermarkKind, WatermarkPosition};
use pageshot_core::error::CoreError;
use tracing::warn;

use super::color::{parse_hex_color, WHITE};

/// 글리프 한 변 픽셀 (배율 1 기준)
const GLYPH_SIZE: u32 = 8;
/// 배경 사각형 안쪽 여백 (배율 1 기준)
const BACKING_PADDING: u32 = 2;
/// 배경 사각형 최대 알파
const BACKING_ALPHA: f32 = 160.0;

/// 워터마크 적용
pub fn apply_watermark(
    image: &DynamicImage,
    config: &WatermarkConfig,
    captured_at: DateTime<Local>,
) -> Result<DynamicImage, CoreError> {
    let opacity = config.opacity.clamp(0.0, 1.0);
    let mut canvas = image.to_rgba8();

    match config.kind {
        WatermarkKind::Timestamp => {
            let mut text = String::new();
            write!(text, "{}", captured_at.format(&config.timestamp_format)).map_err(|_| {
                CoreError::Transform(format!(
                    "잘못된 타임스탬프 형식: {}",
                    config.timestamp_format
                ))
            })?;
            draw_text_block(&mut canvas, &text, config, opacity)?;
        }
        WatermarkKind::Text => {
            if config.text.trim().is_empty() {
                return Err(CoreError::Transform("워터마크 텍스트가 비어 있음".to_string()));
            }
            draw_text_block(&mut canvas, &config.text, config, opacity)?;
        }
        WatermarkKind::Image => {
            let path = config
                .image_path
                .as_deref()
                .ok_or_else(|| CoreError::Transform("워터마크 이미지 경로 없음".to_string()))?;
            let overlay = load_overlay(path)?;
            let (x, y) = anchor(
                config.position,
                (canvas.width(), canvas.height()),
                (overlay.width(), overlay.height()),
                config.margin,
            );
            blend_image(&mut canvas, &overlay, x, y, opacity);
        }
    }

    Ok(DynamicImage::ImageRgba8(canvas))
}

fn load_overlay(path: &Path) -> Result<RgbaImage, CoreError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| CoreError::Transform(format!("워터마크 이미지 로드 실패: {}: {e}", path.display())))
}

fn draw_text_block(
    canvas: &mut RgbaImage,
    text: &str,
    config: &WatermarkConfig,
    opacity: f32,
) -> Result<(), CoreError> {
    let color = parse_hex_color(&config.color).unwrap_or_else(|e| {
        warn!("워터마크 색상 파싱 실패, 흰색 사용: {e}");
        WHITE
    });
    let scale = config.scale.max(1);
    let (text_w, text_h) = text_size(text, scale)?;
    let block = BACKING_PADDING
        .checked_mul(scale)
        .and_then(|padding| {
            let w = text_w.checked_add(padding.checked_mul(2)?)?;
            let h = text_h.checked_add(padding.checked_mul(2)?)?;
            Some((padding, (w, h)))
        });
    let Some((padding, block)) = block else {
        return Err(too_large(scale));
    };

    let (x, y) = anchor(
        config.position,
        (canvas.width(), canvas.height()),
        block,
        config.margin,
    );

    let backing = Rgba([0, 0, 0, (BACKING_ALPHA * opacity).round() as u8]);
    fill_rect(canvas, x, y, block.0, block.1, backing);

    let ink = Rgba([
        color[0],
        color[1],
        color[2],
        (color[3] as f32 * opacity).round() as u8,
    ]);
    draw_bitmap_text(
        canvas,
        x + padding as i64,
        y + padding as i64,
        text,
        ink,
        scale,
    );
    Ok(())
}

fn too_large(scale: u32) -> CoreError {
    CoreError::Transform(format!("워터마크 배율이 너무 큼: {scale}"))
}

/// 텍스트 렌더링 크기 (한 줄 기준, 줄바꿈 없음)
///
/// `u32` 범위를 넘으면 `Transform` 에러.
pub fn text_size(text: &str, scale: u32) -> Result<(u32, u32), CoreError> {
    let chars = u32::try_from(text.chars().count()).map_err(|_| too_large(scale))?;
    let glyph = GLYPH_SIZE.checked_mul(scale).ok_or_else(|| too_large(scale))?;
    let width = chars.checked_mul(glyph).ok_or_else(|| too_large(scale))?;
    Ok((width, glyph))
}

/// 앵커 위치 계산 (캔버스 밖으로 나가면 0으로 고정)
pub fn anchor(
    position: WatermarkPosition,
    canvas: (u32, u32),
    content: (u32, u32),
    margin: u32,
) -> (i64, i64) {
    let (cw, ch) = (canvas.0 as i64, canvas.1 as i64);
    let (w, h) = (content.0 as i64, content.1 as i64);
    let m = margin as i64;

    let (x, y) = match position {
        WatermarkPosition::TopLeft => (m, m),
        WatermarkPosition::TopRight => (cw - w - m, m),
        WatermarkPosition::BottomLeft => (m, ch - h - m),
        WatermarkPosition::BottomRight => (cw - w - m, ch - h - m),
        WatermarkPosition::Center => ((cw - w) / 2, (ch - h) / 2),
    };
    (x.max(0), y.max(0))
}

/// `[start, start + len)`을 `[0, limit)`으로 자른 범위
fn clip(start: i64, len: i64, limit: u32) -> std::ops::Range<i64> {
    start.max(0)..start.saturating_add(len).min(limit as i64)
}

fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, color: Rgba<u8>) {
    let cols = clip(x, w as i64, canvas.width());
    for py in clip(y, h as i64, canvas.height()) {
        for px in cols.clone() {
            blend_at(canvas, px, py, color);
        }
    }
}

fn draw_bitmap_text(canvas: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale as i64;
    let advance = GLYPH_SIZE as i64 * scale;
    let mut cursor_x = x;
    for ch in text.chars() {
        // 오른쪽 경계를 넘으면 나머지 글자도 모두 캔버스 밖
        if cursor_x >= canvas.width() as i64 {
            break;
        }
        let glyph = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'));
        if let Some(glyph) = glyph {
            for (row_idx, row) in glyph.iter().enumerate() {
                let rows = clip(y + row_idx as i64 * scale, scale, canvas.height());
                if rows.is_empty() {
                    continue;
                }
                for col in 0..GLYPH_SIZE as i64 {
                    if (*row >> col) & 1 == 0 {
                        continue;
                    }
                    let cols = clip(cursor_x + col * scale, scale, canvas.width());
                    for py in rows.clone() {
                        for px in cols.clone() {
                            blend_at(canvas, px, py, color);
                        }
                    }
                }
            }
        }
        cursor_x += advance;
    }
}

fn blend_image(canvas: &mut RgbaImage, overlay: &RgbaImage, x: i64, y: i64, opacity: f32) {
    for (ox, oy, pixel) in overlay.enumerate_pixels() {
        let alpha = (pixel[3] as f32 * opacity).round() as u8;
        blend_at(
            canvas,
            x + ox as i64,
            y + oy as i64,
            Rgba([pixel[0], pixel[1], pixel[2], alpha]),
        );
    }
}

/// source-over 합성 (캔버스 밖 좌표는 무시)
fn blend_at(canvas: &mut RgbaImage, x: i64, y: i64, src: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let a = src[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    for c in 0..3 {
        dst[c] = (src[c] as f32 * a + dst[c] as f32 * (1.0 - a)).round() as u8;
    }
    let dst_a = dst[3] as f32 / 255.0;
    dst[3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
}
