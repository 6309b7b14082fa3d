//! 창 영역 캡처.
//!
//! xcap 기반. 창 영역을 포함하는 모니터를 찾아 전체를 캡처한 뒤 창 영역만 잘라낸다.
//! `FrameSource` 포트 구현.

use pageshot_core::error::CoreError;
use pageshot_core::models::capture::RawFrame;
use pageshot_core::models::window::Rect;
use pageshot_core::ports::frame::FrameSource;
use tracing::debug;
use xcap::Monitor;

/// 모니터 영역 (전역 좌표)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonitorArea {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl MonitorArea {
    fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && (px as i64) < self.x as i64 + self.width as i64
            && (py as i64) < self.y as i64 + self.height as i64
    }
}

/// 스크린 캡처: xcap 기반
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapFrameSource;

impl XcapFrameSource {
    pub fn new() -> Self {
        Self
    }

    /// 사용 가능한 모니터 수
    pub fn monitor_count() -> Result<usize, CoreError> {
        Monitor::all()
            .map(|m| m.len())
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))
    }
}

impl FrameSource for XcapFrameSource {
    fn grab(&self, region: &Rect) -> Result<RawFrame, CoreError> {
        if !region.is_valid() {
            return Err(CoreError::Capture(format!("잘못된 캡처 영역: {region:?}")));
        }

        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        // 창 중심이 속한 모니터
        let cx = region.x.saturating_add(region.width / 2);
        let cy = region.y.saturating_add(region.height / 2);
        let (monitor, area) = monitors
            .into_iter()
            .filter_map(|m| {
                let area = MonitorArea {
                    x: m.x().ok()?,
                    y: m.y().ok()?,
                    width: m.width().ok()?,
                    height: m.height().ok()?,
                };
                Some((m, area))
            })
            .find(|(_, area)| area.contains(cx, cy))
            .ok_or_else(|| CoreError::Capture(format!("영역을 포함하는 모니터 없음: {region:?}")))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;

        let (x, y, w, h) = crop_within(region, &area, image.width(), image.height())
            .ok_or_else(|| CoreError::Capture(format!("모니터 밖 영역: {region:?}")))?;

        let cropped = image::imageops::crop_imm(&image, x, y, w, h).to_image();
        debug!(
            "창 영역 캡처 완료: {}x{} at ({},{})",
            cropped.width(),
            cropped.height(),
            x,
            y
        );

        Ok(RawFrame::new(cropped.width(), cropped.height(), cropped.into_raw()))
    }
}

/// 전역 좌표 영역을 모니터 이미지 내부 좌표로 변환하고 경계로 자른다.
fn crop_within(
    region: &Rect,
    area: &MonitorArea,
    image_width: u32,
    image_height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let left = (region.x as i64 - area.x as i64).max(0);
    let top = (region.y as i64 - area.y as i64).max(0);
    let right = (region.x as i64 + region.width as i64 - area.x as i64).min(image_width as i64);
    let bottom = (region.y as i64 + region.height as i64 - area.y as i64).min(image_height as i64);

    if right <= left || bottom <= top {
        return None;
    }
    Some((
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: MonitorArea = MonitorArea {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn crop_inside_monitor() {
        let region = Rect::new(100, 50, 800, 600);
        assert_eq!(
            crop_within(&region, &PRIMARY, 1920, 1080),
            Some((100, 50, 800, 600))
        );
    }

    #[test]
    fn crop_clamps_to_monitor_edge() {
        let region = Rect::new(1500, 900, 800, 600);
        assert_eq!(
            crop_within(&region, &PRIMARY, 1920, 1080),
            Some((1500, 900, 420, 180))
        );
    }

    #[test]
    fn crop_on_secondary_monitor_uses_local_coordinates() {
        let secondary = MonitorArea {
            x: 1920,
            y: 0,
            width: 2560,
            height: 1440,
        };
        let region = Rect::new(2000, 100, 1000, 800);
        assert_eq!(
            crop_within(&region, &secondary, 2560, 1440),
            Some((80, 100, 1000, 800))
        );
        assert!(secondary.contains(2500, 500));
        assert!(!secondary.contains(100, 500));
    }

    #[test]
    fn region_outside_monitor_is_rejected() {
        let region = Rect::new(5000, 5000, 100, 100);
        assert_eq!(crop_within(&region, &PRIMARY, 1920, 1080), None);
    }

    #[test]
    fn invalid_region_is_capture_error() {
        let result = XcapFrameSource::new().grab(&Rect::new(0, 0, 0, 10));
        assert!(matches!(result, Err(CoreError::Capture(_))));
    }
}
