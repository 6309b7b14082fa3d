//! 통계/세션 기록 포트.

use crate::models::capture::SavedCapture;

/// 성공한 캡처마다 한 번씩 통지받는다.
pub trait CaptureRecorder: Send + Sync {
    fn record(&self, capture: &SavedCapture);
}
