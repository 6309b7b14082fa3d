//! 프레임 획득 포트.
//!
//! 구현: `pageshot-vision` crate (xcap)

use crate::error::CoreError;
use crate::models::capture::RawFrame;
use crate::models::window::Rect;

/// 화면 영역의 픽셀을 동기적으로 가져온다.
///
/// 잘못된 영역, 권한 부족, 모니터 분리는 모두 `Err`로 돌려주며
/// 엔진은 이를 "캡처 없음"으로 처리한다.
pub trait FrameSource: Send + Sync {
    fn grab(&self, region: &Rect) -> Result<RawFrame, CoreError>;
}
