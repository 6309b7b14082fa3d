//! 전경 창 조회 포트.
//!
//! 구현: `pageshot-monitor` crate (xdotool / Win32 / osascript)

use crate::error::ProbeError;
use crate::models::window::ForegroundWindow;

/// 현재 전경 창 정보를 OS에서 읽는다.
pub trait ForegroundWindowSource: Send + Sync {
    /// 전경 창이 없으면 `Ok(None)`
    fn foreground_window(&self) -> Result<Option<ForegroundWindow>, ProbeError>;
}
