//! 플랫폼별 전경 창 소스.
//!
//! `ForegroundWindowSource` 포트 구현.

use pageshot_core::error::ProbeError;
use pageshot_core::models::window::ForegroundWindow;
use pageshot_core::ports::window::ForegroundWindowSource;

/// 현재 OS의 전경 창 조회기
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformWindowSource;

impl PlatformWindowSource {
    pub fn new() -> Self {
        Self
    }
}

impl ForegroundWindowSource for PlatformWindowSource {
    fn foreground_window(&self) -> Result<Option<ForegroundWindow>, ProbeError> {
        #[cfg(target_os = "macos")]
        {
            crate::macos::foreground_window_macos()
        }
        #[cfg(target_os = "windows")]
        {
            crate::windows::foreground_window_windows()
        }
        #[cfg(target_os = "linux")]
        {
            crate::linux::foreground_window_linux()
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            Err(ProbeError::Unsupported(std::env::consts::OS.to_string()))
        }
    }
}
