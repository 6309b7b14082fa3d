//! Windows 플랫폼: 전경 창 감지.
//!
//! Win32 API `GetForegroundWindow` + `GetWindowTextW` + `GetWindowRect` 기반.

#![cfg(target_os = "windows")]

use pageshot_core::error::ProbeError;
use pageshot_core::models::window::{ForegroundWindow, Rect};
use windows_sys::Win32::Foundation::{HWND, RECT};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowRect, GetWindowTextW, GetWindowThreadProcessId,
};

/// 전경 창 조회
pub fn foreground_window_windows() -> Result<Option<ForegroundWindow>, ProbeError> {
    unsafe {
        let hwnd: HWND = GetForegroundWindow();
        if hwnd.is_null() {
            return Ok(None);
        }

        let mut title_buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, title_buf.as_mut_ptr(), title_buf.len() as i32);
        let title = if len > 0 {
            String::from_utf16_lossy(&title_buf[..len as usize])
        } else {
            String::new()
        };

        let mut pid: u32 = 0;
        GetWindowThreadProcessId(hwnd, &mut pid);
        let pid = (pid != 0).then_some(pid);

        let mut rect: RECT = std::mem::zeroed();
        if GetWindowRect(hwnd, &mut rect) == 0 {
            return Err(ProbeError::Os("GetWindowRect 실패".to_string()));
        }
        // 최소화된 창은 (-32000, -32000)으로 보고되며 클리핑 단계에서 걸러진다
        let bounds = Rect::new(
            rect.left,
            rect.top,
            rect.right - rect.left,
            rect.bottom - rect.top,
        );

        Ok(Some(ForegroundWindow {
            title,
            bounds,
            pid,
            app_name: pid.and_then(crate::process_name),
        }))
    }
}
