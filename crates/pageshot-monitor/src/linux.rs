//! Linux 플랫폼 지원.
//!
//! X11에서는 `xdotool`로 전경 창 제목과 영역을 읽는다.
//! Wayland는 표준 API가 없어 XWayland 창만 감지된다.

use pageshot_core::error::ProbeError;
use pageshot_core::models::window::{ForegroundWindow, Rect};
use std::process::Command;
use tracing::debug;

/// 현재 디스플레이 서버 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    X11,
    Wayland,
    Unknown,
}

/// 현재 사용 중인 디스플레이 서버 감지
pub fn detect_display_server() -> DisplayServer {
    if let Ok(session_type) = std::env::var("XDG_SESSION_TYPE") {
        match session_type.to_lowercase().as_str() {
            "x11" => return DisplayServer::X11,
            "wayland" => return DisplayServer::Wayland,
            _ => {}
        }
    }

    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        return DisplayServer::Wayland;
    }

    if std::env::var("DISPLAY").is_ok() {
        return DisplayServer::X11;
    }

    DisplayServer::Unknown
}

/// 전경 창 조회
pub fn foreground_window_linux() -> Result<Option<ForegroundWindow>, ProbeError> {
    match detect_display_server() {
        DisplayServer::X11 => foreground_window_x11(),
        DisplayServer::Wayland => {
            debug!("Wayland 감지됨 - XWayland fallback 시도");
            foreground_window_x11()
        }
        DisplayServer::Unknown => Err(ProbeError::Unsupported(
            "디스플레이 서버를 감지할 수 없습니다".to_string(),
        )),
    }
}

fn foreground_window_x11() -> Result<Option<ForegroundWindow>, ProbeError> {
    let window_id = match Command::new("xdotool").arg("getactivewindow").output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        Ok(output) => {
            // 활성 창이 없을 때도 실패 코드를 돌려준다
            debug!(
                "xdotool getactivewindow 실패: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProbeError::Unsupported(
                "xdotool 미설치 - 'sudo apt install xdotool' 실행 필요".to_string(),
            ));
        }
        Err(e) => return Err(ProbeError::Os(format!("xdotool 실행 실패: {e}"))),
    };

    if window_id.is_empty() {
        return Ok(None);
    }

    let title = xdotool(&["getwindowname", &window_id]).unwrap_or_default();
    let pid = xdotool(&["getwindowpid", &window_id]).and_then(|s| s.parse::<u32>().ok());
    let bounds = xdotool(&["getwindowgeometry", "--shell", &window_id])
        .map(|out| parse_geometry(&out))
        .unwrap_or_default();
    let app_name = pid.and_then(crate::process_name);

    Ok(Some(ForegroundWindow {
        title,
        bounds,
        pid,
        app_name,
    }))
}

fn xdotool(args: &[&str]) -> Option<String> {
    Command::new("xdotool")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// `xdotool getwindowgeometry --shell` 출력 파싱
fn parse_geometry(stdout: &str) -> Rect {
    let mut rect = Rect::default();
    for line in stdout.lines() {
        if let Some(val) = line.strip_prefix("X=") {
            rect.x = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("Y=") {
            rect.y = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("WIDTH=") {
            rect.width = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("HEIGHT=") {
            rect.height = val.trim().parse().unwrap_or(0);
        }
    }
    rect
}
