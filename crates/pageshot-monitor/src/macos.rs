//! macOS 플랫폼: 전경 창 감지.
//!
//! System Events AppleScript로 최전면 앱의 앞 창 제목과 영역을 읽는다.
//! 손쉬운 사용 권한이 없으면 제목이 비어 있을 수 있다.

use pageshot_core::error::ProbeError;
use pageshot_core::models::window::{ForegroundWindow, Rect};
use std::process::Command;
use tracing::debug;

const SCRIPT: &str = r#"tell application "System Events"
    set frontApp to first application process whose frontmost is true
    set appName to name of frontApp
    set appPid to unix id of frontApp
    set winTitle to ""
    set winPos to {0, 0}
    set winSize to {0, 0}
    try
        set frontWin to front window of frontApp
        set winTitle to name of frontWin
        set winPos to position of frontWin
        set winSize to size of frontWin
    end try
    return appName & "|" & appPid & "|" & (item 1 of winPos as integer) & "|" & (item 2 of winPos as integer) & "|" & (item 1 of winSize as integer) & "|" & (item 2 of winSize as integer) & "|" & winTitle
end tell"#;

/// 전경 창 조회
pub fn foreground_window_macos() -> Result<Option<ForegroundWindow>, ProbeError> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(SCRIPT)
        .output()
        .map_err(|e| ProbeError::Os(format!("osascript 실행 실패: {e}")))?;

    if !output.status.success() {
        debug!("활성 창 감지 실패 (osascript)");
        return Err(ProbeError::Os(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(parse_output(String::from_utf8_lossy(&output.stdout).trim()))
}

/// `app|pid|x|y|w|h|title` 파싱 (제목에 `|`가 있어도 안전하도록 제목을 마지막에 둔다)
fn parse_output(text: &str) -> Option<ForegroundWindow> {
    let parts: Vec<&str> = text.splitn(7, '|').collect();
    if parts.len() < 7 {
        return None;
    }

    let num = |s: &str| s.trim().parse::<i32>().unwrap_or(0);
    Some(ForegroundWindow {
        title: parts[6].to_string(),
        bounds: Rect::new(num(parts[2]), num(parts[3]), num(parts[4]), num(parts[5])),
        pid: parts[1].trim().parse().ok(),
        app_name: Some(parts[0].to_string()).filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_with_pipe_in_title() {
        let window = parse_output("AdobeAcrobat|812|0|25|1440|875|a|b.pdf - Adobe Acrobat Reader")
            .unwrap();
        assert_eq!(window.title, "a|b.pdf - Adobe Acrobat Reader");
        assert_eq!(window.bounds, Rect::new(0, 25, 1440, 875));
        assert_eq!(window.pid, Some(812));
    }

    #[test]
    fn parse_output_rejects_short_output() {
        assert!(parse_output("Finder|1").is_none());
    }

    #[test]
    fn foreground_window_returns_result() {
        // CI 환경에서는 권한 부족으로 실패할 수 있음
        let _ = foreground_window_macos();
    }
}
