//! # pageshot-monitor
//!
//! 전경 창 감지 어댑터.
//! 창 제목으로 대상 앱/문서 여부를 분류하고, 창 영역을 화면 좌표로 정리한다.
//! 플랫폼별(macOS, Windows, Linux) 네이티브 API 또는 외부 명령으로 구현.
//!
//! Windows에서는 저수준 키보드/마우스 훅으로 입력 이벤트도 수집한다.

pub mod classifier;
pub mod input_hook;
pub mod keymap;
pub mod platform;
pub mod probe;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

/// PID로 프로세스 이름 조회 (로그용)
pub(crate) fn process_name(pid: u32) -> Option<String> {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
    sys.process(Pid::from_u32(pid))
        .map(|p| p.name().to_string_lossy().to_string())
}
