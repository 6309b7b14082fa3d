//! 저수준 키보드/마우스 입력 리스너.
//!
//! `InputSource` 포트 구현. Windows에서는 `WH_KEYBOARD_LL` / `WH_MOUSE_LL` 훅을
//! 각각 전용 스레드에 설치하고, 콜백은 이벤트를 채널에 넣기만 한다.
//! 다른 플랫폼은 `CoreError::Unsupported`를 반환한다.

use pageshot_core::error::CoreError;
use pageshot_core::models::input::InputEvent;
use pageshot_core::ports::input::InputSource;
use tokio::sync::mpsc;

/// 키보드 리스너
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyboardHook;

/// 포인터(휠/클릭) 리스너
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerHook;

impl InputSource for KeyboardHook {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn start(&self, tx: mpsc::UnboundedSender<InputEvent>) -> Result<(), CoreError> {
        #[cfg(target_os = "windows")]
        {
            win::spawn_hook_thread(win::HookKind::Keyboard, tx)
        }
        #[cfg(not(target_os = "windows"))]
        {
            drop(tx);
            Err(unsupported())
        }
    }
}

impl InputSource for PointerHook {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn start(&self, tx: mpsc::UnboundedSender<InputEvent>) -> Result<(), CoreError> {
        #[cfg(target_os = "windows")]
        {
            win::spawn_hook_thread(win::HookKind::Pointer, tx)
        }
        #[cfg(not(target_os = "windows"))]
        {
            drop(tx);
            Err(unsupported())
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn unsupported() -> CoreError {
    CoreError::Unsupported(format!(
        "전역 입력 훅은 Windows에서만 지원됩니다 (현재: {})",
        std::env::consts::OS
    ))
}

#[cfg(target_os = "windows")]
mod win {
    use std::cell::RefCell;
    use std::ptr;

    use pageshot_core::error::CoreError;
    use pageshot_core::models::input::InputEvent;
    use tokio::sync::mpsc;
    use tracing::{debug, error};
    use windows_sys::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        CallNextHookEx, DispatchMessageW, GetMessageW, SetWindowsHookExW, TranslateMessage,
        UnhookWindowsHookEx, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT, WH_KEYBOARD_LL, WH_MOUSE_LL,
        WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_MBUTTONDOWN, WM_MOUSEWHEEL, WM_RBUTTONDOWN,
        WM_SYSKEYDOWN, WM_SYSKEYUP,
    };

    use crate::keymap::from_virtual_key;

    #[derive(Debug, Clone, Copy)]
    pub(super) enum HookKind {
        Keyboard,
        Pointer,
    }

    thread_local! {
        // 훅 콜백은 설치한 스레드의 메시지 루프에서만 호출된다
        static SENDER: RefCell<Option<mpsc::UnboundedSender<InputEvent>>> =
            const { RefCell::new(None) };
    }

    fn forward(event: InputEvent) {
        SENDER.with(|sender| {
            if let Some(tx) = sender.borrow().as_ref() {
                let _ = tx.send(event);
            }
        });
    }

    unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        if code >= 0 {
            let info = &*(lparam as *const KBDLLHOOKSTRUCT);
            let pressed = match wparam as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => Some(true),
                WM_KEYUP | WM_SYSKEYUP => Some(false),
                _ => None,
            };
            if let Some(pressed) = pressed {
                forward(InputEvent::Key {
                    key: from_virtual_key(info.vkCode),
                    pressed,
                });
            }
        }
        CallNextHookEx(ptr::null_mut(), code, wparam, lparam)
    }

    unsafe extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        if code >= 0 {
            let info = &*(lparam as *const MSLLHOOKSTRUCT);
            match wparam as u32 {
                WM_MOUSEWHEEL => {
                    // 상위 16비트가 부호 있는 휠 델타
                    let delta = ((info.mouseData >> 16) & 0xFFFF) as u16 as i16 as i32;
                    forward(InputEvent::Scroll { delta });
                }
                WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN => forward(InputEvent::Click),
                _ => {}
            }
        }
        CallNextHookEx(ptr::null_mut(), code, wparam, lparam)
    }

    /// 훅 스레드 시작. 훅 설치 결과를 기다렸다가 반환한다.
    pub(super) fn spawn_hook_thread(
        kind: HookKind,
        tx: mpsc::UnboundedSender<InputEvent>,
    ) -> Result<(), CoreError> {
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<(), String>>();
        let thread_name = match kind {
            HookKind::Keyboard => "pageshot-keyboard-hook",
            HookKind::Pointer => "pageshot-pointer-hook",
        };

        std::thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || {
                SENDER.with(|sender| *sender.borrow_mut() = Some(tx));

                let hook = unsafe {
                    match kind {
                        HookKind::Keyboard => SetWindowsHookExW(
                            WH_KEYBOARD_LL,
                            Some(keyboard_proc),
                            ptr::null_mut(),
                            0,
                        ),
                        HookKind::Pointer => {
                            SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_proc), ptr::null_mut(), 0)
                        }
                    }
                };

                if hook.is_null() {
                    let _ = ready_tx.send(Err(format!("SetWindowsHookExW 실패 ({kind:?})")));
                    return;
                }
                let _ = ready_tx.send(Ok(()));
                debug!("입력 훅 설치: {kind:?}");

                unsafe {
                    let mut msg: MSG = std::mem::zeroed();
                    while GetMessageW(&mut msg, ptr::null_mut(), 0, 0) > 0 {
                        TranslateMessage(&msg);
                        DispatchMessageW(&msg);
                    }
                    UnhookWindowsHookEx(hook);
                }
                debug!("입력 훅 스레드 종료: {kind:?}");
            })
            .map_err(|e| CoreError::Internal(format!("훅 스레드 생성 실패: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(message)) => {
                error!("{message}");
                Err(CoreError::Internal(message))
            }
            Err(_) => Err(CoreError::Internal("훅 스레드가 응답 없이 종료됨".to_string())),
        }
    }
}
