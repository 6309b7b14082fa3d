//! Win32 가상 키 코드 → `Key` 변환.
//!
//! 훅 콜백은 Windows 전용이지만 매핑 자체는 순수 함수라 모든 플랫폼에서 테스트한다.

use pageshot_core::models::input::Key;

const VK_RETURN: u32 = 0x0D;
const VK_SHIFT: u32 = 0x10;
const VK_CONTROL: u32 = 0x11;
const VK_MENU: u32 = 0x12;
const VK_ESCAPE: u32 = 0x1B;
const VK_SPACE: u32 = 0x20;
const VK_PRIOR: u32 = 0x21;
const VK_NEXT: u32 = 0x22;
const VK_END: u32 = 0x23;
const VK_HOME: u32 = 0x24;
const VK_LEFT: u32 = 0x25;
const VK_UP: u32 = 0x26;
const VK_RIGHT: u32 = 0x27;
const VK_DOWN: u32 = 0x28;
const VK_LWIN: u32 = 0x5B;
const VK_RWIN: u32 = 0x5C;
const VK_F1: u32 = 0x70;
const VK_F24: u32 = 0x87;
const VK_LSHIFT: u32 = 0xA0;
const VK_RSHIFT: u32 = 0xA1;
const VK_LCONTROL: u32 = 0xA2;
const VK_RCONTROL: u32 = 0xA3;
const VK_LMENU: u32 = 0xA4;
const VK_RMENU: u32 = 0xA5;

/// 가상 키 코드 변환 (좌/우 수정자는 하나로 합친다)
pub fn from_virtual_key(vk: u32) -> Key {
    match vk {
        VK_PRIOR => Key::PageUp,
        VK_NEXT => Key::PageDown,
        VK_UP => Key::Up,
        VK_DOWN => Key::Down,
        VK_LEFT => Key::Left,
        VK_RIGHT => Key::Right,
        VK_HOME => Key::Home,
        VK_END => Key::End,
        VK_SPACE => Key::Space,
        VK_RETURN => Key::Enter,
        VK_ESCAPE => Key::Escape,
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => Key::Ctrl,
        VK_SHIFT | VK_LSHIFT | VK_RSHIFT => Key::Shift,
        VK_MENU | VK_LMENU | VK_RMENU => Key::Alt,
        VK_LWIN | VK_RWIN => Key::Meta,
        VK_F1..=VK_F24 => Key::F((vk - VK_F1 + 1) as u8),
        // '0'-'9', 'A'-'Z'
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(vk).map(Key::char).unwrap_or(Key::Other(vk)),
        other => Key::Other(other),
    }
}
