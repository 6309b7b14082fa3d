//! 입력 이벤트, 키 상태, 단축키.
//!
//! 리스너 스레드는 `InputEvent`만 큐에 넣고, 수정자 키 상태는
//! 스케줄러가 소유한 `KeyState` 값으로 관리한다 (전역 변수 없음).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 키 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Space,
    Enter,
    Escape,
    Ctrl,
    Shift,
    Alt,
    Meta,
    /// F1 ~ F24
    F(u8),
    /// 문자 키 (항상 소문자로 저장)
    Char(char),
    /// 그 외 플랫폼 키 코드
    Other(u32),
}

impl Key {
    /// 문자 키 (대소문자 구분 없음)
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Ctrl | Key::Shift | Key::Alt | Key::Meta)
    }
}

impl FromStr for Key {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "pageup" | "pgup" => Key::PageUp,
            "pagedown" | "pgdn" => Key::PageDown,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "ctrl" | "control" => Key::Ctrl,
            "shift" => Key::Shift,
            "alt" | "option" => Key::Alt,
            "meta" | "win" | "cmd" | "super" => Key::Meta,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::char(c),
                    (Some('f'), Some(_)) => other[1..]
                        .parse::<u8>()
                        .ok()
                        .filter(|n| (1..=24).contains(n))
                        .map(Key::F)
                        .ok_or_else(|| unknown_key(s))?,
                    _ => return Err(unknown_key(s)),
                }
            }
        };
        Ok(key)
    }
}

fn unknown_key(s: &str) -> CoreError {
    CoreError::Validation {
        field: "hotkey".to_string(),
        message: format!("알 수 없는 키: {s}"),
    }
}

/// 입력 리스너가 전달하는 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// 키 누름/뗌
    Key { key: Key, pressed: bool },
    /// 마우스 휠 (한 노치 = 120, 부호는 방향)
    Scroll { delta: i32 },
    /// 마우스 버튼 클릭
    Click,
}

/// 현재 눌린 수정자 키 집합
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: BTreeSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        if key.is_modifier() {
            self.held.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// 방금 눌린 `key`와 현재 수정자 조합이 단축키와 정확히 일치하는지
    pub fn matches(&self, hotkey: &Hotkey, key: Key) -> bool {
        hotkey.key == key && hotkey.modifiers == self.held
    }
}

/// 수정자 + 주 키 조합
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: BTreeSet<Key>,
    pub key: Key,
}

impl Hotkey {
    /// `"ctrl+shift+s"` 형식 파싱
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let mut modifiers = BTreeSet::new();
        let mut main = None;

        for part in text.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            let key: Key = part.parse()?;
            if key.is_modifier() {
                modifiers.insert(key);
            } else if main.replace(key).is_some() {
                return Err(CoreError::Validation {
                    field: "hotkey".to_string(),
                    message: format!("주 키가 둘 이상입니다: {text}"),
                });
            }
        }

        let key = main.ok_or_else(|| CoreError::Validation {
            field: "hotkey".to_string(),
            message: format!("주 키가 없습니다: {text}"),
        })?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{m:?}+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}
