//! 문서 식별자.
//!
//! 창 제목에서 앱 이름 접미사를 뗀 나머지를 파일 시스템 안전 문자열로 정규화한다.
//! 유사도 인덱스의 키이자 파일명/폴더명 구성 요소로 쓰인다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 정규화 결과가 비었을 때 사용하는 이름
pub const UNKNOWN_DOCUMENT: &str = "Unknown Document";

/// 정규화된 문서 식별자
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// 원시 문자열 정규화
    ///
    /// 영숫자와 공백, `-`, `_`, `.`만 남기고 앞뒤 공백을 자른 뒤
    /// `max_len` 문자로 자른다. 결과가 비면 [`UNKNOWN_DOCUMENT`].
    /// `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(raw: &str, max_len: usize) -> Self {
        let kept: String = raw.chars().filter(|c| is_allowed(*c)).collect();
        let truncated: String = kept.trim().chars().take(max_len).collect();
        let trimmed = truncated.trim_end();

        if trimmed.is_empty() {
            Self(UNKNOWN_DOCUMENT.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
