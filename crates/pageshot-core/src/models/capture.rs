//! 캡처 요청/결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::models::document::DocumentId;

/// 스케줄러가 만들고 엔진이 정확히 한 번 소비하는 캡처 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// 수동 단축키 요청 여부 (게이트 우회)
    pub manual: bool,
    /// 요청 생성 시각
    pub requested_at: DateTime<Utc>,
}

impl CaptureRequest {
    pub fn automatic() -> Self {
        Self {
            manual: false,
            requested_at: Utc::now(),
        }
    }

    pub fn manual() -> Self {
        Self {
            manual: true,
            requested_at: Utc::now(),
        }
    }
}

/// 프레임 소스가 돌려주는 원시 RGBA 픽셀
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA8, 행 우선
    pub rgba: Vec<u8>,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// 저장 완료된 캡처
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCapture {
    pub path: PathBuf,
    pub document_id: DocumentId,
    pub manual: bool,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

/// 파일을 만들지 않고 조용히 넘어간 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 자동 캡처 비활성
    Disabled,
    /// 대상 앱 비활성 또는 문서 없음
    NoDocument,
    /// 창 영역이 유효하지 않음
    InvalidBounds,
    /// 쿨다운 미경과
    Cooldown,
    /// 제목 화이트리스트/블랙리스트
    TitleFiltered,
    /// 문서당 최대 캡처 수 도달
    MaxCountReached,
    /// 이미 캡처한 페이지
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Disabled => "disabled",
            SkipReason::NoDocument => "no_document",
            SkipReason::InvalidBounds => "invalid_bounds",
            SkipReason::Cooldown => "cooldown",
            SkipReason::TitleFiltered => "title_filtered",
            SkipReason::MaxCountReached => "max_count_reached",
            SkipReason::Duplicate => "duplicate",
        };
        f.write_str(text)
    }
}

/// 캡처 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Saved(SavedCapture),
    Skipped(SkipReason),
    /// 프레임 획득 또는 저장 실패 (로그 후 파일 없음)
    Failed(String),
}

impl CaptureOutcome {
    pub fn saved(&self) -> Option<&SavedCapture> {
        match self {
            CaptureOutcome::Saved(saved) => Some(saved),
            _ => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, CaptureOutcome::Saved(_))
    }
}
