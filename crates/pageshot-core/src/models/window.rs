//! 전경 창 상태 모델.
//!
//! `WindowState`는 조회할 때마다 새로 계산되며 저장되지 않는다.

use serde::{Deserialize, Serialize};

use crate::models::document::DocumentId;

/// 화면 좌표계 직사각형 (픽셀)
///
/// OS가 화면 밖 창에 음수 좌표를 돌려줄 수 있어 부호 있는 정수를 쓴다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 음수 좌표를 0으로 잘라내고, 잘린 만큼 너비/높이를 줄인다.
    pub fn clip_to_screen(&self) -> Rect {
        let (x, width) = clip_axis(self.x, self.width);
        let (y, height) = clip_axis(self.y, self.height);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// 너비와 높이가 모두 양수인지
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn clip_axis(origin: i32, extent: i32) -> (i32, i32) {
    if origin < 0 {
        (0, extent.saturating_add(origin))
    } else {
        (origin, extent)
    }
}

/// OS에서 읽어온 전경 창 원시 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundWindow {
    /// 창 제목
    pub title: String,
    /// 창 위치/크기 (클리핑 전)
    pub bounds: Rect,
    /// 프로세스 ID (조회 가능한 경우)
    pub pid: Option<u32>,
    /// 프로세스 이름 (조회 가능한 경우)
    pub app_name: Option<String>,
}

/// 대상 앱 전경 창 분류 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// 대상 앱이 전경에 있는지
    pub is_target_app_active: bool,
    /// 문서가 열려 있는지
    pub has_document_open: bool,
    /// 문서 식별자 (문서가 없으면 `None`)
    pub document_id: Option<DocumentId>,
    /// 클리핑된 창 영역
    pub window_bounds: Rect,
    /// 원본 창 제목 (제목 필터용)
    pub title: String,
}

impl WindowState {
    /// 대상 앱 비활성 (조회 실패 시 폴백)
    pub fn inactive() -> Self {
        Self {
            is_target_app_active: false,
            has_document_open: false,
            document_id: None,
            window_bounds: Rect::default(),
            title: String::new(),
        }
    }

    /// 대상 앱은 전경이지만 문서가 없음
    pub fn no_document(title: impl Into<String>, bounds: Rect) -> Self {
        Self {
            is_target_app_active: true,
            has_document_open: false,
            document_id: None,
            window_bounds: bounds,
            title: title.into(),
        }
    }

    /// 문서가 열린 대상 앱 창
    pub fn document(title: impl Into<String>, document_id: DocumentId, bounds: Rect) -> Self {
        Self {
            is_target_app_active: true,
            has_document_open: true,
            document_id: Some(document_id),
            window_bounds: bounds,
            title: title.into(),
        }
    }

    /// 캡처 가능한 문서 식별자 (활성 + 문서 열림일 때만)
    pub fn capturable_document(&self) -> Option<&DocumentId> {
        if self.is_target_app_active && self.has_document_open {
            self.document_id.as_ref()
        } else {
            None
        }
    }
}
