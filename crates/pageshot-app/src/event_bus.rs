//! 내부 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 스케줄러 상태 전이와 캡처 결과를 구독자에게 알린다.
//! 상태 표시는 주기적 조회 대신 이 알림을 구독한다.

use pageshot_core::models::capture::{SavedCapture, SkipReason};
use pageshot_core::models::document::DocumentId;
use tokio::sync::broadcast;
use tracing::debug;

use crate::scheduler::SchedulerStatus;

/// 내부 앱 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// 스케줄러 상태 전이
    SchedulerState(SchedulerStatus),
    /// 캡처 저장 완료
    CaptureSaved(SavedCapture),
    /// 게이트에 걸려 파일 없이 종료
    CaptureSkipped { manual: bool, reason: SkipReason },
    /// 프레임 획득/저장 실패
    CaptureFailed { manual: bool, message: String },
    /// 유사도 인덱스 초기화 (`None` = 전체)
    IndexCleared { document_id: Option<DocumentId> },
    /// 세션 캡처 수 갱신
    StatsUpdated {
        total: u64,
        document_id: DocumentId,
        document_total: u64,
    },
}

/// 내부 이벤트 버스
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행 (구독자가 없으면 버려진다)
    pub fn publish(&self, event: AppEvent) {
        debug!("이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
