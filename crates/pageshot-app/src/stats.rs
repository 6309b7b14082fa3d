//! 세션 캡처 통계.
//!
//! 프로세스 수명 동안만 유지되며 디스크에 저장하지 않는다.

use std::collections::HashMap;
use std::sync::Arc;

use pageshot_core::models::capture::SavedCapture;
use pageshot_core::models::document::DocumentId;
use pageshot_core::ports::recorder::CaptureRecorder;
use parking_lot::Mutex;
use tracing::info;

use crate::event_bus::{AppEvent, EventBus};

/// 세션 통계 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: u64,
    pub manual: u64,
    pub per_document: HashMap<DocumentId, u64>,
}

/// 캡처 수 기록기
#[derive(Debug, Default)]
pub struct SessionStatsRecorder {
    stats: Mutex<SessionStats>,
    bus: Option<Arc<EventBus>>,
}

impl SessionStatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 갱신될 때마다 `StatsUpdated` 발행
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn total(&self) -> u64 {
        self.stats.lock().total
    }

    pub fn document_total(&self, doc: &DocumentId) -> u64 {
        self.stats.lock().per_document.get(doc).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> SessionStats {
        self.stats.lock().clone()
    }
}

impl CaptureRecorder for SessionStatsRecorder {
    fn record(&self, capture: &SavedCapture) {
        let (total, document_total) = {
            let mut guard = self.stats.lock();
            let stats = &mut *guard;
            stats.total += 1;
            if capture.manual {
                stats.manual += 1;
            }
            let count = stats
                .per_document
                .entry(capture.document_id.clone())
                .or_insert(0);
            *count += 1;
            (stats.total, *count)
        };

        info!(
            "세션 캡처 {}장 ({}: {}장)",
            total, capture.document_id, document_total
        );

        if let Some(bus) = &self.bus {
            bus.publish(AppEvent::StatsUpdated {
                total,
                document_id: capture.document_id.clone(),
                document_total,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pageshot_core::config::OutputFormat;
    use std::path::PathBuf;

    fn saved(doc: &str, manual: bool) -> SavedCapture {
        SavedCapture {
            path: PathBuf::from(format!("{doc}.png")),
            document_id: DocumentId::normalize(doc, 50),
            manual,
            format: OutputFormat::Png,
            width: 10,
            height: 10,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn counts_total_and_per_document() {
        let recorder = SessionStatsRecorder::new();
        recorder.record(&saved("Report.pdf", false));
        recorder.record(&saved("Report.pdf", true));
        recorder.record(&saved("Notes.pdf", false));

        assert_eq!(recorder.total(), 3);
        assert_eq!(
            recorder.document_total(&DocumentId::normalize("Report.pdf", 50)),
            2
        );
        assert_eq!(
            recorder.document_total(&DocumentId::normalize("Other.pdf", 50)),
            0
        );
        assert_eq!(recorder.snapshot().manual, 1);
    }

    #[tokio::test]
    async fn publishes_updates() {
        let bus = Arc::new(EventBus::new(8));
        let mut rx = bus.subscribe();
        let recorder = SessionStatsRecorder::new().with_event_bus(Arc::clone(&bus));

        recorder.record(&saved("Report.pdf", false));

        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::StatsUpdated {
                total: 1,
                document_id: DocumentId::normalize("Report.pdf", 50),
                document_total: 1,
            }
        );
    }
}
