//! WindowStateProbe: 전경 창 상태 조회.
//!
//! OS 조회는 블로킹이므로 `spawn_blocking`으로 옮기고 타임아웃을 건다.
//! 실패 정책은 한 곳([`WindowStateProbe::probe`])에만 둔다:
//! 모든 `ProbeError`는 "대상 앱 비활성"으로 취급한다.

use std::sync::Arc;
use std::time::Duration;

use pageshot_core::config::TargetAppConfig;
use pageshot_core::error::ProbeError;
use pageshot_core::models::window::{ForegroundWindow, WindowState};
use pageshot_core::ports::window::ForegroundWindowSource;
use tracing::debug;

use crate::classifier::{TitleClass, TitleClassifier};

/// 전경 창 상태 조회기
#[derive(Clone)]
pub struct WindowStateProbe {
    source: Arc<dyn ForegroundWindowSource>,
}

impl WindowStateProbe {
    pub fn new(source: Arc<dyn ForegroundWindowSource>) -> Self {
        Self { source }
    }

    /// 전경 창 조회 + 분류 (실패는 그대로 반환)
    pub async fn try_probe(
        &self,
        target: &TargetAppConfig,
        timeout: Duration,
    ) -> Result<WindowState, ProbeError> {
        let source = Arc::clone(&self.source);
        let query = tokio::task::spawn_blocking(move || source.foreground_window());

        let window = match tokio::time::timeout(timeout, query).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                return Err(ProbeError::Os(format!("창 조회 작업 실패: {join_err}")))
            }
            Err(_) => {
                return Err(ProbeError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        };

        Ok(match window {
            Some(window) => classify_window(&window, &TitleClassifier::new(target)),
            None => WindowState::inactive(),
        })
    }

    /// 전경 창 상태 (실패 시 비활성)
    pub async fn probe(&self, target: &TargetAppConfig, timeout: Duration) -> WindowState {
        self.try_probe(target, timeout).await.unwrap_or_else(|e| {
            debug!("창 조회 실패, 비활성으로 처리: {e}");
            WindowState::inactive()
        })
    }
}

/// 원시 창 정보 → `WindowState`
///
/// 클리핑 후 크기가 0 이하인 창은 대상 앱이라도 비활성으로 본다.
pub fn classify_window(window: &ForegroundWindow, classifier: &TitleClassifier) -> WindowState {
    let class = classifier.classify(&window.title);
    if class == TitleClass::NotTarget {
        return WindowState::inactive();
    }

    let bounds = window.bounds.clip_to_screen();
    if !bounds.is_valid() {
        debug!(
            "대상 앱 창 영역이 유효하지 않음: {:?} → {:?}",
            window.bounds, bounds
        );
        return WindowState::inactive();
    }

    debug!(
        "대상 앱 창: {} ({}, {:?})",
        window.title,
        window.app_name.as_deref().unwrap_or("?"),
        bounds
    );

    match class {
        TitleClass::Document(id) => WindowState::document(window.title.clone(), id, bounds),
        _ => WindowState::no_document(window.title.clone(), bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageshot_core::models::window::Rect;

    struct FixedSource(Result<Option<ForegroundWindow>, ProbeError>);

    impl ForegroundWindowSource for FixedSource {
        fn foreground_window(&self) -> Result<Option<ForegroundWindow>, ProbeError> {
            self.0.clone()
        }
    }

    struct SlowSource;

    impl ForegroundWindowSource for SlowSource {
        fn foreground_window(&self) -> Result<Option<ForegroundWindow>, ProbeError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(None)
        }
    }

    fn window(title: &str, bounds: Rect) -> ForegroundWindow {
        ForegroundWindow {
            title: title.to_string(),
            bounds,
            pid: Some(42),
            app_name: Some("Acrobat.exe".to_string()),
        }
    }

    fn probe_with(result: Result<Option<ForegroundWindow>, ProbeError>) -> WindowStateProbe {
        WindowStateProbe::new(Arc::new(FixedSource(result)))
    }

    const TIMEOUT: Duration = Duration::from_millis(500);

    #[tokio::test]
    async fn report_pdf_scenario() {
        let probe = probe_with(Ok(Some(window(
            "Report.pdf - Adobe Acrobat Reader",
            Rect::new(0, 0, 1280, 720),
        ))));
        let state = probe.probe(&TargetAppConfig::default(), TIMEOUT).await;

        assert!(state.is_target_app_active);
        assert!(state.has_document_open);
        assert_eq!(state.document_id.as_ref().map(|d| d.as_str()), Some("Report.pdf"));
        assert_eq!(state.window_bounds, Rect::new(0, 0, 1280, 720));
    }

    #[tokio::test]
    async fn webpage_title_is_inactive() {
        let probe = probe_with(Ok(Some(window(
            "Acrobat Reader for Report.pdf Tutorial — Some Blog",
            Rect::new(0, 0, 1280, 720),
        ))));
        let state = probe.probe(&TargetAppConfig::default(), TIMEOUT).await;
        assert!(!state.is_target_app_active);
    }

    #[tokio::test]
    async fn bounds_are_clipped() {
        let probe = probe_with(Ok(Some(window(
            "Report.pdf - Adobe Acrobat Reader",
            Rect::new(-8, -8, 1936, 1056),
        ))));
        let state = probe.probe(&TargetAppConfig::default(), TIMEOUT).await;
        assert_eq!(state.window_bounds, Rect::new(0, 0, 1928, 1048));
    }

    #[tokio::test]
    async fn minimized_window_is_inactive() {
        let probe = probe_with(Ok(Some(window(
            "Report.pdf - Adobe Acrobat Reader",
            Rect::new(-32000, -32000, 160, 28),
        ))));
        let state = probe.probe(&TargetAppConfig::default(), TIMEOUT).await;
        assert!(!state.is_target_app_active);
        assert!(state.capturable_document().is_none());
    }

    #[tokio::test]
    async fn os_error_falls_back_to_inactive() {
        let probe = probe_with(Err(ProbeError::Os("boom".to_string())));
        let target = TargetAppConfig::default();

        assert_eq!(
            probe.try_probe(&target, TIMEOUT).await,
            Err(ProbeError::Os("boom".to_string()))
        );
        assert_eq!(probe.probe(&target, TIMEOUT).await, WindowState::inactive());
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let probe = WindowStateProbe::new(Arc::new(SlowSource));
        let result = probe
            .try_probe(&TargetAppConfig::default(), Duration::from_millis(20))
            .await;
        assert_eq!(result, Err(ProbeError::Timeout { timeout_ms: 20 }));
    }

    #[tokio::test]
    async fn no_foreground_window_is_inactive() {
        let probe = probe_with(Ok(None));
        let state = probe.probe(&TargetAppConfig::default(), TIMEOUT).await;
        assert_eq!(state, WindowState::inactive());
    }
}
