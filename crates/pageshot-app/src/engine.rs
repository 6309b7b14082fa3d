//! CaptureEngine: 직렬화된 캡처 실행 경로.
//!
//! 창 확인 → 게이트 → 프레임 획득 → 중복 검사 → 변환 → 경로 결정 → 저장 → 훅.
//! 전체 경로는 하나의 비동기 뮤텍스 안에서 실행되어 동시에 하나의 캡처만 진행된다.
//! 먼저 잠금을 얻은 요청이 끝까지 실행된 뒤 다음 요청이 진행되며, 중간 취소 경로는 없다.
//!
//! 설정은 요청마다 한 번 스냅샷으로 읽어 파이프라인 끝까지 사용한다.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, Utc};
use pageshot_core::config::AppConfig;
use pageshot_core::config_manager::ConfigManager;
use pageshot_core::error::CoreError;
use pageshot_core::models::capture::{
    CaptureOutcome, CaptureRequest, RawFrame, SavedCapture, SkipReason,
};
use pageshot_core::models::document::DocumentId;
use pageshot_core::models::window::WindowState;
use pageshot_core::ports::frame::FrameSource;
use pageshot_core::ports::hooks::{HookContext, PostCaptureHook};
use pageshot_core::ports::recorder::CaptureRecorder;
use pageshot_core::ports::sink::PersistenceSink;
use pageshot_monitor::probe::WindowStateProbe;
use pageshot_storage::namer::FileNamer;
use pageshot_vision::hash::PerceptualHasher;
use pageshot_vision::similarity::SimilarityIndex;
use pageshot_vision::transform::{TransformOutput, TransformPipeline};
use pageshot_vision::{frame_to_image, image_to_frame};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::event_bus::{AppEvent, EventBus};
use crate::hooks::spawn_hooks;

/// 잠금 안에서만 변경되는 엔진 상태
#[derive(Debug, Default)]
struct EngineState {
    index: SimilarityIndex,
    namer: FileNamer,
    /// 마지막 성공 캡처 시각 (쿨다운 기준)
    last_capture: Option<Instant>,
    /// 문서별 성공 캡처 수
    doc_counts: HashMap<DocumentId, u32>,
}

/// 캡처 엔진
pub struct CaptureEngine {
    config: ConfigManager,
    probe: WindowStateProbe,
    frames: Arc<dyn FrameSource>,
    sink: Arc<dyn PersistenceSink>,
    pipeline: TransformPipeline,
    hooks: Vec<Arc<dyn PostCaptureHook>>,
    recorders: Vec<Arc<dyn CaptureRecorder>>,
    bus: Arc<EventBus>,
    state: Mutex<EngineState>,
}

impl CaptureEngine {
    pub fn new(
        config: ConfigManager,
        probe: WindowStateProbe,
        frames: Arc<dyn FrameSource>,
        sink: Arc<dyn PersistenceSink>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            probe,
            frames,
            sink,
            pipeline: TransformPipeline::new(),
            hooks: Vec::new(),
            recorders: Vec::new(),
            bus,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn with_hooks(mut self, hooks: Vec<Arc<dyn PostCaptureHook>>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn CaptureRecorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    /// 캡처 요청 하나를 끝까지 실행
    ///
    /// 게이트 실패와 캡처 실패는 모두 결과 값으로 돌려주며 에러로 전파하지 않는다.
    pub async fn execute(&self, request: CaptureRequest) -> CaptureOutcome {
        let (outcome, hook_ctx) = {
            let mut state = self.state.lock().await;
            let config = self.config.get();
            self.execute_locked(&mut state, &config, request).await
        };

        match &outcome {
            CaptureOutcome::Saved(saved) => {
                for recorder in &self.recorders {
                    recorder.record(saved);
                }
                if let Some(ctx) = hook_ctx {
                    spawn_hooks(&self.hooks, ctx);
                }
                self.bus.publish(AppEvent::CaptureSaved(saved.clone()));
            }
            CaptureOutcome::Skipped(reason) => {
                self.bus.publish(AppEvent::CaptureSkipped {
                    manual: request.manual,
                    reason: *reason,
                });
            }
            CaptureOutcome::Failed(message) => {
                self.bus.publish(AppEvent::CaptureFailed {
                    manual: request.manual,
                    message: message.clone(),
                });
            }
        }
        outcome
    }

    /// 중복 인덱스 초기화 (`None` = 전체)
    pub async fn clear_index(&self, doc: Option<&DocumentId>) {
        self.state.lock().await.index.clear(doc);
        self.bus.publish(AppEvent::IndexCleared {
            document_id: doc.cloned(),
        });
    }

    /// 중복 인덱스 해시 수
    pub async fn index_count(&self, doc: Option<&DocumentId>) -> usize {
        self.state.lock().await.index.count(doc)
    }

    /// 문서별 성공 캡처 수
    pub async fn capture_count(&self, doc: &DocumentId) -> u32 {
        self.state
            .lock()
            .await
            .doc_counts
            .get(doc)
            .copied()
            .unwrap_or(0)
    }

    async fn execute_locked(
        &self,
        state: &mut EngineState,
        config: &Arc<AppConfig>,
        request: CaptureRequest,
    ) -> (CaptureOutcome, Option<HookContext>) {
        let manual = request.manual;

        if !manual && !config.capture.enabled {
            return skipped(SkipReason::Disabled);
        }

        let window = self
            .probe
            .probe(&config.target, config.capture.probe_timeout())
            .await;
        let Some(doc) = window.capturable_document().cloned() else {
            if manual {
                warn!("수동 캡처 취소: 대상 앱에 열린 문서 없음");
            } else {
                debug!("건너뜀: 열린 문서 없음");
            }
            return skipped(SkipReason::NoDocument);
        };
        if !window.window_bounds.is_valid() {
            return skipped(SkipReason::InvalidBounds);
        }

        if !manual {
            if let Some(reason) = check_gates(state, config, &window, &doc) {
                debug!("건너뜀 [{doc}]: {reason}");
                return skipped(reason);
            }
        }

        match self.capture(state, config, &window, doc, manual).await {
            Ok(result) => result,
            Err(e) => {
                error!("캡처 실패: {e}");
                (CaptureOutcome::Failed(e.to_string()), None)
            }
        }
    }

    async fn capture(
        &self,
        state: &mut EngineState,
        config: &Arc<AppConfig>,
        window: &WindowState,
        doc: DocumentId,
        manual: bool,
    ) -> Result<(CaptureOutcome, Option<HookContext>), CoreError> {
        let raw = self.grab(window, config).await?;

        // 해시는 변환 전 원본 프레임 기준
        let image = frame_to_image(&raw)?;
        drop(raw);
        let (image, hash) = if config.duplicate.enabled {
            let hash_size = config.duplicate.hash_size;
            let (image, hash) = blocking(move || {
                let hash = PerceptualHasher::new(hash_size).hash(&image);
                (image, hash)
            })
            .await?;
            (image, Some(hash))
        } else {
            (image, None)
        };

        let is_duplicate = hash.as_ref().is_some_and(|h| {
            state
                .index
                .is_duplicate(h, &doc, config.duplicate.threshold)
        });
        if is_duplicate {
            if manual {
                debug!("수동 캡처: 중복 페이지지만 저장 [{doc}]");
            } else {
                debug!("건너뜀 [{doc}]: 이미 캡처한 페이지");
                return Ok(skipped(SkipReason::Duplicate));
            }
        }

        let captured_at = Local::now();
        let pipeline = self.pipeline;
        let snapshot = Arc::clone(config);
        let TransformOutput {
            bytes,
            format,
            image,
        } = blocking(move || {
            pipeline.run(image, &snapshot.transform, &snapshot.output, captured_at)
        })
        .await??;

        let resolved = state.namer.resolve(&doc, &config.output, captured_at).await?;
        self.sink.write(&bytes, &resolved.path, format).await?;

        // 저장까지 성공한 뒤에만 상태 반영
        if let (Some(hash), false) = (hash, is_duplicate) {
            state.index.record(hash, &doc);
        }
        state.namer.confirm(&resolved);
        state.last_capture = Some(Instant::now());
        *state.doc_counts.entry(doc.clone()).or_insert(0) += 1;

        info!(
            "캡처 저장{}: {} ({}x{})",
            if manual { " (수동)" } else { "" },
            resolved.path.display(),
            image.width(),
            image.height()
        );

        let hook_ctx = (!self.hooks.is_empty()).then(|| HookContext {
            path: resolved.path.clone(),
            document_id: doc.clone(),
            image: Arc::new(image_to_frame(&image)),
        });

        let saved = SavedCapture {
            path: resolved.path,
            document_id: doc,
            manual,
            format,
            width: image.width(),
            height: image.height(),
            captured_at: captured_at.with_timezone(&Utc),
        };
        Ok((CaptureOutcome::Saved(saved), hook_ctx))
    }

    /// 프레임 획득 (블로킹 OS 호출, 타임아웃 적용)
    async fn grab(&self, window: &WindowState, config: &AppConfig) -> Result<RawFrame, CoreError> {
        let frames = Arc::clone(&self.frames);
        let region = window.window_bounds;
        let timeout = config.capture.grab_timeout();

        let task = tokio::task::spawn_blocking(move || frames.grab(&region));
        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(CoreError::Capture(format!(
                "프레임 획득 작업 실패: {join_err}"
            ))),
            Err(_) => Err(CoreError::ExecutionTimeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

/// 자동 요청에만 적용되는 게이트
fn check_gates(
    state: &EngineState,
    config: &AppConfig,
    window: &WindowState,
    doc: &DocumentId,
) -> Option<SkipReason> {
    let capture = &config.capture;

    if let Some(last) = state.last_capture {
        if last.elapsed() < capture.cooldown() {
            return Some(SkipReason::Cooldown);
        }
    }

    if !title_allowed(&window.title, &capture.title_whitelist, &capture.title_blacklist) {
        return Some(SkipReason::TitleFiltered);
    }

    let max = capture.max_captures_per_document;
    if max > 0 && state.doc_counts.get(doc).copied().unwrap_or(0) >= max {
        return Some(SkipReason::MaxCountReached);
    }

    None
}

/// 제목 포함 필터 (대소문자 무시)
///
/// 화이트리스트가 비어 있지 않으면 하나 이상 포함해야 하고,
/// 블랙리스트 항목은 하나라도 포함되면 제외한다.
pub fn title_allowed(title: &str, whitelist: &[String], blacklist: &[String]) -> bool {
    let title = title.to_lowercase();
    let contains = |needle: &String| {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty() && title.contains(&needle)
    };

    if !whitelist.is_empty() && !whitelist.iter().any(contains) {
        return false;
    }
    !blacklist.iter().any(contains)
}

fn skipped(reason: SkipReason) -> (CaptureOutcome, Option<HookContext>) {
    (CaptureOutcome::Skipped(reason), None)
}

async fn blocking<F, T>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Internal(format!("블로킹 작업 실패: {e}")))
}
