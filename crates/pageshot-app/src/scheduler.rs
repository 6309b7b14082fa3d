//! CaptureScheduler: 입력 이벤트 → 캡처 요청.
//!
//! 상태 머신 `Idle` / `PendingDebounce` / `Paused`.
//! 연속된 탐색 입력은 마지막 입력 후 `delay_ms`가 지나야 한 번의 요청이 된다.
//! 수동 단축키는 디바운스와 일시정지를 모두 우회해 즉시 요청을 만든다.
//!
//! 쿨다운, 제목 필터, 문서당 최대 수는 창 상태가 필요하므로 엔진이 검사한다.

use std::sync::Arc;

use pageshot_core::config::AppConfig;
use pageshot_core::config_manager::ConfigManager;
use pageshot_core::models::capture::CaptureRequest;
use pageshot_core::models::input::{Hotkey, InputEvent, Key, KeyState};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::event_bus::{AppEvent, EventBus};

/// 외부에 알리는 스케줄러 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Idle,
    PendingDebounce,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    PendingDebounce { deadline: Instant },
    /// 일시정지 직전에 대기 중이던 타이머는 재개 시 복원된다.
    Paused { resume: Option<Instant> },
}

/// 캡처 스케줄러
pub struct CaptureScheduler {
    config: ConfigManager,
    bus: Arc<EventBus>,
    state: State,
    keys: KeyState,
    /// 스크롤 트리거 전 누적 휠 거리
    scroll_accum: u32,
    bindings: Bindings,
}

impl CaptureScheduler {
    pub fn new(config: ConfigManager, bus: Arc<EventBus>) -> Self {
        let bindings = Bindings::from_config(config.get());
        Self {
            config,
            bus,
            state: State::Idle,
            keys: KeyState::new(),
            scroll_accum: 0,
            bindings,
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        match self.state {
            State::Idle => SchedulerStatus::Idle,
            State::PendingDebounce { .. } => SchedulerStatus::PendingDebounce,
            State::Paused { .. } => SchedulerStatus::Paused,
        }
    }

    /// 대기 중인 디바운스 만료 시각
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            State::PendingDebounce { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Paused { .. })
    }

    /// 일시정지 ⇄ 이전 상태
    pub fn toggle_pause(&mut self) {
        let next = match self.state {
            State::Paused { resume: Some(deadline) } => State::PendingDebounce { deadline },
            State::Paused { resume: None } => State::Idle,
            State::PendingDebounce { deadline } => State::Paused {
                resume: Some(deadline),
            },
            State::Idle => State::Paused { resume: None },
        };
        self.transition(next);
        info!(
            "자동 캡처 {}",
            if self.is_paused() { "일시정지" } else { "재개" }
        );
    }

    /// 입력 이벤트 처리
    ///
    /// 수동 단축키만 즉시 요청을 돌려준다. 탐색 입력은 타이머만 (재)설정한다.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> Option<CaptureRequest> {
        let config = self.config.get();
        self.bindings.refresh(&config);

        match event {
            InputEvent::Key {
                key,
                pressed: false,
            } => {
                self.keys.release(key);
                None
            }
            InputEvent::Key { key, pressed: true } => {
                if key.is_modifier() {
                    self.keys.press(key);
                    return None;
                }
                if self.bindings.is_capture(&self.keys, key) {
                    debug!("수동 캡처 단축키");
                    return Some(CaptureRequest::manual());
                }
                if self.bindings.is_pause(&self.keys, key) {
                    self.toggle_pause();
                    return None;
                }
                if config.capture.navigation_keys.contains(&key) {
                    self.on_navigation(&config, now);
                }
                None
            }
            InputEvent::Scroll { delta } => {
                if !config.capture.scroll_trigger {
                    return None;
                }
                // 일시정지 중 스크롤은 재개 후 거리에 포함하지 않는다
                if self.is_paused() {
                    debug!("일시정지 중, 스크롤 무시");
                    return None;
                }
                let min = config.capture.min_scroll_distance;
                if min > 0 {
                    self.scroll_accum = self.scroll_accum.saturating_add(delta.unsigned_abs());
                    if self.scroll_accum < min {
                        debug!("스크롤 누적 {}/{}", self.scroll_accum, min);
                        return None;
                    }
                    self.scroll_accum = 0;
                }
                self.on_navigation(&config, now);
                None
            }
            InputEvent::Click => {
                if config.capture.click_trigger {
                    self.on_navigation(&config, now);
                }
                None
            }
        }
    }

    /// 디바운스 만료 확인 (만료되었으면 자동 요청)
    pub fn poll_timer(&mut self, now: Instant) -> Option<CaptureRequest> {
        match self.state {
            State::PendingDebounce { deadline } if deadline <= now => {
                self.transition(State::Idle);
                debug!("디바운스 만료, 캡처 요청");
                Some(CaptureRequest::automatic())
            }
            _ => None,
        }
    }

    /// 입력 채널이 닫히거나 종료 신호가 올 때까지 실행
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<InputEvent>,
        requests: mpsc::UnboundedSender<CaptureRequest>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("캡처 스케줄러 시작");
        self.bus.publish(AppEvent::SchedulerState(self.status()));

        loop {
            let deadline = self.deadline();
            let request = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event, Instant::now()),
                    None => {
                        info!("입력 채널 닫힘, 스케줄러 종료");
                        break;
                    }
                },
                _ = wait_until(deadline) => self.poll_timer(Instant::now()),
                _ = shutdown.changed() => {
                    info!("캡처 스케줄러 종료");
                    break;
                }
            };

            if let Some(request) = request {
                if requests.send(request).is_err() {
                    warn!("캡처 요청 수신자 없음, 스케줄러 종료");
                    break;
                }
            }
        }
    }

    fn on_navigation(&mut self, config: &AppConfig, now: Instant) {
        match self.state {
            State::Paused { .. } => {
                debug!("일시정지 중, 탐색 입력 무시");
            }
            _ if !config.capture.enabled => {
                debug!("자동 캡처 비활성, 탐색 입력 무시");
            }
            _ => {
                let deadline = now + config.capture.delay();
                self.transition(State::PendingDebounce { deadline });
            }
        }
    }

    fn transition(&mut self, next: State) {
        let before = self.status();
        self.state = next;
        let after = self.status();
        if before != after {
            debug!("스케줄러 상태: {:?} → {:?}", before, after);
            self.bus.publish(AppEvent::SchedulerState(after));
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// 설정 스냅샷 기준으로 해석해 둔 단축키
struct Bindings {
    source: Arc<AppConfig>,
    capture: Option<Hotkey>,
    pause: Option<Hotkey>,
}

impl Bindings {
    fn from_config(config: Arc<AppConfig>) -> Self {
        let capture = parse_or_warn("capture", &config.hotkeys.capture);
        let pause = parse_or_warn("pause", &config.hotkeys.pause);
        Self {
            source: config,
            capture,
            pause,
        }
    }

    /// 설정이 교체되었으면 다시 해석
    fn refresh(&mut self, config: &Arc<AppConfig>) {
        if !Arc::ptr_eq(&self.source, config) {
            *self = Self::from_config(Arc::clone(config));
        }
    }

    fn is_capture(&self, keys: &KeyState, key: Key) -> bool {
        self.capture.as_ref().is_some_and(|h| keys.matches(h, key))
    }

    fn is_pause(&self, keys: &KeyState, key: Key) -> bool {
        self.pause.as_ref().is_some_and(|h| keys.matches(h, key))
    }
}

fn parse_or_warn(name: &str, text: &str) -> Option<Hotkey> {
    match Hotkey::parse(text) {
        Ok(hotkey) => Some(hotkey),
        Err(e) => {
            warn!("{name} 단축키 해석 실패, 비활성: {e}");
            None
        }
    }
}
