//! # pageshot
//!
//! PageShot 바이너리 진입점.
//! 어댑터 생성(DI), 입력 리스너 시작, 스케줄러/엔진 오케스트레이션.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pageshot_app::engine::CaptureEngine;
use pageshot_app::event_bus::{AppEvent, EventBus};
use pageshot_app::hooks::hooks_from_config;
use pageshot_app::lifecycle::LifecycleManager;
use pageshot_app::scheduler::CaptureScheduler;
use pageshot_app::stats::SessionStatsRecorder;
use pageshot_core::config_manager::ConfigManager;
use pageshot_core::error::CoreError;
use pageshot_core::models::capture::CaptureRequest;
use pageshot_core::ports::input::InputSource;
use pageshot_monitor::input_hook::{KeyboardHook, PointerHook};
use pageshot_monitor::platform::PlatformWindowSource;
use pageshot_monitor::probe::WindowStateProbe;
use pageshot_storage::file_sink::FileSink;
use pageshot_vision::capture::XcapFrameSource;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// PDF 뷰어 페이지 자동 캡처
#[derive(Parser, Debug)]
#[command(name = "pageshot", version, about = "PDF 뷰어 페이지 이동을 감지해 화면을 자동 저장")]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 저장 폴더 (이번 실행에만 적용)
    #[arg(long, short = 's')]
    save_folder: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 자동 캡처를 일시정지 상태로 시작
    #[arg(long)]
    paused: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "pageshot={0},pageshot_app={0},pageshot_core={0},pageshot_monitor={0},pageshot_vision={0},pageshot_storage={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    print_banner();
    info!("PageShot 시작");

    // 설정 로드
    let mut config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    if let Some(folder) = &args.save_folder {
        // CLI 오버라이드는 파일에 저장하지 않는다
        let mut config = (*config_manager.get()).clone();
        config.output.save_folder = folder.clone();
        config.validate()?;
        config_manager =
            ConfigManager::in_memory(config, config_manager.config_path().to_path_buf());
    }
    let config = config_manager.get();
    info!("설정 파일: {}", config_manager.config_path().display());
    info!("저장 폴더: {}", config.output.save_folder.display());
    match XcapFrameSource::monitor_count() {
        Ok(count) => info!("모니터 {count}개 감지"),
        Err(e) => warn!("모니터 확인 실패, 캡처가 실패할 수 있음: {e}"),
    }

    // ── 어댑터 ──
    let bus = Arc::new(EventBus::default());
    let probe = WindowStateProbe::new(Arc::new(PlatformWindowSource::new()));
    let stats = Arc::new(SessionStatsRecorder::new().with_event_bus(Arc::clone(&bus)));
    let engine = Arc::new(
        CaptureEngine::new(
            config_manager.clone(),
            probe,
            Arc::new(XcapFrameSource::new()),
            Arc::new(FileSink::new()),
            Arc::clone(&bus),
        )
        .with_hooks(hooks_from_config(&config.hooks))
        .with_recorder(stats.clone()),
    );

    let lifecycle = LifecycleManager::new();

    // ── 상태 알림 로깅 ──
    tokio::spawn(log_events(bus.subscribe()));

    // ── 입력 리스너 ──
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let sources: [&dyn InputSource; 2] = [&KeyboardHook, &PointerHook];
    for source in sources {
        match source.start(input_tx.clone()) {
            Ok(()) => info!("입력 리스너 시작: {}", source.name()),
            Err(CoreError::Unsupported(msg)) => warn!("입력 리스너 [{}]: {msg}", source.name()),
            Err(e) => error!("입력 리스너 시작 실패 [{}]: {e}", source.name()),
        }
    }

    // ── 스케줄러 ──
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CaptureRequest>();
    let mut scheduler = CaptureScheduler::new(config_manager.clone(), Arc::clone(&bus));
    if args.paused {
        scheduler.toggle_pause();
    }
    tokio::spawn(scheduler.run(input_rx, request_tx, lifecycle.subscribe()));

    // ── 캡처 실행 ──
    // 요청마다 태스크를 띄우고 직렬화는 엔진 잠금에 맡긴다 (요청이 버려지지 않음)
    let exec_engine = Arc::clone(&engine);
    tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            let engine = Arc::clone(&exec_engine);
            tokio::spawn(async move {
                engine.execute(request).await;
            });
        }
        debug!("캡처 실행 루프 종료");
    });

    info!(
        "PageShot 실행 중 (수동 캡처: {}, 일시정지: {}, Ctrl+C로 종료)",
        config.hotkeys.capture, config.hotkeys.pause
    );

    // OS 시그널 대기
    lifecycle.wait_for_signal().await;
    drop(input_tx);

    info!(
        "PageShot 종료 (이번 세션 {}장 저장, 중복 인덱스 {}개)",
        stats.total(),
        engine.index_count(None).await
    );
    Ok(())
}

/// 이벤트 버스 구독 → 로그
async fn log_events(mut rx: broadcast::Receiver<AppEvent>) {
    loop {
        match rx.recv().await {
            Ok(AppEvent::SchedulerState(status)) => info!("스케줄러 상태: {status:?}"),
            Ok(AppEvent::CaptureSkipped {
                manual: true,
                reason,
            }) => warn!("수동 캡처 건너뜀: {reason}"),
            Ok(AppEvent::CaptureFailed {
                manual: true,
                message,
            }) => warn!("수동 캡처 실패: {message}"),
            Ok(AppEvent::IndexCleared { document_id }) => match document_id {
                Some(doc) => info!("중복 인덱스 초기화: {doc}"),
                None => info!("중복 인덱스 전체 초기화"),
            },
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                debug!("이벤트 {n}개 누락");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_banner() {
    eprintln!(
        r#"
  ┌─────────────────────────────────┐
  │  PageShot v{:<21}│
  │  PDF 페이지 자동 캡처           │
  └─────────────────────────────────┘
"#,
        env!("CARGO_PKG_VERSION")
    );
}
