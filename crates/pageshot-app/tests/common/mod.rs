//! 통합 테스트용 가짜 어댑터.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pageshot_app::engine::CaptureEngine;
use pageshot_app::event_bus::EventBus;
use pageshot_core::config::{AppConfig, OutputFormat};
use pageshot_core::config_manager::ConfigManager;
use pageshot_core::error::{CoreError, ProbeError};
use pageshot_core::models::capture::RawFrame;
use pageshot_core::models::window::{ForegroundWindow, Rect};
use pageshot_core::ports::frame::FrameSource;
use pageshot_core::ports::hooks::{HookContext, PostCaptureHook};
use pageshot_core::ports::sink::PersistenceSink;
use pageshot_core::ports::window::ForegroundWindowSource;
use pageshot_monitor::probe::WindowStateProbe;
use pageshot_storage::file_sink::FileSink;
use parking_lot::Mutex;
use tokio::sync::mpsc;

pub const REPORT_TITLE: &str = "Report.pdf - Adobe Acrobat Reader";

/// 제목/영역을 바꿀 수 있는 전경 창
pub struct FakeWindow {
    window: Mutex<Option<ForegroundWindow>>,
}

impl FakeWindow {
    pub fn new(title: &str) -> Arc<Self> {
        let fake = Arc::new(Self {
            window: Mutex::new(None),
        });
        fake.set(title, Rect::new(0, 0, 96, 64));
        fake
    }

    pub fn set(&self, title: &str, bounds: Rect) {
        *self.window.lock() = Some(ForegroundWindow {
            title: title.to_string(),
            bounds,
            pid: None,
            app_name: None,
        });
    }

    pub fn set_title(&self, title: &str) {
        let bounds = self
            .window
            .lock()
            .as_ref()
            .map(|w| w.bounds)
            .unwrap_or_default();
        self.set(title, bounds);
    }
}

impl ForegroundWindowSource for FakeWindow {
    fn foreground_window(&self) -> Result<Option<ForegroundWindow>, ProbeError> {
        Ok(self.window.lock().clone())
    }
}

/// 현재 "페이지"에 해당하는 무작위 블록 이미지를 돌려주는 프레임 소스
pub struct FakeScreen {
    page: Mutex<u32>,
    regions: Mutex<Vec<Rect>>,
    fail: Mutex<bool>,
    stall: Mutex<Option<Duration>>,
}

impl FakeScreen {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            page: Mutex::new(1),
            regions: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
            stall: Mutex::new(None),
        })
    }

    pub fn show_page(&self, page: u32) {
        *self.page.lock() = page;
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    /// 다음 획득부터 응답 전에 `delay`만큼 멈춤 (`None` = 즉시)
    pub fn set_stall(&self, delay: Option<Duration>) {
        *self.stall.lock() = delay;
    }

    pub fn regions(&self) -> Vec<Rect> {
        self.regions.lock().clone()
    }
}

impl FrameSource for FakeScreen {
    fn grab(&self, region: &Rect) -> Result<RawFrame, CoreError> {
        self.regions.lock().push(*region);
        let stall = *self.stall.lock();
        if let Some(delay) = stall {
            std::thread::sleep(delay);
        }
        if *self.fail.lock() {
            return Err(CoreError::Capture("모니터 분리".to_string()));
        }
        Ok(page_frame(*self.page.lock(), 96, 64))
    }
}

/// 페이지 번호를 시드로 한 8px 블록 노이즈 (페이지가 다르면 해시가 크게 다름)
pub fn page_frame(page: u32, width: u32, height: u32) -> RawFrame {
    let cols = width.div_ceil(8);
    let rows = height.div_ceil(8);
    let mut seed = page.wrapping_mul(2_654_435_761).wrapping_add(12_345);
    let cells: Vec<u8> = (0..cols * rows)
        .map(|_| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (seed >> 16) as u8
        })
        .collect();

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = cells[((y / 8) * cols + x / 8) as usize];
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RawFrame::new(width, height, rgba)
}

/// 항상 실패하는 싱크
pub struct FailingSink;

#[async_trait]
impl PersistenceSink for FailingSink {
    async fn write(&self, _bytes: &[u8], path: &Path, _format: OutputFormat) -> Result<(), CoreError> {
        Err(CoreError::Persistence(format!("디스크 가득 참: {}", path.display())))
    }
}

/// 항상 실패하는 훅
pub struct FailingHook;

#[async_trait]
impl PostCaptureHook for FailingHook {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn on_capture(&self, _ctx: &HookContext) -> Result<(), CoreError> {
        Err(CoreError::Internal("훅 실패".to_string()))
    }
}

/// 호출된 경로를 채널로 보내는 훅
pub struct ChannelHook {
    tx: mpsc::UnboundedSender<PathBuf>,
}

impl ChannelHook {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PathBuf>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl PostCaptureHook for ChannelHook {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn on_capture(&self, ctx: &HookContext) -> Result<(), CoreError> {
        let _ = self.tx.send(ctx.path.clone());
        Ok(())
    }
}

/// 테스트 설정: 저장 폴더는 `folder`, 쿨다운 없음
pub fn test_config(folder: &Path, update: impl FnOnce(&mut AppConfig)) -> ConfigManager {
    let mut config = AppConfig::default_config();
    config.output.save_folder = folder.to_path_buf();
    config.capture.cooldown_ms = 0;
    update(&mut config);
    ConfigManager::in_memory(config, folder.join("config.json"))
}

/// 테스트 엔진
pub struct Harness {
    pub engine: CaptureEngine,
    pub window: Arc<FakeWindow>,
    pub screen: Arc<FakeScreen>,
    pub bus: Arc<EventBus>,
}

pub fn harness(config: ConfigManager) -> Harness {
    harness_with_sink(config, Arc::new(FileSink::new()))
}

pub fn harness_with_sink(config: ConfigManager, sink: Arc<dyn PersistenceSink>) -> Harness {
    let window = FakeWindow::new(REPORT_TITLE);
    let screen = FakeScreen::new();
    let bus = Arc::new(EventBus::default());
    let engine = CaptureEngine::new(
        config,
        WindowStateProbe::new(window.clone()),
        screen.clone(),
        sink,
        Arc::clone(&bus),
    );
    Harness {
        engine,
        window,
        screen,
        bus,
    }
}

/// 폴더 아래 저장된 이미지 파일 (숨김 임시 파일 제외)
pub fn saved_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(saved_files(&path));
        } else if path.extension().is_some_and(|e| e != "json")
            && !entry.file_name().to_string_lossy().starts_with('.')
        {
            files.push(path);
        }
    }
    files.sort();
    files
}
