//! 설정 및 DI 와이어링 통합 테스트.
//!
//! 실제 어댑터를 설정에서 생성할 수 있는지 확인 (OS 호출 없음).

use std::sync::Arc;

use pageshot_app::engine::CaptureEngine;
use pageshot_app::event_bus::EventBus;
use pageshot_app::hooks::hooks_from_config;
use pageshot_app::stats::SessionStatsRecorder;
use pageshot_core::config::{AppConfig, OutputFormat};
use pageshot_core::config_manager::ConfigManager;
use pageshot_core::models::input::{Hotkey, Key};
use pageshot_monitor::platform::PlatformWindowSource;
use pageshot_monitor::probe::WindowStateProbe;
use pageshot_storage::file_sink::FileSink;
use pageshot_vision::capture::XcapFrameSource;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = AppConfig::default_config();
    config.validate().unwrap();

    assert!(config.capture.enabled);
    assert_eq!(config.capture.delay_ms, 300);
    assert!(config.capture.navigation_keys.contains(&Key::PageDown));
    assert_eq!(config.duplicate.threshold, 5);
    assert_eq!(config.duplicate.hash_size, 16);
    assert_eq!(config.output.format, OutputFormat::Png);
    assert_eq!(config.output.filename_template, "{doc}_{timestamp}");
}

#[test]
fn default_hotkeys_parse() {
    let config = AppConfig::default_config();
    let capture = Hotkey::parse(&config.hotkeys.capture).unwrap();
    let pause = Hotkey::parse(&config.hotkeys.pause).unwrap();
    assert_eq!(capture.key, Key::char('s'));
    assert_eq!(pause.key, Key::char('p'));
    assert_eq!(capture.modifiers, pause.modifiers);
}

#[test]
fn config_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let manager = ConfigManager::with_path(path.clone()).unwrap();
    manager
        .update_with(|c| {
            c.duplicate.threshold = 0;
            c.hooks.sound = true;
        })
        .unwrap();

    let reopened = ConfigManager::with_path(path).unwrap();
    assert_eq!(reopened.get().duplicate.threshold, 0);
    assert_eq!(hooks_from_config(&reopened.get().hooks).len(), 1);
}

#[test]
fn all_adapters_instantiate_from_config() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::in_memory(AppConfig::default_config(), dir.path().join("c.json"));
    let bus = Arc::new(EventBus::default());

    let _engine = CaptureEngine::new(
        manager.clone(),
        WindowStateProbe::new(Arc::new(PlatformWindowSource::new())),
        Arc::new(XcapFrameSource::new()),
        Arc::new(FileSink::new()),
        Arc::clone(&bus),
    )
    .with_hooks(hooks_from_config(&manager.get().hooks))
    .with_recorder(Arc::new(SessionStatsRecorder::new().with_event_bus(bus)));
}
