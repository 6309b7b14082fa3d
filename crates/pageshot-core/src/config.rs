//! 애플리케이션 설정 구조체.
//!
//! 캡처 트리거, 대상 앱 판별, 중복 감지, 변환 파이프라인, 출력 경로, 단축키,
//! 캡처 후 훅 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.
//!
//! 캡처 실행 경로는 시작 시점에 `Arc<AppConfig>` 스냅샷을 한 번 읽고
//! 파이프라인이 끝날 때까지 그 스냅샷만 사용한다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;
use crate::models::input::Key;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 트리거/게이트 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 대상 앱(창 제목) 판별 설정
    #[serde(default)]
    pub target: TargetAppConfig,
    /// 중복 페이지 감지 설정
    #[serde(default)]
    pub duplicate: DuplicateConfig,
    /// 이미지 변환 파이프라인 설정
    #[serde(default)]
    pub transform: TransformConfig,
    /// 출력 파일 설정
    #[serde(default)]
    pub output: OutputConfig,
    /// 전역 단축키 설정
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    /// 캡처 후 훅 설정
    #[serde(default)]
    pub hooks: HooksConfig,
}

// ============================================================
// 캡처 트리거 설정
// ============================================================

/// 캡처 트리거 설정: 디바운스, 쿨다운, 필터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 자동 캡처 활성화 여부 (수동 단축키는 항상 허용)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 탐색 입력이 멈춘 뒤 캡처까지 대기 시간 (밀리초)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// 마지막 성공 캡처 이후 최소 간격 (밀리초)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// 페이지 탐색으로 간주할 키 목록
    #[serde(default = "default_navigation_keys")]
    pub navigation_keys: Vec<Key>,
    /// 마우스 휠 스크롤을 탐색으로 간주
    #[serde(default = "default_true")]
    pub scroll_trigger: bool,
    /// 마우스 클릭을 탐색으로 간주
    #[serde(default)]
    pub click_trigger: bool,
    /// 스크롤 트리거 전 누적되어야 하는 최소 휠 거리 (0 = 비활성)
    #[serde(default)]
    pub min_scroll_distance: u32,
    /// 문서당 최대 자동 캡처 수 (0 = 무제한)
    #[serde(default)]
    pub max_captures_per_document: u32,
    /// 창 제목에 포함되어야 하는 문자열 (비어 있으면 모두 허용)
    #[serde(default)]
    pub title_whitelist: Vec<String>,
    /// 창 제목에 포함되면 제외하는 문자열
    #[serde(default)]
    pub title_blacklist: Vec<String>,
    /// 전경 창 조회 제한 시간 (밀리초)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// 프레임 획득 제한 시간 (밀리초)
    #[serde(default = "default_grab_timeout_ms")]
    pub grab_timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: default_delay_ms(),
            cooldown_ms: default_cooldown_ms(),
            navigation_keys: default_navigation_keys(),
            scroll_trigger: true,
            click_trigger: false,
            min_scroll_distance: 0,
            max_captures_per_document: 0,
            title_whitelist: Vec::new(),
            title_blacklist: Vec::new(),
            probe_timeout_ms: default_probe_timeout_ms(),
            grab_timeout_ms: default_grab_timeout_ms(),
        }
    }
}

impl CaptureConfig {
    /// 디바운스 지연을 Duration으로 반환
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// 쿨다운을 Duration으로 반환
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn grab_timeout(&self) -> Duration {
        Duration::from_millis(self.grab_timeout_ms)
    }
}

// ============================================================
// 대상 앱 판별 설정
// ============================================================

/// 대상 앱 설정: 창 제목 접미사와 "문서 없음" 표식
///
/// 앱 이름은 버전/언어별로 바뀌므로 하드코딩하지 않고 설정으로 둔다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetAppConfig {
    /// 창 제목이 이 중 하나로 끝나야 대상 앱으로 인정
    #[serde(default = "default_app_suffixes")]
    pub app_suffixes: Vec<String>,
    /// 접미사 제거 후 남은 제목이 이 중 하나면 문서 없음
    #[serde(default = "default_no_document_titles")]
    pub no_document_titles: Vec<String>,
    /// 문서 이름과 앱 이름 사이 구분자
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
    /// 문서 식별자 최대 길이 (문자 수)
    #[serde(default = "default_max_document_id_len")]
    pub max_document_id_len: usize,
}

impl Default for TargetAppConfig {
    fn default() -> Self {
        Self {
            app_suffixes: default_app_suffixes(),
            no_document_titles: default_no_document_titles(),
            separators: default_separators(),
            max_document_id_len: default_max_document_id_len(),
        }
    }
}

// ============================================================
// 중복 감지 설정
// ============================================================

/// 중복 페이지 감지 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// 중복 감지 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 해밍 거리 임계값 (이하이면 중복)
    #[serde(default = "default_duplicate_threshold")]
    pub threshold: u32,
    /// 해시 한 변의 크기 (비트 수 = hash_size²)
    #[serde(default = "default_hash_size")]
    pub hash_size: u32,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_duplicate_threshold(),
            hash_size: default_hash_size(),
        }
    }
}

// ============================================================
// 변환 파이프라인 설정
// ============================================================

/// 변환 파이프라인 설정 (crop → scale → grayscale → max dim → border → watermark → compress)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub crop: CropConfig,
    /// 해상도 배율 (%): 100이면 변환 없음
    #[serde(default = "default_scale_percent")]
    pub scale_percent: u32,
    /// 그레이스케일 변환
    #[serde(default)]
    pub grayscale: bool,
    /// 긴 변 최대 픽셀 (None = 제한 없음, 축소만 수행)
    #[serde(default)]
    pub max_dimension: Option<u32>,
    #[serde(default)]
    pub border: BorderConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub compression: CompressionConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            crop: CropConfig::default(),
            scale_percent: default_scale_percent(),
            grayscale: false,
            max_dimension: None,
            border: BorderConfig::default(),
            watermark: WatermarkConfig::default(),
            compression: CompressionConfig::default(),
        }
    }
}

/// 여백 자르기 (픽셀)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub left: u32,
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
}

/// 테두리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 테두리 두께 (픽셀): 캔버스가 각 축으로 2×size 만큼 커진다
    #[serde(default = "default_border_size")]
    pub size: u32,
    /// 테두리 색상 (#RRGGBB 또는 #RRGGBBAA)
    #[serde(default = "default_white")]
    pub color: String,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: default_border_size(),
            color: default_white(),
        }
    }
}

/// 워터마크 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkKind {
    /// 캡처 시각 텍스트
    #[default]
    Timestamp,
    /// 사용자 지정 텍스트
    Text,
    /// 이미지 오버레이
    Image,
}

/// 워터마크 위치 (5개 앵커)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

/// 워터마크 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub kind: WatermarkKind,
    /// 사용자 지정 텍스트 (kind = text)
    #[serde(default)]
    pub text: String,
    /// 오버레이 이미지 경로 (kind = image)
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default)]
    pub position: WatermarkPosition,
    /// 불투명도 (0.0 ~ 1.0)
    #[serde(default = "default_watermark_opacity")]
    pub opacity: f32,
    /// 텍스트 색상 (#RRGGBB 또는 #RRGGBBAA)
    #[serde(default = "default_white")]
    pub color: String,
    /// 글자 배율 (8px 글리프 기준, 1 ~ 32)
    #[serde(default = "default_watermark_scale")]
    pub scale: u32,
    /// 가장자리 여백 (픽셀)
    #[serde(default = "default_watermark_margin")]
    pub margin: u32,
    /// 타임스탬프 형식 (chrono strftime)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: WatermarkKind::default(),
            text: String::new(),
            image_path: None,
            position: WatermarkPosition::default(),
            opacity: default_watermark_opacity(),
            color: default_white(),
            scale: default_watermark_scale(),
            margin: default_watermark_margin(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// 압축 재인코딩 설정 (최종 포맷과 별개의 용량 절감 단계)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    #[serde(default)]
    pub enabled: bool,
    /// JPEG 품질 (1 ~ 100)
    #[serde(default = "default_compression_quality")]
    pub quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quality: default_compression_quality(),
        }
    }
}

// ============================================================
// 출력 설정
// ============================================================

/// 출력 이미지 포맷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl OutputFormat {
    /// 파일 확장자
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
        }
    }

    /// 품질 파라미터 사용 여부
    pub fn is_lossy(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }
}

/// 날짜별 폴더 분류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFolders {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

/// 출력 파일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 기본 저장 폴더
    #[serde(default = "default_save_folder")]
    pub save_folder: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    /// 손실 포맷 품질 (1 ~ 100)
    #[serde(default = "default_output_quality")]
    pub quality: u8,
    /// 파일명 템플릿 ({doc}, {date}, {time}, {timestamp} 등)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
    #[serde(default)]
    pub date_folders: DateFolders,
    /// 문서별 하위 폴더 생성
    #[serde(default)]
    pub per_document_folder: bool,
    /// 폴더당 최대 파일 수 (0 = 무제한, 초과 시 batchN 하위 폴더)
    #[serde(default)]
    pub max_files_per_folder: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_folder: default_save_folder(),
            format: OutputFormat::default(),
            quality: default_output_quality(),
            filename_template: default_filename_template(),
            date_folders: DateFolders::default(),
            per_document_folder: false,
            max_files_per_folder: 0,
        }
    }
}

// ============================================================
// 단축키 / 훅 설정
// ============================================================

/// 전역 단축키 설정 ("ctrl+shift+s" 형식)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// 수동 캡처
    #[serde(default = "default_capture_hotkey")]
    pub capture: String,
    /// 일시정지 토글
    #[serde(default = "default_pause_hotkey")]
    pub pause: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            capture: default_capture_hotkey(),
            pause: default_pause_hotkey(),
        }
    }
}

/// 캡처 후 훅 설정: 모두 best-effort
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    /// 캡처음 재생
    #[serde(default)]
    pub sound: bool,
    /// 클립보드 복사
    #[serde(default)]
    pub clipboard: bool,
    /// 보조 백업 폴더
    #[serde(default)]
    pub backup_folder: Option<PathBuf>,
    /// 외부 스크립트 (첫 인자로 파일 경로 전달)
    #[serde(default)]
    pub script: Option<PathBuf>,
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            capture: CaptureConfig::default(),
            target: TargetAppConfig::default(),
            duplicate: DuplicateConfig::default(),
            transform: TransformConfig::default(),
            output: OutputConfig::default(),
            hotkeys: HotkeyConfig::default(),
            hooks: HooksConfig::default(),
        }
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.transform.scale_percent == 0 || self.transform.scale_percent > 1000 {
            return Err(invalid("transform.scale_percent", "1 ~ 1000 범위여야 합니다"));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(invalid("output.quality", "1 ~ 100 범위여야 합니다"));
        }
        if !(1..=100).contains(&self.transform.compression.quality) {
            return Err(invalid(
                "transform.compression.quality",
                "1 ~ 100 범위여야 합니다",
            ));
        }
        if self.duplicate.hash_size < 2 || self.duplicate.hash_size > 64 {
            return Err(invalid("duplicate.hash_size", "2 ~ 64 범위여야 합니다"));
        }
        if !(0.0..=1.0).contains(&self.transform.watermark.opacity) {
            return Err(invalid(
                "transform.watermark.opacity",
                "0.0 ~ 1.0 범위여야 합니다",
            ));
        }
        if !(1..=MAX_WATERMARK_SCALE).contains(&self.transform.watermark.scale) {
            return Err(invalid(
                "transform.watermark.scale",
                "1 ~ 32 범위여야 합니다",
            ));
        }
        if self.target.max_document_id_len == 0 {
            return Err(invalid("target.max_document_id_len", "0보다 커야 합니다"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// 워터마크 글자 배율 상한
pub const MAX_WATERMARK_SCALE: u32 = 32;

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    300
}
fn default_cooldown_ms() -> u64 {
    500
}
fn default_probe_timeout_ms() -> u64 {
    500
}
fn default_grab_timeout_ms() -> u64 {
    3_000
}

fn default_navigation_keys() -> Vec<Key> {
    vec![
        Key::PageDown,
        Key::PageUp,
        Key::Down,
        Key::Up,
        Key::Left,
        Key::Right,
        Key::Home,
        Key::End,
    ]
}

fn default_app_suffixes() -> Vec<String> {
    [
        "Adobe Acrobat Reader (64-bit)",
        "Adobe Acrobat Reader DC (64-bit)",
        "Adobe Acrobat Reader DC",
        "Adobe Acrobat Reader",
        "Adobe Acrobat Pro (64-bit)",
        "Adobe Acrobat Pro DC (64-bit)",
        "Adobe Acrobat Pro DC",
        "Adobe Acrobat Pro",
        "Adobe Acrobat Standard DC",
        "Adobe Acrobat Standard",
        "Adobe Acrobat",
        "Adobe Reader",
        "Acrobat Reader",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_no_document_titles() -> Vec<String> {
    ["Home", "Tools", "Start", "Recent", "Documents"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_separators() -> Vec<String> {
    [" - ", " – ", " — "].iter().map(|s| s.to_string()).collect()
}

fn default_max_document_id_len() -> usize {
    50
}
fn default_duplicate_threshold() -> u32 {
    5
}
fn default_hash_size() -> u32 {
    16
}
fn default_scale_percent() -> u32 {
    100
}
fn default_border_size() -> u32 {
    10
}
fn default_white() -> String {
    "#FFFFFF".to_string()
}
fn default_watermark_opacity() -> f32 {
    0.7
}
fn default_watermark_scale() -> u32 {
    2
}
fn default_watermark_margin() -> u32 {
    10
}
fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}
fn default_compression_quality() -> u8 {
    80
}
fn default_output_quality() -> u8 {
    90
}
fn default_filename_template() -> String {
    "{doc}_{timestamp}".to_string()
}
fn default_capture_hotkey() -> String {
    "ctrl+shift+s".to_string()
}
fn default_pause_hotkey() -> String {
    "ctrl+shift+p".to_string()
}

/// `~/Documents/PDF Screenshots` (문서 폴더가 없으면 홈, 그것도 없으면 현재 디렉토리)
fn default_save_folder() -> PathBuf {
    let base = directories::UserDirs::new()
        .map(|dirs| {
            dirs.document_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dirs.home_dir().join("Documents"))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("PDF Screenshots")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert!(AppConfig::default_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_scale() {
        let mut config = AppConfig::default_config();
        config.transform.scale_percent = 0;
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("scale_percent"));
    }

    #[test]
    fn validate_rejects_out_of_range_opacity() {
        let mut config = AppConfig::default_config();
        config.transform.watermark.opacity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bounds_watermark_scale() {
        let mut config = AppConfig::default_config();
        config.transform.watermark.scale = 0;
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("watermark.scale"));

        config.transform.watermark.scale = 600_000_000;
        assert!(config.validate().is_err());

        config.transform.watermark.scale = MAX_WATERMARK_SCALE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_format_extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert!(OutputFormat::Webp.is_lossy());
        assert!(!OutputFormat::Bmp.is_lossy());
    }

    #[test]
    fn default_save_folder_ends_with_product_folder() {
        let folder = default_save_folder();
        assert!(folder.ends_with("PDF Screenshots"));
    }

    #[test]
    fn enum_serde_uses_snake_case() {
        let json = serde_json::to_string(&WatermarkPosition::BottomRight).unwrap();
        assert_eq!(json, "\"bottom_right\"");
        let fmt: OutputFormat = serde_json::from_str("\"jpeg\"").unwrap();
        assert_eq!(fmt, OutputFormat::Jpeg);
    }
}
