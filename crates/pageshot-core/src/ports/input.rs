//! 입력 이벤트 소스 포트.
//!
//! 구현: `pageshot-monitor` crate (Windows 저수준 훅)

use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::models::input::InputEvent;

/// 키보드/포인터 이벤트를 채널로 전달하는 리스너
///
/// 구현체는 전용 스레드에서 이벤트만 큐에 넣고 캡처 작업은 하지 않는다.
/// 수명 관리는 구현체 책임이며 엔진은 구독만 한다.
pub trait InputSource: Send + Sync {
    /// 로그용 이름
    fn name(&self) -> &'static str;

    /// 리스너 시작 (지원하지 않는 플랫폼은 `CoreError::Unsupported`)
    fn start(&self, tx: mpsc::UnboundedSender<InputEvent>) -> Result<(), CoreError>;
}
