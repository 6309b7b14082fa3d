//! 캡처 후 훅 포트.
//!
//! 구현: `pageshot-app` crate (`hooks` 모듈)

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::CoreError;
use crate::models::capture::RawFrame;
use crate::models::document::DocumentId;

/// 훅에 전달되는 캡처 정보
#[derive(Debug, Clone)]
pub struct HookContext {
    /// 저장된 파일 경로
    pub path: PathBuf,
    pub document_id: DocumentId,
    /// 변환이 끝난 최종 이미지 (RGBA)
    pub image: Arc<RawFrame>,
}

/// 성공한 캡처마다 best-effort로 실행되는 부수 작업
///
/// 실패는 로그로만 남고 캡처 결과에 영향을 주지 않는다.
#[async_trait]
pub trait PostCaptureHook: Send + Sync {
    /// 로그용 이름
    fn name(&self) -> &'static str;

    async fn on_capture(&self, ctx: &HookContext) -> Result<(), CoreError>;
}
