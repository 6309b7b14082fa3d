//! 저장 싱크 포트.
//!
//! 구현: `pageshot-storage` crate (`FileSink`)

use async_trait::async_trait;
use std::path::Path;

use crate::config::OutputFormat;
use crate::error::CoreError;

/// 인코딩된 바이트를 경로에 쓴다. 부모 디렉토리는 필요 시 생성.
///
/// 실패는 재시도 없이 호출자에게 그대로 전달된다.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn write(&self, bytes: &[u8], path: &Path, format: OutputFormat)
        -> Result<(), CoreError>;
}
