//! 파일 저장 싱크.
//!
//! `PersistenceSink` 포트 구현. 같은 폴더의 임시 파일에 먼저 쓰고 rename하여
//! 중간에 실패해도 반쯤 쓰인 이미지 파일이 남지 않게 한다.

use async_trait::async_trait;
use pageshot_core::config::OutputFormat;
use pageshot_core::error::CoreError;
use pageshot_core::ports::sink::PersistenceSink;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 로컬 파일 시스템 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "capture".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[async_trait]
impl PersistenceSink for FileSink {
    async fn write(&self, bytes: &[u8], path: &Path, format: OutputFormat) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::Persistence(format!("폴더 생성 실패: {}: {e}", parent.display()))
            })?;
        }

        let temp = temp_path_for(path);
        if let Err(e) = fs::write(&temp, bytes).await {
            let _ = fs::remove_file(&temp).await;
            return Err(CoreError::Persistence(format!(
                "파일 쓰기 실패: {}: {e}",
                temp.display()
            )));
        }

        if let Err(e) = fs::rename(&temp, path).await {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                warn!("임시 파일 정리 실패: {}: {cleanup}", temp.display());
            }
            return Err(CoreError::Persistence(format!(
                "파일 이동 실패: {}: {e}",
                path.display()
            )));
        }

        debug!(
            "{} 저장: {} ({} bytes)",
            format.extension(),
            path.display(),
            bytes.len()
        );
        Ok(())
    }
}
