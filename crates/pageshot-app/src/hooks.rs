//! 캡처 후 훅.
//!
//! 소리, 클립보드, 백업 폴더 복사, 외부 스크립트.
//! 모두 best-effort이며 엔진은 결과를 기다리지 않는다.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use pageshot_core::config::HooksConfig;
use pageshot_core::error::CoreError;
use pageshot_core::ports::hooks::{HookContext, PostCaptureHook};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// 설정에 켜진 훅 목록
pub fn hooks_from_config(config: &HooksConfig) -> Vec<Arc<dyn PostCaptureHook>> {
    let mut hooks: Vec<Arc<dyn PostCaptureHook>> = Vec::new();
    if config.sound {
        hooks.push(Arc::new(SoundHook));
    }
    if config.clipboard {
        hooks.push(Arc::new(ClipboardHook));
    }
    if let Some(folder) = &config.backup_folder {
        hooks.push(Arc::new(BackupHook::new(folder.clone())));
    }
    if let Some(script) = &config.script {
        hooks.push(Arc::new(ScriptHook::new(script.clone())));
    }
    hooks
}

/// 훅을 각각 별도 태스크로 실행 (fire-and-forget)
pub fn spawn_hooks(hooks: &[Arc<dyn PostCaptureHook>], ctx: HookContext) {
    if hooks.is_empty() {
        return;
    }
    let ctx = Arc::new(ctx);
    for hook in hooks {
        let hook = Arc::clone(hook);
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            match hook.on_capture(&ctx).await {
                Ok(()) => debug!("훅 완료: {}", hook.name()),
                Err(e) => warn!("훅 실패 [{}]: {e}", hook.name()),
            }
        });
    }
}

/// 터미널 벨
#[derive(Debug, Default, Clone, Copy)]
pub struct SoundHook;

#[async_trait]
impl PostCaptureHook for SoundHook {
    fn name(&self) -> &'static str {
        "sound"
    }

    async fn on_capture(&self, _ctx: &HookContext) -> Result<(), CoreError> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(b"\x07").await?;
        stderr.flush().await?;
        Ok(())
    }
}

/// 최종 이미지를 클립보드로 복사
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipboardHook;

#[async_trait]
impl PostCaptureHook for ClipboardHook {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    async fn on_capture(&self, ctx: &HookContext) -> Result<(), CoreError> {
        let image = Arc::clone(&ctx.image);
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| CoreError::Internal(format!("클립보드 열기 실패: {e}")))?;
            clipboard
                .set_image(arboard::ImageData {
                    width: image.width as usize,
                    height: image.height as usize,
                    bytes: Cow::Borrowed(image.rgba.as_slice()),
                })
                .map_err(|e| CoreError::Internal(format!("클립보드 복사 실패: {e}")))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("클립보드 작업 실패: {e}")))?
    }
}

/// 보조 폴더로 파일 복사
#[derive(Debug, Clone)]
pub struct BackupHook {
    folder: PathBuf,
}

impl BackupHook {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }
}

#[async_trait]
impl PostCaptureHook for BackupHook {
    fn name(&self) -> &'static str {
        "backup"
    }

    async fn on_capture(&self, ctx: &HookContext) -> Result<(), CoreError> {
        let file_name = ctx.path.file_name().ok_or_else(|| {
            CoreError::Persistence(format!("파일 이름 없음: {}", ctx.path.display()))
        })?;
        tokio::fs::create_dir_all(&self.folder).await?;
        let target = self.folder.join(file_name);
        tokio::fs::copy(&ctx.path, &target).await?;
        debug!("백업 복사: {}", target.display());
        Ok(())
    }
}

/// 외부 스크립트 실행 (인자: 파일 경로, 문서 이름)
#[derive(Debug, Clone)]
pub struct ScriptHook {
    script: PathBuf,
}

impl ScriptHook {
    pub fn new(script: PathBuf) -> Self {
        Self { script }
    }
}

#[async_trait]
impl PostCaptureHook for ScriptHook {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn on_capture(&self, ctx: &HookContext) -> Result<(), CoreError> {
        let status = tokio::process::Command::new(&self.script)
            .arg(&ctx.path)
            .arg(ctx.document_id.as_str())
            .kill_on_drop(true)
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(CoreError::Internal(format!(
                "스크립트 종료 코드 {:?}: {}",
                status.code(),
                self.script.display()
            )))
        }
    }
}
