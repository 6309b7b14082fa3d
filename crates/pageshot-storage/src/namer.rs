//! FileNamer: 저장 경로 결정.
//!
//! 구조: `<save_folder>/[날짜]/[문서]/[batchN]/<파일명>.<확장자>`
//!
//! 폴더당 최대 파일 수가 설정되면 폴더별 파일 수를 세어 가득 찬 폴더 대신
//! `batch1`, `batch2`, ... 하위 폴더로 보낸다. 카운트는 처음 쓰는 폴더마다
//! 디스크의 파일 수로 초기화되고, 저장 성공 후 [`FileNamer::confirm`]으로만 증가한다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};
use pageshot_core::config::{DateFolders, OutputConfig};
use pageshot_core::error::CoreError;
use pageshot_core::models::document::DocumentId;
use tokio::fs;
use tracing::debug;

use crate::template::{file_stem, sanitize_filename};

/// 이름이 겹칠 때 시도할 최대 접미사 번호
const MAX_COLLISION_SUFFIX: u32 = 10_000;

/// 결정된 저장 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// 최종 파일 경로
    pub path: PathBuf,
    /// 순환 카운트 키 (batch 적용 전 폴더)
    pub folder: PathBuf,
    /// 배치 번호 (0 = 기본 폴더)
    pub batch: u32,
}

/// 폴더별 배치 상태
#[derive(Debug, Clone, Copy)]
struct BatchState {
    batch: u32,
    count: u32,
}

/// 저장 경로 결정기
#[derive(Debug, Default)]
pub struct FileNamer {
    folders: HashMap<PathBuf, BatchState>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서와 현재 시각으로 저장 경로 결정
    ///
    /// 디렉토리는 만들지 않는다 (저장 싱크 책임).
    pub async fn resolve(
        &mut self,
        doc: &DocumentId,
        output: &OutputConfig,
        now: DateTime<Local>,
    ) -> Result<ResolvedPath, CoreError> {
        let folder = Self::folder_for(doc, output, &now);

        let (dir, batch) = if output.max_files_per_folder == 0 {
            (folder.clone(), 0)
        } else {
            let batch = self
                .current_batch(&folder, output.max_files_per_folder)
                .await?;
            (batch_dir(&folder, batch), batch)
        };

        let stem = file_stem(&output.filename_template, doc.as_str(), &now);
        let path = unique_path(&dir, &stem, output.format.extension()).await?;

        debug!("저장 경로 결정: {}", path.display());
        Ok(ResolvedPath {
            path,
            folder,
            batch,
        })
    }

    /// 저장 성공 후 폴더 카운트 증가
    pub fn confirm(&mut self, resolved: &ResolvedPath) {
        if let Some(state) = self.folders.get_mut(&resolved.folder) {
            if state.batch == resolved.batch {
                state.count += 1;
            }
        }
    }

    /// 날짜/문서 하위 폴더 (batch 적용 전)
    pub fn folder_for(doc: &DocumentId, output: &OutputConfig, now: &DateTime<Local>) -> PathBuf {
        let mut folder = output.save_folder.clone();

        if let Some(bucket) = date_bucket(output.date_folders, now) {
            folder.push(bucket);
        }

        if output.per_document_folder {
            let name = sanitize_filename(doc.as_str());
            if !name.is_empty() {
                folder.push(name);
            }
        }

        folder
    }

    /// 여유가 있는 배치 번호. 캐시가 없거나 가득 찼으면 디스크를 다시 센다.
    async fn current_batch(&mut self, folder: &Path, max: u32) -> Result<u32, CoreError> {
        if let Some(state) = self.folders.get(folder) {
            if state.count < max {
                return Ok(state.batch);
            }
        }

        let mut batch = self.folders.get(folder).map_or(0, |s| s.batch);
        loop {
            let count = count_files(&batch_dir(folder, batch)).await?;
            if count < max {
                self.folders
                    .insert(folder.to_path_buf(), BatchState { batch, count });
                if batch > 0 {
                    debug!("배치 폴더 사용: {} batch{batch} ({count}/{max})", folder.display());
                }
                return Ok(batch);
            }
            batch += 1;
        }
    }
}

fn batch_dir(folder: &Path, batch: u32) -> PathBuf {
    if batch == 0 {
        folder.to_path_buf()
    } else {
        folder.join(format!("batch{batch}"))
    }
}

/// 날짜 폴더 이름
pub fn date_bucket(mode: DateFolders, now: &DateTime<Local>) -> Option<String> {
    match mode {
        DateFolders::None => None,
        DateFolders::Daily => Some(now.format("%Y-%m-%d").to_string()),
        DateFolders::Weekly => {
            let week = now.iso_week();
            Some(format!("{}-W{:02}", week.year(), week.week()))
        }
        DateFolders::Monthly => Some(now.format("%Y-%m").to_string()),
    }
}

/// 폴더 안의 일반 파일 수 (폴더가 없으면 0)
async fn count_files(dir: &Path) -> Result<u32, CoreError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(CoreError::Persistence(format!(
                "폴더 조회 실패: {}: {e}",
                dir.display()
            )))
        }
    };

    let mut count = 0;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// 이미 있는 파일과 겹치지 않는 경로 (`name_1.png`, `name_2.png`, ...)
async fn unique_path(dir: &Path, stem: &str, ext: &str) -> Result<PathBuf, CoreError> {
    let candidate = dir.join(format!("{stem}.{ext}"));
    if !fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    for n in 1..=MAX_COLLISION_SUFFIX {
        let candidate = dir.join(format!("{stem}_{n}.{ext}"));
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(CoreError::Persistence(format!(
        "사용 가능한 파일 이름 없음: {}/{stem}.{ext}",
        dir.display()
    )))
}
