//! SimilarityIndex: 문서별 캡처 해시 인덱스.
//!
//! 세션 동안 메모리에만 유지되고 크기 제한이 없다. 재시작하면 비워진다.
//! 해시는 중복이 아니고 저장까지 성공한 캡처에 대해서만 기록된다
//! (기록 시점은 호출자가 보장).

use std::collections::HashMap;

use pageshot_core::models::document::DocumentId;
use pageshot_core::models::hash::PerceptualHash;
use tracing::info;

/// 문서 식별자 → 캡처 해시 목록 (캡처 순서)
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    entries: HashMap<DocumentId, Vec<PerceptualHash>>,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 해당 문서의 기록 중 **하나라도** 거리 ≤ `threshold`이면 중복
    ///
    /// 사용자가 앞 페이지로 돌아갈 수 있으므로 마지막 해시만 보지 않는다.
    pub fn is_duplicate(&self, hash: &PerceptualHash, doc: &DocumentId, threshold: u32) -> bool {
        self.entries
            .get(doc)
            .is_some_and(|hashes| hashes.iter().any(|h| h.distance(hash) <= threshold))
    }

    /// 해시 기록
    pub fn record(&mut self, hash: PerceptualHash, doc: &DocumentId) {
        self.entries.entry(doc.clone()).or_default().push(hash);
    }

    /// 전체 또는 문서 하나의 기록 삭제
    pub fn clear(&mut self, doc: Option<&DocumentId>) {
        match doc {
            Some(doc) => {
                let removed = self.entries.remove(doc).map_or(0, |v| v.len());
                info!("중복 인덱스 초기화: 문서 '{}' ({}개 해시 삭제)", doc, removed);
            }
            None => {
                let removed = self.count(None);
                self.entries.clear();
                info!("중복 인덱스 전체 초기화 ({}개 해시 삭제)", removed);
            }
        }
    }

    /// 전체 또는 문서 하나의 해시 수
    pub fn count(&self, doc: Option<&DocumentId>) -> usize {
        match doc {
            Some(doc) => self.entries.get(doc).map_or(0, Vec::len),
            None => self.entries.values().map(Vec::len).sum(),
        }
    }

    /// 기록이 있는 문서 수
    pub fn document_count(&self) -> usize {
        self.entries.len()
    }
}
