//! 창 제목 분류기.
//!
//! 제목이 설정된 앱 이름 접미사로 **끝나야** 대상 앱으로 인정한다.
//! 앱 이름을 본문에 언급하는 웹페이지 제목 등은 부분 문자열 매칭이라 거부된다.
//! 접미사 목록은 설정이며 완전하다고 가정하지 않는다.

use pageshot_core::config::TargetAppConfig;
use pageshot_core::models::document::DocumentId;

/// 제목 분류 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleClass {
    /// 대상 앱 창이 아님
    NotTarget,
    /// 대상 앱이지만 문서 없음 (시작 화면, 도구 탭 등)
    NoDocument,
    /// 문서가 열린 대상 앱 창
    Document(DocumentId),
}

/// 접미사 기반 창 제목 분류기
#[derive(Debug, Clone)]
pub struct TitleClassifier {
    /// 긴 접미사 우선
    suffixes: Vec<String>,
    /// 긴 구분자 우선
    separators: Vec<String>,
    sentinels: Vec<String>,
    max_document_id_len: usize,
}

impl TitleClassifier {
    pub fn new(config: &TargetAppConfig) -> Self {
        let mut suffixes: Vec<String> = config
            .app_suffixes
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut separators: Vec<String> = config
            .separators
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        separators.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            suffixes,
            separators,
            sentinels: config
                .no_document_titles
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
            max_document_id_len: config.max_document_id_len,
        }
    }

    pub fn classify(&self, title: &str) -> TitleClass {
        let title = title.trim();

        for suffix in &self.suffixes {
            let Some(remainder) = strip_suffix_ignore_case(title, suffix) else {
                continue;
            };

            // 제목 전체가 앱 이름
            if remainder.trim().is_empty() {
                return TitleClass::NoDocument;
            }

            // 앱 이름 앞에는 구분자가 있어야 함 ("... Adobe Acrobat" 같은 문장 제외)
            let Some(document_part) = self
                .separators
                .iter()
                .find_map(|sep| remainder.strip_suffix(sep.as_str()))
            else {
                continue;
            };

            let document_part = document_part.trim();
            if document_part.is_empty() || self.is_sentinel(document_part) {
                return TitleClass::NoDocument;
            }

            return TitleClass::Document(DocumentId::normalize(
                document_part,
                self.max_document_id_len,
            ));
        }

        TitleClass::NotTarget
    }

    fn is_sentinel(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.sentinels.iter().any(|s| *s == lower)
    }
}

/// ASCII 대소문자 무시 접미사 제거
fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(cut) {
        return None;
    }
    let (head, tail) = text.split_at(cut);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TitleClassifier {
        TitleClassifier::new(&TargetAppConfig::default())
    }

    fn doc(name: &str) -> TitleClass {
        TitleClass::Document(DocumentId::normalize(name, 50))
    }

    #[test]
    fn document_title_is_recognized() {
        assert_eq!(
            classifier().classify("Report.pdf - Adobe Acrobat Reader"),
            doc("Report.pdf")
        );
    }

    #[test]
    fn longest_suffix_wins() {
        assert_eq!(
            classifier().classify("Report.pdf - Adobe Acrobat Reader (64-bit)"),
            doc("Report.pdf")
        );
        assert_eq!(
            classifier().classify("Spec v2.pdf - Adobe Acrobat Pro DC"),
            doc("Spec v2.pdf")
        );
    }

    #[test]
    fn webpage_mentioning_product_is_not_target() {
        assert_eq!(
            classifier().classify("Acrobat Reader for Report.pdf Tutorial — Some Blog"),
            TitleClass::NotTarget
        );
    }

    #[test]
    fn suffix_without_separator_is_not_target() {
        assert_eq!(
            classifier().classify("Why I switched away from Adobe Acrobat Reader"),
            TitleClass::NotTarget
        );
    }

    #[test]
    fn bare_app_title_has_no_document() {
        assert_eq!(
            classifier().classify("Adobe Acrobat Reader (64-bit)"),
            TitleClass::NoDocument
        );
    }

    #[test]
    fn sentinel_remainder_has_no_document() {
        assert_eq!(
            classifier().classify("Home - Adobe Acrobat Reader"),
            TitleClass::NoDocument
        );
        assert_eq!(
            classifier().classify("tools - Adobe Acrobat Pro"),
            TitleClass::NoDocument
        );
    }

    #[test]
    fn unicode_separator_and_suffix_case() {
        assert_eq!(
            classifier().classify("계약서.pdf – adobe acrobat reader"),
            doc("계약서.pdf")
        );
    }

    #[test]
    fn custom_suffix_list() {
        let config = TargetAppConfig {
            app_suffixes: vec!["SumatraPDF".to_string()],
            ..TargetAppConfig::default()
        };
        let classifier = TitleClassifier::new(&config);
        assert_eq!(classifier.classify("notes.pdf - SumatraPDF"), doc("notes.pdf"));
        assert_eq!(
            classifier.classify("Report.pdf - Adobe Acrobat Reader"),
            TitleClass::NotTarget
        );
    }

    #[test]
    fn unrelated_and_empty_titles() {
        assert_eq!(classifier().classify(""), TitleClass::NotTarget);
        assert_eq!(
            classifier().classify("main.rs - Visual Studio Code"),
            TitleClass::NotTarget
        );
    }
}
