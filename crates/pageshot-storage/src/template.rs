//! 파일명 템플릿 치환과 파일 시스템 안전화.
//!
//! 지원 토큰:
//!
//! | 토큰 | 예 |
//! |------|----|
//! | `{doc}` | `Report.pdf` |
//! | `{date}` | `2024-03-09` |
//! | `{time}` | `14-05-07` |
//! | `{datetime}` | `2024-03-09_14-05-07` |
//! | `{timestamp}` | `20240309_140507_123` |
//! | `{year}` `{month}` `{day}` | `2024` `03` `09` |
//! | `{hour}` `{minute}` `{second}` `{ms}` | `14` `05` `07` `123` |
//!
//! 알 수 없는 토큰은 그대로 남는다.

use chrono::{DateTime, Local};

/// 밀리초까지 포함한 타임스탬프 형식
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// 파일명에 쓸 수 없는 문자
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// 템플릿 토큰 치환
pub fn render_template(template: &str, doc: &str, now: &DateTime<Local>) -> String {
    let tokens: [(&str, String); 12] = [
        ("{doc}", doc.to_string()),
        ("{datetime}", now.format("%Y-%m-%d_%H-%M-%S").to_string()),
        ("{timestamp}", now.format(TIMESTAMP_FORMAT).to_string()),
        ("{date}", now.format("%Y-%m-%d").to_string()),
        ("{time}", now.format("%H-%M-%S").to_string()),
        ("{year}", now.format("%Y").to_string()),
        ("{month}", now.format("%m").to_string()),
        ("{day}", now.format("%d").to_string()),
        ("{hour}", now.format("%H").to_string()),
        ("{minute}", now.format("%M").to_string()),
        ("{second}", now.format("%S").to_string()),
        ("{ms}", now.format("%3f").to_string()),
    ];

    tokens
        .iter()
        .fold(template.to_string(), |acc, (token, value)| acc.replace(token, value))
}

/// 금지 문자와 제어 문자 제거, 앞뒤 공백과 끝의 마침표 제거
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !FORBIDDEN.contains(c))
        .collect();
    cleaned.trim().trim_end_matches('.').trim_end().to_string()
}

/// 치환 결과가 비면 `{doc}_{timestamp}`로 대체한 최종 파일 이름 (확장자 제외)
pub fn file_stem(template: &str, doc: &str, now: &DateTime<Local>) -> String {
    let rendered = sanitize_filename(&render_template(template, doc, now));
    if !rendered.is_empty() {
        return rendered;
    }
    sanitize_filename(&format!("{}_{}", doc, now.format(TIMESTAMP_FORMAT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at() -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_milli_opt(14, 5, 7, 123))
            .unwrap();
        Local.from_local_datetime(&naive).unwrap()
    }

    #[test]
    fn renders_all_tokens() {
        let out = render_template(
            "{doc}|{date}|{time}|{datetime}|{timestamp}|{year}{month}{day}|{hour}{minute}{second}.{ms}",
            "Report.pdf",
            &at(),
        );
        assert_eq!(
            out,
            "Report.pdf|2024-03-09|14-05-07|2024-03-09_14-05-07|20240309_140507_123|20240309|140507.123"
        );
    }

    #[test]
    fn default_template() {
        assert_eq!(
            file_stem("{doc}_{timestamp}", "Report.pdf", &at()),
            "Report.pdf_20240309_140507_123"
        );
    }

    #[test]
    fn unknown_tokens_survive() {
        assert_eq!(render_template("{page}-{doc}", "a", &at()), "{page}-a");
    }

    #[test]
    fn sanitize_strips_forbidden_and_control() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
        assert_eq!(sanitize_filename("tab\there\n"), "tabhere");
        assert_eq!(sanitize_filename("  name.. "), "name");
    }

    #[test]
    fn empty_result_falls_back_to_doc_and_timestamp() {
        for template in ["", "   ", "<>:?*", "..."] {
            let stem = file_stem(template, "Report.pdf", &at());
            assert!(!stem.is_empty());
            assert!(stem.contains("Report.pdf"));
            assert!(stem.contains("20240309_140507_123"));
        }
    }
}
