//! # pageshot-storage
//!
//! 출력 저장 어댑터.
//!
//! - [`namer`]: 템플릿 → 파일명, 날짜/문서 하위 폴더, `batchN` 폴더 순환, 충돌 회피
//! - [`file_sink`]: `PersistenceSink` 구현 (임시 파일 + rename)

pub mod file_sink;
pub mod namer;
pub mod template;
