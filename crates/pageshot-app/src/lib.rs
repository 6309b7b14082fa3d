//! # pageshot-app
//!
//! PageShot 캡처 엔진 오케스트레이션.
//! 입력 이벤트 → 스케줄러(디바운스/일시정지) → 엔진(직렬화된 캡처 경로) → 저장 + 훅.
//!
//! 바이너리(`main.rs`)는 이 crate의 구성 요소를 어댑터와 연결하기만 한다.

pub mod engine;
pub mod event_bus;
pub mod hooks;
pub mod lifecycle;
pub mod scheduler;
pub mod stats;
