//! 포트 인터페이스 (trait).
//!
//! 캡처 엔진의 외부 협력자 경계. 각 어댑터 crate가 구현하고
//! `pageshot-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! OS 호출이 동기인 포트(창 조회, 프레임 획득)는 동기 trait으로 두고
//! 호출 측에서 `spawn_blocking` + 타임아웃으로 감싼다.
//! I/O 포트는 `async_trait`을 사용한다.

pub mod frame;
pub mod hooks;
pub mod input;
pub mod recorder;
pub mod sink;
pub mod window;
