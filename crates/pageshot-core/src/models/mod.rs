//! PageShot 도메인 모델.
//!
//! 캡처 엔진 내부에서 오가는 값 객체를 정의한다.
//! 디스크에 저장되는 모델은 없다 (설정 제외).

pub mod capture;
pub mod document;
pub mod hash;
pub mod input;
pub mod window;
