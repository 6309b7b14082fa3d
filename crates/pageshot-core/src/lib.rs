//! # pageshot-core
//!
//! PageShot 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (창 상태, 문서 식별자, 지각 해시, 입력 이벤트)
//! - [`ports`]: 캡처 엔진 외부 협력자 인터페이스 (프레임 소스, 저장 싱크, 훅)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
