//! PageShot 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 `CoreError`를 그대로 반환하거나 메시지로 감싼다.
//! 창 조회 실패는 별도의 `ProbeError`로 분리되어 "비활성" 폴백 정책에만 쓰인다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 프레임 획득 실패 (잘못된 영역, 권한, 모니터 분리 등)
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 이미지 변환 단계 실패
    #[error("변환 에러: {0}")]
    Transform(String),

    /// 파일 저장 실패
    #[error("저장 에러: {0}")]
    Persistence(String),

    /// 미지원 플랫폼/기능
    #[error("미지원: {0}")]
    Unsupported(String),

    /// 실행 타임아웃
    #[error("실행 타임아웃: {timeout_ms}ms 초과")]
    ExecutionTimeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// 전경 창 조회 에러.
///
/// 호출자에게 예외로 전파되지 않는다. `WindowStateProbe::probe`가
/// 모든 변형을 "대상 앱 비활성"으로 취급한다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// OS 조회가 제한 시간 내에 끝나지 않음
    #[error("창 조회 타임아웃: {timeout_ms}ms 초과")]
    Timeout {
        /// 제한 시간 (밀리초)
        timeout_ms: u64,
    },

    /// OS API/외부 명령 실패
    #[error("창 조회 실패: {0}")]
    Os(String),

    /// 현재 플랫폼/디스플레이 서버에서 지원하지 않음
    #[error("창 조회 미지원: {0}")]
    Unsupported(String),
}
