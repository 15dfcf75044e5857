//! Client Error Types
//!
//! 클라이언트 에러 정의

use thiserror::Error;

use crate::classifier::AccessMode;
use crate::driver::DriverFault;

// ============================================================================
// ClientError - 클라이언트 에러
// ============================================================================

/// 클라이언트 에러
#[derive(Error, Debug)]
pub enum ClientError {
    /// 지원하지 않는 URI 스킴
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// 잘못된 URI
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// 라우팅 테이블 탐색 에러
    #[error("Routing discovery error: {0}")]
    Discovery(String),

    /// 빈 문장
    #[error("Statement must not be empty")]
    EmptyStatement,

    /// 라우팅 가능한 서버 없음
    #[error("No {mode} servers available in routing table")]
    NoServersAvailable {
        /// 요청된 접근 모드
        mode: AccessMode,
    },

    /// 쿼리 에러 (드라이버 실패 변환 결과)
    #[error("Query error: {code} - {message}")]
    Query {
        /// 드라이버가 보고한 상태 코드
        code: String,
        /// 에러 메시지
        message: String,
    },

    /// 세션 에러
    #[error("Session error: {0}")]
    Session(String),
}

impl ClientError {
    /// 지원하지 않는 스킴 에러 생성
    pub fn unsupported_scheme(scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme(scheme.into())
    }

    /// 잘못된 URI 에러 생성
    pub fn invalid_uri(msg: impl Into<String>) -> Self {
        Self::InvalidUri(msg.into())
    }

    /// 탐색 에러 생성
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// 빈 문장 에러 생성
    pub fn empty_statement() -> Self {
        Self::EmptyStatement
    }

    /// 서버 없음 에러 생성
    pub fn no_servers_available(mode: AccessMode) -> Self {
        Self::NoServersAvailable { mode }
    }

    /// 쿼리 에러 생성
    pub fn query(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            code: code.into(),
            message: message.into(),
        }
    }

    /// 세션 에러 생성
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// 생성 시점 치명적 에러 여부
    ///
    /// 이 에러가 발생하면 Connection은 사용할 수 없습니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedScheme(_) | Self::InvalidUri(_) | Self::Discovery(_)
        )
    }

    /// 인자 에러 여부 (네트워크 왕복 전에 발생)
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::EmptyStatement)
    }

    /// 보존된 드라이버 상태 코드
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<DriverFault> for ClientError {
    fn from(fault: DriverFault) -> Self {
        // 상태 코드를 그대로 보존하여 호출자에게 전파
        Self::Query {
            code: fault.code,
            message: fault.message,
        }
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 클라이언트 결과 타입
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::unsupported_scheme("ftp");
        assert_eq!(err.to_string(), "Unsupported scheme: ftp");

        let err = ClientError::query("Neo.ClientError.Statement.SyntaxError", "Invalid syntax");
        assert_eq!(
            err.to_string(),
            "Query error: Neo.ClientError.Statement.SyntaxError - Invalid syntax"
        );

        let err = ClientError::no_servers_available(AccessMode::Read);
        assert_eq!(err.to_string(), "No READ servers available in routing table");
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(ClientError::unsupported_scheme("ftp").is_fatal());
        assert!(ClientError::invalid_uri("missing host").is_fatal());
        assert!(ClientError::discovery("no records").is_fatal());
        assert!(!ClientError::empty_statement().is_fatal());
        assert!(!ClientError::query("Neo.Code", "boom").is_fatal());
    }

    #[test]
    fn test_error_is_argument_error() {
        assert!(ClientError::empty_statement().is_argument_error());
        assert!(!ClientError::session("closed").is_argument_error());
    }

    #[test]
    fn test_fault_translation_preserves_code() {
        let fault = DriverFault::new("Neo.ClientError.Security.Unauthorized", "bad credentials");
        let err: ClientError = fault.into();

        assert_eq!(err.code(), Some("Neo.ClientError.Security.Unauthorized"));
        assert!(matches!(err, ClientError::Query { .. }));
    }

    #[test]
    fn test_code_absent_for_local_errors() {
        assert_eq!(ClientError::empty_statement().code(), None);
        assert_eq!(ClientError::session("closed").code(), None);
    }
}
