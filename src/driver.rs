//! Driver Contracts - 드라이버 계약
//!
//! 이 코어가 외부 드라이버 구현(와이어 프로토콜)에 요구하는 인터페이스와
//! 드라이버 팩토리 계약입니다. 바이너리 인코딩이나 HTTP 전송 자체는 이
//! 크레이트의 범위 밖이며, 트레이트 구현체로 주입됩니다.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value as JsonValue;

use crate::error::{ClientError, ClientResult};
use crate::uri::{Scheme, UriParts};
use crate::value::Value;

// ============================================================================
// DriverFault - 드라이버 실패
// ============================================================================

/// 드라이버 수준의 프로토콜 실패
///
/// 서버가 반환하는 상태 코드와 메시지를 담습니다. 파사드에서
/// [`ClientError::Query`]로 변환되며 코드는 그대로 보존됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverFault {
    /// 상태 코드
    pub code: String,
    /// 에러 메시지
    pub message: String,
}

impl DriverFault {
    /// 새 실패 생성
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// 클라이언트 에러 여부
    pub fn is_client_error(&self) -> bool {
        self.code.starts_with("Neo.ClientError")
    }

    /// 트랜지언트 에러 여부
    pub fn is_transient_error(&self) -> bool {
        self.code.starts_with("Neo.TransientError")
    }
}

impl fmt::Display for DriverFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for DriverFault {}

// ============================================================================
// Record / QueryResult - 결과
// ============================================================================

/// 쿼리 결과 레코드 (순서 있는 값 목록)
#[derive(Debug, Clone, Default)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    /// 새 레코드 생성
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// 값 목록
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// 인덱스로 값 가져오기
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// 레코드 길이
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 빈 레코드 여부
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 쿼리 결과 (순서 있는 레코드 목록)
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    keys: Vec<String>,
    records: Vec<Record>,
}

impl QueryResult {
    /// 새 결과 생성
    pub fn new(keys: Vec<String>, records: Vec<Record>) -> Self {
        Self { keys, records }
    }

    /// 빈 결과 생성
    pub fn empty() -> Self {
        Self::default()
    }

    /// 컬럼 키
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 레코드 목록
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// 첫 번째 레코드
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// 레코드 수
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 빈 결과 여부
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Auth - 인증
// ============================================================================

/// 인증 정보
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    /// 인증 없음 (인증 없는 서버와의 호환용)
    #[default]
    None,
    /// Basic 인증 (사용자명/비밀번호)
    Basic {
        /// 사용자명
        username: String,
        /// 비밀번호
        password: String,
    },
}

impl Auth {
    /// Basic 인증 생성
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 인증 없음
    pub fn none() -> Self {
        Self::None
    }

    /// 인증 스킴
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
        }
    }
}

// ============================================================================
// ServerAddress - 서버 주소
// ============================================================================

/// 서버 주소
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
}

impl ServerAddress {
    /// 새 서버 주소 생성
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` 문자열에서 파싱 (포트 생략 시 7687)
    pub fn parse(address: &str) -> ClientResult<Self> {
        match address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                let port = port.parse().map_err(|_| {
                    ClientError::invalid_uri(format!("invalid port in address '{address}'"))
                })?;
                Ok(Self::new(host, port))
            }
            None if !address.is_empty() => Ok(Self::new(address, 7687)),
            _ => Err(ClientError::invalid_uri(format!(
                "invalid server address '{address}'"
            ))),
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ============================================================================
// DriverConfig - 드라이버 설정
// ============================================================================

/// bolt 드라이버 빌드 설정
///
/// 라우팅된 재빌드는 탐색 시점의 이 스냅샷을 주소만 바꿔 재사용합니다.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// 서버 주소
    pub address: ServerAddress,
    /// 인증 정보
    pub auth: Auth,
    /// TLS 암호화 요구 여부
    pub encrypted: bool,
    /// 드라이버별 불투명 설정
    pub extras: Option<JsonValue>,
}

impl DriverConfig {
    /// 새 설정 생성
    pub fn new(address: ServerAddress, auth: Auth) -> Self {
        Self {
            address,
            auth,
            encrypted: false,
            extras: None,
        }
    }

    /// TLS 암호화 설정
    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    /// 불투명 설정 추가
    pub fn with_extras(mut self, extras: Option<JsonValue>) -> Self {
        self.extras = extras;
        self
    }

    /// 같은 설정을 다른 주소로 복제
    pub fn at(&self, address: ServerAddress) -> Self {
        Self {
            address,
            ..self.clone()
        }
    }
}

// ============================================================================
// Collaborator Traits - 드라이버 계약
// ============================================================================

/// 불투명 드라이버 핸들
///
/// 이 코어는 드라이버에서 세션을 얻는 것만 요구합니다.
pub trait Driver {
    /// 새 세션 생성
    fn session(&self) -> Result<Box<dyn SessionHandle>, DriverFault>;
}

/// 드라이버 세션
pub trait SessionHandle {
    /// 단일 문장 실행
    fn run(
        &mut self,
        statement: &str,
        parameters: HashMap<String, Value>,
        tag: Option<&str>,
    ) -> Result<QueryResult, DriverFault>;

    /// 파이프라인 생성
    fn create_pipeline(
        &mut self,
        query: Option<&str>,
        parameters: HashMap<String, Value>,
        tag: Option<&str>,
    ) -> Result<Box<dyn Pipeline>, DriverFault>;

    /// 트랜잭션 획득
    fn transaction(&mut self) -> Result<Box<dyn Transaction>, DriverFault>;
}

/// 문장 파이프라인 (한 번의 왕복으로 순차 실행되는 배치)
pub trait Pipeline {
    /// 문장을 파이프라인에 추가
    fn push(
        &mut self,
        statement: &str,
        parameters: HashMap<String, Value>,
        tag: Option<&str>,
    );

    /// 파이프라인 실행, 추가 순서대로 결과 반환
    fn run(&mut self) -> Result<Vec<QueryResult>, DriverFault>;
}

/// 드라이버 트랜잭션
///
/// 트랜잭션 의미론은 전부 드라이버 구현체의 몫입니다. 이 코어는 획득만
/// 위임합니다.
pub trait Transaction {}

// ============================================================================
// DriverFactory - 드라이버 팩토리
// ============================================================================

/// 드라이버 팩토리
///
/// 구체적인 와이어 구현은 이 트레이트 뒤에 있습니다.
pub trait DriverFactory {
    /// bolt 드라이버 빌드
    fn bolt(&self, config: &DriverConfig) -> Result<Box<dyn Driver>, DriverFault>;

    /// http 드라이버 빌드 (원본 URI와 설정을 그대로 전달)
    fn http(
        &self,
        uri: &str,
        extras: Option<&JsonValue>,
    ) -> Result<Box<dyn Driver>, DriverFault>;
}

/// 팩토리 빌드 결과
pub struct BuiltDriver {
    /// 빌드된 드라이버
    pub driver: Box<dyn Driver>,
    /// bolt 계열일 때의 설정 스냅샷 (라우팅 재빌드용)
    pub bolt_config: Option<DriverConfig>,
}

/// 스킴에 따라 드라이버 빌드
///
/// - bolt 계열, 자격 증명 없음: 인증 없이 빌드 (인증 없는 서버 호환)
/// - bolt 계열, 자격 증명 있음: Basic 인증 + 암호화 전송 요구
/// - http 계열: 원본 URI와 설정을 변경 없이 전달
///
/// 지원하지 않는 스킴은 [`UriParts::parse`]에서 이미 거부됩니다.
pub fn build_driver(
    factory: &dyn DriverFactory,
    uri: &str,
    parts: &UriParts,
    extras: Option<&JsonValue>,
) -> ClientResult<BuiltDriver> {
    match parts.scheme {
        Scheme::Bolt { .. } => {
            let (auth, encrypted) = match (&parts.user, &parts.password) {
                (Some(user), Some(password)) => (Auth::basic(user, password), true),
                _ => (Auth::None, false),
            };

            let config = DriverConfig::new(
                ServerAddress::new(&parts.host, parts.port),
                auth,
            )
            .with_encrypted(encrypted)
            .with_extras(extras.cloned());

            let driver = factory.bolt(&config)?;
            Ok(BuiltDriver {
                driver,
                bolt_config: Some(config),
            })
        }
        Scheme::Http { .. } => {
            let driver = factory.http(uri, extras)?;
            Ok(BuiltDriver {
                driver,
                bolt_config: None,
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_fault() {
        let fault = DriverFault::new("Neo.ClientError.Statement.SyntaxError", "bad syntax");
        assert!(fault.is_client_error());
        assert!(!fault.is_transient_error());
        assert_eq!(
            fault.to_string(),
            "Neo.ClientError.Statement.SyntaxError: bad syntax"
        );

        let fault = DriverFault::new(
            "Neo.TransientError.General.TemporarilyUnavailable",
            "busy",
        );
        assert!(fault.is_transient_error());
    }

    #[test]
    fn test_record() {
        let record = Record::new(vec![Value::Integer(300), Value::List(vec![])]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(0), Some(&Value::Integer(300)));
        assert!(record.get(2).is_none());
    }

    #[test]
    fn test_query_result() {
        let result = QueryResult::new(
            vec!["n".into()],
            vec![Record::new(vec![Value::Integer(1)])],
        );
        assert_eq!(result.keys(), ["n".to_string()]);
        assert_eq!(result.len(), 1);
        assert!(result.first().is_some());
        assert!(QueryResult::empty().is_empty());
    }

    #[test]
    fn test_auth_scheme() {
        assert_eq!(Auth::none().scheme(), "none");
        assert_eq!(Auth::basic("neo4j", "secret").scheme(), "basic");
    }

    #[test]
    fn test_server_address_parse() {
        let addr = ServerAddress::parse("core1:7688").unwrap();
        assert_eq!(addr.host, "core1");
        assert_eq!(addr.port, 7688);
        assert_eq!(addr.to_string(), "core1:7688");

        let addr = ServerAddress::parse("core1").unwrap();
        assert_eq!(addr.port, 7687); // 기본 포트

        assert!(ServerAddress::parse("core1:abc").is_err());
        assert!(ServerAddress::parse("").is_err());
        assert!(ServerAddress::parse(":7687").is_err());
    }

    #[test]
    fn test_driver_config_at() {
        let config = DriverConfig::new(
            ServerAddress::new("core1", 7687),
            Auth::basic("neo4j", "secret"),
        )
        .with_encrypted(true);

        let moved = config.at(ServerAddress::new("replica1", 7687));
        assert_eq!(moved.address.host, "replica1");
        assert_eq!(moved.auth, config.auth);
        assert!(moved.encrypted);
    }
}
