//! Connection - 연결
//!
//! 별칭 하나에 대응하는 연결입니다. URI로 드라이버를 고르고, 세션을
//! 게으르게 만들고, 라우팅된 클러스터라면 문장을 읽기/쓰기로 분류해
//! 적절한 서버로 투명하게 리디렉션합니다.
//!
//! 하나의 Connection은 단일 호출자가 순차적으로 사용하는 것을 전제로
//! 합니다. 드라이버 교체와 세션 무효화는 `run()` 호출과 원자적이지
//! 않으므로, 공유하려면 외부에서 동기화해야 합니다.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::classifier::{classify, AccessMode};
use crate::driver::{
    build_driver, Driver, DriverConfig, DriverFactory, Pipeline, QueryResult,
    SessionHandle, Transaction,
};
use crate::error::{ClientError, ClientResult};
use crate::routing::{discover, RandomSelector, RoutingState, ServerSelector};
use crate::uri::UriParts;
use crate::value::Value;

// ============================================================================
// Statement - 문장
// ============================================================================

/// 실행할 문장
#[derive(Debug, Clone)]
pub struct Statement {
    /// 문장 텍스트
    pub text: String,
    /// 파라미터
    pub parameters: HashMap<String, Value>,
    /// 결과 식별용 태그
    pub tag: Option<String>,
}

impl Statement {
    /// 새 문장 생성
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: HashMap::new(),
            tag: None,
        }
    }

    /// 파라미터 추가
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// 파라미터들 추가
    pub fn with_params(mut self, params: HashMap<String, Value>) -> Self {
        self.parameters.extend(params);
        self
    }

    /// 태그 설정
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl From<&str> for Statement {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Statement {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// MixedEntry - 혼합 큐 항목
// ============================================================================

/// [`Connection::run_mixed`] 큐의 항목
#[derive(Debug, Clone)]
pub enum MixedEntry {
    /// 문장 배치 (순서 유지하며 개별 추가)
    Batch(Vec<Statement>),
    /// 단일 문장
    Single(Statement),
}

impl From<Statement> for MixedEntry {
    fn from(statement: Statement) -> Self {
        Self::Single(statement)
    }
}

// ============================================================================
// RouteOutcome - 라우팅 결과
// ============================================================================

/// 라우터 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// 드라이버를 다른 서버로 교체함
    Switched,
    /// 이미 올바른 서버 계열에 있음
    Unchanged,
}

// ============================================================================
// Connection - 연결
// ============================================================================

/// 그래프 데이터베이스 연결
///
/// 별칭당 한 번 생성되며 복제되지 않습니다. 드라이버 핸들은 항상 정확히
/// 하나이고, 교체될 때마다 현재 세션이 무효화되어 다음 작업이 새
/// 드라이버에서 세션을 다시 얻습니다.
pub struct Connection {
    alias: String,
    uri: String,
    factory: Arc<dyn DriverFactory>,
    selector: Box<dyn ServerSelector>,
    driver: Box<dyn Driver>,
    session: Option<Box<dyn SessionHandle>>,
    routing: Option<RoutingState>,
    open: bool,
}

impl Connection {
    /// 새 연결 생성 (균등 랜덤 서버 선택)
    ///
    /// 지원하지 않는 스킴이나 라우팅 테이블 탐색 실패는 치명적이며
    /// 연결은 생성되지 않습니다.
    pub fn new(
        alias: impl Into<String>,
        uri: impl Into<String>,
        extras: Option<JsonValue>,
        factory: Arc<dyn DriverFactory>,
    ) -> ClientResult<Self> {
        Self::with_selector(alias, uri, extras, factory, Box::new(RandomSelector))
    }

    /// 서버 선택기를 지정하여 연결 생성
    pub fn with_selector(
        alias: impl Into<String>,
        uri: impl Into<String>,
        extras: Option<JsonValue>,
        factory: Arc<dyn DriverFactory>,
        selector: Box<dyn ServerSelector>,
    ) -> ClientResult<Self> {
        let alias = alias.into();
        let uri = uri.into();

        let parts = UriParts::parse(&uri)?;
        let built = build_driver(factory.as_ref(), &uri, &parts, extras.as_ref())?;

        let mut connection = Self {
            alias,
            uri,
            factory,
            selector,
            driver: built.driver,
            session: None,
            routing: None,
            open: true,
        };

        if parts.scheme.is_routing() {
            let routing_config = built.bolt_config.ok_or_else(|| {
                ClientError::discovery("routing scheme produced no bolt configuration")
            })?;
            connection.enable_routing(routing_config)?;
        }

        Ok(connection)
    }

    /// 라우팅 테이블을 탐색하고 라우팅을 활성화
    ///
    /// 탐색 직후 WRITE 모드를 강제 적용하여 첫 실제 드라이버가 탐색용
    /// 드라이버가 아닌 쓰기 서버를 가리키게 합니다.
    fn enable_routing(&mut self, routing_config: DriverConfig) -> ClientResult<()> {
        let table = discover(self.ensure_session()?)?;

        debug!(alias = %self.alias, "routing enabled");
        self.routing = Some(RoutingState::new(table, routing_config));
        self.check_update_server_routing(None, Some(AccessMode::Write))?;

        Ok(())
    }

    /// 문장 실행 전후의 라우팅 판정
    ///
    /// 라우팅이 비활성이면 아무것도 하지 않습니다. 활성이면 문장을
    /// 분류하고(강제 모드가 우선), 마지막 모드와 다른 계열이 필요할 때
    /// 해당 풀에서 서버 하나를 골라 드라이버를 재빌드하고 세션을
    /// 비웁니다. 빈 풀에서의 선택은 라우팅 상태 손상이므로 에러로
    /// 표면화됩니다.
    pub fn check_update_server_routing(
        &mut self,
        statement: Option<&str>,
        force: Option<AccessMode>,
    ) -> ClientResult<RouteOutcome> {
        let Some(state) = self.routing.as_mut() else {
            return Ok(RouteOutcome::Unchanged);
        };

        let mode = statement.map(classify);
        let last = state.last_mode();

        let target = if last != Some(AccessMode::Write)
            && (mode == Some(AccessMode::Write) || force == Some(AccessMode::Write))
        {
            AccessMode::Write
        } else if last != Some(AccessMode::Read)
            && (mode == Some(AccessMode::Read) || force == Some(AccessMode::Read))
        {
            AccessMode::Read
        } else {
            return Ok(RouteOutcome::Unchanged);
        };

        state.set_last_mode(target);

        let address = self
            .selector
            .select(state.servers(target))
            .cloned()
            .ok_or(ClientError::NoServersAvailable { mode: target })?;

        let config = state.routing_config().at(address.clone());

        debug!(alias = %self.alias, mode = %target, server = %address, "switching routed driver");

        self.driver = self.factory.bolt(&config)?;
        self.session = None;

        Ok(RouteOutcome::Switched)
    }

    /// 세션 확보
    ///
    /// 세션이 없으면 현재 드라이버에서 새로 만들고, 있으면 그대로
    /// 반환합니다. 라우터가 서버 교체의 부수효과로 세션을 비울 수
    /// 있으므로, 반드시 해당 문장의 라우팅이 끝난 뒤에 호출해야 합니다.
    pub fn ensure_session(&mut self) -> ClientResult<&mut dyn SessionHandle> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.driver.session()?,
        };
        Ok(self.session.insert(session).as_mut())
    }

    /// 단일 문장 실행
    ///
    /// 라우팅 판정 → 세션 확보 → 실행 순서로 진행하며, 성공 후에는 WRITE
    /// 모드를 강제 재적용합니다. 드라이버 실패는 상태 코드를 보존한
    /// [`ClientError::Query`]로 변환되어 그대로 전파되며 재시도하지
    /// 않습니다. 실패한 실행은 강제 재적용을 건너뛰므로 라우팅 모드는
    /// 시도 전 그대로 남습니다.
    pub fn run(
        &mut self,
        statement: &str,
        parameters: Option<HashMap<String, Value>>,
        tag: Option<&str>,
    ) -> ClientResult<QueryResult> {
        self.ensure_open()?;

        if statement.is_empty() {
            return Err(ClientError::empty_statement());
        }

        self.check_update_server_routing(Some(statement), None)?;

        let parameters = parameters.unwrap_or_default();
        let session = self.ensure_session()?;
        let result = session.run(statement, parameters, tag)?;

        self.check_update_server_routing(None, Some(AccessMode::Write))?;

        Ok(result)
    }

    /// 혼합 큐 실행
    ///
    /// 세션 하나, 파이프라인 하나를 만들어 큐의 항목을 순서대로
    /// 추가한 뒤 한 번에 실행합니다. 배치 항목의 문장들은 개별로, 순서를
    /// 유지하며 추가됩니다. 결과는 추가 순서대로 반환됩니다.
    pub fn run_mixed(&mut self, queue: &[MixedEntry]) -> ClientResult<Vec<QueryResult>> {
        self.ensure_open()?;

        let session = self.ensure_session()?;
        let mut pipeline = session.create_pipeline(None, HashMap::new(), None)?;

        for entry in queue {
            match entry {
                MixedEntry::Batch(statements) => {
                    for statement in statements {
                        pipeline.push(
                            &statement.text,
                            statement.parameters.clone(),
                            statement.tag.as_deref(),
                        );
                    }
                }
                MixedEntry::Single(statement) => {
                    pipeline.push(
                        &statement.text,
                        statement.parameters.clone(),
                        statement.tag.as_deref(),
                    );
                }
            }
        }

        Ok(pipeline.run()?)
    }

    /// 파이프라인 생성
    ///
    /// 라우팅 판정에는 참여하지 않습니다. 라우팅은 파이프라인 생성이
    /// 아니라 실행 단위의 결정입니다.
    pub fn create_pipeline(
        &mut self,
        query: Option<&str>,
        parameters: Option<HashMap<String, Value>>,
        tag: Option<&str>,
    ) -> ClientResult<Box<dyn Pipeline>> {
        self.ensure_open()?;

        let parameters = parameters.unwrap_or_default();
        let session = self.ensure_session()?;
        Ok(session.create_pipeline(query, parameters, tag)?)
    }

    /// 트랜잭션 획득
    pub fn get_transaction(&mut self) -> ClientResult<Box<dyn Transaction>> {
        self.ensure_open()?;

        let session = self.ensure_session()?;
        Ok(session.transaction()?)
    }

    /// 현재 세션 (없으면 생성)
    pub fn get_session(&mut self) -> ClientResult<&mut dyn SessionHandle> {
        self.ensure_open()?;
        self.ensure_session()
    }

    /// 현재 드라이버 핸들
    pub fn get_driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// 연결 별칭
    pub fn get_alias(&self) -> &str {
        &self.alias
    }

    /// 연결 URI
    pub fn get_uri(&self) -> &str {
        &self.uri
    }

    /// 라우팅 활성 여부
    pub fn is_routed(&self) -> bool {
        self.routing.is_some()
    }

    /// 마지막 라우팅 모드 (`None`이면 미사용 또는 비라우팅)
    pub fn routing_mode(&self) -> Option<AccessMode> {
        self.routing.as_ref().and_then(RoutingState::last_mode)
    }

    /// 연결 닫기
    ///
    /// 세션을 해제하고 이후의 작업을 거부합니다.
    pub fn close(&mut self) {
        self.open = false;
        self.session = None;
    }

    fn ensure_open(&self) -> ClientResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(ClientError::session("Connection is closed"))
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("alias", &self.alias)
            .field("uri", &self.uri)
            .field("routed", &self.routing.is_some())
            .field("has_session", &self.session.is_some())
            .field("open", &self.open)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
