//! Routing Discovery - 라우팅 테이블 탐색
//!
//! 클러스터 라우팅 테이블 프로시저를 한 번 호출하여 역할별 서버 목록을
//! 얻습니다. 라우팅 스킴의 Connection 생성 중에만 실행되며, 실패나
//! 예상 밖의 결과 형태는 생성 시점 치명적 에러입니다.

use std::collections::HashMap;

use tracing::debug;

use crate::driver::{QueryResult, ServerAddress, SessionHandle};
use crate::error::{ClientError, ClientResult};
use crate::value::Value;

use super::table::{RoutingTable, ServerRole};

/// 라우팅 테이블 조회 질의 (고정 리터럴, 파라미터 없음)
pub const ROUTING_TABLE_QUERY: &str = "CALL dbms.cluster.routing.getRoutingTable({})";

/// 세션으로 라우팅 테이블 탐색
pub fn discover(session: &mut dyn SessionHandle) -> ClientResult<RoutingTable> {
    let result = session
        .run(ROUTING_TABLE_QUERY, HashMap::new(), None)
        .map_err(|fault| {
            ClientError::discovery(format!("routing table query failed: {fault}"))
        })?;

    let table = parse_routing_table(&result)?;
    debug!(
        writers = table.writers.len(),
        readers = table.readers.len(),
        "discovered cluster routing table"
    );
    Ok(table)
}

/// 탐색 결과 파싱
///
/// 첫 레코드의 두 번째 값이 `{role, addresses}` 서버 기술자의 목록이어야
/// 합니다. WRITE/READ 이외의 역할은 무시합니다.
pub fn parse_routing_table(result: &QueryResult) -> ClientResult<RoutingTable> {
    let record = result.first().ok_or_else(|| {
        ClientError::discovery("routing table result contains no records")
    })?;

    let servers = record.get(1).and_then(Value::as_list).ok_or_else(|| {
        ClientError::discovery("second routing table field is not a server list")
    })?;

    let mut table = RoutingTable::new();

    for descriptor in servers {
        let descriptor = descriptor.as_map().ok_or_else(|| {
            ClientError::discovery("server descriptor is not a map")
        })?;

        let role = descriptor
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::discovery("server descriptor has no role"))?;

        let addresses = descriptor
            .get("addresses")
            .and_then(Value::as_list)
            .ok_or_else(|| {
                ClientError::discovery("server descriptor has no address list")
            })?;

        let Some(role) = ServerRole::from_str(role) else {
            continue; // ROUTE 등 다른 역할
        };

        for address in addresses {
            let address = address.as_str().ok_or_else(|| {
                ClientError::discovery("server address is not a string")
            })?;
            table.add_server(role, ServerAddress::parse(address)?);
        }
    }

    Ok(table)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Record;

    fn descriptor(role: &str, addresses: &[&str]) -> Value {
        let mut map = HashMap::new();
        map.insert("role".to_string(), Value::from(role));
        map.insert(
            "addresses".to_string(),
            Value::List(addresses.iter().map(|a| Value::from(*a)).collect()),
        );
        Value::Map(map)
    }

    fn table_result(servers: Vec<Value>) -> QueryResult {
        QueryResult::new(
            vec!["ttl".into(), "servers".into()],
            vec![Record::new(vec![Value::Integer(300), Value::List(servers)])],
        )
    }

    #[test]
    fn test_parse_partitions_by_role() {
        let result = table_result(vec![
            descriptor("WRITE", &["core1:7687"]),
            descriptor("READ", &["replica1:7687", "replica2:7687"]),
        ]);

        let table = parse_routing_table(&result).unwrap();
        assert_eq!(table.writers.len(), 1);
        assert_eq!(table.readers.len(), 2);
        assert_eq!(table.writers[0].host, "core1");
        assert_eq!(table.readers[1].host, "replica2");
    }

    #[test]
    fn test_parse_ignores_other_roles() {
        let result = table_result(vec![
            descriptor("ROUTE", &["router1:7687"]),
            descriptor("WRITE", &["core1:7687"]),
            descriptor("READ", &["replica1:7687"]),
        ]);

        let table = parse_routing_table(&result).unwrap();
        assert_eq!(table.writers.len(), 1);
        assert_eq!(table.readers.len(), 1);
    }

    #[test]
    fn test_parse_empty_result_fails() {
        let result = QueryResult::empty();
        let err = parse_routing_table(&result).unwrap_err();
        assert!(matches!(err, ClientError::Discovery(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_parse_missing_server_list_fails() {
        // 두 번째 값이 없음
        let result = QueryResult::new(
            vec!["ttl".into()],
            vec![Record::new(vec![Value::Integer(300)])],
        );
        assert!(parse_routing_table(&result).is_err());

        // 두 번째 값이 리스트가 아님
        let result = QueryResult::new(
            vec!["ttl".into(), "servers".into()],
            vec![Record::new(vec![Value::Integer(300), Value::from("oops")])],
        );
        assert!(parse_routing_table(&result).is_err());
    }

    #[test]
    fn test_parse_malformed_descriptor_fails() {
        let result = table_result(vec![Value::from("not a map")]);
        assert!(parse_routing_table(&result).is_err());

        let mut no_role = HashMap::new();
        no_role.insert(
            "addresses".to_string(),
            Value::List(vec![Value::from("core1:7687")]),
        );
        let result = table_result(vec![Value::Map(no_role)]);
        assert!(parse_routing_table(&result).is_err());
    }

    #[test]
    fn test_parse_bad_address_fails() {
        let result = table_result(vec![descriptor("WRITE", &["core1:notaport"])]);
        assert!(parse_routing_table(&result).is_err());
    }

    #[test]
    fn test_routing_query_literal() {
        assert_eq!(
            ROUTING_TABLE_QUERY,
            "CALL dbms.cluster.routing.getRoutingTable({})"
        );
    }
}
