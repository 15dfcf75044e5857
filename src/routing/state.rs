//! Routing State - 라우팅 상태
//!
//! Connection이 소유하는 라우팅 캐시입니다. 라우팅된 클러스터일 때만
//! 존재하며, 마지막 접근 모드와 역할별 서버 목록, 라우팅 드라이버
//! 재빌드용 설정 스냅샷을 담습니다.

use crate::classifier::AccessMode;
use crate::driver::{DriverConfig, ServerAddress};

use super::table::RoutingTable;

// ============================================================================
// RoutingState - 라우팅 상태
// ============================================================================

/// 라우팅 상태
///
/// `last_mode`는 최초 사용 전까지 `None`(UNSET)이며, 한 번 설정된 후에는
/// READ/WRITE 사이에서만 전이합니다.
#[derive(Debug)]
pub struct RoutingState {
    last_mode: Option<AccessMode>,
    table: RoutingTable,
    routing_config: DriverConfig,
}

impl RoutingState {
    /// 탐색된 테이블과 설정 스냅샷으로 상태 생성
    pub fn new(table: RoutingTable, routing_config: DriverConfig) -> Self {
        Self {
            last_mode: None,
            table,
            routing_config,
        }
    }

    /// 마지막 접근 모드 (`None`이면 아직 미사용)
    pub fn last_mode(&self) -> Option<AccessMode> {
        self.last_mode
    }

    /// 마지막 접근 모드 갱신
    pub(crate) fn set_last_mode(&mut self, mode: AccessMode) {
        self.last_mode = Some(mode);
    }

    /// 모드에 해당하는 서버 풀
    pub fn servers(&self, mode: AccessMode) -> &[ServerAddress] {
        match mode {
            AccessMode::Write => &self.table.writers,
            AccessMode::Read => &self.table.readers,
        }
    }

    /// 라우팅 테이블
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// 라우팅 드라이버 재빌드용 설정 스냅샷
    pub fn routing_config(&self) -> &DriverConfig {
        &self.routing_config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Auth;

    fn state() -> RoutingState {
        let mut table = RoutingTable::new();
        table.add_writer(ServerAddress::new("core1", 7687));
        table.add_reader(ServerAddress::new("replica1", 7687));
        table.add_reader(ServerAddress::new("replica2", 7687));

        let config = DriverConfig::new(ServerAddress::new("core1", 7687), Auth::none());
        RoutingState::new(table, config)
    }

    #[test]
    fn test_initial_mode_is_unset() {
        let state = state();
        assert_eq!(state.last_mode(), None);
    }

    #[test]
    fn test_mode_transitions() {
        let mut state = state();

        state.set_last_mode(AccessMode::Write);
        assert_eq!(state.last_mode(), Some(AccessMode::Write));

        state.set_last_mode(AccessMode::Read);
        assert_eq!(state.last_mode(), Some(AccessMode::Read));
    }

    #[test]
    fn test_servers_by_mode() {
        let state = state();

        assert_eq!(state.servers(AccessMode::Write).len(), 1);
        assert_eq!(state.servers(AccessMode::Read).len(), 2);
        assert_eq!(state.servers(AccessMode::Write)[0].host, "core1");
    }
}
