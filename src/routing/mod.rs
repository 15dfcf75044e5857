//! Routing - 클러스터 라우팅
//!
//! 라우팅 테이블 탐색과 캐시, 서버 선택을 담당합니다. 탐색은 생성 시점에
//! 한 번만 수행되며 주기적 갱신은 하지 않습니다.

mod discovery;
mod selector;
mod state;
mod table;

pub use discovery::{discover, parse_routing_table, ROUTING_TABLE_QUERY};
pub use selector::{RandomSelector, RoundRobinSelector, ServerSelector};
pub use state::RoutingState;
pub use table::{RoutingTable, ServerRole};
