//! Server Selector - 서버 선택
//!
//! 서버 선택 전략을 정의합니다. 기본은 균등 랜덤이며, 테스트에서는
//! 결정적 선택기를 주입할 수 있습니다.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::driver::ServerAddress;

// ============================================================================
// ServerSelector - 선택기 트레이트
// ============================================================================

/// 서버 선택기
pub trait ServerSelector: fmt::Debug {
    /// 서버 목록에서 하나 선택
    ///
    /// 빈 목록이면 `None`을 반환합니다.
    fn select<'a>(&self, servers: &'a [ServerAddress]) -> Option<&'a ServerAddress>;
}

// ============================================================================
// RandomSelector - 균등 랜덤 선택기
// ============================================================================

/// 균등 랜덤 선택기 (기본값)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl ServerSelector for RandomSelector {
    fn select<'a>(&self, servers: &'a [ServerAddress]) -> Option<&'a ServerAddress> {
        if servers.is_empty() {
            return None;
        }

        use rand::Rng;
        let index = rand::thread_rng().gen_range(0..servers.len());
        Some(&servers[index])
    }
}

// ============================================================================
// RoundRobinSelector - 라운드 로빈 선택기
// ============================================================================

/// 라운드 로빈 선택기
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    index: AtomicUsize,
}

impl RoundRobinSelector {
    /// 새 선택기 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 인덱스 리셋
    pub fn reset(&self) {
        self.index.store(0, Ordering::Relaxed);
    }
}

impl ServerSelector for RoundRobinSelector {
    fn select<'a>(&self, servers: &'a [ServerAddress]) -> Option<&'a ServerAddress> {
        if servers.is_empty() {
            return None;
        }

        let index = self.index.fetch_add(1, Ordering::Relaxed);
        Some(&servers[index % servers.len()])
    }
}

// ============================================================================
// Tests
// ============================================================================
