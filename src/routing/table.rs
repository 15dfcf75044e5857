//! Routing Table - 라우팅 테이블
//!
//! 클러스터의 서버 역할별 주소 목록입니다.

use crate::driver::ServerAddress;

// ============================================================================
// ServerRole - 서버 역할
// ============================================================================

/// 서버 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerRole {
    /// 쓰기 문장 처리 (리더)
    Write,
    /// 읽기 문장 처리 (팔로워)
    Read,
}

impl ServerRole {
    /// 역할 문자열 파싱
    ///
    /// WRITE/READ 이외의 역할은 `None`을 반환하며 탐색 시 무시됩니다.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "WRITE" => Some(Self::Write),
            "READ" => Some(Self::Read),
            _ => None,
        }
    }

    /// 역할을 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "WRITE",
            Self::Read => "READ",
        }
    }
}

// ============================================================================
// RoutingTable - 라우팅 테이블
// ============================================================================

/// 라우팅 테이블
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    /// 쓰기 서버 목록
    pub writers: Vec<ServerAddress>,
    /// 읽기 서버 목록
    pub readers: Vec<ServerAddress>,
}

impl RoutingTable {
    /// 빈 테이블 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 쓰기 서버 추가
    pub fn add_writer(&mut self, address: ServerAddress) {
        if !self.writers.contains(&address) {
            self.writers.push(address);
        }
    }

    /// 읽기 서버 추가
    pub fn add_reader(&mut self, address: ServerAddress) {
        if !self.readers.contains(&address) {
            self.readers.push(address);
        }
    }

    /// 역할별 서버 추가
    pub fn add_server(&mut self, role: ServerRole, address: ServerAddress) {
        match role {
            ServerRole::Write => self.add_writer(address),
            ServerRole::Read => self.add_reader(address),
        }
    }

    /// 쓰기 서버 존재 여부
    pub fn has_writers(&self) -> bool {
        !self.writers.is_empty()
    }

    /// 읽기 서버 존재 여부
    pub fn has_readers(&self) -> bool {
        !self.readers.is_empty()
    }

    /// 서버 존재 여부
    pub fn has_servers(&self) -> bool {
        self.has_writers() || self.has_readers()
    }
}

// ============================================================================
// Tests
// ============================================================================
