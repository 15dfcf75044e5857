//! Statement Classifier - 문장 분류
//!
//! Cypher 문장을 읽기/쓰기로 분류합니다.

use std::fmt;

// ============================================================================
// AccessMode - 접근 모드
// ============================================================================

/// 접근 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// 읽기
    Read,
    /// 쓰기
    Write,
}

impl AccessMode {
    /// 모드를 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// classify - 문장 분류
// ============================================================================

/// 쓰기 문장을 나타내는 Cypher 키워드 (대문자 관례)
const WRITE_CLAUSES: [&str; 4] = ["CREATE", "SET", "MERGE", "DELETE"];

/// 문장을 접근 모드로 분류
///
/// CREATE, SET, MERGE, DELETE 중 하나가 단어 단위로 포함되어 있으면
/// [`AccessMode::Write`], 아니면 [`AccessMode::Read`]입니다. 대소문자를
/// 구분하며 소문자 키워드는 쓰기로 간주하지 않습니다.
pub fn classify(statement: &str) -> AccessMode {
    if WRITE_CLAUSES
        .iter()
        .any(|clause| contains_word(statement, clause))
    {
        AccessMode::Write
    } else {
        AccessMode::Read
    }
}

/// 단어 단위 포함 여부
fn contains_word(text: &str, word: &str) -> bool {
    let bytes = text.as_bytes();
    for (start, _) in text.match_indices(word) {
        let end = start + word.len();
        let boundary_before = start == 0 || !is_word_byte(bytes[start - 1]);
        let boundary_after = end == bytes.len() || !is_word_byte(bytes[end]);
        if boundary_before && boundary_after {
            return true;
        }
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ============================================================================
// Tests
// ============================================================================
