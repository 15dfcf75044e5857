//! Value - 파라미터/결과 값
//!
//! 문장 파라미터와 결과 레코드에 쓰이는 값 타입

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Value - 값
// ============================================================================

/// 문장 파라미터 및 결과 값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// 널
    Null,
    /// 불리언
    Bool(bool),
    /// 정수
    Integer(i64),
    /// 실수
    Float(f64),
    /// 문자열
    String(String),
    /// 리스트
    List(Vec<Value>),
    /// 맵
    Map(HashMap<String, Value>),
}

impl Value {
    /// 널 여부
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 불리언으로 변환
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 정수로 변환
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// 실수로 변환
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// 리스트로 변환
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// 맵으로 변환
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
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
    fn test_value_from() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Integer(42));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from("hello"), Value::String("hello".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(1i64)), Value::Integer(1));
    }

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(7).as_int(), Some(7));
        assert_eq!(Value::Integer(7).as_float(), Some(7.0));
        assert_eq!(Value::String("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Integer(7).as_str(), None);

        let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));

        let mut entries = HashMap::new();
        entries.insert("role".to_string(), Value::from("WRITE"));
        let map = Value::Map(entries);
        assert_eq!(
            map.as_map().and_then(|m| m.get("role")).and_then(Value::as_str),
            Some("WRITE")
        );
    }
}
