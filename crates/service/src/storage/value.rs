use serde::{Deserialize, Serialize};

/// Tagged value for maps that must hold more than one payload kind.
///
/// Accessors return `None` on a kind mismatch instead of panicking, so a
/// reader always has to handle the case where a key holds the other kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CacheValue {
    Text(String),
    Int(i64),
}

impl CacheValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CacheValue::Text(s) => Some(s),
            CacheValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CacheValue::Int(n) => Some(*n),
            CacheValue::Text(_) => None,
        }
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self { CacheValue::Text(s) }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self { CacheValue::Text(s.to_string()) }
}

impl From<i64> for CacheValue {
    fn from(n: i64) -> Self { CacheValue::Int(n) }
}
