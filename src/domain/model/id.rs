use serde::{Deserialize, Serialize};
use std::fmt;

/// Bookのid。任意の文字列。新規採番はUUID v4文字列。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl Default for BookId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl BookId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 自動採番されるISBNトークン（UUID v4文字列）。
pub fn generate_isbn() -> String {
    uuid::Uuid::new_v4().to_string()
}
