//! Result record and pagination cursor definitions

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Opaque locator for the next page of a paginated result set.
///
/// Always an absolute URL; adapters that receive relative continuation
/// tokens resolve them before constructing a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One search record mapped from a raw provider record.
///
/// Holds the provider-assigned identifying name, a structured key/value
/// payload, and a canonical human-readable rendering (the [`fmt::Display`]
/// impl). Immutable after construction.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    name: String,
    fields: Map<String, Value>,
    rendering: String,
}

impl SearchHit {
    pub fn new(name: impl Into<String>, fields: Map<String, Value>, rendering: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            rendering: rendering.into(),
        }
    }

    /// Provider-assigned identifier for this record
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structured payload projected from the raw provider record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single payload field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The payload serialized as a JSON object string
    pub fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_accessors() {
        let mut fields = Map::new();
        fields.insert("text".to_string(), json!("hello"));
        let hit = SearchHit::new("42", fields, "42: hello");

        assert_eq!(hit.name(), "42");
        assert_eq!(hit.field("text"), Some(&json!("hello")));
        assert_eq!(hit.field("missing"), None);
        assert_eq!(hit.to_string(), "42: hello");
        assert_eq!(hit.to_json_string(), r#"{"text":"hello"}"#);
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = PageCursor::new("https://api.example.com/page2");
        assert_eq!(cursor.as_str(), "https://api.example.com/page2");
    }
}
