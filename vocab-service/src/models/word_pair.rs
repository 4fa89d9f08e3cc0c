use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One English word and its Korean meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub eng: String,
    pub kor: String,
}

impl WordPair {
    pub fn new(eng: impl Into<String>, kor: impl Into<String>) -> Self {
        Self {
            eng: eng.into(),
            kor: kor.into(),
        }
    }

    /// Build a pair from one element of the model's JSON array.
    ///
    /// Returns `None` unless both `eng` and `kor` are non-blank strings.
    pub fn from_json(item: &Value) -> Option<Self> {
        let field = |key: &str| {
            item.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            eng: field("eng")?,
            kor: field("kor")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_trims_fields() {
        let pair = WordPair::from_json(&json!({"eng": " apple ", "kor": "사과\n"})).unwrap();
        assert_eq!(pair, WordPair::new("apple", "사과"));
    }

    #[test]
    fn from_json_rejects_missing_or_blank_fields() {
        assert!(WordPair::from_json(&json!({"eng": "apple"})).is_none());
        assert!(WordPair::from_json(&json!({"eng": "", "kor": "사과"})).is_none());
        assert!(WordPair::from_json(&json!({"eng": "apple", "kor": 3})).is_none());
        assert!(WordPair::from_json(&json!("apple")).is_none());
    }

    #[test]
    fn serializes_with_short_keys() {
        let value = serde_json::to_value(WordPair::new("book", "책")).unwrap();
        assert_eq!(value, json!({"eng": "book", "kor": "책"}));
    }
}
