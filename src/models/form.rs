//! Raw and sanitized form submissions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single submitted field: one value, or several when the key was repeated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Scalar view of the value. A repeated key yields its first occurrence.
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::List(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Named form fields in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldBag(IndexMap<String, FieldValue>);

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from decoded `key=value` pairs. Repeated keys accumulate
    /// into a [`FieldValue::List`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: IndexMap<String, FieldValue> = IndexMap::new();
        for (key, value) in pairs {
            let key: String = key.into();
            let value: String = value.into();
            match fields.get_mut(&key) {
                Some(FieldValue::List(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.as_text().to_string();
                    *existing = FieldValue::List(vec![first, value]);
                }
                None => {
                    fields.insert(key, FieldValue::Text(value));
                }
            }
        }
        Self(fields)
    }

    /// Builder used to assemble submissions by hand
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Remove a field, keeping the order of the others
    pub fn take(&mut self, field: &str) -> Option<FieldValue> {
        self.0.shift_remove(field)
    }

    /// Scalar value of a field, empty when absent
    pub fn text(&self, field: &str) -> String {
        self.get(field)
            .map(|value| value.as_text().to_string())
            .unwrap_or_default()
    }

    /// Multi-valued view of a field, empty when absent
    pub fn list(&self, field: &str) -> Vec<String> {
        match self.get(field) {
            None => Vec::new(),
            Some(FieldValue::Text(s)) => vec![s.clone()],
            Some(FieldValue::List(values)) => values.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_accumulate() {
        let bag = FieldBag::from_pairs(vec![
            ("title", "Dune"),
            ("genre", "1"),
            ("genre", "2"),
            ("genre", "3"),
        ]);
        assert_eq!(bag.get("title"), Some(&FieldValue::Text("Dune".to_string())));
        assert_eq!(bag.list("genre"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_of_absent_field_is_empty() {
        let bag = FieldBag::new();
        assert_eq!(bag.text("title"), "");
        assert!(bag.list("genre").is_empty());
    }

    #[test]
    fn test_deserializes_scalars_and_lists() {
        let bag: FieldBag =
            serde_json::from_str(r#"{"title":"Dune","genre":["1","2"]}"#).unwrap();
        assert_eq!(bag.text("title"), "Dune");
        assert_eq!(bag.get("genre"), Some(&FieldValue::from(vec!["1", "2"])));
    }
}
