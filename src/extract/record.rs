//! Extracted records.
//!
//! A [`Record`] is an ordered map from field name to a string, a flag, or a
//! nested list of records. Records are only ever produced by
//! [`RecordBuilder`], which refuses empty values, so a persisted record never
//! carries `""` or `[]`.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value of one extracted field before it enters a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Records(Vec<Record>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Flag(_) => false,
            FieldValue::Records(r) => r.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flat cell text for tabular output. Missing keys give an empty cell;
    /// nested records are flattened to `a b, c d`.
    pub fn cell(&self, key: &str) -> String {
        self.0.get(key).map(flatten).unwrap_or_default()
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten).filter(|s| !s.is_empty()).join(", "),
        Value::Object(map) => map.values().map(flatten).filter(|s| !s.is_empty()).join(" "),
        other => other.to_string(),
    }
}

/// Builds a [`Record`], silently dropping empty values.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    map: Map<String, Value>,
}

impl RecordBuilder {
    pub fn value(mut self, key: &str, value: FieldValue) -> Self {
        if value.is_empty() {
            return self;
        }
        let json = match value {
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Flag(b) => Value::Bool(b),
            FieldValue::Records(records) => {
                Value::Array(records.into_iter().map(|r| Value::Object(r.0)).collect())
            }
        };
        self.map.insert(key.to_string(), json);
        self
    }

    pub fn text(self, key: &str, value: impl Into<String>) -> Self {
        self.value(key, FieldValue::Text(value.into()))
    }

    pub fn flag(self, key: &str, value: bool) -> Self {
        self.value(key, FieldValue::Flag(value))
    }

    pub fn build(self) -> Record {
        Record(self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_never_inserts_empty_values() {
        let record = Record::builder()
            .text("title", "Final")
            .text("date", "")
            .value("teams", FieldValue::Records(vec![]))
            .flag("winner", false)
            .build();

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["title", "winner"]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"title":"Final","winner":false}"#);
    }

    #[test]
    fn keys_keep_insertion_order() {
        let record = Record::builder().text("z", "1").text("a", "2").text("m", "3").build();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn nested_records_serialize_as_arrays() {
        let inner = Record::builder().text("name", "Colegio Don Bosco").build();
        let outer = Record::builder().text("title", "Grupo A").value("teams", FieldValue::Records(vec![inner])).build();
        let json = serde_json::to_value(&outer).unwrap();
        assert_eq!(json["teams"][0]["name"], "Colegio Don Bosco");
    }

    #[test]
    fn cell_flattens_scalars() {
        let record = Record::builder().text("name", "A").flag("winner", true).build();
        assert_eq!(record.cell("name"), "A");
        assert_eq!(record.cell("winner"), "true");
        assert_eq!(record.cell("missing"), "");
    }

    #[test]
    fn cell_flattens_nested_records() {
        let sets = vec![
            Record::builder().text("score", "25-20").build(),
            Record::builder().text("score", "23-25").build(),
        ];
        let record = Record::builder().value("sets", FieldValue::Records(sets)).build();
        assert_eq!(record.cell("sets"), "25-20, 23-25");
    }
}
