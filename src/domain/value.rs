//! Mock value tree produced by synthesis.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A node of a synthesized payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<MockValue>),
    /// Map field entries in insertion order.
    Map(Vec<(MockValue, MockValue)>),
    Record(Record),
}

impl MockValue {
    /// Value used when a field type cannot be resolved.
    pub const UNRESOLVED: MockValue = MockValue::Int(0);

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MockValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            MockValue::Int(i) => Value::from(*i),
            MockValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            MockValue::Bool(b) => Value::Bool(*b),
            MockValue::String(s) => Value::String(s.clone()),
            MockValue::Bytes(bytes) => Value::String(STANDARD.encode(bytes)),
            MockValue::List(items) => Value::Array(items.iter().map(MockValue::to_json).collect()),
            MockValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.map_key(), v.to_json()))
                    .collect(),
            ),
            MockValue::Record(record) => record.to_json(),
        }
    }

    /// String form of a value used as a JSON object key.
    pub fn map_key(&self) -> String {
        match self {
            MockValue::String(s) => s.clone(),
            MockValue::Int(i) => i.to_string(),
            MockValue::Float(f) => f.to_string(),
            MockValue::Bool(b) => b.to_string(),
            MockValue::Bytes(bytes) => STANDARD.encode(bytes),
            other => other.to_json().to_string(),
        }
    }
}

impl From<Record> for MockValue {
    fn from(record: Record) -> Self {
        MockValue::Record(record)
    }
}

impl Serialize for MockValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MockValue::Int(i) => serializer.serialize_i64(*i),
            MockValue::Float(f) => serializer.serialize_f64(*f),
            MockValue::Bool(b) => serializer.serialize_bool(*b),
            MockValue::String(s) => serializer.serialize_str(s),
            MockValue::Bytes(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            MockValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            MockValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.map_key(), value)?;
                }
                map.end()
            }
            MockValue::Record(record) => record.serialize(serializer),
        }
    }
}

/// Immutable, ordered field name to value record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, MockValue)>,
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&MockValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MockValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Accumulates fields in order and finishes into a [`Record`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<(String, MockValue)>,
}

impl RecordBuilder {
    /// Sets a field; a repeated name overwrites the earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: MockValue) -> &mut Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn finish(self) -> Record {
        Record {
            fields: self.fields,
        }
    }
}
