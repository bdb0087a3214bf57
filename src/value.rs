//! Runtime record values
//!
//! A [`Value`] mirrors the shape of a schema at runtime. Union values carry no
//! tag: the analyzer picks the matching member from the value's concrete
//! shape.

use std::borrow::Cow;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::schema::PrimitiveKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Named fields in record order
    Record(Vec<(String, Value)>),
    Array(Vec<Value>),
}

impl Value {
    /// Build a record value from `(name, value)` pairs
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field of a record value; `None` for a missing field or a non-record value
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Primitive kind carried by a leaf value; `None` for records and arrays
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Null => Some(PrimitiveKind::Null),
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            Value::String(_) => Some(PrimitiveKind::String),
            Value::Bytes(_) => Some(PrimitiveKind::Bytes),
            Value::Record(_) | Value::Array(_) => None,
        }
    }

    /// Textual form of a leaf value
    ///
    /// Returns `None` for null, containers and bytes that are not UTF-8.
    /// Floating point values keep their decimal point (`3.0`, not `3`).
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null | Value::Record(_) | Value::Array(_) => None,
            Value::Boolean(b) => Some(Cow::Owned(b.to_string())),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Long(l) => Some(Cow::Owned(l.to_string())),
            Value::Float(f) => Some(Cow::Owned(format!("{:?}", f))),
            Value::Double(d) => Some(Cow::Owned(format!("{:?}", d))),
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Bytes(b) => std::str::from_utf8(b).ok().map(Cow::Borrowed),
        }
    }

    /// Convert plain JSON into a value
    ///
    /// Objects become records, integral numbers `Long` and other numbers
    /// `Double`.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(l) => Value::Long(l),
                None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as plain JSON; records become objects and bytes lossy UTF-8 strings
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Long(l) => JsonValue::from(*l),
            Value::Float(f) => JsonValue::from(f64::from(*f)),
            Value::Double(d) => JsonValue::from(*d),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
            Value::Record(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(&json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
