//! Enriched output values

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::inference::DataTypeCategory;
use crate::value::Value;

/// A record value with every leaf paired with its inferred category
///
/// Serializes as plain JSON where each leaf becomes
/// `{"value": ..., "dataType": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichedValue {
    /// Null record, null union value, or a position whose shape did not match
    Null,
    Leaf {
        value: Value,
        data_type: DataTypeCategory,
    },
    Record(Vec<(String, EnrichedValue)>),
    Array(Vec<EnrichedValue>),
}

impl EnrichedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, EnrichedValue::Null)
    }

    /// Category of a leaf
    pub fn data_type(&self) -> Option<DataTypeCategory> {
        match self {
            EnrichedValue::Leaf { data_type, .. } => Some(*data_type),
            _ => None,
        }
    }

    /// Original value of a leaf
    pub fn value(&self) -> Option<&Value> {
        match self {
            EnrichedValue::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Field of an enriched record
    pub fn get(&self, name: &str) -> Option<&EnrichedValue> {
        match self {
            EnrichedValue::Record(fields) => {
                fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Elements of an enriched array
    pub fn elements(&self) -> &[EnrichedValue] {
        match self {
            EnrichedValue::Array(items) => items,
            _ => &[],
        }
    }
}

impl Serialize for EnrichedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EnrichedValue::Null => serializer.serialize_none(),
            EnrichedValue::Leaf { value, data_type } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("dataType", data_type)?;
                map.end()
            }
            EnrichedValue::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, field) in fields {
                    map.serialize_entry(name, field)?;
                }
                map.end()
            }
            EnrichedValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize() {
        let enriched = EnrichedValue::Record(vec![
            (
                "name".to_string(),
                EnrichedValue::Leaf {
                    value: Value::from("Alice"),
                    data_type: DataTypeCategory::String,
                },
            ),
            ("zip".to_string(), EnrichedValue::Null),
            (
                "scores".to_string(),
                EnrichedValue::Array(vec![EnrichedValue::Leaf {
                    value: Value::Long(3),
                    data_type: DataTypeCategory::Integer,
                }]),
            ),
        ]);

        assert_eq!(
            serde_json::to_value(&enriched).unwrap(),
            json!({
                "name": {"value": "Alice", "dataType": "STRING"},
                "zip": null,
                "scores": [{"value": 3, "dataType": "INTEGER"}]
            })
        );
    }

    #[test]
    fn test_accessors() {
        let leaf = EnrichedValue::Leaf {
            value: Value::from("x"),
            data_type: DataTypeCategory::String,
        };
        assert_eq!(leaf.data_type(), Some(DataTypeCategory::String));
        assert_eq!(leaf.value(), Some(&Value::from("x")));
        assert!(leaf.elements().is_empty());
        assert!(EnrichedValue::Null.get("a").is_none());
    }
}
