//! Semantic data-type categories

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic category inferred for a single leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataTypeCategory {
    String,
    Integer,
    Double,
    Boolean,
    Date,
    /// Null, empty or blank value
    Empty,
    /// Value that has no textual leaf form, e.g. a container where a leaf was declared
    Unknown,
}

impl DataTypeCategory {
    pub const ALL: [DataTypeCategory; 7] = [
        DataTypeCategory::String,
        DataTypeCategory::Integer,
        DataTypeCategory::Double,
        DataTypeCategory::Boolean,
        DataTypeCategory::Date,
        DataTypeCategory::Empty,
        DataTypeCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataTypeCategory::String => "STRING",
            DataTypeCategory::Integer => "INTEGER",
            DataTypeCategory::Double => "DOUBLE",
            DataTypeCategory::Boolean => "BOOLEAN",
            DataTypeCategory::Date => "DATE",
            DataTypeCategory::Empty => "EMPTY",
            DataTypeCategory::Unknown => "UNKNOWN",
        }
    }

    /// Numeric categories, routed to number generators by maskers
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataTypeCategory::Integer | DataTypeCategory::Double)
    }
}

impl std::fmt::Display for DataTypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataTypeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataTypeCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown data type category: {}", s))
    }
}
