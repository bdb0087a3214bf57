//! Leaf value classification
//!
//! Order matters: empty, then boolean, integer and double literals, then
//! dates, and STRING as the catch-all. Numeric-looking text therefore never
//! ends up as a date, and classification never fails.

use once_cell::sync::Lazy;
use regex::Regex;

use super::config::InferenceConfig;
use super::dates::{DatePatternMatch, find_date_pattern};
use super::types::DataTypeCategory;
use crate::value::Value;

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

static DOUBLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").unwrap()
});

static SPECIAL_DOUBLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?(?i:inf|infinity)|(?i:nan))$").unwrap());

/// Classifies leaf values into [`DataTypeCategory`]
#[derive(Debug, Clone, Default)]
pub struct DataTypeClassifier {
    config: InferenceConfig,
}

impl DataTypeClassifier {
    /// Create a classifier with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Classify a leaf value
    ///
    /// Null is EMPTY and typed floating point values are DOUBLE, including
    /// NaN and infinities. Records, arrays and non-UTF-8 bytes have no
    /// textual leaf form and are UNKNOWN.
    pub fn classify(&self, value: &Value) -> DataTypeCategory {
        match value {
            Value::Null => DataTypeCategory::Empty,
            Value::Float(_) | Value::Double(_) => DataTypeCategory::Double,
            other => match other.as_text() {
                Some(text) => self.classify_text(&text),
                None => DataTypeCategory::Unknown,
            },
        }
    }

    /// Classify a textual value
    pub fn classify_text(&self, text: &str) -> DataTypeCategory {
        if text.trim().is_empty() {
            return DataTypeCategory::Empty;
        }
        let text = if self.config.trim_values {
            text.trim()
        } else {
            text
        };

        if is_boolean(text) {
            DataTypeCategory::Boolean
        } else if INTEGER_REGEX.is_match(text) {
            DataTypeCategory::Integer
        } else if is_double(text) {
            DataTypeCategory::Double
        } else if self.detect_date_pattern(text).is_some() {
            DataTypeCategory::Date
        } else {
            DataTypeCategory::String
        }
    }

    /// Date pattern that parses `text`, declared patterns first
    pub fn detect_date_pattern(&self, text: &str) -> Option<DatePatternMatch> {
        find_date_pattern(
            text,
            &self.config.date_patterns,
            self.config.guess_date_patterns,
        )
    }
}

fn is_boolean(text: &str) -> bool {
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
}

/// A decimal literal needs a decimal point or an exponent; plain digits are integers
fn is_double(text: &str) -> bool {
    if SPECIAL_DOUBLE_REGEX.is_match(text) {
        return true;
    }
    DOUBLE_REGEX.is_match(text) && text.contains(['.', 'e', 'E'])
}
