//! Semantic data-type inference for leaf values
//!
//! This module classifies a single value into a [`DataTypeCategory`]:
//!
//! - **Empty detection** - null, empty and blank text
//! - **Literal grammars** - boolean, integer and decimal literals
//! - **Date detection** - declared candidate patterns, then a layout-based guess
//! - **Fallback** - anything else is a string
//!
//! ## Example
//!
//! ```rust,ignore
//! use data_quality_sdk::inference::{DataTypeClassifier, InferenceConfig};
//!
//! let classifier = DataTypeClassifier::with_config(
//!     InferenceConfig::builder().date_pattern("%d/%m/%Y").build(),
//! );
//! assert_eq!(classifier.classify_text("31/12/1999").to_string(), "DATE");
//! ```

mod classifier;
mod config;
mod dates;
mod types;

pub use classifier::DataTypeClassifier;
pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use dates::{
    DatePatternMatch, PatternSource, find_date_pattern, guess_date_pattern, has_hour_component,
    parses_with,
};
pub use types::DataTypeCategory;
