//! Data Quality SDK - Schema-driven data-type analysis of structured records
//!
//! Provides:
//! - Schema model and Avro schema parsing
//! - Semantic data-type inference for leaf values
//! - Streaming record analysis with per-field aggregates
//! - Quality summaries rendered back onto the schema

pub mod analysis;
pub mod inference;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use analysis::{
    AggregateEntry, AnalyzeIter, AnnotatedNode, AnnotatedSchema, DataTypeAnalyzer, EnrichedValue,
    QualityCounters,
};
pub use inference::{DataTypeCategory, DataTypeClassifier, InferenceConfig};
pub use schema::{FieldDef, PrimitiveKind, Schema, SchemaError, SchemaTree};
pub use value::Value;
