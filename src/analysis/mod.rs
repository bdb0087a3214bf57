//! Record analysis
//!
//! Walks records against an initialized schema tree, classifying every leaf,
//! accumulating per-node aggregates and global quality counters, and
//! summarizing them into an [`AnnotatedSchema`].

mod aggregate;
mod analyzer;
mod enriched;
mod quality;
mod summary;
mod walker;

pub use aggregate::{Aggregate, AggregateEntry, AggregateTable};
pub use analyzer::{AnalyzeIter, DataTypeAnalyzer};
pub use enriched::EnrichedValue;
pub use quality::{QualityCounters, RecordQuality};
pub use summary::{
    AnnotatedField, AnnotatedKind, AnnotatedNode, AnnotatedSchema, DATA_TYPE_AGGREGATE_PROP,
    GLOBAL_QUALITY_PROP,
};
