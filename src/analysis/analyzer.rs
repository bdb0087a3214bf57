//! Streaming data-type analyzer
//!
//! A [`DataTypeAnalyzer`] is initialized from a [`Schema`] and then fed
//! records one at a time, in batches, or through [`DataTypeAnalyzer::analyze_iter`].
//! Each record comes back enriched with per-leaf categories while per-node
//! aggregates and global quality counters accumulate. [`DataTypeAnalyzer::finalize`]
//! can be called at any point and as often as needed.

use std::borrow::Borrow;

use tracing::{debug, info};

use super::aggregate::{AggregateEntry, AggregateTable};
use super::enriched::EnrichedValue;
use super::quality::{QualityCounters, RecordQuality};
use super::summary::AnnotatedSchema;
use super::walker::Walker;
use crate::inference::{DataTypeClassifier, InferenceConfig};
use crate::schema::{NodeId, Schema, SchemaError, SchemaTree};
use crate::value::Value;

/// Analyzer bound to one schema
#[derive(Debug, Clone)]
pub struct DataTypeAnalyzer {
    classifier: DataTypeClassifier,
    tree: SchemaTree,
    aggregates: AggregateTable,
    quality: QualityCounters,
}

impl DataTypeAnalyzer {
    /// Create an analyzer with the default inference configuration
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        Self::with_config(schema, InferenceConfig::default())
    }

    pub fn with_config(schema: &Schema, config: InferenceConfig) -> Result<Self, SchemaError> {
        let tree = SchemaTree::build(schema)?;
        info!("Initialized analyzer with {} schema nodes", tree.node_count());
        Ok(Self {
            classifier: DataTypeClassifier::with_config(config),
            aggregates: AggregateTable::new(tree.node_count()),
            quality: QualityCounters::default(),
            tree,
        })
    }

    /// Bind to a new schema, discarding all counts
    ///
    /// On error the previous schema and counts are kept.
    pub fn init(&mut self, schema: &Schema) -> Result<(), SchemaError> {
        let tree = SchemaTree::build(schema)?;
        info!("Re-initialized analyzer with {} schema nodes", tree.node_count());
        self.aggregates = AggregateTable::new(tree.node_count());
        self.quality = QualityCounters::default();
        self.tree = tree;
        Ok(())
    }

    /// Analyze one top-level record
    pub fn analyze(&mut self, record: &Value) -> EnrichedValue {
        if record.is_null() {
            debug!("Null record");
            self.quality.merge_record(&RecordQuality::default());
            return EnrichedValue::Null;
        }

        let mut walker = Walker::new(&self.classifier, &mut self.aggregates);
        let enriched = walker.walk(self.tree.root(), record);
        self.quality.merge_record(&walker.into_quality());
        enriched
    }

    /// Lazily analyze a sequence of records
    ///
    /// Nothing is counted until the returned iterator is pulled; each call to
    /// `next` analyzes exactly one record.
    pub fn analyze_iter<I>(&mut self, records: I) -> AnalyzeIter<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        AnalyzeIter {
            analyzer: self,
            records: records.into_iter(),
        }
    }

    /// Analyze a batch eagerly
    pub fn analyze_all<I>(&mut self, records: I) -> Vec<EnrichedValue>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        self.analyze_iter(records).collect()
    }

    /// Annotated copy of the schema with the counts gathered so far
    pub fn finalize(&self) -> AnnotatedSchema {
        AnnotatedSchema::build(&self.tree, &self.aggregates, self.quality)
    }

    pub fn quality(&self) -> QualityCounters {
        self.quality
    }

    /// Aggregate snapshot of a single node
    pub fn snapshot(&self, id: NodeId) -> Vec<AggregateEntry> {
        self.aggregates.snapshot(id)
    }

    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    pub fn config(&self) -> &InferenceConfig {
        self.classifier.config()
    }
}

/// Iterator returned by [`DataTypeAnalyzer::analyze_iter`]
pub struct AnalyzeIter<'a, I> {
    analyzer: &'a mut DataTypeAnalyzer,
    records: I,
}

impl<I> AnalyzeIter<'_, I> {
    /// Annotated schema reflecting only the records pulled so far
    pub fn finalize(&self) -> AnnotatedSchema {
        self.analyzer.finalize()
    }

    pub fn quality(&self) -> QualityCounters {
        self.analyzer.quality()
    }
}

impl<I> Iterator for AnalyzeIter<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Value>,
{
    type Item = EnrichedValue;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(self.analyzer.analyze(record.borrow()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
