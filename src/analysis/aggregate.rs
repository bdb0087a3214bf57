//! Per-node data-type aggregates

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::inference::DataTypeCategory;
use crate::schema::{NodeId, SchemaNode};

/// One line of an aggregate snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateEntry {
    pub data_type: DataTypeCategory,
    pub total: u64,
}

/// Running count of inferred categories for one schema node
///
/// Categories keep the order in which they were first observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    entries: Vec<(DataTypeCategory, u64)>,
}

impl Aggregate {
    pub fn observe(&mut self, category: DataTypeCategory) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((category, 1)),
        }
    }

    pub fn count(&self, category: DataTypeCategory) -> u64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Sum over all categories
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts sorted by total, descending; equal totals keep first-observed order
    pub fn snapshot(&self) -> Vec<AggregateEntry> {
        let mut entries: Vec<AggregateEntry> = self
            .entries
            .iter()
            .map(|&(data_type, total)| AggregateEntry { data_type, total })
            .collect();
        // sort_by is stable
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        entries
    }
}

/// Aggregates for every node of a schema tree, indexed by [`NodeId`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    aggregates: Vec<Aggregate>,
}

impl AggregateTable {
    /// One empty aggregate per node
    pub fn new(node_count: usize) -> Self {
        Self {
            aggregates: vec![Aggregate::default(); node_count],
        }
    }

    /// Record one observation on `node`
    ///
    /// NULL-typed nodes never receive entries.
    pub fn observe(&mut self, node: &SchemaNode, category: DataTypeCategory) {
        if node.is_null() {
            trace!("Ignoring {} observation on null node {:?}", category, node.id);
            return;
        }
        if let Some(aggregate) = self.aggregates.get_mut(node.id.index()) {
            aggregate.observe(category);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Aggregate> {
        self.aggregates.get(id.index())
    }

    /// Snapshot of one node; empty for unknown ids
    pub fn snapshot(&self, id: NodeId) -> Vec<AggregateEntry> {
        self.get(id).map(Aggregate::snapshot).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}
