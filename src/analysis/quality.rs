//! Global quality counters

use serde::{Deserialize, Serialize};

use crate::inference::DataTypeCategory;

/// Root-level counters over every analyzed record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCounters {
    /// Top-level records seen, null records included
    pub records_analyzed: u64,
    /// EMPTY leaves plus null values in union positions
    pub null_fields: u64,
    /// UNKNOWN leaves plus values whose shape matched no schema position
    pub invalid_fields: u64,
    /// Leaves classified to any other category
    pub valid_fields: u64,
}

impl QualityCounters {
    /// Fold one top-level record into the totals
    pub fn merge_record(&mut self, record: &RecordQuality) {
        self.records_analyzed += 1;
        self.null_fields += record.null_fields;
        self.invalid_fields += record.invalid_fields;
        self.valid_fields += record.valid_fields;
    }
}

/// Counters accumulated during a single walker pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuality {
    pub null_fields: u64,
    pub invalid_fields: u64,
    pub valid_fields: u64,
}

impl RecordQuality {
    pub fn count_leaf(&mut self, category: DataTypeCategory) {
        match category {
            DataTypeCategory::Empty => self.null_fields += 1,
            DataTypeCategory::Unknown => self.invalid_fields += 1,
            _ => self.valid_fields += 1,
        }
    }

    pub fn count_null(&mut self) {
        self.null_fields += 1;
    }

    pub fn count_mismatch(&mut self) {
        self.invalid_fields += 1;
    }
}
