//! Occurrence aggregation across a training corpus
//!
//! Accumulates per-field occurrence multisets from many documents.
//! Merging is commutative and associative over those multisets, so
//! documents can be matched in parallel and partial aggregates combined
//! in any order; all downstream statistics are order-independent.

use crate::matcher::Occurrence;
use std::collections::BTreeMap;

/// Per-field occurrence multiset for one bank's training corpus
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    fields: BTreeMap<String, Vec<Occurrence>>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's matcher output.
    pub fn merge_document(&mut self, batch: BTreeMap<String, Vec<Occurrence>>) {
        for (field, occurrences) in batch {
            self.fields.entry(field).or_default().extend(occurrences);
        }
    }

    /// Combine two partial aggregates (reduce step for parallel
    /// ingestion).
    pub fn merge(mut self, other: Aggregate) -> Aggregate {
        for (field, occurrences) in other.fields {
            self.fields.entry(field).or_default().extend(occurrences);
        }
        self
    }

    pub fn occurrences(&self, field: &str) -> Option<&[Occurrence]> {
        self.fields.get(field).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
