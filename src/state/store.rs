//! Deduplicated record storage

use crate::record::Record;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Maps canonical links to the record extracted from them
///
/// A later write for the same link replaces the earlier record wholesale.
/// Iteration is by link, which gives ranking a deterministic base order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Mutex<BTreeMap<String, Record>>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its link, returning the record it replaced
    pub fn insert(&self, record: Record) -> Option<Record> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.link.clone(), record)
    }

    /// Returns the record stored for a link
    pub fn get(&self, link: &str) -> Option<Record> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.get(link).cloned()
    }

    /// Returns the number of distinct links stored
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether no record has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the store, returning records in link order
    pub fn into_records(self) -> Vec<Record> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_values()
            .collect()
    }

    /// Returns a copy of all records in link order
    pub fn snapshot(&self) -> Vec<Record> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.values().cloned().collect()
    }
}
